// 🏷️ Name Normalization - Honorific prefixes as data
// "Mother Jane" and "Jane" name the same responsible party.

use serde::{Deserialize, Serialize};

/// Honorific/role prefixes stripped by default
pub const DEFAULT_HONORIFIC_PREFIXES: [&str; 4] = ["Mother ", "Father ", "אמא ", "אבא "];

/// Strips one leading honorific prefix from a party name.
///
/// Prefixes are tried in list order and the first match wins. Matching is
/// exact (case and trailing space included); at most one prefix is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameNormalizer {
    prefixes: Vec<String>,
}

impl NameNormalizer {
    pub fn new(prefixes: Vec<String>) -> Self {
        NameNormalizer {
            prefixes: prefixes.into_iter().filter(|p| !p.is_empty()).collect(),
        }
    }

    /// Normalizer that strips nothing
    pub fn identity() -> Self {
        NameNormalizer { prefixes: Vec::new() }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Normalized party name; `None` becomes `""`
    pub fn normalize(&self, name: Option<&str>) -> String {
        let Some(name) = name else {
            return String::new();
        };

        for prefix in &self.prefixes {
            if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                return rest.to_string();
            }
        }

        name.to_string()
    }

    /// Identity comparison of two party names
    pub fn same_party(&self, a: Option<&str>, b: Option<&str>) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        NameNormalizer::new(DEFAULT_HONORIFIC_PREFIXES.iter().map(|p| p.to_string()).collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
