// ⚙️ Engine Configuration - Family conventions as data
//
// Everything the original screens hardcoded (honorific prefixes, parent
// colors, the chore category label) lives here and is loaded from JSON.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::custody::DuplicatePolicy;
use crate::entities::TaskCategory;
use crate::error::ScheduleError;
use crate::normalize::{NameNormalizer, DEFAULT_HONORIFIC_PREFIXES};

pub const DEFAULT_PARTY_COLOR: &str = "#64748B";
pub const DEFAULT_ACTIVITY_COLOR: &str = "#10B981";
pub const DEFAULT_CUSTODY_TITLE_PREFIX: &str = "Responsible: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stripped from party names before any comparison
    pub honorific_prefixes: Vec<String>,

    /// Normalized party name → display color
    pub party_colors: BTreeMap<String, String>,

    /// Color for parties missing from `party_colors`
    pub default_party_color: String,

    /// Color for activities that carry none
    pub default_activity_color: String,

    /// Title of custody items is this prefix followed by the party
    pub custody_title_prefix: String,

    /// What to do with two overrides on the same date
    pub duplicate_policy: DuplicatePolicy,

    /// Extra raw category labels treated as household chores
    pub household_chore_categories: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            honorific_prefixes: DEFAULT_HONORIFIC_PREFIXES.iter().map(|p| p.to_string()).collect(),
            party_colors: BTreeMap::new(),
            default_party_color: DEFAULT_PARTY_COLOR.to_string(),
            default_activity_color: DEFAULT_ACTIVITY_COLOR.to_string(),
            custody_title_prefix: DEFAULT_CUSTODY_TITLE_PREFIX.to_string(),
            duplicate_policy: DuplicatePolicy::FirstWins,
            household_chore_categories: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: EngineConfig = serde_json::from_str(&content)
            .context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Colors must be `#RRGGBB`
    pub fn validate(&self) -> std::result::Result<(), ScheduleError> {
        let colors = self
            .party_colors
            .values()
            .chain(std::iter::once(&self.default_party_color))
            .chain(std::iter::once(&self.default_activity_color));

        for color in colors {
            if !is_hex_color(color) {
                return Err(ScheduleError::Config(format!(
                    "invalid color '{}': expected #RRGGBB",
                    color
                )));
            }
        }

        Ok(())
    }

    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::new(self.honorific_prefixes.clone())
    }

    pub fn with_party_color(mut self, party: &str, color: &str) -> Self {
        self.party_colors.insert(party.to_string(), color.to_string());
        self
    }

    /// Display color for an already-normalized party name
    pub fn color_for_party(&self, party: &str) -> &str {
        self.party_colors
            .get(party)
            .map(String::as_str)
            .unwrap_or(&self.default_party_color)
    }

    pub fn is_household_chore(&self, category: &TaskCategory) -> bool {
        match category {
            TaskCategory::HouseholdChore => true,
            TaskCategory::Other(raw) => self
                .household_chore_categories
                .iter()
                .any(|label| label.trim() == raw.trim()),
            TaskCategory::Homework | TaskCategory::Personal => false,
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
