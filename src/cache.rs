// 🗄️ Schedule Cache - Memoized custody maps per (family, range)
//
// Each entry remembers a SHA-256 fingerprint of what it was built from: the
// resolver's prefixes and duplicate policy, the template and the overrides.
// A lookup with different inputs is a miss and replaces the entry.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::custody::{CustodyMap, CustodyResolver};
use crate::dates::DateRange;
use crate::entities::{CustodyOverride, CustodyTemplate};
use crate::error::Result;

type CacheKey = (String, DateRange);

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: String,
    map: CustodyMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Thread-safe custody map cache. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct ScheduleCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        ScheduleCache::default()
    }

    /// Cached map for `(family_id, range)`, building it on a miss
    pub fn get_or_build(
        &self,
        resolver: &CustodyResolver,
        family_id: &str,
        template: Option<&CustodyTemplate>,
        overrides: &[CustodyOverride],
        range: DateRange,
    ) -> Result<CustodyMap> {
        let fingerprint = fingerprint(resolver, template, overrides)?;
        let key = (family_id.to_string(), range);

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = entries.get(&key) {
                if entry.fingerprint == fingerprint {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(entry.map.clone());
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let map = resolver.build_custody_map(template, overrides, range)?;

        debug!(family_id, from = %range.from, to = %range.to, "custody map cached");

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                fingerprint,
                map: map.clone(),
            },
        );

        Ok(map)
    }

    /// Drop every entry for a family. Returns how many were removed.
    pub fn invalidate_family(&self, family_id: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|(family, _), _| family != family_id);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().unwrap_or_else(|e| e.into_inner()).len(),
        }
    }
}

/// SHA-256 over the resolver settings and the serialized custody inputs
fn fingerprint(
    resolver: &CustodyResolver,
    template: Option<&CustodyTemplate>,
    overrides: &[CustodyOverride],
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(resolver.normalizer().prefixes())?);
    hasher.update(serde_json::to_vec(&resolver.policy())?);
    hasher.update(serde_json::to_vec(&template)?);
    hasher.update(serde_json::to_vec(overrides)?);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================
