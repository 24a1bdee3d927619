//! Matcher cache for compiled include/exclude filters
//!
//! Compiling a filter list is cheap but happens for every field on every
//! recomputation, and most recomputations change one field at a time. This
//! cache keeps compiled filters keyed by a digest of the canonicalised list so
//! unchanged fields reuse their previous compilation.
//!
//! The cache is an explicit object owned by the caller. Dropping or clearing
//! it only costs recompilation.

use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use leadlens_core::config::EngineConfig;
use leadlens_core::metrics::MATCHER_CACHE_LOOKUPS;
use leadlens_core::{FilterMode, FilterValue};

use crate::matcher::{CompiledKeywordFilter, CompiledValueFilter, KeywordMatcher, ValueMatcher};

/// Cache key for a filter list
/// Uses SHA-256 of the canonical list so that order and duplicates don't matter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MatcherCacheKey {
    digest: [u8; 32],
}

impl MatcherCacheKey {
    fn new(values: &[FilterValue], include_blanks: bool) -> Self {
        let mut canonical: Vec<(FilterMode, &str)> = values
            .iter()
            .map(|v| (v.mode, v.value.as_str()))
            .collect();
        canonical.sort_unstable();
        canonical.dedup();

        let encoded = serde_json::to_vec(&(include_blanks, canonical)).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        let hash_result = hasher.finalize();

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hash_result);

        Self { digest }
    }
}

/// Cache of compiled value and keyword filters.
///
/// - **Size limit**: `capacity` entries per matcher family
/// - **Idle expiry**: entries unused for `idle` are evicted
pub struct MatcherCache {
    values: Cache<MatcherCacheKey, Arc<CompiledValueFilter>>,
    keywords: Cache<MatcherCacheKey, Arc<CompiledKeywordFilter>>,
}

impl MatcherCache {
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            values: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
            keywords: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.matcher_cache_capacity, config.matcher_cache_idle())
    }

    /// Compiled matcher for a categorical field's list.
    pub fn value_matcher(&self, values: &[FilterValue], include_blanks: bool) -> ValueMatcher {
        if values.is_empty() {
            return ValueMatcher::Any;
        }

        let key = MatcherCacheKey::new(values, include_blanks);
        if let Some(filter) = self.values.get(&key) {
            MATCHER_CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            return ValueMatcher::Values(filter);
        }

        MATCHER_CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
        let filter = Arc::new(CompiledValueFilter::compile(values, include_blanks));
        self.values.insert(key, filter.clone());
        ValueMatcher::Values(filter)
    }

    /// Compiled matcher for a keyword list.
    pub fn keyword_matcher(&self, values: &[FilterValue]) -> KeywordMatcher {
        if values.is_empty() {
            return KeywordMatcher::Any;
        }

        let key = MatcherCacheKey::new(values, false);
        if let Some(filter) = self.keywords.get(&key) {
            MATCHER_CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            return KeywordMatcher::Keywords(filter);
        }

        MATCHER_CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
        let filter = Arc::new(CompiledKeywordFilter::compile(values));
        self.keywords.insert(key, filter.clone());
        KeywordMatcher::Keywords(filter)
    }

    /// Get cache statistics
    ///
    /// Returns (entry_count, estimated_size) summed over both families.
    pub fn stats(&self) -> (u64, u64) {
        self.values.run_pending_tasks();
        self.keywords.run_pending_tasks();
        (
            self.values.entry_count() + self.keywords.entry_count(),
            self.values.weighted_size() + self.keywords.weighted_size(),
        )
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.values.invalidate_all();
        self.keywords.invalidate_all();
        self.values.run_pending_tasks();
        self.keywords.run_pending_tasks();
    }
}

impl Default for MatcherCache {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
