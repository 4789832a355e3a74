//! Explicit memoization of generated tables.
//!
//! A generated table depends on the seed and on the day the window ends, so the
//! cache is keyed on exactly that pair. Asking for a different key drops the
//! previous table and generates a fresh one; asking for the same key again hands
//! out the shared table without regenerating.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::data::sample::generate;
use crate::domain::{GeneratorConfig, Table};
use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub seed: u64,
    pub day: NaiveDate,
}

/// Hit/miss counters, mostly useful in tests and debug logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Holds at most one generated table.
#[derive(Debug)]
pub struct DatasetCache {
    template: GeneratorConfig,
    entry: Option<(CacheKey, Arc<Table>)>,
    stats: CacheStats,
}

impl DatasetCache {
    /// `template` supplies everything but the seed and the window end day.
    pub fn new(template: GeneratorConfig) -> Self {
        Self {
            template,
            entry: None,
            stats: CacheStats::default(),
        }
    }

    /// Return the table for `(seed, day)`, generating it on a miss.
    pub fn get(&mut self, seed: u64, day: NaiveDate) -> Result<Arc<Table>, PipelineError> {
        let key = CacheKey { seed, day };
        if let Some((cached_key, table)) = &self.entry {
            if *cached_key == key {
                self.stats.hits += 1;
                debug!(seed, %day, "dataset cache hit");
                return Ok(Arc::clone(table));
            }
            info!(
                old_seed = cached_key.seed,
                old_day = %cached_key.day,
                seed,
                %day,
                "dataset cache key changed; regenerating"
            );
        }

        self.stats.misses += 1;
        let config = GeneratorConfig {
            seed,
            as_of: day,
            ..self.template.clone()
        };
        // Drop the stale entry before generating so a failure leaves the cache empty.
        self.entry = None;
        let table = Arc::new(generate(&config)?);
        self.entry = Some((key, Arc::clone(&table)));
        Ok(table)
    }

    /// Convenience for the dashboard: the table for `seed` with the window ending today.
    pub fn get_today(&mut self, seed: u64) -> Result<Arc<Table>, PipelineError> {
        self.get(seed, chrono::Local::now().date_naive())
    }

    /// Drop the cached table, if any.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn cached_key(&self) -> Option<CacheKey> {
        self.entry.as_ref().map(|(k, _)| *k)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn cache() -> DatasetCache {
        DatasetCache::new(GeneratorConfig::new(0, day(1)).with_row_count(250))
    }

    #[test]
    fn same_key_is_served_from_cache() {
        let mut cache = cache();
        let a = cache.get(42, day(10)).unwrap();
        let b = cache.get(42, day(10)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn new_day_invalidates() {
        let mut cache = cache();
        let a = cache.get(42, day(10)).unwrap();
        let b = cache.get(42, day(11)).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.cached_key(), Some(CacheKey { seed: 42, day: day(11) }));
        assert_eq!(cache.stats().misses, 2);

        // Coming back to the old key regenerates, but identically.
        let c = cache.get(42, day(10)).unwrap();
        assert_eq!(*a, *c);
    }

    #[test]
    fn failed_generation_leaves_cache_empty() {
        let mut cache = DatasetCache::new(GeneratorConfig::new(0, day(1)).with_row_count(0));
        assert!(cache.get(42, day(10)).is_err());
        assert_eq!(cache.cached_key(), None);
    }

    #[test]
    fn explicit_invalidate() {
        let mut cache = cache();
        cache.get(1, day(2)).unwrap();
        cache.invalidate();
        assert_eq!(cache.cached_key(), None);
        cache.get(1, day(2)).unwrap();
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
    }
}
