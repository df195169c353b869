use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{Granularity, RatePoint};

/// Projected (unfiltered) series per granularity.
///
/// The source document never changes, so an entry stays valid for the
/// lifetime of the chart and switching granularity back and forth reuses the
/// same allocation.
pub struct SeriesCache {
    cache: HashMap<Granularity, Arc<Vec<RatePoint>>>,
}

impl SeriesCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Store a projected series
    pub fn store(&mut self, granularity: Granularity, series: Arc<Vec<RatePoint>>) {
        self.cache.insert(granularity, series);
    }

    /// Retrieve a projected series
    pub fn get(&self, granularity: Granularity) -> Option<Arc<Vec<RatePoint>>> {
        self.cache.get(&granularity).cloned()
    }

    /// Return the cached series or compute and store it
    pub fn get_or_try_insert_with<E>(
        &mut self,
        granularity: Granularity,
        project: impl FnOnce() -> Result<Vec<RatePoint>, E>,
    ) -> Result<Arc<Vec<RatePoint>>, E> {
        if let Some(series) = self.get(granularity) {
            return Ok(series);
        }
        let series = Arc::new(project()?);
        self.store(granularity, Arc::clone(&series));
        Ok(series)
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_lookup_reuses_series() {
        let mut cache = SeriesCache::new();
        let mut calls = 0;

        let first = cache
            .get_or_try_insert_with::<()>(Granularity::Week, || {
                calls += 1;
                Ok(vec![RatePoint::new("Week 1, Jan 2025")])
            })
            .unwrap();
        let second = cache
            .get_or_try_insert_with::<()>(Granularity::Week, || {
                calls += 1;
                Ok(Vec::new())
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.get(Granularity::Day).is_none());
    }

    #[test]
    fn test_failed_projection_is_not_cached() {
        let mut cache = SeriesCache::new();
        let result = cache.get_or_try_insert_with(Granularity::Day, || Err("bad date"));
        assert!(result.is_err());
        assert!(cache.get(Granularity::Day).is_none());

        cache.store(Granularity::Day, Arc::new(Vec::new()));
        cache.clear();
        assert!(cache.get(Granularity::Day).is_none());
    }
}
