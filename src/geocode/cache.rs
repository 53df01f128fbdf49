//! Process-lifetime coordinate cache.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use super::{GeocodeError, Geocoder};
use crate::models::{Coordinate, PlaceName};

/// Memoizes geocoder results by normalized place name.
///
/// Hits only take the shared lock. The lock is never held across the
/// external lookup, so two concurrent misses on the same name may both
/// reach the geocoder; the first insert wins and both callers see it.
/// Entries are never evicted and failures are never stored.
pub struct CoordinateCache {
    geocoder: Arc<dyn Geocoder>,
    entries: RwLock<HashMap<PlaceName, Coordinate>>,
}

impl CoordinateCache {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached coordinate for `name`, geocoding it on a miss
    pub async fn get(&self, name: &PlaceName) -> Result<Coordinate, GeocodeError> {
        if let Some(coordinate) = self.peek(name) {
            return Ok(coordinate);
        }

        debug!("Coordinate cache miss for {}", name);
        let coordinate = self.geocoder.geocode(name).await?;

        let stored = *self
            .entries
            .write()
            .entry(name.clone())
            .or_insert(coordinate);
        Ok(stored)
    }

    /// Cached coordinate without falling back to the geocoder
    pub fn peek(&self, name: &PlaceName) -> Option<Coordinate> {
        self.entries.read().get(name).copied()
    }

    /// Seed an entry, returning whatever it replaced
    pub fn insert(&self, name: PlaceName, coordinate: Coordinate) -> Option<Coordinate> {
        self.entries.write().insert(name, coordinate)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticGeocoder;

    const SPAIN: Coordinate = Coordinate::new(40.46, -3.75);

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let geocoder = Arc::new(StaticGeocoder::new().with("spain", SPAIN));
        let cache = CoordinateCache::new(geocoder.clone());

        let first = cache.get(&PlaceName::new("spain")).await.unwrap();
        let second = cache.get(&PlaceName::new("spain")).await.unwrap();

        assert_eq!(first, SPAIN);
        assert_eq!(first, second);
        assert_eq!(geocoder.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_normalized_names_share_an_entry() {
        let geocoder = Arc::new(StaticGeocoder::new().with("united states", SPAIN));
        let cache = CoordinateCache::new(geocoder.clone());

        cache.get(&PlaceName::new("United_States")).await.unwrap();
        cache.get(&PlaceName::new(" UNITED   STATES")).await.unwrap();
        cache.get(&PlaceName::new("united states")).await.unwrap();

        assert_eq!(geocoder.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let geocoder = Arc::new(StaticGeocoder::new());
        let cache = CoordinateCache::new(geocoder.clone());
        let name = PlaceName::new("spain");

        let result = cache.get(&name).await;
        assert!(matches!(result, Err(GeocodeError::NoResults { .. })));
        assert!(cache.is_empty());

        geocoder.add("spain", SPAIN);
        assert_eq!(cache.get(&name).await.unwrap(), SPAIN);
        assert_eq!(geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn test_seeded_entry_skips_geocoder() {
        let geocoder = Arc::new(StaticGeocoder::new());
        let cache = CoordinateCache::new(geocoder.clone());

        assert!(cache.insert(PlaceName::new("spain"), SPAIN).is_none());
        assert_eq!(cache.peek(&PlaceName::new("SPAIN")), Some(SPAIN));
        assert_eq!(cache.get(&PlaceName::new("Spain")).await.unwrap(), SPAIN);
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_converge() {
        let geocoder = Arc::new(StaticGeocoder::new().with("spain", SPAIN));
        let cache = Arc::new(CoordinateCache::new(geocoder.clone()));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get(&PlaceName::new("spain")).await })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), SPAIN);
        }
        assert_eq!(cache.len(), 1);
        assert!(geocoder.calls() >= 1);
    }
}
