//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::geocode::{GeocodeError, Geocoder};
use crate::models::{Coordinate, PlaceName};
use crate::silhouettes::{ImageFetchError, SilhouetteSource, TerritorySource, TerritorySourceError};

/// Geocoder answering from a fixed table and counting every call
#[derive(Default)]
pub struct StaticGeocoder {
    known: Mutex<HashMap<PlaceName, Coordinate>>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, coordinate: Coordinate) -> Self {
        self.add(name, coordinate);
        self
    }

    pub fn add(&self, name: &str, coordinate: Coordinate) {
        self.known.lock().insert(PlaceName::new(name), coordinate);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, name: &PlaceName) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers interleave like a real network call would
        tokio::task::yield_now().await;
        self.known
            .lock()
            .get(name)
            .copied()
            .ok_or_else(|| GeocodeError::NoResults { name: name.clone() })
    }
}

/// Territory lister and silhouette store backed by a fixed list.
///
/// Each silhouette is the slug's bytes, so tests can tell images apart.
#[derive(Default)]
pub struct StaticTerritories {
    names: Vec<PlaceName>,
    list_fails: AtomicBool,
    fetch_fails: AtomicBool,
    fetches: AtomicUsize,
}

impl StaticTerritories {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| PlaceName::new(n)).collect(),
            ..Self::default()
        }
    }

    pub fn fail_listing(&self, fail: bool) {
        self.list_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetching(&self, fail: bool) {
        self.fetch_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TerritorySource for StaticTerritories {
    async fn list_territory_names(&self) -> Result<Vec<PlaceName>, TerritorySourceError> {
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(TerritorySourceError::Status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ));
        }
        if self.names.is_empty() {
            return Err(TerritorySourceError::Empty);
        }
        Ok(self.names.clone())
    }
}

#[async_trait]
impl SilhouetteSource for StaticTerritories {
    async fn fetch_silhouette(&self, name: &PlaceName) -> Result<Vec<u8>, ImageFetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fetch_fails.load(Ordering::SeqCst) {
            return Err(ImageFetchError::Status {
                name: name.clone(),
                status: reqwest::StatusCode::NOT_FOUND,
            });
        }
        Ok(name.slug().into_bytes())
    }
}
