//! Territory names and their silhouette images.
//!
//! The game only needs two things from its content store: the list of
//! playable territories and a PNG per territory. Both are traits so the
//! session can be driven by [`GitHubSilhouettes`] in production and by
//! in-memory doubles in tests.

mod github;

pub use github::GitHubSilhouettes;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PlaceName;

#[derive(Error, Debug)]
pub enum TerritorySourceError {
    #[error("territory listing request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("invalid territory listing URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("territory listing returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("territory listing could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("no territories found in the content store")]
    Empty,
}

#[derive(Error, Debug)]
pub enum ImageFetchError {
    #[error("silhouette request for {name} failed: {source}")]
    Request {
        name: PlaceName,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid silhouette URL for {name}: {source}")]
    InvalidUrl {
        name: PlaceName,
        #[source]
        source: url::ParseError,
    },

    #[error("silhouette for {name} returned HTTP {status}")]
    Status {
        name: PlaceName,
        status: reqwest::StatusCode,
    },

    #[error("silhouette body for {name} could not be read: {source}")]
    Body {
        name: PlaceName,
        #[source]
        source: reqwest::Error,
    },
}

/// Lists every playable territory, in the store's order
#[async_trait]
pub trait TerritorySource: Send + Sync {
    async fn list_territory_names(&self) -> Result<Vec<PlaceName>, TerritorySourceError>;
}

/// Fetches the PNG silhouette of one territory
#[async_trait]
pub trait SilhouetteSource: Send + Sync {
    async fn fetch_silhouette(&self, name: &PlaceName) -> Result<Vec<u8>, ImageFetchError>;
}
