//! Place name -> coordinate resolution.
//!
//! The [`Geocoder`] trait is the seam to the external lookup service,
//! [`GoogleGeocoder`] is the production implementation and
//! [`CoordinateCache`] memoizes results for the lifetime of the process.

mod cache;
mod google;

pub use cache::CoordinateCache;
pub use google::{GoogleGeocoder, GOOGLE_MAPS_API};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Coordinate, PlaceName};

/// Any failure to turn a place name into a usable coordinate.
///
/// Every variant names the place that failed. The core never retries and
/// never caches these.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding request for {name} failed: {source}")]
    Request {
        name: PlaceName,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build geocoding URL for {name}: {source}")]
    InvalidUrl {
        name: PlaceName,
        #[source]
        source: url::ParseError,
    },

    #[error("geocoding {name} returned HTTP {status}")]
    Status {
        name: PlaceName,
        status: reqwest::StatusCode,
    },

    #[error("geocoding response for {name} could not be decoded: {source}")]
    Decode {
        name: PlaceName,
        #[source]
        source: reqwest::Error,
    },

    #[error("geocoder rejected {name}: {status} {message}")]
    Api {
        name: PlaceName,
        status: String,
        message: String,
    },

    #[error("no geocoding results for {name}")]
    NoResults { name: PlaceName },

    #[error("geocoder returned an invalid coordinate for {name}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        name: PlaceName,
        latitude: f64,
        longitude: f64,
    },
}

impl GeocodeError {
    /// The place name whose lookup failed
    pub fn name(&self) -> &PlaceName {
        match self {
            Self::Request { name, .. }
            | Self::InvalidUrl { name, .. }
            | Self::Status { name, .. }
            | Self::Decode { name, .. }
            | Self::Api { name, .. }
            | Self::NoResults { name }
            | Self::InvalidCoordinate { name, .. } => name,
        }
    }
}

/// External place name lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, name: &PlaceName) -> Result<Coordinate, GeocodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_place() {
        let err = GeocodeError::NoResults {
            name: PlaceName::new("atlantis"),
        };
        assert_eq!(err.to_string(), "no geocoding results for ATLANTIS");
        assert_eq!(err.name().as_str(), "ATLANTIS");

        let err = GeocodeError::Api {
            name: PlaceName::new("spain"),
            status: "REQUEST_DENIED".to_string(),
            message: "The provided API key is invalid.".to_string(),
        };
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("SPAIN"));
    }
}
