//! Google Maps Geocoding API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{GeocodeError, Geocoder};
use crate::models::{Coordinate, PlaceName};

pub const GOOGLE_MAPS_API: &str = "https://maps.googleapis.com/maps/api";

/// Forward geocoder backed by the Google Maps Geocoding API
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GoogleGeocoder {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, GOOGLE_MAPS_API, timeout)
    }

    /// Point the client at another API root (a proxy or a mock server)
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, name: &PlaceName) -> Result<Coordinate, GeocodeError> {
        let url = Url::parse_with_params(
            &format!("{}/geocode/json", self.base_url),
            &[("address", name.as_str()), ("key", self.api_key.as_str())],
        )
        .map_err(|source| GeocodeError::InvalidUrl {
            name: name.clone(),
            source,
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| GeocodeError::Request {
                name: name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                name: name.clone(),
                status,
            });
        }

        let body: GeocodeResponse =
            response
                .json()
                .await
                .map_err(|source| GeocodeError::Decode {
                    name: name.clone(),
                    source,
                })?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeocodeError::NoResults { name: name.clone() }),
            _ => {
                return Err(GeocodeError::Api {
                    name: name.clone(),
                    status: body.status,
                    message: body.error_message.unwrap_or_default(),
                })
            }
        }

        // Google ranks results; take the best match
        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoResults { name: name.clone() })?;

        let LatLng { lat, lng } = first.geometry.location;
        let coordinate =
            Coordinate::checked(lat, lng).ok_or_else(|| GeocodeError::InvalidCoordinate {
                name: name.clone(),
                latitude: lat,
                longitude: lng,
            })?;

        debug!(
            "Geocoded {} to {} ({})",
            name,
            coordinate,
            first.formatted_address.as_deref().unwrap_or("no address")
        );
        Ok(coordinate)
    }
}
