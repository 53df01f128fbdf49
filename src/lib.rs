//! Worldle - backend for a country silhouette guessing game
//!
//! The library holds the geospatial scoring engine (geocoding, a coordinate
//! cache and great-circle math) and the single-round game session. The
//! `server` binary exposes them over HTTP.

pub mod config;
pub mod geocode;
pub mod geodesy;
pub mod models;
pub mod scoring;
pub mod session;
pub mod silhouettes;

#[cfg(test)]
pub(crate) mod test_support;

pub use geodesy::CompassPoint;
pub use models::{Coordinate, PlaceName};
