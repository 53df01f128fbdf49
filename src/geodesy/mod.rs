//! Great-circle math on a spherical Earth.
//!
//! Pure functions, no I/O. Distances use the haversine formula and bearings
//! are the initial bearing at the starting point.

mod compass;

pub use compass::{compass_label, CompassPoint};

use crate::models::Coordinate;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Largest possible great-circle distance (half the circumference)
pub const MAX_DISTANCE_KM: f64 = EARTH_RADIUS_KM * std::f64::consts::PI;

/// Haversine distance between two coordinates in kilometers
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial bearing from `from` toward `to`, in degrees within [0, 360)
///
/// Identical coordinates give 0, which carries no meaning; callers should
/// handle exact matches before asking for a direction.
pub fn initial_bearing_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let phi_from = from.latitude.to_radians();
    let phi_to = to.latitude.to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let y = delta_lambda.sin() * phi_to.cos();
    let x = phi_from.cos() * phi_to.sin() - phi_from.sin() * phi_to.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Fold any angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Compass direction from `from` toward `to`
pub fn direction(from: Coordinate, to: Coordinate) -> CompassPoint {
    compass_label(initial_bearing_degrees(from, to))
}
