//! Geographic coordinate in decimal degrees.

/// Latitude/longitude pair (WGS84 decimal degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate, rejecting values outside the valid lat/lng ranges
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.is_valid().then_some(coordinate)
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]; NaN is never valid
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
