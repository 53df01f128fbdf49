//! 16-point compass rose.

use serde::{Deserialize, Serialize};

use super::normalize_degrees;

const SECTOR_WIDTH: f64 = 360.0 / 16.0;
const HALF_SECTOR: f64 = SECTOR_WIDTH / 2.0;

/// One of the 16 compass points, clockwise from north
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a bearing to its compass point.
///
/// Sectors are 22.5° wide and centered on their label. A bearing that lands
/// exactly on a boundary belongs to the sector it closes: NNE is
/// `(11.25, 33.75]`, NE is `(33.75, 56.25]`, and so on. North wraps around
/// as `> 348.75 || <= 11.25`. Angles outside [0, 360) are normalized first.
pub fn compass_label(degrees: f64) -> CompassPoint {
    let degrees = normalize_degrees(degrees);
    if degrees > 360.0 - HALF_SECTOR || degrees <= HALF_SECTOR {
        return CompassPoint::N;
    }

    // (HALF_SECTOR, 360 - HALF_SECTOR] maps onto sectors 1..=15; NaN casts to 0
    let index = ((degrees - HALF_SECTOR) / SECTOR_WIDTH).ceil() as usize;
    CompassPoint::ALL[index % CompassPoint::ALL.len()]
}
