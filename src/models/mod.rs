//! Core data models for the game.

pub mod coordinate;
pub mod place_name;

pub use coordinate::Coordinate;
pub use place_name::PlaceName;
