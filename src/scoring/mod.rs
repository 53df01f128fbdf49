//! Guess scoring: distance and direction from a guess to the answer.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

use crate::geocode::{CoordinateCache, GeocodeError};
use crate::geodesy::{self, CompassPoint};
use crate::models::{Coordinate, PlaceName};

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// Outcome of one guess
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Great-circle distance rounded to the nearest kilometer
    pub distance_km: f64,
    /// Direction from the guess toward the answer; `None` on an exact match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<CompassPoint>,
    pub is_exact_match: bool,
}

impl ScoreResult {
    pub fn exact_match() -> Self {
        Self {
            distance_km: 0.0,
            bearing: None,
            is_exact_match: true,
        }
    }

    /// Compass label, or an empty string on an exact match
    pub fn direction_label(&self) -> &'static str {
        self.bearing.map_or("", CompassPoint::label)
    }
}

/// A lookup failure, tagged with the side of the comparison that failed
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("could not locate the guess: {0}")]
    Guess(#[source] GeocodeError),

    #[error("could not locate the answer: {0}")]
    Answer(#[source] GeocodeError),
}

impl ScoreError {
    pub fn geocode_error(&self) -> &GeocodeError {
        match self {
            Self::Guess(err) | Self::Answer(err) => err,
        }
    }
}

/// Scores guesses against an answer using cached coordinates
pub struct ScoringService {
    cache: Arc<CoordinateCache>,
}

impl ScoringService {
    pub fn new(cache: Arc<CoordinateCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CoordinateCache {
        &self.cache
    }

    /// Distance and direction from `guess` to `answer`.
    ///
    /// Names that normalize to the same value are an exact match and never
    /// reach the geocoder.
    pub async fn score(
        &self,
        guess: &PlaceName,
        answer: &PlaceName,
    ) -> Result<ScoreResult, ScoreError> {
        if guess == answer {
            return Ok(ScoreResult::exact_match());
        }

        let (from, to) = self.locate(guess, answer).await?;
        let result = ScoreResult {
            distance_km: geodesy::distance_km(from, to).round(),
            bearing: Some(geodesy::direction(from, to)),
            is_exact_match: false,
        };

        debug!(
            "Scored {} -> {}: {} km {}",
            guess,
            answer,
            result.distance_km,
            result.direction_label()
        );
        Ok(result)
    }

    /// Google Maps directions from the guess to the answer
    pub async fn maps_link_for_comparison(
        &self,
        guess: &PlaceName,
        answer: &PlaceName,
    ) -> Result<String, ScoreError> {
        if guess == answer {
            return Ok(maps_link_for_answer(answer));
        }

        let (from, to) = self.locate(guess, answer).await?;
        Ok(format!(
            "{}?api=1&origin={}&destination={}",
            MAPS_DIRECTIONS_URL,
            encode(&from.to_string()),
            encode(&to.to_string())
        ))
    }

    async fn locate(
        &self,
        guess: &PlaceName,
        answer: &PlaceName,
    ) -> Result<(Coordinate, Coordinate), ScoreError> {
        futures::try_join!(
            async { self.cache.get(guess).await.map_err(ScoreError::Guess) },
            async { self.cache.get(answer).await.map_err(ScoreError::Answer) },
        )
    }
}

/// Google Maps search link for the answer
pub fn maps_link_for_answer(answer: &PlaceName) -> String {
    format!("{}?api=1&query={}", MAPS_SEARCH_URL, encode(answer.as_str()))
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
