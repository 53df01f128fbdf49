//! Request handlers and their JSON shapes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use worldle::geocode::GeocodeError;
use worldle::models::PlaceName;
use worldle::scoring::{maps_link_for_answer, ScoreError, ScoringService};
use worldle::session::{GameSession, SessionError};
use worldle::silhouettes::TerritorySource;

/// Application state shared across handlers
pub struct AppState {
    pub session: GameSession,
    pub scoring: ScoringService,
    pub territories: Arc<dyn TerritorySource>,
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    game_active: bool,
    cached_coordinates: usize,
}

#[derive(Deserialize)]
pub struct GuessRequest {
    guess: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResponse {
    is_correct: bool,
    distance: f64,
    direction: &'static str,
    url: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    answer: PlaceName,
    url: String,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        game_active: state.session.is_active(),
        cached_coordinates: state.scoring.cache().len(),
    })
}

/// Start a new round with a random territory
pub async fn new_game(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state
        .session
        .start_new_game()
        .await
        .map_err(session_error)?;
    Ok("New game started")
}

/// PNG silhouette of the current answer
pub async fn silhouette(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let image = state.session.current_image().map_err(session_error)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], image.to_vec()))
}

/// Every playable territory, formatted for display
pub async fn territories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let names = state
        .territories
        .list_territory_names()
        .await
        .map_err(|e| {
            error!("Territory listing failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    Ok(Json(names.iter().map(PlaceName::to_string).collect()))
}

/// Score a guess against the current answer
pub async fn guess(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GuessRequest>,
) -> ApiResult<Json<GuessResponse>> {
    let guess = PlaceName::new(&request.guess);
    if guess.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "guess must not be empty".to_string()));
    }

    // One read of the session per request, even if a new game starts meanwhile
    let round = state.session.snapshot().map_err(session_error)?;
    let answer = round.answer();

    let score = state
        .scoring
        .score(&guess, answer)
        .await
        .map_err(score_error)?;

    let url = if score.is_exact_match {
        maps_link_for_answer(answer)
    } else {
        state
            .scoring
            .maps_link_for_comparison(&guess, answer)
            .await
            .map_err(score_error)?
    };

    Ok(Json(GuessResponse {
        is_correct: score.is_exact_match,
        distance: score.distance_km,
        direction: score.direction_label(),
        url,
    }))
}

/// Reveal the current answer
pub async fn answer(State(state): State<Arc<AppState>>) -> ApiResult<Json<AnswerResponse>> {
    let round = state.session.snapshot().map_err(session_error)?;
    let answer = round.answer().clone();
    let url = maps_link_for_answer(&answer);

    Ok(Json(AnswerResponse { answer, url }))
}

fn session_error(e: SessionError) -> (StatusCode, String) {
    if e.is_init_failure() {
        error!("Failed to start new game: {}", e);
        return (StatusCode::BAD_GATEWAY, e.to_string());
    }
    warn!("Session read before any game was started");
    (StatusCode::CONFLICT, e.to_string())
}

fn score_error(e: ScoreError) -> (StatusCode, String) {
    let unknown_guess = matches!(e, ScoreError::Guess(_))
        && matches!(e.geocode_error(), GeocodeError::NoResults { .. });

    if unknown_guess {
        warn!("Unknown guess: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    } else {
        error!("Scoring failed: {}", e);
        (StatusCode::BAD_GATEWAY, e.to_string())
    }
}
