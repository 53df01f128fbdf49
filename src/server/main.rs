//! Game server.
//!
//! Thin HTTP layer over the game session and the scoring service: start a
//! round, serve its silhouette, score guesses and reveal the answer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use worldle::config::Config;
use worldle::geocode::{CoordinateCache, GoogleGeocoder};
use worldle::scoring::ScoringService;
use worldle::session::GameSession;
use worldle::silhouettes::GitHubSilhouettes;

mod handlers;
use handlers::AppState;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Country silhouette guessing game server")]
struct Args {
    /// TOML config file (credentials may also come from the environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    config.validate().context("Invalid configuration")?;

    let api_key = config
        .geocoder
        .api_key
        .as_deref()
        .context("MAPS_API_KEY is not set")?;
    let geocoder = GoogleGeocoder::with_base_url(
        api_key,
        &config.geocoder.api_url,
        config.geocoder.timeout(),
    )
    .context("Failed to build geocoding client")?;
    let scoring = ScoringService::new(Arc::new(CoordinateCache::new(Arc::new(geocoder))));

    let store = Arc::new(
        GitHubSilhouettes::new(&config.silhouettes)
            .context("Failed to build silhouette store client")?,
    );
    info!(
        "Serving silhouettes from {}/{}@{}",
        config.silhouettes.owner, config.silhouettes.repo, config.silhouettes.branch
    );

    let state = Arc::new(AppState {
        session: GameSession::new(store.clone(), store.clone()),
        scoring,
        territories: store,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/new-game", post(handlers::new_game))
        .route("/silhouette", get(handlers::silhouette))
        .route("/territories", get(handlers::territories))
        .route("/guess", post(handlers::guess))
        .route("/answer", get(handlers::answer))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
