use std::{io::ErrorKind, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use shared::{
    domain::PlaylistUrl,
    error::{ApiError, ErrorCode},
    mood::MoodReading,
    protocol::{
        SubmitPlaylistRequest, SubmitPlaylistResponse, MOOD_ROUTE, PLAYLISTS_ROUTE,
        VISUALIZATION_ROUTE,
    },
};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;

use config::load_settings;

#[derive(Debug)]
struct AppState {
    visualization_path: PathBuf,
    processing_delay: Duration,
    mood: RwLock<f64>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let state = AppState {
        visualization_path: settings.visualization_path.clone(),
        processing_delay: settings.processing_delay(),
        mood: RwLock::new(settings.initial_mood),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        visualization_path = %settings.visualization_path.display(),
        processing_delay_ms = settings.processing_delay_ms,
        "server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(PLAYLISTS_ROUTE, post(submit_playlist))
        .route(VISUALIZATION_ROUTE, get(visualization))
        .route(MOOD_ROUTE, get(current_mood).put(record_mood))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Accepts a playlist url after the simulated processing delay.
async fn submit_playlist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitPlaylistRequest>,
) -> ApiResult<Json<SubmitPlaylistResponse>> {
    let url = PlaylistUrl::parse(req.playlist_url)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiError::from(e))))?;

    tokio::time::sleep(state.processing_delay).await;

    let submission_id = Uuid::new_v4();
    let playlist_id = url.playlist_id().map(str::to_string);
    info!(
        %submission_id,
        playlist_id = playlist_id.as_deref().unwrap_or("-"),
        "playlist accepted"
    );

    Ok(Json(SubmitPlaylistResponse {
        submission_id,
        playlist_id,
        accepted_at: Utc::now(),
    }))
}

/// Serves the configured PNG as base64 text.
async fn visualization(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let bytes = tokio::fs::read(&state.visualization_path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ApiError::new(
                    ErrorCode::NotFound,
                    "no visualization has been rendered yet",
                )),
            ),
            _ => {
                error!(
                    path = %state.visualization_path.display(),
                    error = %e,
                    "failed to read visualization"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiError::new(ErrorCode::Internal, e.to_string())),
                )
            }
        })?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        STANDARD.encode(bytes),
    ))
}

async fn current_mood(State(state): State<Arc<AppState>>) -> Json<MoodReading> {
    Json(MoodReading {
        current_mood: *state.mood.read().await,
    })
}

/// Replaces the current mood; readings must lie in `0..=1`.
async fn record_mood(
    State(state): State<Arc<AppState>>,
    Json(reading): Json<MoodReading>,
) -> ApiResult<StatusCode> {
    if !(0.0..=1.0).contains(&reading.current_mood) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(format!(
                "mood {} is outside 0..=1",
                reading.current_mood
            ))),
        ));
    }
    *state.mood.write().await = reading.current_mood;
    debug!(mood = reading.current_mood, "mood recorded");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
