use std::{sync::Arc, time::Duration};

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::{
    domain::{FailureReason, PlaylistUrl, SubmissionState},
    error::ApiError,
    mood::{MoodReading, DEFAULT_MOOD},
    protocol::{SubmitPlaylistRequest, SubmitPlaylistResponse},
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    EndpointError, HttpSubmitter, MoodClient, MoodWindow, PlaylistSubmissionController,
    SubmitCollaborator, SubmitOutcome, Visualization, VisualizationClient, VisualizationError,
};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[derive(Clone, Default)]
struct PlaylistServerState {
    received: Arc<Mutex<Vec<String>>>,
}

async fn accept_playlist(
    State(state): State<PlaylistServerState>,
    Json(req): Json<SubmitPlaylistRequest>,
) -> Json<SubmitPlaylistResponse> {
    state.received.lock().await.push(req.playlist_url);
    Json(SubmitPlaylistResponse {
        submission_id: uuid::Uuid::new_v4(),
        playlist_id: Some("abc123".to_string()),
        accepted_at: chrono::Utc::now(),
    })
}

async fn reject_playlist() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::validation("playlist is private")),
    )
}

async fn spawn_server(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn http_submitter_posts_playlist_url() {
    let state = PlaylistServerState::default();
    let app = Router::new()
        .route("/api/playlists", post(accept_playlist))
        .with_state(state.clone());
    let server_url = spawn_server(app).await.expect("spawn server");

    let submitter = HttpSubmitter::new(&server_url).expect("submitter");
    assert_eq!(submitter.endpoint().path(), "/api/playlists");
    let url = PlaylistUrl::parse("https://open.spotify.com/playlist/abc123").expect("valid");
    submitter.submit(&url).await.expect("submit");

    assert_eq!(
        *state.received.lock().await,
        vec!["https://open.spotify.com/playlist/abc123".to_string()]
    );
}

#[tokio::test]
async fn http_submitter_surfaces_api_error_message() {
    let app = Router::new().route("/api/playlists", post(reject_playlist));
    let server_url = spawn_server(app).await.expect("spawn server");

    let submitter = HttpSubmitter::new(&server_url).expect("submitter");
    let url = PlaylistUrl::parse("https://open.spotify.com/playlist/abc123").expect("valid");
    let err = submitter.submit(&url).await.expect_err("rejected");
    assert!(err.to_string().contains("playlist is private"));
}

#[tokio::test]
async fn controller_over_http_fails_with_submit_error_on_missing_route() {
    let app = Router::new().route("/healthz", get(|| async { "ok" }));
    let server_url = spawn_server(app).await.expect("spawn server");

    let controller = PlaylistSubmissionController::new(Arc::new(
        HttpSubmitter::new(&server_url).expect("submitter"),
    ));
    controller
        .set_url("https://open.spotify.com/playlist/abc123")
        .await;

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Completed(SubmissionState::Failed(FailureReason::SubmitError))
    );
    let last_error = controller.snapshot().await.last_error.expect("message");
    assert!(last_error.contains("404"));
}

#[tokio::test]
async fn http_submitter_timeout_turns_slow_backend_into_failure() {
    let app = Router::new().route(
        "/api/playlists",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let server_url = spawn_server(app).await.expect("spawn server");

    let submitter =
        HttpSubmitter::with_timeout(&server_url, Duration::from_millis(100)).expect("submitter");
    let url = PlaylistUrl::parse("https://open.spotify.com/playlist/abc123").expect("valid");
    let err = submitter.submit(&url).await.expect_err("timed out");
    let err = err.downcast::<reqwest::Error>().expect("reqwest error");
    assert!(err.is_timeout());
}

#[test]
fn rejects_unparseable_server_url() {
    let err = HttpSubmitter::new("not a url").err().expect("invalid base");
    assert!(matches!(err, EndpointError::InvalidBaseUrl { .. }));
    assert!(VisualizationClient::new("").is_err());
}

#[tokio::test]
async fn visualization_client_decodes_base64_png() {
    let encoded = STANDARD.encode(PNG_SIGNATURE);
    let body = format!("{encoded}\n");
    let app = Router::new().route("/api/visualization", get(move || async move { body }));
    let server_url = spawn_server(app).await.expect("spawn server");

    let client = VisualizationClient::new(&server_url).expect("client");
    let visualization = client.fetch().await.expect("visualization");

    assert_eq!(visualization.png_bytes(), PNG_SIGNATURE);
    assert_eq!(
        visualization.data_uri(),
        format!("data:image/png;base64,{encoded}")
    );
}

#[tokio::test]
async fn visualization_client_reports_non_success_status() {
    let app = Router::new().route(
        "/api/visualization",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
    );
    let server_url = spawn_server(app).await.expect("spawn server");

    let err = VisualizationClient::new(&server_url)
        .expect("client")
        .fetch()
        .await
        .expect_err("status error");
    assert!(matches!(
        err,
        VisualizationError::Status(status) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));
}

#[test]
fn visualization_rejects_non_base64_body() {
    let err = Visualization::from_base64("<html>oops</html>").expect_err("invalid");
    assert!(matches!(err, VisualizationError::InvalidEncoding(_)));
}

#[tokio::test]
async fn mood_client_reads_current_mood() {
    let app = Router::new().route(
        "/get_mood",
        get(|| async { Json(MoodReading { current_mood: 0.8 }) }),
    );
    let server_url = spawn_server(app).await.expect("spawn server");

    let client = MoodClient::new(&server_url).expect("client");
    assert_eq!(client.fetch().await.expect("mood"), 0.8);
    assert_eq!(client.current_mood().await, 0.8);
}

#[tokio::test]
async fn mood_client_falls_back_to_default_when_backend_fails() {
    let app = Router::new().route(
        "/get_mood",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "camera offline") }),
    );
    let server_url = spawn_server(app).await.expect("spawn server");

    let client = MoodClient::new(&server_url).expect("client");
    assert!(client.fetch().await.is_err());
    assert_eq!(client.current_mood().await, DEFAULT_MOOD);
}

#[test]
fn mood_window_averages_most_recent_samples() {
    let mut window = MoodWindow::new(2);
    assert!(window.is_empty());
    assert_eq!(window.average(), None);

    assert_eq!(window.record(0.25), 0.25);
    assert_eq!(window.record(0.75), 0.5);
    assert_eq!(window.record(1.0), 0.875);
    assert_eq!(window.len(), 2);
    assert_eq!(MoodWindow::default().average(), None);
}
