use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{FailureReason, SubmissionState};

pub const PLAYLISTS_ROUTE: &str = "/api/playlists";
pub const VISUALIZATION_ROUTE: &str = "/api/visualization";
/// `GET` reads the current mood as a [`MoodReading`](crate::mood::MoodReading); `PUT` records one.
pub const MOOD_ROUTE: &str = "/get_mood";

/// Body of `POST /api/playlists`.
///
/// The url travels as a raw string so the backend can answer invalid input
/// with a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPlaylistRequest {
    pub playlist_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPlaylistResponse {
    pub submission_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    pub accepted_at: DateTime<Utc>,
}

/// Notifications republished to subscribed views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SubmissionEvent {
    StateChanged(SubmissionState),
    Error {
        reason: FailureReason,
        message: String,
    },
}
