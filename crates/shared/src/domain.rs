use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker every accepted playlist URL must contain.
pub const PLAYLIST_URL_MARKER: &str = "spotify.com/playlist/";

/// Substring containment check against [`PLAYLIST_URL_MARKER`].
///
/// No scheme, host or path parsing happens here: `"xspotify.com/playlist/"`
/// passes and `"https://open.spotify.com/album/abc"` does not.
pub fn is_valid_playlist_url(candidate: &str) -> bool {
    candidate.contains(PLAYLIST_URL_MARKER)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a spotify playlist url: {candidate:?}")]
pub struct InvalidPlaylistUrl {
    pub candidate: String,
}

/// A candidate string that passed [`is_valid_playlist_url`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaylistUrl(String);

impl PlaylistUrl {
    pub fn parse(candidate: impl Into<String>) -> Result<Self, InvalidPlaylistUrl> {
        let candidate = candidate.into();
        if is_valid_playlist_url(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(InvalidPlaylistUrl { candidate })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment after `playlist/` up to the first `?`, if non-empty.
    pub fn playlist_id(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once("playlist/")?;
        let id = rest.split('?').next().unwrap_or_default();
        (!id.is_empty()).then_some(id)
    }
}

impl fmt::Display for PlaylistUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlaylistUrl {
    type Error = InvalidPlaylistUrl;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PlaylistUrl> for String {
    fn from(value: PlaylistUrl) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidUrl,
    SubmitError,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => f.write_str("invalid playlist url"),
            Self::SubmitError => f.write_str("submission failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(FailureReason),
}

impl SubmissionState {
    /// States from which a new `submit` is accepted.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}
