//! Submit side effects invoked by the controller once a url validates.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use shared::{
    domain::PlaylistUrl,
    error::{ApiError, ApiException},
    protocol::{SubmitPlaylistRequest, SubmitPlaylistResponse, PLAYLISTS_ROUTE},
};
use tracing::info;

use crate::{endpoint, error::EndpointError};

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_secs(3);

#[async_trait]
pub trait SubmitCollaborator: Send + Sync {
    async fn submit(&self, url: &PlaylistUrl) -> Result<()>;
}

/// Stand-in for a real ingestion call: waits, then reports the configured result.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    fail_with: Option<String>,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_with: None,
        }
    }

    pub fn failing(delay: Duration, message: impl Into<String>) -> Self {
        Self {
            delay,
            fail_with: Some(message.into()),
        }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl SubmitCollaborator for SimulatedSubmitter {
    async fn submit(&self, url: &PlaylistUrl) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        match &self.fail_with {
            Some(message) => Err(anyhow!("simulated processing failed for {url}: {message}")),
            None => Ok(()),
        }
    }
}

/// Posts the playlist url to `{base}/api/playlists`.
pub struct HttpSubmitter {
    http: Client,
    endpoint: Url,
}

impl HttpSubmitter {
    pub fn new(server_url: &str) -> std::result::Result<Self, EndpointError> {
        Ok(Self {
            http: Client::new(),
            endpoint: endpoint(server_url, PLAYLISTS_ROUTE)?,
        })
    }

    /// Applies a per-request timeout. Without one a request waits for the server indefinitely.
    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint(server_url, PLAYLISTS_ROUTE)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SubmitCollaborator for HttpSubmitter {
    async fn submit(&self, url: &PlaylistUrl) -> Result<()> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&SubmitPlaylistRequest {
                playlist_url: url.as_str().to_string(),
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // The backend answers failures with an ApiError envelope; fall back to the status.
            return match res.json::<ApiError>().await {
                Ok(api_error) => Err(ApiException::from(api_error).into()),
                Err(_) => Err(anyhow!("playlist submission rejected with status {status}")),
            };
        }

        let body: SubmitPlaylistResponse = res.json().await?;
        info!(
            submission_id = %body.submission_id,
            playlist_id = body.playlist_id.as_deref().unwrap_or("-"),
            "playlist accepted by backend"
        );
        Ok(())
    }
}
