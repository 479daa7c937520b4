//! Submission state machine shared by every playlist front end.
//!
//! ```text
//! Idle --submit(invalid)--> Failed(InvalidUrl)
//! Idle --submit(valid)--> Submitting
//! Submitting --collaborator ok--> Succeeded
//! Submitting --collaborator error--> Failed(SubmitError)
//! Succeeded | Failed --reset--> Idle
//! Failed --submit--> (validated again)
//! ```
//!
//! Observers are called while the state lock is held, so they see
//! transitions in the order they were applied.

use std::sync::Arc;

use shared::domain::{FailureReason, PlaylistUrl, SubmissionState};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    collaborator::SubmitCollaborator,
    error::ControllerError,
    observer::{NoopObserver, SubmissionObserver},
};

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid Spotify playlist URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt ran and settled in the contained state.
    Completed(SubmissionState),
    /// Rejected because the controller was submitting or already succeeded.
    Ignored(SubmissionState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub url: String,
    pub state: SubmissionState,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct ControllerState {
    url: String,
    state: SubmissionState,
    last_error: Option<String>,
}

pub struct PlaylistSubmissionController {
    collaborator: Arc<dyn SubmitCollaborator>,
    observer: Arc<dyn SubmissionObserver>,
    inner: Mutex<ControllerState>,
}

impl PlaylistSubmissionController {
    pub fn new(collaborator: Arc<dyn SubmitCollaborator>) -> Arc<Self> {
        Self::new_with_observer(collaborator, Arc::new(NoopObserver))
    }

    pub fn new_with_observer(
        collaborator: Arc<dyn SubmitCollaborator>,
        observer: Arc<dyn SubmissionObserver>,
    ) -> Arc<Self> {
        Arc::new(Self {
            collaborator,
            observer,
            inner: Mutex::new(ControllerState::default()),
        })
    }

    /// Stores the candidate for the next `submit`. Never changes state.
    pub async fn set_url(&self, candidate: impl Into<String>) {
        self.inner.lock().await.url = candidate.into();
    }

    pub async fn url(&self) -> String {
        self.inner.lock().await.url.clone()
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let guard = self.inner.lock().await;
        ControllerSnapshot {
            url: guard.url.clone(),
            state: guard.state,
            last_error: guard.last_error.clone(),
        }
    }

    /// Validates the stored url and, if valid, runs the collaborator once.
    ///
    /// The collaborator call runs on its own task, so dropping the returned
    /// future does not cancel it; the controller still settles when it ends.
    pub async fn submit(self: &Arc<Self>) -> SubmitOutcome {
        match self.begin_submit().await {
            Begin::Settled(outcome) => outcome,
            Begin::InFlight(handle) => match handle.await {
                Ok(state) => SubmitOutcome::Completed(state),
                Err(join_error) => {
                    // The task already applied its result unless it panicked.
                    let state = self
                        .complete(Err(anyhow::anyhow!("submission task aborted: {join_error}")))
                        .await;
                    SubmitOutcome::Completed(state)
                }
            },
        }
    }

    /// Fire-and-forget variant for event handlers that must not wait.
    pub fn spawn_submit(self: &Arc<Self>) -> JoinHandle<SubmitOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.submit().await })
    }

    /// Returns to `Idle` and clears the stored url.
    ///
    /// A no-op from `Idle`; rejected while a submission is in flight.
    pub async fn reset(&self) -> Result<(), ControllerError> {
        let mut guard = self.inner.lock().await;
        match guard.state {
            SubmissionState::Submitting => {
                debug!("reset rejected while submitting");
                Err(ControllerError::SubmissionInFlight)
            }
            SubmissionState::Idle => Ok(()),
            SubmissionState::Succeeded | SubmissionState::Failed(_) => {
                guard.url.clear();
                guard.last_error = None;
                guard.state = SubmissionState::Idle;
                self.observer.on_state_change(&SubmissionState::Idle);
                Ok(())
            }
        }
    }

    async fn begin_submit(self: &Arc<Self>) -> Begin {
        let mut guard = self.inner.lock().await;
        if !guard.state.accepts_submit() {
            debug!(state = ?guard.state, "submit ignored");
            return Begin::Settled(SubmitOutcome::Ignored(guard.state));
        }

        let url = match PlaylistUrl::parse(guard.url.clone()) {
            Ok(url) => url,
            Err(err) => {
                let state = SubmissionState::Failed(FailureReason::InvalidUrl);
                guard.state = state;
                guard.last_error = Some(INVALID_URL_MESSAGE.to_string());
                info!(candidate = %err.candidate, "playlist url rejected");
                self.observer.on_state_change(&state);
                self.observer
                    .on_error(FailureReason::InvalidUrl, INVALID_URL_MESSAGE);
                return Begin::Settled(SubmitOutcome::Completed(state));
            }
        };

        guard.state = SubmissionState::Submitting;
        guard.last_error = None;
        info!(%url, "submitting playlist");
        self.observer.on_state_change(&SubmissionState::Submitting);

        let controller = Arc::clone(self);
        Begin::InFlight(tokio::spawn(async move {
            let result = controller.collaborator.submit(&url).await;
            controller.complete(result).await
        }))
    }

    async fn complete(&self, result: anyhow::Result<()>) -> SubmissionState {
        let mut guard = self.inner.lock().await;
        if guard.state != SubmissionState::Submitting {
            return guard.state;
        }

        match result {
            Ok(()) => {
                guard.state = SubmissionState::Succeeded;
                info!("playlist submission succeeded");
                self.observer.on_state_change(&SubmissionState::Succeeded);
                SubmissionState::Succeeded
            }
            Err(err) => {
                let state = SubmissionState::Failed(FailureReason::SubmitError);
                let message = format!("Could not share playlist: {err:#}");
                guard.state = state;
                guard.last_error = Some(message.clone());
                warn!(error = %err, "playlist submission failed");
                self.observer.on_state_change(&state);
                self.observer.on_error(FailureReason::SubmitError, &message);
                state
            }
        }
    }
}

enum Begin {
    Settled(SubmitOutcome),
    InFlight(JoinHandle<SubmissionState>),
}
