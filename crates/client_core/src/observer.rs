//! View-layer hooks notified by the controller.

use shared::{
    domain::{FailureReason, SubmissionState},
    protocol::SubmissionEvent,
};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Called with the controller's state lock held: implementations must return
/// promptly and must not wait on the controller.
pub trait SubmissionObserver: Send + Sync {
    fn on_state_change(&self, state: &SubmissionState);

    /// `message` is suitable for showing to the user as-is.
    fn on_error(&self, reason: FailureReason, message: &str);
}

pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {
    fn on_state_change(&self, _state: &SubmissionState) {}

    fn on_error(&self, _reason: FailureReason, _message: &str) {}
}

pub struct TracingObserver;

impl SubmissionObserver for TracingObserver {
    fn on_state_change(&self, state: &SubmissionState) {
        info!(?state, "submission state changed");
    }

    fn on_error(&self, reason: FailureReason, message: &str) {
        warn!(%reason, message, "submission failed");
    }
}

/// Fans notifications out to any number of subscribers.
pub struct BroadcastObserver {
    events: broadcast::Sender<SubmissionEvent>,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self { events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }
}

impl SubmissionObserver for BroadcastObserver {
    fn on_state_change(&self, state: &SubmissionState) {
        // No subscribers is not an error for a view that has not mounted yet.
        let _ = self.events.send(SubmissionEvent::StateChanged(*state));
    }

    fn on_error(&self, reason: FailureReason, message: &str) {
        let _ = self.events.send(SubmissionEvent::Error {
            reason,
            message: message.to_string(),
        });
    }
}
