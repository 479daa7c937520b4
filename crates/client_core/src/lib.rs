use reqwest::Url;

pub mod collaborator;
pub mod controller;
pub mod error;
pub mod mood;
pub mod observer;
pub mod visualization;

pub use collaborator::{HttpSubmitter, SimulatedSubmitter, SubmitCollaborator};
pub use controller::{ControllerSnapshot, PlaylistSubmissionController, SubmitOutcome};
pub use error::{ControllerError, EndpointError, VisualizationError};
pub use mood::{MoodClient, MoodWindow};
pub use observer::{BroadcastObserver, NoopObserver, SubmissionObserver, TracingObserver};
pub use visualization::{Visualization, VisualizationClient};

fn endpoint(server_url: &str, route: &str) -> Result<Url, EndpointError> {
    let invalid = |source| EndpointError::InvalidBaseUrl {
        url: server_url.to_string(),
        source,
    };
    Url::parse(server_url)
        .map_err(invalid)?
        .join(route)
        .map_err(invalid)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod http_tests;
