use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("a submission is in flight and cannot be reset")]
    SubmissionInFlight,
}

#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error("visualization request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("visualization endpoint returned {0}")]
    Status(StatusCode),
    #[error("visualization body is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid server url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}
