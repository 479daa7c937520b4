use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Url};
use shared::protocol::VISUALIZATION_ROUTE;
use tracing::debug;

use crate::{
    endpoint,
    error::{EndpointError, VisualizationError},
};

/// A PNG delivered as base64 text by the visualization endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visualization {
    base64: String,
    png: Vec<u8>,
}

impl Visualization {
    pub fn from_base64(body: &str) -> Result<Self, VisualizationError> {
        let base64 = body.trim().to_string();
        let png = STANDARD.decode(base64.as_bytes())?;
        Ok(Self { base64, png })
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.base64)
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png_bytes(self) -> Vec<u8> {
        self.png
    }
}

pub struct VisualizationClient {
    http: Client,
    endpoint: Url,
}

impl VisualizationClient {
    pub fn new(server_url: &str) -> Result<Self, EndpointError> {
        Ok(Self {
            http: Client::new(),
            endpoint: endpoint(server_url, VISUALIZATION_ROUTE)?,
        })
    }

    pub async fn fetch(&self) -> Result<Visualization, VisualizationError> {
        let res = self.http.get(self.endpoint.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(VisualizationError::Status(status));
        }
        let body = res.text().await?;
        debug!(bytes = body.len(), "visualization body received");
        Visualization::from_base64(&body)
    }
}
