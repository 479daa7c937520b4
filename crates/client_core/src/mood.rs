//! Reading the room's mood from the backend.

use std::collections::VecDeque;

use anyhow::Context;
use reqwest::{Client, Url};
use shared::{
    mood::{average_mood, MoodReading, DEFAULT_MOOD},
    protocol::MOOD_ROUTE,
};
use tracing::warn;

use crate::{endpoint, error::EndpointError};

/// Samples kept by [`MoodWindow::default`].
pub const MOOD_WINDOW: usize = 1000;

pub struct MoodClient {
    http: Client,
    endpoint: Url,
}

impl MoodClient {
    pub fn new(server_url: &str) -> Result<Self, EndpointError> {
        Ok(Self {
            http: Client::new(),
            endpoint: endpoint(server_url, MOOD_ROUTE)?,
        })
    }

    pub async fn fetch(&self) -> anyhow::Result<f64> {
        let reading: MoodReading = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("mood body is not a mood reading")?;
        Ok(reading.current_mood)
    }

    /// Like [`fetch`](Self::fetch), but falls back to [`DEFAULT_MOOD`].
    pub async fn current_mood(&self) -> f64 {
        match self.fetch().await {
            Ok(mood) => mood,
            Err(error) => {
                warn!(error = %format!("{error:#}"), "mood unavailable; using default");
                DEFAULT_MOOD
            }
        }
    }
}

/// Rolling average over the most recent mood samples.
#[derive(Debug, Clone)]
pub struct MoodWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl MoodWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds a sample, evicting the oldest when full, and returns the new average.
    pub fn record(&mut self, sample: f64) -> f64 {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.average().unwrap_or(sample)
    }

    pub fn average(&self) -> Option<f64> {
        average_mood(self.samples.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for MoodWindow {
    fn default() -> Self {
        Self::new(MOOD_WINDOW)
    }
}
