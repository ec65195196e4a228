//! HTTP transport for the v1 API.
//!
//! The client talks to the network exclusively through the [`Transport`]
//! trait, so tests can substitute a scripted transport (see
//! [`crate::testing`]) and hosts can layer their own caching or retry
//! policy underneath the resolution logic.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::Error;

/// Default public API origin.
pub const API_BASE: &str = "https://pokeapi.co";

/// The wire collaborator: reference paths in, decoded JSON or raw bytes
/// out. Paths are addressed relative to a fixed base origin and must
/// carry their leading slash; the resolution service normalizes
/// reference strings before calling in.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `path` and decode the body as JSON.
    async fn fetch_json(&self, path: &str) -> Result<Value, Error>;

    /// Fetch `path` and return the raw body bytes.
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, Error>;
}

/// Transport backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against the public API origin.
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    /// Create a transport against a custom origin, e.g. a local mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "querying");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!(
            %url,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response returned"
        );

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("status {status}: {body}")));
        }

        Ok(response)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, path: &str) -> Result<Value, Error> {
        self.get(path)
            .await?
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, Error> {
        Ok(self
            .get(path)
            .await?
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .to_vec())
    }
}
