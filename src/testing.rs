//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - [`FakeTransport`] for deterministic tests without network access
//! - Per-path request counters for verifying cache behavior through
//!   transport spy counts

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::Transport;
use crate::Error;

/// A scripted transport.
///
/// Stub responses per path, hand it to
/// [`Pokedex::with_transport`](crate::Pokedex::with_transport), and
/// assert on call counts: a memoized resolution shows up as a path
/// whose count never goes past one.
#[derive(Default)]
pub struct FakeTransport {
    json: Mutex<HashMap<String, Value>>,
    bytes: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a JSON response for `path`.
    pub fn stub_json(&self, path: impl Into<String>, payload: Value) {
        self.json
            .lock()
            .expect("stub lock poisoned")
            .insert(path.into(), payload);
    }

    /// Script a raw byte response for `path`.
    pub fn stub_bytes(&self, path: impl Into<String>, data: Vec<u8>) {
        self.bytes
            .lock()
            .expect("stub lock poisoned")
            .insert(path.into(), data);
    }

    /// Number of requests issued for `path`, JSON and bytes combined.
    pub fn calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .expect("call counter lock poisoned")
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Total requests issued across all paths.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .expect("call counter lock poisoned")
            .values()
            .sum()
    }

    fn record_call(&self, path: &str) {
        *self
            .calls
            .lock()
            .expect("call counter lock poisoned")
            .entry(path.to_string())
            .or_insert(0) += 1;
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch_json(&self, path: &str) -> Result<Value, Error> {
        self.record_call(path);
        self.json
            .lock()
            .expect("stub lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("no scripted response for {path}")))
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, Error> {
        self.record_call(path);
        self.bytes
            .lock()
            .expect("stub lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("no scripted response for {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fake_transport_counts_calls() {
        let transport = FakeTransport::new();
        transport.stub_json("/api/v1/type/12/", json!({"name": "grass"}));

        assert_eq!(transport.calls("/api/v1/type/12/"), 0);
        transport.fetch_json("/api/v1/type/12/").await.unwrap();
        transport.fetch_json("/api/v1/type/12/").await.unwrap();
        assert_eq!(transport.calls("/api/v1/type/12/"), 2);
        assert_eq!(transport.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_fake_transport_unscripted_path_errors() {
        let transport = FakeTransport::new();
        assert!(transport.fetch_json("/api/v1/type/12/").await.is_err());
        assert!(transport.fetch_bytes("/media/img/1.png").await.is_err());
        // Failed requests still count.
        assert_eq!(transport.total_calls(), 2);
    }
}
