//! # Mock Data Source
//!
//! Stands in for the CMS so views and the system can be tested without a
//! network. Register a canned payload or a failure per query string, then
//! inspect [`MockSource::calls`] to assert which queries were sent.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::FetchError;
use crate::source::DataSource;

#[derive(Default)]
pub struct MockSource {
    responses: Mutex<HashMap<String, Result<Value, FetchError>>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `payload`, which should be a JSON array.
    pub fn respond(&self, query: &str, payload: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Ok(payload));
    }

    /// Make `query` fail as if the service were unreachable.
    pub fn fail(&self, query: &str) {
        self.responses.lock().unwrap().insert(
            query.to_string(),
            Err(FetchError::Network("connection refused".to_string())),
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Value>, FetchError> {
        self.calls.lock().unwrap().push(query.to_string());
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Network(format!("no response for {}", query))));

        match response? {
            Value::Array(items) => Ok(items),
            other => Err(FetchError::Decode(format!("expected array, got {}", other))),
        }
    }
}
