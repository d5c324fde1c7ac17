//! Canned-response transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::Transport;
use crate::error::{Error, Result};

#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<HashMap<String, String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_json(self, url: &str, body: Value) -> Self {
        self.set_json(url, body);
        self
    }

    pub(crate) fn with_text(self, url: &str, body: &str) -> Self {
        self.set_text(url, body);
        self
    }

    /// Replace the body served for `url` from now on
    pub(crate) fn set_json(&self, url: &str, body: Value) {
        self.set_text(url, &body.to_string());
    }

    pub(crate) fn set_text(&self, url: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
