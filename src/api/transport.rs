use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("volley-centre/", env!("CARGO_PKG_VERSION"));

/// Minimal HTTP surface the scraper needs.
///
/// Every upstream request goes through this trait so the engine can be driven
/// by canned responses in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a URL and return the body as text
    async fn get_text(&self, url: &str) -> Result<String>;

    /// GET a URL and decode the body as JSON, whatever the content type says
    async fn get_json(&self, url: &str) -> Result<Value> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|source| Error::Json {
            url: url.to_string(),
            source,
        })
    }
}

/// `reqwest` backed transport with a per-request deadline
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport; every request is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })
    }
}

/// Some match centre components serve their payload as a JSON string that
/// itself contains JSON. Unwrap one such layer, leave anything else untouched.
pub fn decode_nested(value: Value) -> Value {
    match value {
        Value::String(inner) => serde_json::from_str(&inner).unwrap_or(Value::String(inner)),
        other => other,
    }
}
