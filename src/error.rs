use thiserror::Error;

/// Errors surfaced by the match centre client
#[derive(Debug, Error)]
pub enum Error {
    /// An identity-dependent accessor ran before `MatchEngine::init` finished
    #[error("match identity not resolved yet, await `init()` first")]
    Uninitialized,

    /// Neither the live-score feed nor the fallback endpoints know this match
    #[error("match unavailable: {0}")]
    MatchUnavailable(String),

    /// The match centre page does not embed an endpoint with this tag
    #[error("no `{0}` endpoint embedded in the match centre page")]
    EndpointMissing(&'static str),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// An upstream fragment did not have the shape we rely on
    #[error("failed to parse {context}: {detail}")]
    Parse {
        context: &'static str,
        detail: String,
    },

    #[error("parser worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn parse(context: &'static str, detail: impl Into<String>) -> Self {
        Error::Parse {
            context,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
