use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_HOMEPAGE_URL: &str = "https://www.cev.eu/";
const DEFAULT_LIVE_SCORES_URL: &str = "https://www.cev.eu/LiveScores.json";
const DEFAULT_CALENDAR_URL: &str = "https://www.cev.eu/umbraco/api/CalendarApi/GetCalendar";
const DEFAULT_CALENDAR_NODE_ID: &str = "11346";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Federation homepage, scraped for featured media
    pub homepage_url: String,

    /// Global live-scores feed
    pub live_scores_url: String,

    /// Monthly calendar API
    pub calendar_url: String,

    /// Site node the calendar is queried for
    pub calendar_node_id: String,

    /// Interval in seconds between score polls of an engine
    pub score_poll_interval: u64,

    /// Per-request deadline in seconds
    pub request_timeout: u64,

    /// Match centre page the binary follows
    pub match_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            homepage_url: env::var("HOMEPAGE_URL").unwrap_or_else(|_| DEFAULT_HOMEPAGE_URL.to_string()),

            live_scores_url: env::var("LIVE_SCORES_URL")
                .unwrap_or_else(|_| DEFAULT_LIVE_SCORES_URL.to_string()),

            calendar_url: env::var("CALENDAR_URL").unwrap_or_else(|_| DEFAULT_CALENDAR_URL.to_string()),

            calendar_node_id: env::var("CALENDAR_NODE_ID")
                .unwrap_or_else(|_| DEFAULT_CALENDAR_NODE_ID.to_string()),

            score_poll_interval: env::var("SCORE_POLL_INTERVAL")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("SCORE_POLL_INTERVAL must be a valid number")?,

            request_timeout: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("REQUEST_TIMEOUT must be a valid number")?,

            match_url: env::var("MATCH_URL").ok().filter(|url| !url.is_empty()),
        })
    }

    pub fn score_poll_interval(&self) -> Duration {
        Duration::from_secs(self.score_poll_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            homepage_url: DEFAULT_HOMEPAGE_URL.to_string(),
            live_scores_url: DEFAULT_LIVE_SCORES_URL.to_string(),
            calendar_url: DEFAULT_CALENDAR_URL.to_string(),
            calendar_node_id: DEFAULT_CALENDAR_NODE_ID.to_string(),
            score_poll_interval: 20,
            request_timeout: 15,
            match_url: None,
        }
    }
}
