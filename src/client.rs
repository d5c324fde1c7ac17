use std::sync::Arc;

use tracing::info;

use crate::api::{CalendarClient, HttpTransport, LiveScoreDirectory, Transport};
use crate::config::Config;
use crate::engine::MatchEngine;
use crate::error::Result;
use crate::scrape::Featured;

/// Entry point: builds match engines and calendar listings over one transport
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: Config,
}

impl Client {
    /// Client over HTTP, every request bounded by the configured timeout
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.request_timeout())?);
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: Config) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch a match centre page and build an engine for it. The engine
    /// starts resolving its identity in the background; await
    /// [`MatchEngine::init`] before using identity-bound accessors.
    pub async fn match_by_url(&self, url: &str) -> Result<MatchEngine> {
        info!("Loading match centre {}", url);
        let html = self.transport.get_text(url).await?;

        Ok(MatchEngine::new(
            Arc::clone(&self.transport),
            Arc::new(self.directory()),
            &html,
            url,
            self.config.score_poll_interval(),
        ))
    }

    pub fn calendar(&self) -> CalendarClient {
        CalendarClient::new(
            Arc::clone(&self.transport),
            &self.config.calendar_url,
            &self.config.calendar_node_id,
            Arc::new(self.directory()),
        )
    }

    /// Featured gallery images and videos of the federation homepage
    pub async fn featured(&self) -> Result<Featured> {
        let html = self.transport.get_text(&self.config.homepage_url).await?;
        let featured = Featured::parse(&html, &self.config.homepage_url);
        info!(
            "Featured: {} images, {} videos",
            featured.gallery.len(),
            featured.videos.len()
        );
        Ok(featured)
    }

    fn directory(&self) -> LiveScoreDirectory {
        LiveScoreDirectory::new(Arc::clone(&self.transport), &self.config.live_scores_url)
    }
}
