use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::api::Transport;
use crate::error::Result;
use crate::models::{LiveScoreRecord, LiveScoresFeed};

/// Fetches and caches the global live-score feed.
///
/// The cache lives as long as the directory and is only replaced by a fetch
/// with `use_cache = false`; it never expires on its own.
pub struct LiveScoreDirectory {
    transport: Arc<dyn Transport>,
    url: String,
    cache: RwLock<Option<Arc<LiveScoresFeed>>>,
}

impl LiveScoreDirectory {
    pub fn new(transport: Arc<dyn Transport>, url: &str) -> Self {
        Self {
            transport,
            url: url.to_string(),
            cache: RwLock::new(None),
        }
    }

    /// The whole feed, served from cache when allowed and available
    pub async fn fetch_all(&self, use_cache: bool) -> Result<Arc<LiveScoresFeed>> {
        if use_cache {
            if let Some(feed) = self.cache.read().await.as_ref() {
                return Ok(Arc::clone(feed));
            }
        }

        debug!("Fetching live-score feed from: {}", self.url);
        let value = self.transport.get_json(&self.url).await?;
        let feed = Arc::new(LiveScoresFeed::from_value(value)?);

        info!(
            "Live-score feed: {} competitions, {} matches",
            feed.competitions.len(),
            feed.matches().count()
        );

        *self.cache.write().await = Some(Arc::clone(&feed));
        Ok(feed)
    }

    pub async fn find_by_internal_id(
        &self,
        match_id: i64,
        use_cache: bool,
    ) -> Result<Option<LiveScoreRecord>> {
        let feed = self.fetch_all(use_cache).await?;
        Ok(feed.find_by_internal_id(match_id).cloned())
    }

    pub async fn find_by_link(&self, link: &str, use_cache: bool) -> Result<Option<LiveScoreRecord>> {
        let feed = self.fetch_all(use_cache).await?;
        Ok(feed.find_by_link(link).cloned())
    }

    /// Every match of the feed, flattened across competitions
    pub async fn all_matches(&self, use_cache: bool) -> Result<Vec<LiveScoreRecord>> {
        let feed = self.fetch_all(use_cache).await?;
        Ok(feed.matches().cloned().collect())
    }
}
