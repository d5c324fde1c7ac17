use tracing::{debug, warn};

use crate::api::Transport;
use crate::models::de;
use crate::scrape::{tags, EndpointIndex};

/// Identifiers correlating one match across the page, the live-score feed
/// and the fallback endpoints. Resolved once, never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchIdentity {
    pub match_centre_link: String,
    /// Internal id from the score hero component
    pub match_id: Option<i64>,
    /// The page is one of the site's error pages and embeds no components
    pub invalid_match_centre: bool,
}

/// How to find the match in the live-score feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    Id(i64),
    Link(&'a str),
}

impl MatchIdentity {
    /// Fetch the score hero component and read the match id from it.
    /// Any failure leaves the id unset, which switches lookups to the link.
    pub async fn resolve(
        transport: &dyn Transport,
        endpoints: &EndpointIndex,
        match_centre_link: &str,
        invalid_match_centre: bool,
    ) -> Self {
        let match_id = match endpoints.link(tags::LIVE_SCORE_HERO, 0) {
            Some(url) => match transport.get_json(url).await {
                Ok(hero) => hero.get("MatchId").and_then(de::as_i64),
                Err(e) => {
                    warn!("Failed to resolve match id for {}: {}", match_centre_link, e);
                    None
                }
            },
            None => None,
        };

        debug!("Resolved {} to match id {:?}", match_centre_link, match_id);

        Self {
            match_centre_link: match_centre_link.to_string(),
            match_id,
            invalid_match_centre,
        }
    }

    pub fn lookup_key(&self) -> LookupKey<'_> {
        match self.match_id {
            Some(id) if !self.invalid_match_centre => LookupKey::Id(id),
            _ => LookupKey::Link(&self.match_centre_link),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;

    const PAGE: &str = r#"<a href="https://cev.test/umbraco/api/livescorehero/get?nodeId=7"></a>"#;
    const HERO: &str = "https://cev.test/umbraco/api/livescorehero/get?nodeId=7";

    #[tokio::test]
    async fn test_resolves_id_from_score_hero() {
        let transport = MockTransport::new().with_json(HERO, json!({"MatchId": "4711"}));
        let identity =
            MatchIdentity::resolve(&transport, &EndpointIndex::extract(PAGE), "https://m/1", false).await;

        assert_eq!(identity.match_id, Some(4711));
        assert_eq!(identity.lookup_key(), LookupKey::Id(4711));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_link() {
        let transport = MockTransport::new();
        let identity =
            MatchIdentity::resolve(&transport, &EndpointIndex::extract(PAGE), "https://m/1", false).await;

        assert_eq!(identity.match_id, None);
        assert_eq!(identity.lookup_key(), LookupKey::Link("https://m/1"));
    }

    #[tokio::test]
    async fn test_invalid_match_centre_always_uses_link() {
        let transport = MockTransport::new().with_json(HERO, json!({"MatchId": 1}));
        let identity =
            MatchIdentity::resolve(&transport, &EndpointIndex::extract(PAGE), "https://m/1", true).await;

        assert_eq!(identity.lookup_key(), LookupKey::Link("https://m/1"));
    }
}
