use std::sync::LazyLock;

use regex::Regex;

/// Substring tags of the match centre components
pub mod tags {
    pub const LIVE_SCORE_HERO: &str = "livescorehero";
    pub const GET_LIVE_SCORE_HERO: &str = "getlivescorehero";
    pub const MATCH_POLL: &str = "GetMatchPoll";
    /// Index 0 is the home team, 1 the away team
    pub const STARTING_TEAM: &str = "GetStartingTeamComponent";
    pub const PLAYER_STATS: &str = "GetPlayerStatsComponentMC";
    pub const TEAM_STATS: &str = "GetTeamStatsComponentMC";
    pub const FORM: &str = "GetFormComponent";
    pub const PLAY_BY_PLAY: &str = "GetPlayByPlayComponent";
    /// One link per award category
    pub const TOP_STATISTICS: &str = "GetTopStatisticsComponent";
}

static RE_API_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w\-]+(?:\.[\w\-]+)+[\w.,@;?^=%\&:/\~+#\-]*umbraco[\w.,@;?^=%\&:/\~+#\-]*[\w@?^=%\&/\~+#\-]")
        .unwrap()
});
static RE_GALLERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w\-]+(?:\.[\w\-]+)+[\w.,@;?^=%\&:/\~+#\-]*Upload/Photo/[\w .,@;?^=%\&:/\~+#\-]*[\w@?^=%\&/\~+#\-].(?:jpg|JPG)")
        .unwrap()
});
static RE_EMBEDDED_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w\-]+(?:\.[\w\-]+)+[\w.,@;?^=%\&:/\~+#\-]*/embed/[\w .,@;?^=%\&:/\~+#\-]*[\w@?^=%\&/\~+#\-]")
        .unwrap()
});

/// Markers of the site's broken match centre pages
const INVALID_PAGE_MARKERS: [&str; 2] = [
    "This page can be replaced with a custom 404. Check the documentation for",
    "Object reference not set to an instance of an object.",
];

/// Endpoint, gallery and video URLs embedded in a match centre page,
/// in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointIndex {
    links: Vec<String>,
    gallery: Vec<String>,
    videos: Vec<String>,
}

impl EndpointIndex {
    pub fn extract(html: &str) -> Self {
        let links = RE_API_LINK
            .find_iter(html)
            .map(|m| format!("https://{}", m.as_str().replace("&amp;", "&")))
            .collect();

        let gallery = RE_GALLERY
            .find_iter(html)
            .map(|m| format!("https://{}", m.as_str()))
            .collect();

        let videos = embedded_videos(html);

        Self {
            links,
            gallery,
            videos,
        }
    }

    /// Whether the page embeds any component endpoint at all
    pub fn is_valid(&self) -> bool {
        !self.links.is_empty()
    }

    /// All links containing `tag` (case-insensitively), in document order
    pub fn links(&self, tag: &str) -> Vec<&str> {
        let tag = tag.to_lowercase();
        self.links
            .iter()
            .filter(|link| link.to_lowercase().contains(&tag))
            .map(String::as_str)
            .collect()
    }

    /// The `index`-th link containing `tag`
    pub fn link(&self, tag: &str, index: usize) -> Option<&str> {
        self.links(tag).into_iter().nth(index)
    }

    pub fn gallery(&self) -> &[String] {
        &self.gallery
    }

    /// First embedded video, rewritten to its watch link
    pub fn highlights_link(&self) -> Option<&str> {
        self.videos.first().map(String::as_str)
    }
}

/// Embedded players of a page as canonical `/v/` links, in document order
pub(crate) fn embedded_videos(html: &str) -> Vec<String> {
    RE_EMBEDDED_VIDEO
        .find_iter(html)
        .map(|m| canonical_video_link(m.as_str()))
        .collect()
}

/// `host/embed/ID?params` -> `https://host/v/ID`
fn canonical_video_link(embed: &str) -> String {
    let link = embed.replace("/embed/", "/v/");
    let link = link.split('?').next().unwrap_or_default();
    format!("https://{link}")
}

pub fn is_invalid_match_centre(html: &str) -> bool {
    INVALID_PAGE_MARKERS.iter().any(|marker| html.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div data-url="https://site.example/umbraco/api/LiveScoreHero/Get?nodeId=42&amp;x=1"></div>
        <div data-url="https://site.example/umbraco/api/MatchCentre/GetStartingTeamComponent?nodeId=42&amp;home=true"></div>
        <div data-url="https://site.example/umbraco/api/MatchCentre/GetStartingTeamComponent?nodeId=42&amp;home=false"></div>
        <img src="https://media.site.example/Upload/Photo/2023/match 1.jpg">
        <iframe src="https://www.youtube.com/embed/abc123?autoplay=1"></iframe>
    "#;

    #[test]
    fn test_entity_unescaped_and_tagged() {
        let index = EndpointIndex::extract(PAGE);

        assert!(index.is_valid());
        assert_eq!(
            index.link(tags::LIVE_SCORE_HERO, 0),
            Some("https://site.example/umbraco/api/LiveScoreHero/Get?nodeId=42&x=1")
        );
    }

    #[test]
    fn test_shared_tag_kept_in_order() {
        let index = EndpointIndex::extract(PAGE);

        let teams = index.links(tags::STARTING_TEAM);
        assert_eq!(teams.len(), 2);
        assert!(teams[0].ends_with("home=true"));
        assert!(index.link(tags::STARTING_TEAM, 1).unwrap().ends_with("home=false"));
        assert_eq!(index.link(tags::STARTING_TEAM, 2), None);
        assert!(index.links(tags::PLAY_BY_PLAY).is_empty());
    }

    #[test]
    fn test_gallery_and_video() {
        let index = EndpointIndex::extract(PAGE);

        assert_eq!(
            index.gallery(),
            ["https://media.site.example/Upload/Photo/2023/match 1.jpg".to_string()]
        );
        assert_eq!(index.highlights_link(), Some("https://www.youtube.com/v/abc123"));
    }

    #[test]
    fn test_empty_page() {
        let index = EndpointIndex::extract("<html></html>");
        assert!(!index.is_valid());
        assert!(index.gallery().is_empty());
        assert_eq!(index.highlights_link(), None);
    }

    #[test]
    fn test_invalid_match_centre() {
        assert!(is_invalid_match_centre(
            "<p>Object reference not set to an instance of an object.</p>"
        ));
        assert!(!is_invalid_match_centre(PAGE));
    }
}
