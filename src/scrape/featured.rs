use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::scrape::endpoints::embedded_videos;

static RE_MEDIA_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/media/[\w .,@;?^=%\&:/\~+#\-]*[\w@?^=%\&/\~+#\-]\.(?:jpg|JPG)").unwrap()
});

/// Featured images and videos of the federation homepage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Featured {
    pub gallery: Vec<String>,
    pub videos: Vec<String>,
}

impl Featured {
    /// Scrape the homepage `html`; site-relative image paths are resolved
    /// against `base_url`
    pub fn parse(html: &str, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');

        let gallery = RE_MEDIA_IMAGE
            .find_iter(html)
            .map(|m| format!("{base}{}", m.as_str()))
            .collect();

        Self {
            gallery,
            videos: embedded_videos(html),
        }
    }
}
