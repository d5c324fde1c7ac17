use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("invalid selector {css}"))
}

static MATCH_INFO: LazyLock<Selector> = LazyLock::new(|| selector("div.match-info"));
static ITEM: LazyLock<Selector> = LazyLock::new(|| selector(".match-info__item"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".match-info__label"));
static VALUE: LazyLock<Selector> = LazyLock::new(|| selector(".match-info__value"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfoItem {
    pub label: String,
    pub value: String,
}

/// Labelled facts from the match centre's info panel (referees, spectators...)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchInfo {
    pub items: Vec<MatchInfoItem>,
}

impl MatchInfo {
    /// `None` when the page has no info panel
    pub fn parse(html: &str) -> Option<MatchInfo> {
        let document = Html::parse_document(html);
        let panel = document.select(&MATCH_INFO).next()?;

        let items = panel
            .select(&ITEM)
            .filter_map(|item| {
                Some(MatchInfoItem {
                    label: text(&item.select(&LABEL).next()?),
                    value: text(&item.select(&VALUE).next()?),
                })
            })
            .collect();

        Some(MatchInfo { items })
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.label.eq_ignore_ascii_case(label))
            .map(|item| item.value.as_str())
    }
}

/// Text content with whitespace runs collapsed
fn text(element: &ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
