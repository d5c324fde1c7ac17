use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("invalid selector {css}"))
}

static MATCH_REPORT: LazyLock<Selector> = LazyLock::new(|| selector("div.match-report"));
static HEADLINE: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static SUMMARY: LazyLock<Selector> = LazyLock::new(|| selector("div.match-report__summary-container p"));
static QUOTE_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector(".quote-block"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static CITE: LazyLock<Selector> = LazyLock::new(|| selector("cite"));
static IN_NUMBER: LazyLock<Selector> = LazyLock::new(|| selector("div.column-container"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static IN_NUMBER_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("span.col__content-title"));

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuote {
    pub quote: String,
    pub cite: String,
    pub cite_description: Option<String>,
}

/// One "match in numbers" fact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInNumber {
    pub value: String,
    pub title: String,
    pub description: String,
}

/// Editorial report published on finished match centre pages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub headline: String,
    pub body: String,
    pub quotes: Vec<MatchQuote>,
    pub in_numbers: Vec<MatchInNumber>,
}

impl MatchReport {
    /// Parse the report out of a full match centre page. `None` when the page
    /// has no report block, or the block lacks its headline or summary.
    pub fn parse(html: &str) -> Option<MatchReport> {
        let document = Html::parse_document(html);
        let mut blocks = document.select(&MATCH_REPORT);

        let report = blocks.next()?;
        let headline = report.select(&HEADLINE).next().map(|h| text(&h))?;
        let body = report.select(&SUMMARY).next().map(|p| raw_text(&p))?;

        let quotes = document.select(&QUOTE_BLOCK).filter_map(|q| parse_quote(&q)).collect();

        // the numbers live in a second report block further down the page
        let in_numbers = blocks
            .flat_map(|block| block.select(&IN_NUMBER).collect::<Vec<_>>())
            .filter_map(|n| parse_in_number(&n))
            .collect();

        Some(MatchReport {
            headline,
            body,
            quotes,
            in_numbers,
        })
    }
}

fn parse_quote(block: &ElementRef) -> Option<MatchQuote> {
    let quote = block
        .select(&PARAGRAPH)
        .next()
        .map(|p| raw_text(&p).replace(['“', '”'], "").trim().to_string())?;

    let cite = block.select(&CITE).next()?;
    let mut lines = cite.text().map(str::trim).filter(|t| !t.is_empty());

    Some(MatchQuote {
        quote,
        cite: lines.next()?.to_string(),
        cite_description: lines.next().map(str::to_string),
    })
}

fn parse_in_number(column: &ElementRef) -> Option<MatchInNumber> {
    Some(MatchInNumber {
        value: column.select(&SPAN).next().map(|s| raw_text(&s))?,
        title: column.select(&IN_NUMBER_TITLE).next().map(|s| text(&s))?,
        description: column.select(&PARAGRAPH).next().map(|p| raw_text(&p))?,
    })
}

fn raw_text(element: &ElementRef) -> String {
    element.text().collect()
}

fn text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect::<Vec<_>>().concat()
}
