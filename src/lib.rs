//! Scraping, reconciliation and snapshots of CEV volleyball match centres.
//!
//! A [`Client`] fetches a match centre page and turns it into a
//! [`MatchEngine`], which reconciles the page's embedded components with the
//! global live-score feed and assembles [`MatchSnapshot`]s.

pub mod api;
pub mod client;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod matching;
pub mod models;
pub mod scrape;
pub mod workers;

#[cfg(test)]
mod testing;

pub use client::Client;
pub use config::Config;
pub use engine::{MatchEngine, MatchIdentity};
pub use error::{Error, Result};
pub use models::{CalendarMatch, MatchResult, MatchSnapshot, MatchState};
pub use scrape::Featured;
pub use workers::{ObserverId, ScoreObserver};
