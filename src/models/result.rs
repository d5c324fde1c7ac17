use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::score_hero::parse_sets;
use crate::error::{Error, Result};
use crate::models::de;
use crate::models::LiveScoreRecord;

/// Set score exactly as the live-score feed ships it (any field may be absent)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSetScore {
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub home_score: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub away_score: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub set_number: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub is_in_play: Option<bool>,
}

/// Result of a single set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResult {
    pub home_score: u32,
    pub away_score: u32,
    /// 1-5, or 6 for a golden set
    pub set_number: u32,
    pub is_in_play: bool,
}

impl SetResult {
    /// Complete sets only: every field must be present
    pub fn from_raw(raw: &RawSetScore) -> Option<Self> {
        Some(Self {
            home_score: raw.home_score?,
            away_score: raw.away_score?,
            set_number: raw.set_number?,
            is_in_play: raw.is_in_play?,
        })
    }

    /// A set counts once both sides have scored; 0-0 placeholders never do
    pub fn is_valid(&self) -> bool {
        self.home_score != 0 && self.away_score != 0
    }

    /// Parse the running score attached to a play-by-play event (`"12-9"`)
    pub fn from_play_by_play(description: &str, set_number: u32) -> Result<Self> {
        let (home, away) = description
            .split_once('-')
            .ok_or_else(|| Error::parse("play-by-play score", description))?;

        let parse = |s: &str| {
            s.trim()
                .parse::<u32>()
                .map_err(|e| Error::parse("play-by-play score", format!("{description}: {e}")))
        };

        Ok(Self {
            home_score: parse(home)?,
            away_score: parse(away)?,
            set_number,
            is_in_play: false,
        })
    }
}

impl fmt::Display for SetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home_score, self.away_score)
    }
}

/// Full match result: sets won plus per-set scores
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    sets: Vec<SetResult>,
    #[serde(rename = "homeScore")]
    home_sets_won: u32,
    #[serde(rename = "awayScore")]
    away_sets_won: u32,
    has_golden_set: bool,
    /// Raw current set, kept even while it is still 0-0
    #[serde(skip)]
    current_set: Option<SetResult>,
}

impl MatchResult {
    pub fn new(sets: Vec<SetResult>, home_sets_won: u32, away_sets_won: u32, has_golden_set: bool) -> Self {
        Self {
            sets,
            home_sets_won,
            away_sets_won,
            has_golden_set,
            current_set: None,
        }
    }

    /// Build from a live-score feed entry (or a synthesized one)
    pub fn from_record(record: &LiveScoreRecord) -> Self {
        let mut sets: Vec<SetResult> = record
            .set_results
            .iter()
            .filter_map(SetResult::from_raw)
            .filter(SetResult::is_valid)
            .collect();

        let current_set = record.current_set_score.as_ref().and_then(SetResult::from_raw);
        if let Some(current) = current_set.filter(SetResult::is_valid) {
            sets.push(current);
        }

        Self {
            sets,
            home_sets_won: record.home_sets_won.unwrap_or(0),
            away_sets_won: record.away_sets_won.unwrap_or(0),
            has_golden_set: record.has_golden_set.unwrap_or(false),
            current_set,
        }
    }

    /// Build from a form entry's `SetsFormatted` string and sets won
    pub fn from_form(sets_formatted: &str, home_sets_won: u32, away_sets_won: u32) -> Result<Self> {
        Ok(Self::new(parse_sets(sets_formatted)?, home_sets_won, away_sets_won, false))
    }

    pub fn sets(&self) -> &[SetResult] {
        &self.sets
    }

    /// All sets except a trailing golden set
    pub fn regular_sets(&self) -> &[SetResult] {
        match (self.has_golden_set, self.sets.split_last()) {
            (true, Some((_, regular))) => regular,
            _ => &self.sets,
        }
    }

    pub fn golden_set(&self) -> Option<&SetResult> {
        if self.has_golden_set {
            self.sets.last()
        } else {
            None
        }
    }

    /// Latest set, possibly still being played
    pub fn latest_set(&self) -> Option<&SetResult> {
        self.sets.last()
    }

    pub fn current_set(&self) -> Option<&SetResult> {
        self.current_set.as_ref()
    }

    /// True while the feed reports a set in progress, including a fresh 0-0 one
    pub fn in_play(&self) -> bool {
        self.current_set.is_some_and(|set| set.is_in_play)
    }

    pub fn home_sets_won(&self) -> u32 {
        self.home_sets_won
    }

    pub fn away_sets_won(&self) -> u32 {
        self.away_sets_won
    }

    pub fn has_golden_set(&self) -> bool {
        self.has_golden_set
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.home_sets_won == 0 && self.away_sets_won == 0
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.home_sets_won, self.away_sets_won)?;
        if !self.sets.is_empty() {
            let sets: Vec<String> = self.sets.iter().map(|s| s.to_string()).collect();
            write!(f, " ({})", sets.join(", "))?;
        }
        Ok(())
    }
}
