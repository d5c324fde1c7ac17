//! Normalizes the single-match "score hero" component into the live-score
//! feed shape.
//!
//! Matches roll off the live feed some time after they finish. For those the
//! score hero endpoint plus the match poll carry everything the feed entry
//! would have had.

use chrono::Duration;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::de;
use crate::models::{LiveScoreRecord, PollEntry, RawSetScore, SetResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeroLogo {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeroTeam {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub score: Option<u32>,
    #[serde(default)]
    pub logo: Option<HeroLogo>,
}

/// Score hero payload, limited to the fields we read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreHero {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub match_id: Option<i64>,
    #[serde(default)]
    pub stadium_information: Option<String>,
    #[serde(rename = "MatchStartDateTimeUTC", default)]
    pub start_utc: Option<String>,
    #[serde(default)]
    pub home_team: Option<HeroTeam>,
    #[serde(default)]
    pub away_team: Option<HeroTeam>,
    /// `"(25-20), (22-25)"`, usually wrapped in `<span>` tags
    #[serde(default)]
    pub sets_formatted: Option<String>,
    /// Either the golden set score (`"15-10"`) or a plain flag
    #[serde(default)]
    pub golden_set: Option<Value>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub has_golden_set: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub match_number: Option<String>,
    /// `"95 minutes"`
    #[serde(default)]
    pub duration: Option<String>,
}

impl ScoreHero {
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| Error::parse("score hero", e.to_string()))
    }

    fn golden_set_score(&self) -> Option<&str> {
        match &self.golden_set {
            Some(Value::String(score)) if !score.trim().is_empty() => Some(score.trim()),
            _ => None,
        }
    }

    fn golden_set_flag(&self) -> bool {
        self.has_golden_set.unwrap_or(match &self.golden_set {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(score)) => !score.trim().is_empty(),
            _ => false,
        })
    }

    /// All sets, with the golden set appended when one was played
    pub fn sets(&self) -> Result<(Vec<SetResult>, bool)> {
        let mut sets = parse_sets(self.sets_formatted.as_deref().unwrap_or_default())?;

        let golden = match (self.golden_set_flag(), self.golden_set_score()) {
            (true, Some(score)) => Some(parse_set_score(score, next_set_number(&sets))?),
            _ => None,
        };

        let has_golden_set = golden.is_some();
        sets.extend(golden);
        Ok((sets, has_golden_set))
    }

    /// Match duration from the `"N minutes"` label
    pub fn duration(&self) -> Result<Duration> {
        let raw = self
            .duration
            .as_deref()
            .ok_or_else(|| Error::parse("match duration", "Duration missing"))?;
        parse_duration_minutes(raw)
    }
}

fn next_set_number(sets: &[SetResult]) -> u32 {
    sets.len() as u32 + 1
}

/// Convert a score hero payload and the match poll into a feed entry.
/// Synthesized entries are always marked finished.
pub fn to_feed_record(score_hero: &Value, match_poll: &Value) -> Result<LiveScoreRecord> {
    let hero = ScoreHero::from_value(score_hero)?;
    let poll = PollEntry::parse_list(match_poll);
    let (sets, has_golden_set) = hero.sets()?;

    let home = hero.home_team.clone().unwrap_or_default();
    let away = hero.away_team.clone().unwrap_or_default();
    let logo_url = |team: &HeroTeam| team.logo.as_ref().and_then(|l| l.url.clone());

    Ok(LiveScoreRecord {
        match_id: hero.match_id,
        match_centre_link: None,
        match_state: Some("FINISHED".to_string()),
        home_team: home.name.clone(),
        away_team: away.name.clone(),
        home_team_icon: logo_url(&home),
        away_team_icon: logo_url(&away),
        home_team_nickname: poll.first().and_then(|p| p.value.clone()),
        away_team_nickname: poll.get(1).and_then(|p| p.value.clone()),
        home_team_id: poll.first().and_then(|p| p.id),
        away_team_id: poll.get(1).and_then(|p| p.id),
        match_location: hero.stadium_information.clone(),
        utc_start_date: hero.start_utc.clone(),
        home_sets_won: home.score,
        away_sets_won: away.score,
        has_golden_set: Some(has_golden_set),
        set_results: sets
            .iter()
            .map(|set| RawSetScore {
                home_score: Some(set.home_score),
                away_score: Some(set.away_score),
                set_number: Some(set.set_number),
                is_in_play: Some(set.is_in_play),
            })
            .collect(),
        current_set_score: Some(RawSetScore {
            home_score: Some(0),
            away_score: Some(0),
            set_number: Some(0),
            is_in_play: Some(false),
        }),
        match_number: hero.match_number.clone(),
        ..Default::default()
    })
}

/// Parse a `"(h-a), (h-a), ..."` sets string. Markup, brackets and blanks
/// are ignored and empty segments are skipped; sets are numbered from 1.
pub fn parse_sets(formatted: &str) -> Result<Vec<SetResult>> {
    let cleaned: String = formatted
        .replace("<span>", "")
        .replace("</span>", "")
        .chars()
        .filter(|c| !matches!(c, '(' | ')') && !c.is_whitespace())
        .collect();

    cleaned
        .split(',')
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| parse_set_score(segment, index as u32 + 1))
        .collect()
}

/// Inverse of [`parse_sets`] (without markup)
pub fn format_sets(sets: &[SetResult]) -> String {
    sets.iter()
        .map(|set| format!("({set})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_set_score(segment: &str, set_number: u32) -> Result<SetResult> {
    let (home, away) = segment
        .split_once('-')
        .ok_or_else(|| Error::parse("set score", segment))?;

    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| Error::parse("set score", format!("{segment}: {e}")))
    };

    Ok(SetResult {
        home_score: parse(home)?,
        away_score: parse(away)?,
        set_number,
        is_in_play: false,
    })
}

fn parse_duration_minutes(raw: &str) -> Result<Duration> {
    let minutes: f64 = raw
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::parse("match duration", raw))?;

    Ok(Duration::seconds((minutes * 60.0).round() as i64))
}
