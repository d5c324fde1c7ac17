use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::models::{MatchCompetition, MatchResult, MatchState, PlayByPlay, Team, TopPlayers};
use crate::scrape::{MatchInfo, MatchReport};

/// Every field of a match, fetched as one concurrent batch.
///
/// Fields are plain values; nothing here talks to the network.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub state: MatchState,
    pub result: MatchResult,
    pub home_team: Team,
    pub away_team: Team,
    pub competition: Option<MatchCompetition>,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    pub start_time: DateTime<Utc>,
    pub match_centre_link: String,
    pub watch_link: Option<String>,
    pub highlights_link: Option<String>,
    pub venue: Option<String>,
    pub report: Option<MatchReport>,
    pub info: Option<MatchInfo>,
    pub top_players: TopPlayers,
    pub gallery: Vec<String>,
    pub play_by_play: Option<PlayByPlay>,
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|source| Error::Json {
            url: self.match_centre_link.clone(),
            source,
        })
    }

    pub fn finished(&self) -> bool {
        self.state == MatchState::Finished
    }
}

/// `H:MM:SS`, negative durations clamp to zero
fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
