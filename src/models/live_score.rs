use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::de;
use crate::models::RawSetScore;

const FEED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const FINISHED: &str = "FINISHED";

/// Competition a feed entry belongs to, copied onto each match at fetch time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
}

/// One match entry of the live-score feed.
///
/// The score-hero converter produces the same shape, so everything
/// downstream treats both sources alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScoreRecord {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub match_id: Option<i64>,
    #[serde(default)]
    pub match_centre_link: Option<String>,
    #[serde(rename = "matchState_String", default)]
    pub match_state: Option<String>,

    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub home_team_icon: Option<String>,
    #[serde(default)]
    pub away_team_icon: Option<String>,
    #[serde(default)]
    pub home_team_nickname: Option<String>,
    #[serde(default)]
    pub away_team_nickname: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub home_team_id: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub away_team_id: Option<i64>,

    #[serde(default)]
    pub match_location: Option<String>,
    #[serde(default)]
    pub utc_start_date: Option<String>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub home_sets_won: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub away_sets_won: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub has_golden_set: Option<bool>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub set_results: Vec<RawSetScore>,
    #[serde(default)]
    pub current_set_score: Option<RawSetScore>,

    #[serde(default)]
    pub watch_link: Option<String>,
    #[serde(default)]
    pub highlights_link: Option<String>,

    #[serde(default)]
    pub leg_name: Option<String>,
    #[serde(default)]
    pub phase_name: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub match_number: Option<String>,

    #[serde(default)]
    pub competition: Option<CompetitionRef>,
}

/// Team fields of one side of a feed entry
#[derive(Debug, Clone, Copy)]
pub struct FeedSide<'a> {
    pub name: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub nickname: Option<&'a str>,
    pub id: Option<i64>,
}

impl LiveScoreRecord {
    pub fn is_finished(&self) -> bool {
        self.match_state.as_deref() == Some(FINISHED)
    }

    /// Kick-off time; the feed always uses `YYYY-MM-DDTHH:MM:SSZ`
    pub fn start_time(&self) -> Result<DateTime<Utc>> {
        let raw = self
            .utc_start_date
            .as_deref()
            .ok_or_else(|| Error::parse("start time", "utcStartDate missing"))?;
        parse_feed_time(raw)
    }

    pub fn side(&self, home: bool) -> FeedSide<'_> {
        if home {
            FeedSide {
                name: self.home_team.as_deref(),
                icon: self.home_team_icon.as_deref(),
                nickname: self.home_team_nickname.as_deref(),
                id: self.home_team_id,
            }
        } else {
            FeedSide {
                name: self.away_team.as_deref(),
                icon: self.away_team_icon.as_deref(),
                nickname: self.away_team_nickname.as_deref(),
                id: self.away_team_id,
            }
        }
    }
}

pub(crate) fn parse_feed_time(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, FEED_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::parse("start time", format!("{raw}: {e}")))
}

/// A competition block of the feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedCompetition {
    pub name: Option<String>,
    pub id: Option<String>,
    pub matches: Vec<LiveScoreRecord>,
}

/// The global live-scores document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveScoresFeed {
    pub competitions: Vec<FeedCompetition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeed {
    #[serde(default, deserialize_with = "de::or_default")]
    competitions: Vec<RawFeedCompetition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeedCompetition {
    #[serde(default)]
    competition_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    competition_id: Option<String>,
    #[serde(default, deserialize_with = "de::or_default")]
    matches: Vec<Value>,
}

impl LiveScoresFeed {
    /// Parse the feed, stamping every match with its parent competition.
    /// Entries that do not deserialize are dropped so one bad row does not
    /// hide the rest of the feed.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawFeed = serde_json::from_value(value)
            .map_err(|e| Error::parse("live-score feed", e.to_string()))?;

        let competitions = raw
            .competitions
            .into_iter()
            .map(|competition| {
                let matches = competition
                    .matches
                    .into_iter()
                    .filter_map(|entry| match serde_json::from_value::<LiveScoreRecord>(entry) {
                        Ok(mut record) => {
                            record.competition = Some(CompetitionRef {
                                name: competition.competition_name.clone(),
                                id: competition.competition_id.clone(),
                            });
                            Some(record)
                        }
                        Err(e) => {
                            warn!("Skipping malformed live-score entry: {}", e);
                            None
                        }
                    })
                    .collect();

                FeedCompetition {
                    name: competition.competition_name,
                    id: competition.competition_id,
                    matches,
                }
            })
            .collect();

        Ok(Self { competitions })
    }

    pub fn matches(&self) -> impl Iterator<Item = &LiveScoreRecord> {
        self.competitions.iter().flat_map(|c| c.matches.iter())
    }

    pub fn find_by_internal_id(&self, match_id: i64) -> Option<&LiveScoreRecord> {
        self.matches().find(|m| m.match_id == Some(match_id))
    }

    pub fn find_by_link(&self, link: &str) -> Option<&LiveScoreRecord> {
        self.matches()
            .find(|m| m.match_centre_link.as_deref() == Some(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_feed() -> Value {
        json!({
            "competitions": [
                {
                    "competitionName": "CEV Champions League Volley 2024 | Men",
                    "competitionId": 77,
                    "matches": [
                        {
                            "matchId": 12345,
                            "matchCentreLink": "https://www.cev.eu/match-centres/a",
                            "matchState_String": "FINISHED",
                            "homeTeam": "Home",
                            "awayTeam": "Away",
                            "utcStartDate": "2024-03-02T18:00:00Z"
                        },
                        "not an object",
                        {
                            "matchId": "12346",
                            "matchCentreLink": "https://www.cev.eu/match-centres/b",
                            "matchState_String": "LIVE",
                            "setResults": null
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_feed_annotates_competition_and_skips_bad_rows() {
        let feed = LiveScoresFeed::from_value(sample_feed()).unwrap();

        assert_eq!(feed.matches().count(), 2);
        let record = feed.find_by_internal_id(12345).unwrap();
        assert!(record.is_finished());
        let competition = record.competition.as_ref().unwrap();
        assert_eq!(competition.id.as_deref(), Some("77"));

        let live = feed
            .find_by_link("https://www.cev.eu/match-centres/b")
            .unwrap();
        assert_eq!(live.match_id, Some(12346));
        assert!(!live.is_finished());
        assert!(feed.find_by_internal_id(99999).is_none());
    }

    #[test]
    fn test_start_time_format() {
        let feed = LiveScoresFeed::from_value(sample_feed()).unwrap();
        let start = feed.find_by_internal_id(12345).unwrap().start_time().unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-02T18:00:00+00:00");

        assert!(parse_feed_time("02.03.2024 18:00").is_err());
    }
}
