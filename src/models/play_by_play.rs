use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::matching::title_case;
use crate::models::de;
use crate::models::types::PlayType;
use crate::models::SetResult;

/// One rally outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    #[serde(rename = "type")]
    pub kind: PlayType,
    /// Score of the set right after this play
    pub score: SetResult,
    pub player_name: String,
    pub player_number: Option<u32>,
    pub is_home: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayByPlaySet {
    pub set_number: u32,
    pub plays: Vec<Play>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayByPlay {
    pub sets: Vec<PlayByPlaySet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPlayByPlay {
    play_events: Vec<RawTab>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTab {
    tab_name: String,
    events: Vec<RawEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEvent {
    #[serde(default)]
    title: Option<String>,
    description: String,
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    player_number: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    is_home: Option<bool>,
}

impl PlayByPlay {
    /// Parse the play-by-play component. Tabs, events and running scores are
    /// required; anything missing there is a parse error.
    pub fn parse(value: &Value) -> Result<Self> {
        let raw: RawPlayByPlay = serde_json::from_value(value.clone())
            .map_err(|e| Error::parse("play-by-play", e.to_string()))?;

        let sets = raw
            .play_events
            .into_iter()
            .map(PlayByPlaySet::from_raw)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { sets })
    }

    pub fn set(&self, set_number: u32) -> Option<&PlayByPlaySet> {
        self.sets.iter().find(|s| s.set_number == set_number)
    }
}

impl PlayByPlaySet {
    fn from_raw(tab: RawTab) -> Result<Self> {
        let set_number = parse_tab_name(&tab.tab_name)?;

        let plays = tab
            .events
            .into_iter()
            .map(|event| {
                Ok(Play {
                    kind: PlayType::parse(event.title.as_deref().unwrap_or_default()),
                    score: SetResult::from_play_by_play(&event.description, set_number)?,
                    player_name: title_case(event.player_name.as_deref().unwrap_or_default()),
                    player_number: event.player_number,
                    is_home: event.is_home,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { set_number, plays })
    }

    pub fn last_play(&self) -> Option<&Play> {
        self.plays.last()
    }
}

/// `"Set 3"` -> 3
fn parse_tab_name(tab_name: &str) -> Result<u32> {
    tab_name
        .split_whitespace()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::parse("play-by-play tab", tab_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sets_and_plays() {
        let pbp = PlayByPlay::parse(&json!({
            "PlayEvents": [
                {"TabName": "Set 1", "Events": [
                    {"Title": "First Serve", "Description": "0-0", "PlayerName": "SARA NOVAK",
                     "PlayerNumber": 9, "IsHome": true},
                    {"Title": "Spike", "Description": "1-0", "PlayerName": "ANNA SMITH",
                     "PlayerNumber": "7", "IsHome": true}
                ]},
                {"TabName": "Set 2", "Events": []}
            ]
        }))
        .unwrap();

        assert_eq!(pbp.sets.len(), 2);
        let first = pbp.set(1).unwrap();
        let last = first.last_play().unwrap();
        assert_eq!(last.kind, PlayType::Spike);
        assert_eq!((last.score.home_score, last.score.away_score), (1, 0));
        assert_eq!(last.player_name, "Anna Smith");
        assert_eq!(last.player_number, Some(7));
        assert!(pbp.set(2).unwrap().plays.is_empty());
    }

    #[test]
    fn test_missing_pieces_fail() {
        assert!(PlayByPlay::parse(&json!({})).is_err());
        assert!(PlayByPlay::parse(&json!({
            "PlayEvents": [{"TabName": "Overview", "Events": []}]
        }))
        .is_err());
        assert!(PlayByPlay::parse(&json!({
            "PlayEvents": [{"TabName": "Set 1", "Events": [{"Title": "Spike", "Description": "?"}]}]
        }))
        .is_err());
    }
}
