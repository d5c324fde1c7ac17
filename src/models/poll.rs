use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::de;

/// One side of the "who will win?" match poll
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PollEntry {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    /// Team nickname (three letter code)
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub percent: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub vote_count: Option<i64>,
}

impl PollEntry {
    /// Parse the poll array; unreadable entries become empty ones so the
    /// home/away positions stay intact
    pub fn parse_list(value: &Value) -> Vec<PollEntry> {
        value
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| serde_json::from_value(entry.clone()).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPoll {
    /// 0 - 100
    pub percent: f64,
    pub count: i64,
}

impl TeamPoll {
    /// Pick this team's side of a two-entry poll: the first entry unless its
    /// id belongs to someone else
    pub fn select(entries: &[PollEntry], team_id: Option<i64>) -> Option<TeamPoll> {
        let [first, second] = entries else {
            return None;
        };

        let entry = if first.id != team_id { second } else { first };
        Some(TeamPoll {
            percent: entry.percent.unwrap_or(0.0),
            count: entry.vote_count.unwrap_or(0),
        })
    }
}
