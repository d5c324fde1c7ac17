use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::de;
use crate::models::types::{Position, TeamStatisticType, TopPlayerType};

/// One team statistic of one tab (a set or the whole match)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStatistic {
    #[serde(rename = "type")]
    pub kind: TeamStatisticType,
    pub value: i64,
    /// 0 - 100
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStatisticSet {
    pub name: String,
    pub stats: Vec<TeamStatistic>,
}

impl TeamStatisticSet {
    pub fn by_type(&self, kind: TeamStatisticType) -> Option<&TeamStatistic> {
        self.stats.iter().find(|s| s.kind == kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatistics {
    pub set_stats: Vec<TeamStatisticSet>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawStatsComponent {
    #[serde(default, deserialize_with = "de::or_default")]
    tabs: Vec<RawStatsTab>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawStatsTab {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::or_default")]
    statistics: Vec<RawTeamStatistic>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawTeamStatistic {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    home_team_value: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    away_team_value: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    home_team_percent: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    away_team_percent: Option<f64>,
}

impl TeamStatistics {
    /// Parse the team stats component, keeping one side's numbers
    pub fn parse(value: &Value, home: bool) -> Self {
        let raw: RawStatsComponent = serde_json::from_value(value.clone()).unwrap_or_default();

        let set_stats = raw
            .tabs
            .into_iter()
            .map(|tab| TeamStatisticSet {
                name: tab.name.unwrap_or_default(),
                stats: tab
                    .statistics
                    .into_iter()
                    .map(|stat| {
                        let (value, percent) = if home {
                            (stat.home_team_value, stat.home_team_percent)
                        } else {
                            (stat.away_team_value, stat.away_team_percent)
                        };
                        TeamStatistic {
                            kind: TeamStatisticType::parse(stat.name.as_deref().unwrap_or_default()),
                            value: value.unwrap_or(0),
                            percent: percent.unwrap_or(0.0),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { set_stats }
    }
}

/// A row of the player stats component; also the key for the player join
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerStatsEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub player_number: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub points: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub serves: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub spikes: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub blocks: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub reception: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub spike_perc: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub positive_reception_perc: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawPlayerStatsComponent {
    #[serde(default, deserialize_with = "de::or_default")]
    teams: Vec<RawPlayerStatsTeam>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawPlayerStatsTeam {
    #[serde(default, deserialize_with = "de::or_default")]
    players: Vec<PlayerStatsEntry>,
}

impl PlayerStatsEntry {
    /// Flatten the rows of both teams of the player stats component
    pub fn parse_component(value: &Value) -> Vec<PlayerStatsEntry> {
        let raw: RawPlayerStatsComponent = serde_json::from_value(value.clone()).unwrap_or_default();
        raw.teams.into_iter().flat_map(|t| t.players).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistic {
    pub points: i64,
    pub serves: i64,
    pub spikes: i64,
    pub blocks: i64,
    pub receptions: i64,
    /// 0 - 100
    pub spike_percentage: i64,
    /// 0 - 100
    pub reception_percentage: i64,
}

impl From<&PlayerStatsEntry> for PlayerStatistic {
    fn from(entry: &PlayerStatsEntry) -> Self {
        Self {
            points: entry.points.unwrap_or(0),
            serves: entry.serves.unwrap_or(0),
            spikes: entry.spikes.unwrap_or(0),
            blocks: entry.blocks.unwrap_or(0),
            receptions: entry.reception.unwrap_or(0),
            spike_percentage: entry.spike_perc.unwrap_or(0.0) as i64,
            reception_percentage: entry.positive_reception_perc.unwrap_or(0.0) as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayerPlayer {
    pub number: Option<u32>,
    pub name: String,
    pub position: Position,
    pub score: i64,
    pub nationality: Option<String>,
    pub image: Option<String>,
}

/// Ranked players of one award category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayer {
    #[serde(rename = "type")]
    pub kind: TopPlayerType,
    pub players: Vec<TopPlayerPlayer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTopStatistics {
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "Match", default)]
    match_block: Option<RawTopMatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTopMatch {
    #[serde(default, deserialize_with = "de::or_default")]
    players: Vec<RawTopPlayer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTopPlayer {
    #[serde(default, deserialize_with = "de::opt_u32")]
    number: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    score: Option<i64>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl TopPlayer {
    /// `None` when the component lists nobody
    pub fn parse(value: &Value) -> Option<TopPlayer> {
        let raw: RawTopStatistics = serde_json::from_value(value.clone()).ok()?;

        let players: Vec<TopPlayerPlayer> = raw
            .match_block
            .map(|m| m.players)
            .unwrap_or_default()
            .into_iter()
            .map(|p| TopPlayerPlayer {
                number: p.number,
                name: p.name.unwrap_or_default(),
                position: Position::parse(p.position.as_deref().unwrap_or_default()),
                score: p.score.unwrap_or(0),
                nationality: p.team,
                image: p.image,
            })
            .collect();

        if players.is_empty() {
            return None;
        }

        Some(TopPlayer {
            kind: TopPlayerType::parse(raw.kind.as_deref().unwrap_or_default()),
            players,
        })
    }

    pub fn top_player(&self) -> Option<&TopPlayerPlayer> {
        self.players.first()
    }
}

/// Top players across categories, at most one entry per category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPlayers {
    top_players: Vec<TopPlayer>,
}

impl TopPlayers {
    /// Add a category; a category already present keeps its first entry
    pub fn push(&mut self, top_player: TopPlayer) {
        if self.top_players.iter().any(|p| p.kind == top_player.kind) {
            return;
        }
        self.top_players.push(top_player);
    }

    pub fn all(&self) -> &[TopPlayer] {
        &self.top_players
    }

    pub fn by_type(&self, kind: TopPlayerType) -> Option<&TopPlayer> {
        self.top_players.iter().find(|p| p.kind == kind)
    }
}
