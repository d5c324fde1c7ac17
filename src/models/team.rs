use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::matching::{find_player_stats, title_case};
use crate::models::de;
use crate::models::types::{Position, Zone};
use crate::models::{MatchResult, PlayerStatistic, PlayerStatsEntry, PollEntry, TeamPoll, TeamStatistics};

const FORM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLogo {
    #[serde(default)]
    alt_text: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPlayer {
    #[serde(default, deserialize_with = "de::opt_u32")]
    number: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(rename = "isCaptain", default, deserialize_with = "de::opt_bool")]
    is_captain: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    position_number: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    player_id: Option<i64>,
}

/// Starting lineup component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLineup {
    #[serde(default, deserialize_with = "de::opt_i64")]
    team_id: Option<i64>,
    #[serde(default)]
    team_logo: Option<RawLogo>,
    #[serde(default)]
    top_left_player: Option<RawPlayer>,
    #[serde(default)]
    top_mid_player: Option<RawPlayer>,
    #[serde(default)]
    top_right_player: Option<RawPlayer>,
    #[serde(default)]
    bottom_left_player: Option<RawPlayer>,
    #[serde(default)]
    bottom_mid_player: Option<RawPlayer>,
    #[serde(default)]
    bottom_right_player: Option<RawPlayer>,
    #[serde(default)]
    head_coach: Option<RawPlayer>,
    #[serde(default, deserialize_with = "de::or_default")]
    featured_players: Vec<RawPlayer>,
    #[serde(default, deserialize_with = "de::or_default")]
    sub_players: Vec<RawPlayer>,
}

impl RawLineup {
    /// Court slots, head coach, featured, substitutes: in that order
    fn into_slots(self) -> Vec<RawPlayer> {
        let mut slots = Vec::new();
        if self.top_left_player.is_some() {
            slots.extend(
                [
                    self.top_left_player,
                    self.top_mid_player,
                    self.top_right_player,
                    self.bottom_left_player,
                    self.bottom_mid_player,
                    self.bottom_right_player,
                    self.head_coach,
                ]
                .into_iter()
                .flatten(),
            );
        }
        slots.extend(self.featured_players);
        slots.extend(self.sub_players);
        slots
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub zone: Zone,
    pub position: Position,
    pub name: String,
    pub id: Option<i64>,
    pub number: Option<u32>,
    pub image: Option<String>,
    pub is_captain: bool,
    pub stats: Option<PlayerStatistic>,
}

impl Player {
    fn from_raw(raw: RawPlayer, stats_rows: &[PlayerStatsEntry]) -> Self {
        let name = title_case(raw.name.as_deref().unwrap_or("N/A"));
        let stats = find_player_stats(&name, raw.number, stats_rows).map(PlayerStatistic::from);

        Self {
            zone: raw.position_number.map(Zone::parse).unwrap_or_default(),
            position: Position::parse(raw.position.as_deref().unwrap_or_default()),
            name,
            id: raw.player_id,
            number: raw.number,
            image: raw.image,
            is_captain: raw.is_captain.unwrap_or(false),
            stats,
        }
    }
}

/// Raw inputs for building one side's [`Team`]
#[derive(Debug, Clone, Copy)]
pub struct TeamSources<'a> {
    pub lineup: &'a Value,
    pub player_stats: &'a Value,
    pub team_stats: &'a Value,
    pub poll: &'a Value,
    /// This side's entry of the form component
    pub form: &'a Value,
    pub icon: Option<&'a str>,
    pub nickname: Option<&'a str>,
    pub home: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub logo: Option<String>,
    pub id: Option<i64>,
    pub stats: TeamStatistics,
    pub poll: Option<TeamPoll>,
    pub form: Vec<FormMatch>,
    pub players: Vec<Player>,
}

impl Team {
    /// Build a full team from the match centre components
    pub fn parse(sources: TeamSources<'_>) -> Result<Team> {
        if !sources.lineup.is_object() {
            return Err(Error::parse("starting lineup", "expected an object"));
        }
        let lineup: RawLineup = serde_json::from_value(sources.lineup.clone())
            .map_err(|e| Error::parse("starting lineup", e.to_string()))?;

        let stats_rows = PlayerStatsEntry::parse_component(sources.player_stats);
        let logo = lineup.team_logo.clone().unwrap_or_default();
        let id = lineup.team_id;

        Ok(Team {
            name: logo.alt_text,
            nickname: sources.nickname.map(str::to_string),
            logo: sources.icon.map(str::to_string).or(logo.url),
            id,
            stats: TeamStatistics::parse(sources.team_stats, sources.home),
            poll: TeamPoll::select(&PollEntry::parse_list(sources.poll), id),
            form: FormMatch::parse_list(sources.form),
            players: lineup
                .into_slots()
                .into_iter()
                .map(|raw| Player::from_raw(raw, &stats_rows))
                .collect(),
        })
    }

    /// A team known only by name, logo and nickname
    pub fn minimal(name: Option<&str>, icon: Option<&str>, nickname: Option<&str>) -> Team {
        Team {
            name: name.map(str::to_string),
            nickname: nickname.map(str::to_string),
            logo: icon.map(str::to_string),
            id: None,
            stats: TeamStatistics::default(),
            poll: None,
            form: Vec::new(),
            players: Vec::new(),
        }
    }

    /// Players matching every given filter
    pub fn players_where(
        &self,
        zone: Option<Zone>,
        position: Option<Position>,
        id: Option<i64>,
        number: Option<u32>,
    ) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| zone.map_or(true, |z| p.zone == z))
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .filter(|p| id.map_or(true, |id| p.id == Some(id)))
            .filter(|p| number.map_or(true, |n| p.number == Some(n)))
            .collect()
    }

    pub fn first_player_where(
        &self,
        zone: Option<Zone>,
        position: Option<Position>,
        id: Option<i64>,
        number: Option<u32>,
    ) -> Option<&Player> {
        self.players_where(zone, position, id, number).into_iter().next()
    }
}

impl PartialEq for Team {
    /// Same id when both are known, otherwise same name
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

/// A recent match of a team, as listed by the form component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMatch {
    pub won: bool,
    pub link: Option<String>,
    pub home_team: Team,
    pub away_team: Team,
    pub result: MatchResult,
    pub start_time: NaiveDateTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawForm {
    #[serde(default, deserialize_with = "de::or_default")]
    matches: Vec<RawFormMatch>,
    #[serde(default, deserialize_with = "de::or_default")]
    recent_form: Vec<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFormMatch {
    #[serde(default)]
    match_centre_url: Option<String>,
    #[serde(default)]
    home_team: Option<RawFormTeam>,
    #[serde(default)]
    away_team: Option<RawFormTeam>,
    #[serde(default)]
    sets_formatted: Option<String>,
    #[serde(default)]
    match_date_time: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawFormTeam {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    logo: Option<RawLogo>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    score: Option<u32>,
}

impl RawFormTeam {
    fn to_team(&self) -> Team {
        let icon = self.logo.as_ref().and_then(|l| l.url.as_deref());
        Team::minimal(self.name.as_deref(), icon, Some("N/A"))
    }
}

impl FormMatch {
    /// Parse one side of the form component. Matches are paired with the
    /// win/loss flags positionally; entries that cannot be read are skipped.
    pub fn parse_list(value: &Value) -> Vec<FormMatch> {
        let Ok(raw) = serde_json::from_value::<RawForm>(value.clone()) else {
            return Vec::new();
        };

        raw.matches
            .into_iter()
            .zip(raw.recent_form)
            .filter_map(|(entry, won)| match FormMatch::from_raw(entry, won) {
                Ok(form) => Some(form),
                Err(e) => {
                    debug!("Skipping form match: {}", e);
                    None
                }
            })
            .collect()
    }

    fn from_raw(raw: RawFormMatch, won: bool) -> Result<FormMatch> {
        let home = raw.home_team.unwrap_or_default();
        let away = raw.away_team.unwrap_or_default();

        let played_at = raw.match_date_time.unwrap_or_default();
        let start_time = NaiveDateTime::parse_from_str(&played_at, FORM_TIME_FORMAT)
            .map_err(|e| Error::parse("form match time", format!("{played_at}: {e}")))?;

        let result = MatchResult::from_form(
            raw.sets_formatted.as_deref().unwrap_or_default(),
            home.score.unwrap_or(0),
            away.score.unwrap_or(0),
        )?;

        Ok(FormMatch {
            won,
            link: raw.match_centre_url,
            home_team: home.to_team(),
            away_team: away.to_team(),
            result,
            start_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lineup() -> Value {
        json!({
            "TeamId": 10,
            "TeamLogo": {"AltText": "Mladost Zagreb", "Url": "https://img/lineup.png"},
            "TopLeftPlayer": {"Number": 7, "Name": "ANNA SMITH", "Position": "Outside spiker",
                              "PositionNumber": 4, "PlayerId": 1, "isCaptain": true},
            "TopMidPlayer": {"Number": 12, "Name": "IVA HORVAT", "Position": "Middle blocker",
                             "PositionNumber": 3, "PlayerId": 2},
            "TopRightPlayer": {"Number": 1, "Name": "MIA KOVAC", "Position": "Opposite",
                               "PositionNumber": 2, "PlayerId": 3},
            "BottomLeftPlayer": {"Number": 3, "Name": "LANA BABIC", "Position": "Outside spiker",
                                 "PositionNumber": 5, "PlayerId": 4},
            "BottomMidPlayer": {"Number": 15, "Name": "EVA JURIC", "Position": "Middle blocker",
                                "PositionNumber": 6, "PlayerId": 5},
            "BottomRightPlayer": {"Number": 9, "Name": "SARA NOVAK", "Position": "Setter",
                                  "PositionNumber": 1, "PlayerId": 6},
            "HeadCoach": {"Name": "IVAN PERIC", "Position": "Head Coach", "PlayerId": 7},
            "FeaturedPlayers": [{"Number": 5, "Name": "ANA MARIC", "Position": "Libero",
                                 "PositionNumber": 7, "PlayerId": 8}],
            "SubPlayers": [{"Number": 18, "Name": "NINA TOMIC", "Position": "Setter",
                            "PositionNumber": 0, "PlayerId": 9}]
        })
    }

    fn form() -> Value {
        json!({
            "Matches": [
                {
                    "MatchCentreUrl": "https://www.cev.eu/match-centres/x",
                    "HomeTeam": {"Name": "Mladost Zagreb", "Score": 3, "Logo": {"Url": "h.png"}},
                    "AwayTeam": {"Name": "Other", "Score": 0, "Logo": {"Url": "a.png"}},
                    "SetsFormatted": "<span>(25-10)</span>, <span>(25-11)</span>, <span>(25-12)</span>",
                    "MatchDateTime": "2022-10-30T18:00:00"
                },
                {
                    "MatchCentreUrl": "https://www.cev.eu/match-centres/y",
                    "MatchDateTime": "yesterday"
                },
                {
                    "MatchCentreUrl": "https://www.cev.eu/match-centres/z",
                    "MatchDateTime": "2022-10-20T18:00:00"
                }
            ],
            "RecentForm": [true, false]
        })
    }

    fn build(poll: Value) -> Team {
        let player_stats = json!({"Teams": [{"Players": [
            {"Name": "Smith Anna", "PlayerNumber": 7, "Points": 21}
        ]}]});
        let team_stats = json!({"Tabs": []});
        let form = form();

        Team::parse(TeamSources {
            lineup: &lineup(),
            player_stats: &player_stats,
            team_stats: &team_stats,
            poll: &poll,
            form: &form,
            icon: Some("https://img/feed.png"),
            nickname: Some("MLA"),
            home: true,
        })
        .unwrap()
    }

    #[test]
    fn test_players_built_positionally() {
        let team = build(json!([]));

        assert_eq!(team.players.len(), 9);
        assert_eq!(team.players[0].name, "Anna Smith");
        assert!(team.players[0].is_captain);
        assert_eq!(team.players[6].position, Position::HeadCoach);
        assert_eq!(team.players[7].zone, Zone::Featured);
        assert_eq!(team.players[8].zone, Zone::Sub);
    }

    #[test]
    fn test_stats_enrichment_is_best_effort() {
        let team = build(json!([]));

        let captain = team.first_player_where(None, None, Some(1), None).unwrap();
        assert_eq!(captain.stats.as_ref().map(|s| s.points), Some(21));

        let setter = team.first_player_where(Some(Zone::One), Some(Position::Setter), None, None).unwrap();
        assert!(setter.stats.is_none());
    }

    #[test]
    fn test_feed_icon_and_poll_selection() {
        let team = build(json!([
            {"Id": 11, "Percent": 40.0, "VoteCount": 4},
            {"Id": 10, "Percent": 60.0, "VoteCount": 6}
        ]));

        assert_eq!(team.name.as_deref(), Some("Mladost Zagreb"));
        assert_eq!(team.logo.as_deref(), Some("https://img/feed.png"));
        assert_eq!(team.poll.as_ref().map(|p| p.count), Some(6));
    }

    #[test]
    fn test_form_pairs_with_flags_and_skips_bad_rows() {
        let team = build(json!([]));

        // third match has no flag, second has an unreadable date
        assert_eq!(team.form.len(), 1);
        let form = &team.form[0];
        assert!(form.won);
        assert_eq!(form.result.sets().len(), 3);
        assert_eq!(form.home_team.name.as_deref(), Some("Mladost Zagreb"));
    }

    #[test]
    fn test_lineup_must_be_object() {
        let empty = json!({});
        let result = Team::parse(TeamSources {
            lineup: &json!("Object reference not set to an instance of an object."),
            player_stats: &empty,
            team_stats: &empty,
            poll: &empty,
            form: &empty,
            icon: None,
            nickname: None,
            home: false,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_team_equality() {
        let a = Team::minimal(Some("A"), None, None);
        let mut b = Team::minimal(Some("A"), None, None);
        assert_eq!(a, b);

        b.id = Some(3);
        let mut c = Team::minimal(Some("Renamed"), None, None);
        c.id = Some(3);
        assert_eq!(b, c);
    }
}
