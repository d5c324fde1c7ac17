use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Client;
use crate::engine::MatchEngine;
use crate::error::{Error, Result};
use crate::models::de;
use crate::models::competition::split_display_name;
use crate::models::live_score::parse_feed_time;
use crate::models::{LiveScoreRecord, MatchCompetition, MatchResult, MatchState, Team};

/// Placeholder year the calendar uses for matches without a date
const PLACEHOLDER_YEAR: i32 = 1900;

/// Lightweight match listing built straight from calendar or live-score
/// feed JSON, without touching the match centre
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMatch {
    #[serde(rename = "matchCentreLink")]
    pub link: Option<String>,
    pub competition: MatchCompetition,
    pub home_team: Team,
    pub away_team: Team,
    pub venue: Option<String>,
    pub start_time: DateTime<Utc>,
    pub result: MatchResult,
    pub state: MatchState,
    #[serde(skip)]
    pub finished: bool,
}

#[derive(Deserialize)]
struct RawCalendarMatch {
    #[serde(rename = "MatchCentreUrl", default)]
    match_centre_url: Option<String>,
    #[serde(rename = "CompetitionName", default)]
    competition_name: Option<String>,
    #[serde(rename = "CompetitionLogo", default)]
    competition_logo: Option<String>,
    #[serde(rename = "PhaseName", default)]
    phase_name: Option<String>,
    #[serde(rename = "HomeTeamName", default)]
    home_team_name: Option<String>,
    #[serde(rename = "HomeTeamLogo", default)]
    home_team_logo: Option<String>,
    #[serde(rename = "HomeClubCode", default)]
    home_club_code: Option<String>,
    #[serde(rename = "GuestTeamName", default)]
    guest_team_name: Option<String>,
    #[serde(rename = "GuestTeamLogo", default)]
    guest_team_logo: Option<String>,
    #[serde(rename = "GuestClubCode", default)]
    guest_club_code: Option<String>,
    #[serde(rename = "StadiumName", default)]
    stadium_name: Option<String>,
    #[serde(rename = "MatchDateTime_UTC", default)]
    match_date_time_utc: Option<String>,
    #[serde(rename = "WonSetHome", default, deserialize_with = "de::opt_u32")]
    won_set_home: Option<u32>,
    #[serde(rename = "WonSetGuest", default, deserialize_with = "de::opt_u32")]
    won_set_guest: Option<u32>,
    #[serde(rename = "Finalized", default, deserialize_with = "de::opt_bool")]
    finalized: Option<bool>,
}

impl CalendarMatch {
    /// Parse one `Dates[].Matches[]` entry of the calendar feed
    pub fn from_calendar_entry(value: &Value) -> Result<CalendarMatch> {
        let raw: RawCalendarMatch = serde_json::from_value(value.clone())
            .map_err(|e| Error::parse("calendar match", e.to_string()))?;

        let (name, gender) = split_display_name(raw.competition_name.as_deref().unwrap_or_default());
        let competition = MatchCompetition {
            name,
            gender,
            phase: raw.phase_name,
            logo: raw.competition_logo,
            ..Default::default()
        };

        Self::build(
            raw.match_centre_url,
            competition,
            Team::minimal(
                raw.home_team_name.as_deref(),
                raw.home_team_logo.as_deref(),
                raw.home_club_code.as_deref(),
            ),
            Team::minimal(
                raw.guest_team_name.as_deref(),
                raw.guest_team_logo.as_deref(),
                raw.guest_club_code.as_deref(),
            ),
            raw.stadium_name,
            raw.match_date_time_utc.as_deref().unwrap_or_default(),
            MatchResult::new(
                Vec::new(),
                raw.won_set_home.unwrap_or(0),
                raw.won_set_guest.unwrap_or(0),
                false,
            ),
            raw.finalized.unwrap_or(false),
        )
    }

    /// Convert a live-score feed entry
    pub fn from_record(record: &LiveScoreRecord) -> Result<CalendarMatch> {
        let home = record.side(true);
        let away = record.side(false);

        Self::build(
            record.match_centre_link.clone(),
            MatchCompetition::from_record(record).unwrap_or_default(),
            Team::minimal(home.name, home.icon, home.nickname),
            Team::minimal(away.name, away.icon, away.nickname),
            record.match_location.clone(),
            record.utc_start_date.as_deref().unwrap_or_default(),
            MatchResult::from_record(record),
            record.is_finished(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        link: Option<String>,
        competition: MatchCompetition,
        home_team: Team,
        away_team: Team,
        venue: Option<String>,
        start_time: &str,
        result: MatchResult,
        finished: bool,
    ) -> Result<CalendarMatch> {
        let start_time = if start_time.ends_with('Z') {
            parse_feed_time(start_time)?
        } else {
            parse_feed_time(&format!("{start_time}Z"))?
        };

        let now = Utc::now();
        let finished = finished
            || start_time.year() == PLACEHOLDER_YEAR
            || (now - start_time).num_days() >= 1;

        Ok(CalendarMatch {
            link,
            competition,
            home_team,
            away_team,
            venue,
            start_time,
            result,
            state: MatchState::derive(now >= start_time, finished),
            finished,
        })
    }

    /// Upgrade to a full engine through the match centre link.
    /// `None` when the listing has no link.
    pub async fn to_engine(&self, client: &Client) -> Result<Option<MatchEngine>> {
        match &self.link {
            Some(link) => client.match_by_url(link).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::CompetitionGender;
    use serde_json::json;

    fn entry(date: &str, finalized: bool) -> Value {
        json!({
            "MatchCentreUrl": "https://www.cev.eu/match-centres/2023/cup/m1",
            "CompetitionName": "CEV Cup 2023 | Women",
            "PhaseName": "Final",
            "HomeTeamName": "Home", "HomeTeamLogo": "h.png", "HomeClubCode": "HOM",
            "GuestTeamName": "Guest", "GuestTeamLogo": "g.png", "GuestClubCode": "GUE",
            "StadiumName": "Arena",
            "MatchDateTime_UTC": date,
            "WonSetHome": 3, "WonSetGuest": "2",
            "Finalized": finalized
        })
    }

    #[test]
    fn test_calendar_entry() {
        let calendar = CalendarMatch::from_calendar_entry(&entry("2099-05-01T18:00:00", false)).unwrap();

        assert_eq!(calendar.competition.name, "CEV Cup 2023");
        assert_eq!(calendar.competition.gender, CompetitionGender::Women);
        assert_eq!(calendar.away_team.nickname.as_deref(), Some("GUE"));
        assert_eq!(calendar.result.away_sets_won(), 2);
        assert_eq!(calendar.state, MatchState::Upcoming);
        assert!(!calendar.finished);
    }

    #[test]
    fn test_finished_is_forced_for_old_and_placeholder_dates() {
        let placeholder = CalendarMatch::from_calendar_entry(&entry("1900-01-01T00:00:00Z", false)).unwrap();
        assert!(placeholder.finished);

        let old = CalendarMatch::from_calendar_entry(&entry("2020-01-01T18:00:00", false)).unwrap();
        assert_eq!(old.state, MatchState::Finished);
    }

    #[test]
    fn test_bad_date_fails() {
        assert!(CalendarMatch::from_calendar_entry(&entry("tomorrow", false)).is_err());
    }

    #[test]
    fn test_from_record() {
        let record: LiveScoreRecord = serde_json::from_value(json!({
            "matchCentreLink": "https://www.cev.eu/match-centres/x",
            "matchState_String": "LIVE",
            "homeTeam": "Home",
            "homeTeamNickname": "HOM",
            "utcStartDate": "2099-01-01T18:00:00Z",
            "homeSetsWon": 1,
            "phaseName": "Final",
            "competition": {"name": "CEV Cup 2099 | Men", "id": 3}
        }))
        .unwrap();

        let calendar = CalendarMatch::from_record(&record).unwrap();
        assert_eq!(calendar.home_team.nickname.as_deref(), Some("HOM"));
        assert_eq!(calendar.competition.phase.as_deref(), Some("Final"));
        assert_eq!(calendar.result.home_sets_won(), 1);
        assert!(!calendar.finished);
    }
}
