use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::de;
use crate::models::types::CompetitionGender;
use crate::models::LiveScoreRecord;

/// Competition context of a single match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchCompetition {
    pub name: String,
    pub gender: CompetitionGender,
    pub group_pool: Option<String>,
    pub leg: Option<String>,
    pub phase: Option<String>,
    pub season: Option<String>,
    pub match_number: Option<String>,
    pub logo: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCompetition {
    #[serde(default)]
    competition: Option<String>,
    #[serde(default)]
    group_pool: Option<String>,
    #[serde(default)]
    leg: Option<String>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    season: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    match_number: Option<String>,
    #[serde(default)]
    competition_logo: Option<String>,
}

impl MatchCompetition {
    /// Parse the competition block of the score hero component
    pub fn from_score_hero(value: &Value) -> Result<Self> {
        let raw: RawCompetition = serde_json::from_value(value.clone())
            .map_err(|e| Error::parse("competition", e.to_string()))?;

        let (name, gender) = split_display_name(raw.competition.as_deref().unwrap_or_default());
        Ok(Self {
            name,
            gender,
            group_pool: raw.group_pool,
            leg: raw.leg,
            phase: raw.phase,
            season: raw.season,
            match_number: raw.match_number,
            logo: raw.competition_logo,
        })
    }

    /// Competition as denormalised onto a live-score feed entry.
    /// `None` when the entry carries no competition.
    pub fn from_record(record: &LiveScoreRecord) -> Option<Self> {
        let competition = record.competition.as_ref()?;
        let (name, gender) = split_display_name(competition.name.as_deref().unwrap_or_default());

        Some(Self {
            name,
            gender,
            group_pool: record.group_name.clone(),
            leg: record.leg_name.clone(),
            phase: record.phase_name.clone(),
            season: None,
            match_number: record.match_number.clone(),
            logo: None,
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} | {}", self.name, self.gender.as_str())
    }
}

/// `"CEV Cup 2023 | Women Finals"` -> (`"CEV Cup 2023"`, Women)
pub(crate) fn split_display_name(raw: &str) -> (String, CompetitionGender) {
    let (name, rest) = raw.split_once('|').unwrap_or((raw, ""));
    let gender = rest.split_whitespace().next().unwrap_or_default();
    (name.trim_end().to_string(), CompetitionGender::parse(gender))
}

impl Serialize for MatchCompetition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Out<'a> {
            name: &'a str,
            display_name: String,
            gender: &'static str,
            group_pool: &'a Option<String>,
            leg: &'a Option<String>,
            phase: &'a Option<String>,
            season: &'a Option<String>,
            logo: &'a Option<String>,
            match_number: &'a Option<String>,
        }

        Out {
            name: &self.name,
            display_name: self.display_name(),
            gender: self.gender.as_str(),
            group_pool: &self.group_pool,
            leg: &self.leg,
            phase: &self.phase,
            season: &self.season,
            logo: &self.logo,
            match_number: &self.match_number,
        }
        .serialize(serializer)
    }
}
