use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{LiveScoreDirectory, Transport};
use crate::error::{Error, Result};
use crate::models::de;
use crate::models::{CalendarMatch, LiveScoreRecord};

/// Listing entry points: the monthly calendar and the live-score feed
pub struct CalendarClient {
    transport: Arc<dyn Transport>,
    calendar_url: String,
    node_id: String,
    directory: Arc<LiveScoreDirectory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CalendarResponse {
    #[serde(default, deserialize_with = "de::or_default")]
    dates: Vec<CalendarDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CalendarDate {
    #[serde(default, deserialize_with = "de::or_default")]
    matches: Vec<Value>,
}

impl CalendarClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        calendar_url: &str,
        node_id: &str,
        directory: Arc<LiveScoreDirectory>,
    ) -> Self {
        Self {
            transport,
            calendar_url: calendar_url.to_string(),
            node_id: node_id.to_string(),
            directory,
        }
    }

    /// All calendar matches of a month; missing month/year default to today's
    pub async fn matches_of_month(&self, month: Option<u32>, year: Option<i32>) -> Result<Vec<CalendarMatch>> {
        let today = Utc::now().date_naive();
        let year = year.unwrap_or(today.year());
        let month = month.unwrap_or(today.month());

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::parse("calendar month", format!("{year}-{month}")))?;
        let timestamp = first.format("%Y-%m-%dT00:00:00Z").to_string();

        let url = format!(
            "{}?nodeId={}&culture=en-US&date={}",
            self.calendar_url,
            self.node_id,
            urlencoding::encode(&timestamp)
        );
        debug!("Fetching calendar from: {}", url);

        let value = self.transport.get_json(&url).await?;
        let response: CalendarResponse = serde_json::from_value(value)
            .map_err(|e| Error::parse("calendar", e.to_string()))?;

        let matches: Vec<CalendarMatch> = response
            .dates
            .iter()
            .flat_map(|date| date.matches.iter())
            .filter_map(|entry| match CalendarMatch::from_calendar_entry(entry) {
                Ok(calendar_match) => Some(calendar_match),
                Err(e) => {
                    warn!("Skipping calendar entry: {}", e);
                    None
                }
            })
            .collect();

        info!("Calendar {}-{:02}: {} matches", year, month, matches.len());
        Ok(matches)
    }

    /// Finished matches still listed in the live-score feed
    pub async fn recent_matches(&self) -> Result<Vec<CalendarMatch>> {
        self.feed_matches(|record| record.is_finished()).await
    }

    /// Live and upcoming matches of the live-score feed
    pub async fn upcoming_matches(&self) -> Result<Vec<CalendarMatch>> {
        self.feed_matches(|record| !record.is_finished()).await
    }

    pub async fn upcoming_and_recent_matches(&self) -> Result<Vec<CalendarMatch>> {
        self.feed_matches(|_| true).await
    }

    async fn feed_matches<F>(&self, keep: F) -> Result<Vec<CalendarMatch>>
    where
        F: Fn(&LiveScoreRecord) -> bool,
    {
        let records = self.directory.all_matches(false).await?;

        Ok(records
            .iter()
            .filter(|record| keep(*record))
            .filter_map(|record| match CalendarMatch::from_record(record) {
                Ok(calendar_match) => Some(calendar_match),
                Err(e) => {
                    warn!("Skipping live-score entry {:?}: {}", record.match_id, e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;

    const FEED_URL: &str = "https://feed.test/LiveScores.json";
    const CALENDAR_URL: &str = "https://cal.test/GetCalendar";

    fn client(transport: Arc<MockTransport>) -> CalendarClient {
        let directory = Arc::new(LiveScoreDirectory::new(transport.clone(), FEED_URL));
        CalendarClient::new(transport, CALENDAR_URL, "11346", directory)
    }

    #[tokio::test]
    async fn test_matches_of_month() {
        let url = format!("{CALENDAR_URL}?nodeId=11346&culture=en-US&date=2023-02-01T00%3A00%3A00Z");
        let transport = Arc::new(MockTransport::new().with_json(
            &url,
            json!({"Dates": [
                {"Matches": [
                    {"MatchCentreUrl": "https://m/1", "CompetitionName": "CEV Cup | Men",
                     "MatchDateTime_UTC": "2023-02-03T18:00:00", "Finalized": true},
                    {"MatchCentreUrl": "https://m/2", "MatchDateTime_UTC": "soon"}
                ]},
                {"Matches": null}
            ]}),
        ));

        let matches = client(transport).matches_of_month(Some(2), Some(2023)).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].link.as_deref(), Some("https://m/1"));
        assert!(matches[0].finished);
    }

    #[tokio::test]
    async fn test_invalid_month() {
        let transport = Arc::new(MockTransport::new());
        assert!(client(transport).matches_of_month(Some(13), Some(2023)).await.is_err());
    }

    #[tokio::test]
    async fn test_feed_listings() {
        let transport = Arc::new(MockTransport::new().with_json(
            FEED_URL,
            json!({"competitions": [{"competitionName": "CEV Cup | Men", "matches": [
                {"matchId": 1, "matchState_String": "FINISHED", "utcStartDate": "2024-01-01T18:00:00Z"},
                {"matchId": 2, "matchState_String": "UPCOMING", "utcStartDate": "2099-01-01T18:00:00Z"},
                {"matchId": 3, "matchState_String": "LIVE"}
            ]}]}),
        ));
        let calendar = client(transport.clone());

        assert_eq!(calendar.recent_matches().await.unwrap().len(), 1);
        // the entry without a start date cannot be listed
        assert_eq!(calendar.upcoming_matches().await.unwrap().len(), 1);
        assert_eq!(calendar.upcoming_and_recent_matches().await.unwrap().len(), 2);
        assert_eq!(transport.calls(FEED_URL), 3);
    }
}
