//! The match engine: identity resolution, per-field accessors, snapshots and
//! score observation for one match centre page.

pub mod identity;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use serde_json::Value;
use tokio::sync::{Notify, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{decode_nested, LiveScoreDirectory, Transport};
use crate::convert::score_hero::{to_feed_record, ScoreHero};
use crate::error::{Error, Result};
use crate::models::{
    LiveScoreRecord, MatchCompetition, MatchResult, MatchSnapshot, MatchState, PlayByPlay, Team,
    TeamSources, TopPlayer, TopPlayers,
};
use crate::scrape::{is_invalid_match_centre, tags, EndpointIndex, MatchInfo, MatchReport};
use crate::workers::score_observer::{self, ObserverId, ScoreObserver};

pub use identity::{LookupKey, MatchIdentity};

pub(crate) struct EngineInner {
    transport: Arc<dyn Transport>,
    directory: Arc<LiveScoreDirectory>,
    html: Arc<str>,
    link: String,
    endpoints: EndpointIndex,
    invalid_match_centre: bool,

    identity: OnceCell<MatchIdentity>,
    finished: AtomicBool,

    form_cache: OnceCell<Value>,
    report_cache: OnceCell<Option<MatchReport>>,
    info_cache: OnceCell<Option<MatchInfo>>,
    highlights_link_cache: OnceCell<Option<String>>,

    observers: Mutex<Vec<(ObserverId, Arc<dyn ScoreObserver>)>>,
    next_observer_id: AtomicU64,
    poll_interval: Mutex<Duration>,
    shutdown: Arc<Notify>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

/// Live view of one match centre page.
///
/// Cheap to clone; clones share caches and observers. Identity resolution
/// starts as soon as the engine is built; accessors that need it fail with
/// [`Error::Uninitialized`] until [`MatchEngine::init`] has completed.
#[derive(Clone)]
pub struct MatchEngine {
    inner: Arc<EngineInner>,
}

impl MatchEngine {
    /// Build an engine for a fetched match centre page. Must be called from
    /// within a tokio runtime: identity resolution and the score poll loop
    /// are spawned right away.
    pub fn new(
        transport: Arc<dyn Transport>,
        directory: Arc<LiveScoreDirectory>,
        html: &str,
        link: &str,
        poll_interval: Duration,
    ) -> Self {
        let endpoints = EndpointIndex::extract(html);
        let invalid_match_centre = is_invalid_match_centre(html);
        if invalid_match_centre {
            warn!("Match centre {} is an error page, matching by link", link);
        }

        let engine = Self {
            inner: Arc::new(EngineInner {
                transport,
                directory,
                html: Arc::from(html),
                link: link.to_string(),
                endpoints,
                invalid_match_centre,
                identity: OnceCell::new(),
                finished: AtomicBool::new(false),
                form_cache: OnceCell::new(),
                report_cache: OnceCell::new(),
                info_cache: OnceCell::new(),
                highlights_link_cache: OnceCell::new(),
                observers: Mutex::new(Vec::new()),
                next_observer_id: AtomicU64::new(0),
                poll_interval: Mutex::new(poll_interval),
                shutdown: Arc::new(Notify::new()),
                poll_task: Mutex::new(None),
            }),
        };

        info!("Match engine created for {}", link);

        let resolver = engine.clone();
        tokio::spawn(async move {
            resolver.init().await;
        });

        let handle = tokio::spawn(score_observer::run(
            Arc::downgrade(&engine.inner),
            Arc::clone(&engine.inner.shutdown),
        ));
        *lock(&engine.inner.poll_task) = Some(handle);

        engine
    }

    pub(crate) fn from_inner(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    /// Resolve the match identity; resolves at most once, later calls return
    /// the stored identity
    pub async fn init(&self) -> &MatchIdentity {
        let inner = &self.inner;
        inner
            .identity
            .get_or_init(|| {
                MatchIdentity::resolve(
                    inner.transport.as_ref(),
                    &inner.endpoints,
                    &inner.link,
                    inner.invalid_match_centre,
                )
            })
            .await
    }

    pub fn identity(&self) -> Result<&MatchIdentity> {
        self.inner.identity.get().ok_or(Error::Uninitialized)
    }

    pub fn is_initialised(&self) -> bool {
        self.inner.identity.initialized()
    }

    /// Whether the page embeds any component endpoint
    pub fn is_valid(&self) -> bool {
        self.inner.endpoints.is_valid()
    }

    pub fn match_centre_link(&self) -> &str {
        &self.inner.link
    }

    pub fn gallery(&self) -> &[String] {
        self.inner.endpoints.gallery()
    }

    // LOOKUP

    /// Find this match in the live-score feed, falling back to a record
    /// synthesized from the score hero and poll components.
    pub async fn locate(&self, use_cache: bool) -> Result<LiveScoreRecord> {
        let identity = self.identity()?;
        let directory = &self.inner.directory;

        let found = match identity.lookup_key() {
            LookupKey::Id(id) => directory.find_by_internal_id(id, use_cache).await?,
            LookupKey::Link(link) => directory.find_by_link(link, use_cache).await?,
        };

        match found {
            Some(record) => {
                self.inner.finished.store(record.is_finished(), Ordering::SeqCst);
                Ok(record)
            }
            None => {
                debug!("{} not in the live-score feed, synthesizing", self.inner.link);
                self.fallback_synthesize(true).await
            }
        }
    }

    /// Rebuild the feed record of a match that rolled off the live-score feed
    pub async fn fallback_synthesize(&self, truly_finished: bool) -> Result<LiveScoreRecord> {
        let inner = &self.inner;
        if inner.invalid_match_centre {
            return Err(Error::MatchUnavailable(inner.link.clone()));
        }

        let (hero_url, poll_url) = match (
            inner.endpoints.link(tags::GET_LIVE_SCORE_HERO, 0),
            inner.endpoints.link(tags::MATCH_POLL, 0),
        ) {
            (Some(hero), Some(poll)) => (hero, poll),
            _ => return Err(Error::MatchUnavailable(inner.link.clone())),
        };

        inner.finished.store(truly_finished, Ordering::SeqCst);

        let (hero, poll) = tokio::try_join!(
            inner.transport.get_json(hero_url),
            inner.transport.get_json(poll_url),
        )?;

        to_feed_record(&hero, &poll)
    }

    fn endpoint(&self, tag: &'static str, index: usize) -> Result<&str> {
        self.inner.endpoints.link(tag, index).ok_or(Error::EndpointMissing(tag))
    }

    async fn fetch(&self, tag: &'static str, index: usize) -> Result<Value> {
        let url = self.endpoint(tag, index)?;
        self.inner.transport.get_json(url).await
    }

    /// Components that double-encode their JSON
    async fn fetch_nested(&self, tag: &'static str, index: usize) -> Result<Value> {
        self.fetch(tag, index).await.map(decode_nested)
    }

    async fn score_hero(&self) -> Result<ScoreHero> {
        let value = self.fetch(tags::GET_LIVE_SCORE_HERO, 0).await?;
        ScoreHero::from_value(&value)
    }

    // ACCESSORS

    /// Current score; the feed is re-fetched until the match is known to be
    /// finished
    pub async fn result(&self) -> Result<MatchResult> {
        self.identity()?;
        let use_cache = self.inner.finished.load(Ordering::SeqCst);
        let record = self.locate(use_cache).await?;
        Ok(MatchResult::from_record(&record))
    }

    pub async fn start_time(&self) -> Result<chrono::DateTime<Utc>> {
        self.locate(true).await?.start_time()
    }

    pub async fn venue(&self) -> Result<Option<String>> {
        Ok(self.locate(true).await?.match_location)
    }

    async fn started(&self) -> Result<bool> {
        Ok(Utc::now() >= self.start_time().await?)
    }

    /// Always asks the feed afresh
    pub async fn finished(&self) -> Result<bool> {
        self.init().await;
        self.locate(false).await?;
        Ok(self.inner.finished.load(Ordering::SeqCst))
    }

    pub async fn state(&self) -> Result<MatchState> {
        let (started, finished) = tokio::try_join!(self.started(), self.finished())?;
        Ok(MatchState::derive(started, finished))
    }

    /// Running time while the match is on, the official duration once it is
    /// finished. Zero before kick-off and for broken match centre pages.
    pub async fn duration(&self) -> Result<chrono::Duration> {
        self.identity()?;

        if !self.finished().await? {
            let elapsed = Utc::now() - self.start_time().await?;
            return Ok(elapsed.max(chrono::Duration::zero()));
        }

        if self.inner.invalid_match_centre {
            return Ok(chrono::Duration::zero());
        }

        self.score_hero().await?.duration()
    }

    pub async fn watch_link(&self) -> Result<Option<String>> {
        Ok(self.locate(true).await?.watch_link)
    }

    /// Embedded video of the page, otherwise the feed's highlights link
    pub async fn highlights_link(&self) -> Result<Option<String>> {
        if let Some(link) = self.inner.endpoints.highlights_link() {
            return Ok(Some(link.to_string()));
        }

        self.identity()?;
        self.inner
            .highlights_link_cache
            .get_or_try_init(|| async { Ok::<_, Error>(self.locate(true).await?.highlights_link) })
            .await
            .cloned()
    }

    /// Competition from the score hero component, or from the feed entry
    /// when the match centre page is broken
    pub async fn competition(&self) -> Result<Option<MatchCompetition>> {
        if self.inner.invalid_match_centre {
            let record = self.locate(true).await?;
            return Ok(MatchCompetition::from_record(&record));
        }

        let competition = match self.fetch(tags::GET_LIVE_SCORE_HERO, 0).await {
            Ok(hero) => MatchCompetition::from_score_hero(&hero),
            Err(e) => Err(e),
        };

        match competition {
            Ok(competition) => Ok(Some(competition)),
            Err(e) => {
                debug!("No competition for {}: {}", self.inner.link, e);
                Ok(None)
            }
        }
    }

    pub async fn play_by_play(&self) -> Option<PlayByPlay> {
        let parsed = match self.fetch(tags::PLAY_BY_PLAY, 0).await {
            Ok(value) => PlayByPlay::parse(&value),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(play_by_play) => Some(play_by_play),
            Err(e) => {
                debug!("No play-by-play for {}: {}", self.inner.link, e);
                None
            }
        }
    }

    /// One request per embedded award category, fetched concurrently
    pub async fn top_players(&self) -> TopPlayers {
        let transport = &self.inner.transport;
        let links = self.inner.endpoints.links(tags::TOP_STATISTICS);

        let responses = join_all(links.iter().map(|url| transport.get_json(url))).await;

        let mut top_players = TopPlayers::default();
        for (url, response) in links.iter().zip(responses) {
            match response {
                Ok(value) => {
                    if let Some(top_player) = TopPlayer::parse(&value) {
                        top_players.push(top_player);
                    }
                }
                Err(e) => debug!("Skipping top statistics {}: {}", url, e),
            }
        }
        top_players
    }

    /// Parsed on a blocking worker, then cached
    pub async fn report(&self) -> Result<Option<MatchReport>> {
        let html = Arc::clone(&self.inner.html);
        self.inner
            .report_cache
            .get_or_try_init(|| async move {
                Ok::<_, Error>(tokio::task::spawn_blocking(move || MatchReport::parse(&html)).await?)
            })
            .await
            .cloned()
    }

    /// Parsed on a blocking worker, then cached
    pub async fn info(&self) -> Result<Option<MatchInfo>> {
        let html = Arc::clone(&self.inner.html);
        self.inner
            .info_cache
            .get_or_try_init(|| async move {
                Ok::<_, Error>(tokio::task::spawn_blocking(move || MatchInfo::parse(&html)).await?)
            })
            .await
            .cloned()
    }

    pub async fn home_team(&self) -> Result<Team> {
        self.identity()?;
        Ok(self.team(0, true).await)
    }

    pub async fn away_team(&self) -> Result<Team> {
        self.identity()?;
        Ok(self.team(1, false).await)
    }

    /// Full team, or the feed's name/icon/nickname when any component fails
    async fn team(&self, index: usize, home: bool) -> Team {
        match self.full_team(index, home).await {
            Ok(team) => team,
            Err(e) => {
                warn!("Team {} of {} incomplete, using feed data: {}", index, self.inner.link, e);
                self.minimal_team(home).await
            }
        }
    }

    async fn full_team(&self, index: usize, home: bool) -> Result<Team> {
        let (lineup, player_stats, team_stats, poll, form, record) = tokio::try_join!(
            self.fetch(tags::STARTING_TEAM, index),
            self.fetch_nested(tags::PLAYER_STATS, 0),
            self.fetch_nested(tags::TEAM_STATS, 0),
            self.fetch(tags::MATCH_POLL, 0),
            self.form(),
            self.locate(true),
        )?;

        let side_key = if home { "HomeTeam" } else { "AwayTeam" };
        let form = form
            .get(side_key)
            .ok_or_else(|| Error::parse("form", format!("{side_key} missing")))?;
        let side = record.side(home);

        Team::parse(TeamSources {
            lineup: &lineup,
            player_stats: &player_stats,
            team_stats: &team_stats,
            poll: &poll,
            form,
            icon: side.icon,
            nickname: side.nickname,
            home,
        })
    }

    async fn minimal_team(&self, home: bool) -> Team {
        match self.locate(true).await {
            Ok(record) => {
                let side = record.side(home);
                Team::minimal(side.name, side.icon, side.nickname)
            }
            Err(e) => {
                warn!("No feed data for team of {}: {}", self.inner.link, e);
                Team::minimal(None, None, None)
            }
        }
    }

    async fn form(&self) -> Result<Value> {
        self.inner
            .form_cache
            .get_or_try_init(|| self.fetch_nested(tags::FORM, 0))
            .await
            .cloned()
    }

    // SNAPSHOT

    /// Every field fetched as one concurrent batch
    pub async fn snapshot(&self) -> Result<MatchSnapshot> {
        self.init().await;

        let (
            result,
            duration,
            start_time,
            venue,
            home_team,
            away_team,
            watch_link,
            highlights_link,
            state,
            competition,
            report,
            info,
            play_by_play,
            top_players,
        ) = tokio::try_join!(
            self.result(),
            self.duration(),
            self.start_time(),
            self.venue(),
            self.home_team(),
            self.away_team(),
            self.watch_link(),
            self.highlights_link(),
            self.state(),
            self.competition(),
            self.report(),
            self.info(),
            async { Ok::<_, Error>(self.play_by_play().await) },
            async { Ok::<_, Error>(self.top_players().await) },
        )?;

        Ok(MatchSnapshot {
            state,
            result,
            home_team,
            away_team,
            competition,
            duration,
            start_time,
            match_centre_link: self.inner.link.clone(),
            watch_link,
            highlights_link,
            venue,
            report,
            info,
            top_players,
            gallery: self.gallery().to_vec(),
            play_by_play,
        })
    }

    // OBSERVERS

    /// Register an observer; it is called with every new score, in
    /// registration order
    pub fn add_score_observer(&self, observer: Arc<dyn ScoreObserver>) -> ObserverId {
        let id = ObserverId(self.inner.next_observer_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.inner.observers).push((id, observer));
        id
    }

    /// Returns whether the observer was registered
    pub fn remove_score_observer(&self, id: ObserverId) -> bool {
        let mut observers = lock(&self.inner.observers);
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn set_score_observer_interval(&self, interval: Duration) {
        *lock(&self.inner.poll_interval) = interval;
    }

    pub(crate) fn score_observer_interval(&self) -> Duration {
        *lock(&self.inner.poll_interval)
    }

    pub(crate) fn score_observers(&self) -> Vec<Arc<dyn ScoreObserver>> {
        lock(&self.inner.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    /// Stop the score poll loop and wait for it to exit.
    ///
    /// Called from inside an observer, this only signals the loop, which
    /// stops as soon as the current poll returns.
    pub async fn shutdown(&self) {
        self.inner.shutdown.notify_one();
        if score_observer::in_poll_task() {
            debug!("Score poll for {} asked to stop by an observer", self.inner.link);
            return;
        }

        let handle = lock(&self.inner.poll_task).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Score poll task for {} failed: {}", self.inner.link, e);
            }
        }
        info!("Match engine for {} shut down", self.inner.link);
    }
}

#[cfg(test)]
impl MatchEngine {
    pub(crate) fn take_poll_task(&self) -> Option<JoinHandle<()>> {
        lock(&self.inner.poll_task).take()
    }
}

/// Observer and settings locks are never held across an await
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;

    const LINK: &str = "https://www.cev.test/match-centres/2024/cl/m1";
    const FEED: &str = "https://feed.test/LiveScores.json";
    const HERO: &str = "https://cev.test/umbraco/api/livescorehero/getlivescorehero?nodeId=1&lang=en";
    const POLL: &str = "https://cev.test/umbraco/api/matchcentre/GetMatchPoll?nodeId=1";
    const HOME_LINEUP: &str = "https://cev.test/umbraco/api/matchcentre/GetStartingTeamComponent?nodeId=1&home=true";
    const PLAYER_STATS: &str = "https://cev.test/umbraco/api/matchcentre/GetPlayerStatsComponentMC?nodeId=1";
    const TEAM_STATS: &str = "https://cev.test/umbraco/api/matchcentre/GetTeamStatsComponentMC?nodeId=1";
    const FORM: &str = "https://cev.test/umbraco/api/matchcentre/GetFormComponent?nodeId=1";

    const PAGE: &str = r#"<html><body>
        <div data-src="https://cev.test/umbraco/api/livescorehero/getlivescorehero?nodeId=1&amp;lang=en"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetMatchPoll?nodeId=1"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetStartingTeamComponent?nodeId=1&amp;home=true"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetStartingTeamComponent?nodeId=1&amp;home=false"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetPlayerStatsComponentMC?nodeId=1"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetTeamStatsComponentMC?nodeId=1"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetFormComponent?nodeId=1"></div>
        <div data-src="https://cev.test/umbraco/api/matchcentre/GetPlayByPlayComponent?nodeId=1"></div>
    </body></html>"#;

    fn hero(match_id: i64) -> Value {
        json!({
            "MatchId": match_id,
            "Competition": "CEV Champions League Volley 2024 | Men",
            "Phase": "Final Four",
            "MatchStartDateTimeUTC": "2024-05-04T17:00:00Z",
            "HomeTeam": {"Name": "Home Club", "Score": 3},
            "AwayTeam": {"Name": "Away Club", "Score": 0},
            "SetsFormatted": "<span>(25-20)</span>, <span>(25-21)</span>, <span>(25-19)</span>",
            "Duration": "95 minutes"
        })
    }

    fn feed(match_id: i64, state: &str) -> Value {
        json!({"competitions": [{
            "competitionName": "CEV Champions League Volley 2024 | Men",
            "competitionId": 1,
            "matches": [{
                "matchId": match_id,
                "matchCentreLink": LINK,
                "matchState_String": state,
                "homeTeam": "Home Club", "homeTeamNickname": "HOM", "homeTeamIcon": "h.png",
                "awayTeam": "Away Club", "awayTeamNickname": "AWA",
                "matchLocation": "Arena",
                "utcStartDate": "2024-05-04T17:00:00Z",
                "homeSetsWon": 2, "awaySetsWon": 1,
                "setResults": [
                    {"homeScore": 25, "awayScore": 20, "setNumber": 1, "isInPlay": false},
                    {"homeScore": 22, "awayScore": 25, "setNumber": 2, "isInPlay": false},
                    {"homeScore": 25, "awayScore": 18, "setNumber": 3, "isInPlay": false}
                ],
                "currentSetScore": {"homeScore": 0, "awayScore": 0, "setNumber": 4, "isInPlay": true},
                "watchLink": "https://tv.test/m1"
            }]
        }]})
    }

    fn transport(hero_id: i64, feed_id: i64, state: &str) -> Arc<MockTransport> {
        Arc::new(
            MockTransport::new()
                .with_json(FEED, feed(feed_id, state))
                .with_json(HERO, hero(hero_id))
                .with_json(POLL, json!([
                    {"Id": 10, "Value": "HOM", "Percent": 70.0, "VoteCount": 7},
                    {"Id": 11, "Value": "AWA", "Percent": 30.0, "VoteCount": 3}
                ])),
        )
    }

    fn engine(transport: Arc<MockTransport>, html: &str) -> MatchEngine {
        let directory = Arc::new(LiveScoreDirectory::new(transport.clone(), FEED));
        MatchEngine::new(transport, directory, html, LINK, Duration::from_secs(20))
    }

    #[tokio::test]
    async fn test_accessors_require_identity() {
        let engine = engine(transport(12345, 12345, "LIVE"), PAGE);

        assert!(matches!(engine.result().await, Err(Error::Uninitialized)));
        assert!(matches!(engine.home_team().await, Err(Error::Uninitialized)));

        engine.init().await;
        assert!(engine.is_initialised());
        assert!(engine.result().await.is_ok());
    }

    #[tokio::test]
    async fn test_finished_flag_set_from_feed() {
        let engine = engine(transport(12345, 12345, "FINISHED"), PAGE);
        let identity = engine.init().await;
        assert_eq!(identity.match_id, Some(12345));

        let record = engine.locate(true).await.unwrap();
        assert_eq!(record.match_id, Some(12345));
        assert!(engine.finished().await.unwrap());
        assert_eq!(engine.state().await.unwrap(), MatchState::Finished);
    }

    #[tokio::test]
    async fn test_missing_match_is_synthesized() {
        let transport = transport(99999, 12345, "LIVE");
        let engine = engine(transport.clone(), PAGE);
        engine.init().await;

        let hero_calls = transport.calls(HERO);
        let result = engine.result().await.unwrap();

        assert_eq!(transport.calls(HERO) - hero_calls, 1);
        assert_eq!(transport.calls(POLL), 1);
        assert_eq!(result.home_sets_won(), 3);
        assert_eq!(result.sets().len(), 3);
        assert!(engine.inner.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_result_tracks_feed() {
        let transport = transport(12345, 12345, "LIVE");
        let engine = engine(transport.clone(), PAGE);
        engine.init().await;

        let result = engine.result().await.unwrap();
        assert_eq!(result.sets().len(), 3);
        assert!(result.in_play());
        assert_eq!(result.to_string(), "2:1 (25-20, 22-25, 25-18)");

        transport.set_json(FEED, feed(12345, "FINISHED"));
        assert_eq!(engine.result().await.unwrap(), result);
        assert_eq!(transport.calls(FEED), 2);
    }

    #[tokio::test]
    async fn test_duration() {
        let live = engine(transport(12345, 12345, "LIVE"), PAGE);
        live.init().await;
        assert!(live.duration().await.unwrap() > chrono::Duration::zero());

        let finished = engine(transport(12345, 12345, "FINISHED"), PAGE);
        finished.init().await;
        assert_eq!(finished.duration().await.unwrap(), chrono::Duration::minutes(95));
    }

    #[tokio::test]
    async fn test_team_falls_back_to_feed() {
        let transport = transport(12345, 12345, "FINISHED");
        transport.set_json(
            HOME_LINEUP,
            json!({
                "TeamId": 10,
                "TeamLogo": {"AltText": "Home Club", "Url": "lineup.png"},
                "TopLeftPlayer": {"Number": 4, "Name": "JAN NOWAK", "Position": "Outside spiker",
                                  "PositionNumber": 4, "PlayerId": 1}
            }),
        );
        transport.set_json(
            PLAYER_STATS,
            Value::String(json!({"Teams": [{"Players": [{"Name": "Nowak Jan", "PlayerNumber": 4, "Points": 19}]}]}).to_string()),
        );
        transport.set_json(TEAM_STATS, Value::String(json!({"Tabs": []}).to_string()));
        transport.set_json(FORM, Value::String(json!({"HomeTeam": {}, "AwayTeam": {}}).to_string()));

        let engine = engine(transport, PAGE);
        engine.init().await;

        let home = engine.home_team().await.unwrap();
        assert_eq!(home.id, Some(10));
        assert_eq!(home.logo.as_deref(), Some("h.png"));
        assert_eq!(home.players[0].stats.as_ref().map(|s| s.points), Some(19));
        assert_eq!(home.poll.as_ref().map(|p| p.count), Some(7));

        // the away lineup is not served
        let away = engine.away_team().await.unwrap();
        assert_eq!(away.name.as_deref(), Some("Away Club"));
        assert_eq!(away.nickname.as_deref(), Some("AWA"));
        assert!(away.players.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_without_report_and_info() {
        let engine = engine(transport(12345, 12345, "FINISHED"), PAGE);
        let snapshot = engine.snapshot().await.unwrap();

        assert_eq!(snapshot.state, MatchState::Finished);
        assert!(snapshot.report.is_none());
        assert!(snapshot.info.is_none());
        assert!(snapshot.play_by_play.is_none());
        assert!(snapshot.top_players.all().is_empty());
        assert_eq!(snapshot.venue.as_deref(), Some("Arena"));

        let json = snapshot.to_json().unwrap();
        assert!(json["report"].is_null());
        assert!(json["info"].is_null());
        assert_eq!(json["duration"], "1:35:00");
        assert_eq!(json["state"], "finished");
        assert_eq!(json["matchCentreLink"], LINK);
        assert_eq!(json["homeTeam"]["name"], "Home Club");
        assert_eq!(json["competition"]["phase"], "Final Four");
        assert_eq!(json["result"]["homeScore"], 2);
    }

    #[tokio::test]
    async fn test_invalid_match_centre_matches_by_link() {
        let html = "<html><body>Object reference not set to an instance of an object.</body></html>";
        let engine = engine(transport(12345, 12345, "FINISHED"), html);
        assert!(!engine.is_valid());

        let identity = engine.init().await;
        assert_eq!(identity.lookup_key(), LookupKey::Link(LINK));

        assert_eq!(engine.result().await.unwrap().home_sets_won(), 2);
        assert_eq!(engine.duration().await.unwrap(), chrono::Duration::zero());
        let competition = engine.competition().await.unwrap().unwrap();
        assert_eq!(competition.name, "CEV Champions League Volley 2024");
    }

    #[tokio::test]
    async fn test_unknown_broken_page_is_unavailable() {
        let transport = Arc::new(MockTransport::new().with_json(FEED, json!({"competitions": []})));
        let engine = engine(transport, "Object reference not set to an instance of an object.");
        engine.init().await;

        assert!(matches!(engine.result().await, Err(Error::MatchUnavailable(_))));
    }

    #[tokio::test]
    async fn test_shutdown_stops_poll_loop() {
        let engine = engine(transport(12345, 12345, "LIVE"), PAGE);
        engine.shutdown().await;
        assert!(lock(&engine.inner.poll_task).is_none());
    }
}
