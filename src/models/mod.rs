pub(crate) mod de;

pub mod calendar_match;
pub mod competition;
pub mod live_score;
pub mod play_by_play;
pub mod poll;
pub mod result;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod team;
pub mod types;

pub use calendar_match::CalendarMatch;
pub use competition::MatchCompetition;
pub use live_score::{CompetitionRef, FeedCompetition, FeedSide, LiveScoreRecord, LiveScoresFeed};
pub use play_by_play::{Play, PlayByPlay, PlayByPlaySet};
pub use poll::{PollEntry, TeamPoll};
pub use result::{MatchResult, RawSetScore, SetResult};
pub use snapshot::MatchSnapshot;
pub use state::MatchState;
pub use stats::{
    PlayerStatistic, PlayerStatsEntry, TeamStatistic, TeamStatisticSet, TeamStatistics, TopPlayer,
    TopPlayerPlayer, TopPlayers,
};
pub use team::{FormMatch, Player, Team, TeamSources};
pub use types::{CompetitionGender, PlayType, Position, TeamStatisticType, TopPlayerType, Zone};
