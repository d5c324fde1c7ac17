use serde::{Deserialize, Serialize};

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    Upcoming,
    Live,
    Finished,
    #[default]
    Unknown,
}

impl MatchState {
    /// Always derived from the two observations, never stored on its own.
    /// `finished` dominates once it is true.
    pub fn derive(started: bool, finished: bool) -> Self {
        match (started, finished) {
            (_, true) => MatchState::Finished,
            (true, false) => MatchState::Live,
            (false, false) => MatchState::Upcoming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchState::Upcoming => "upcoming",
            MatchState::Live => "live",
            MatchState::Finished => "finished",
            MatchState::Unknown => "unknown",
        }
    }
}
