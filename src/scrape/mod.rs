pub mod endpoints;
pub mod featured;
pub mod info;
pub mod report;

pub use endpoints::{is_invalid_match_centre, tags, EndpointIndex};
pub use featured::Featured;
pub use info::{MatchInfo, MatchInfoItem};
pub use report::{MatchInNumber, MatchQuote, MatchReport};
