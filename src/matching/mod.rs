pub mod player_stats;

pub use player_stats::{find_player_stats, title_case};
