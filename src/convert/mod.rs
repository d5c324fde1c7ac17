pub mod score_hero;

pub use score_hero::{format_sets, parse_sets, to_feed_record, ScoreHero};
