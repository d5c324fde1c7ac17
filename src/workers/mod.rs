pub mod score_observer;

pub use score_observer::{ObserverId, ScoreObserver};
