use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time;
use tracing::{debug, info, warn};

use crate::engine::{EngineInner, MatchEngine};
use crate::error::Result;
use crate::models::MatchResult;

/// Handle returned when registering a score observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Called by the poll loop whenever the score of a match changes
#[async_trait]
pub trait ScoreObserver: Send + Sync {
    async fn on_score(&self, engine: &MatchEngine, score: &MatchResult) -> anyhow::Result<()>;
}

/// Remembers the last score seen and notifies observers on change
#[derive(Debug, Default)]
pub(crate) struct ScoreWatcher {
    last: Option<MatchResult>,
}

impl ScoreWatcher {
    /// One poll: fetch the score and fan a change out to every observer in
    /// registration order. An observer error is logged and the rest still run.
    pub(crate) async fn tick(&mut self, engine: &MatchEngine) -> Result<()> {
        let observers = engine.score_observers();
        if observers.is_empty() {
            return Ok(());
        }

        let score = engine.result().await?;
        if self.last.as_ref() == Some(&score) {
            return Ok(());
        }

        debug!("Score of {} changed: {}", engine.match_centre_link(), score);
        self.last = Some(score.clone());

        for observer in observers {
            if let Err(e) = observer.on_score(engine, &score).await {
                warn!("Score observer failed for {}: {}", engine.match_centre_link(), e);
            }
        }

        Ok(())
    }
}

tokio::task_local! {
    static POLL_TASK: ();
}

/// Whether the caller runs inside a score poll loop, e.g. from an observer
pub(crate) fn in_poll_task() -> bool {
    POLL_TASK.try_with(|_| ()).is_ok()
}

/// Poll loop of one engine. Runs until `shutdown` is notified or the engine
/// has been dropped; a failed poll is retried on the next interval.
pub(crate) async fn run(engine: Weak<EngineInner>, shutdown: Arc<Notify>) {
    POLL_TASK.scope((), poll(engine, shutdown)).await
}

async fn poll(engine: Weak<EngineInner>, shutdown: Arc<Notify>) {
    let mut watcher = ScoreWatcher::default();

    loop {
        let interval = {
            let Some(inner) = engine.upgrade() else {
                debug!("Match engine dropped, stopping score poll");
                break;
            };
            let engine = MatchEngine::from_inner(inner);

            // accessors need the identity
            engine.init().await;

            if let Err(e) = watcher.tick(&engine).await {
                debug!("Score poll for {} failed, retrying: {}", engine.match_centre_link(), e);
            }
            engine.score_observer_interval()
        };

        tokio::select! {
            _ = shutdown.notified() => {
                info!("Score poll stopped");
                break;
            }
            _ = time::sleep(interval) => {}
        }
    }
}
