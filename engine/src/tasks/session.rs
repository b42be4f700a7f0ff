//! Run → score → persist, for any task that knows how to score itself.

use serde::{de::DeserializeOwned, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, warn};

use crate::core::storage::{History, HistoryConfig, HistoryEntry, KeyValueStore, StorageError};
use crate::core::timing::Clock;

use super::driver::{self, RunEvents};
use super::sequencer::{RunSummary, Sequencer, TaskPlan, Transition};
use super::stimulus;

pub trait ScoredTask: TaskPlan {
    type Attempt: Serialize + DeserializeOwned + HistoryEntry + Clone;

    /// Storage key of this task's attempt history.
    const HISTORY_KEY: &'static str;

    fn score(
        &self,
        id: String,
        created_at: String,
        summary: RunSummary<Self::Outcome>,
    ) -> Self::Attempt;
}

/// History handle for task `P`.
pub fn open_history<P, S>(store: S, config: HistoryConfig) -> History<P::Attempt, S>
where
    P: ScoredTask,
    S: KeyValueStore,
{
    History::new(store, P::HISTORY_KEY, config)
}

/// Current UTC time as RFC 3339.
pub fn timestamp_now() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Turn a finished run into an attempt with a fresh id and timestamp.
pub fn finalize<P: ScoredTask>(plan: &P, summary: RunSummary<P::Outcome>) -> P::Attempt {
    plan.score(stimulus::attempt_id(), timestamp_now(), summary)
}

/// Drive one run to the end, then score and save it.
///
/// A cancelled run yields `Ok(None)` and leaves the history untouched.
pub async fn run_session<P, C, S>(
    sequencer: &mut Sequencer<P, C>,
    events: RunEvents<P::Response>,
    history: &History<P::Attempt, S>,
) -> Result<Option<P::Attempt>, StorageError>
where
    P: ScoredTask,
    C: Clock,
    S: KeyValueStore,
{
    run_session_with(sequencer, events, history, |_| {}).await
}

/// [`run_session`] with a transition observer, see [`driver::drive_with`].
pub async fn run_session_with<P, C, S, F>(
    sequencer: &mut Sequencer<P, C>,
    events: RunEvents<P::Response>,
    history: &History<P::Attempt, S>,
    observe: F,
) -> Result<Option<P::Attempt>, StorageError>
where
    P: ScoredTask,
    C: Clock,
    S: KeyValueStore,
    F: FnMut(&Transition<P::Outcome>),
{
    let Some(summary) = driver::drive_with(sequencer, events, observe).await else {
        info!(key = history.key(), "run abandoned; nothing saved");
        return Ok(None);
    };

    let attempt = finalize(sequencer.plan(), summary);
    if let Err(err) = history.save(attempt.clone()) {
        warn!(key = history.key(), %err, "attempt could not be saved");
        return Err(err);
    }
    info!(key = history.key(), id = attempt.id(), "attempt saved");
    Ok(Some(attempt))
}
