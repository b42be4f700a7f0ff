//! Emotional Stroop task: name the ink colour, ignore the word.

pub mod engine;
pub mod metrics;
pub mod words;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::storage::HistoryEntry;
use crate::core::timing::Clock;
use crate::t;

use super::metrics::BlockSummary;
use super::sequencer::{RunSummary, Sequencer, TimingConfig};
use super::session::ScoredTask;
use super::stimulus::{self, InkColor};

pub use engine::{make_trials, StroopPlan};
pub use metrics::build_stroop_attempt;
pub use words::clamp_trials_per_condition;

pub const HISTORY_KEY: &str = "mk_stroop_history_v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Congruent,
    Incongruent,
    Neutral,
}

impl Condition {
    /// Presentation order of the blocks.
    pub const ORDER: [Condition; 3] = [
        Condition::Congruent,
        Condition::Incongruent,
        Condition::Neutral,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Condition::Congruent => "congruent",
            Condition::Incongruent => "incongruent",
            Condition::Neutral => "neutral",
        }
    }

    pub fn label(self) -> String {
        match self {
            Condition::Congruent => t!("condition-congruent"),
            Condition::Incongruent => t!("condition-incongruent"),
            Condition::Neutral => t!("condition-neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StroopTrial {
    pub id: String,
    pub condition: Condition,
    pub word: String,
    pub ink: InkColor,
    /// Always equal to `ink`; kept as the explicit comparison target.
    pub correct_ink: InkColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StroopTrialResult {
    pub trial_id: String,
    pub condition: Condition,
    pub word: String,
    pub ink: InkColor,
    pub correct_ink: InkColor,
    pub picked: Option<InkColor>,
    pub correct: bool,
    pub rt_ms: u64,
    pub shown_at_ms: f64,
    pub response_at_ms: f64,
    #[serde(default)]
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StroopAttempt {
    pub id: String,
    #[serde(rename = "createdAtIso")]
    pub created_at: String,
    pub total_ms: u64,
    pub total_trials: usize,
    pub accuracy_pct: f64,
    pub congruent: BlockSummary,
    pub incongruent: BlockSummary,
    pub neutral: BlockSummary,
    pub interference_ms: i64,
    pub results: Vec<StroopTrialResult>,
}

impl StroopAttempt {
    pub fn summary(&self, condition: Condition) -> BlockSummary {
        match condition {
            Condition::Congruent => self.congruent,
            Condition::Incongruent => self.incongruent,
            Condition::Neutral => self.neutral,
        }
    }
}

impl HistoryEntry for StroopAttempt {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StroopConfig {
    pub trials_per_condition: usize,
    pub timing: TimingConfig,
}

impl Default for StroopConfig {
    fn default() -> Self {
        Self {
            trials_per_condition: words::DEFAULT_TRIALS_PER_CONDITION,
            timing: TimingConfig {
                fixation_ms: 500,
                feedback_ms: None,
                block_break_secs: 3,
                response_timeout_ms: None,
            },
        }
    }
}

impl StroopConfig {
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> StroopPlan {
        StroopPlan::new(make_trials(self.trials_per_condition, rng))
    }

    pub fn sequencer<R, C>(&self, rng: &mut R, clock: C) -> Sequencer<StroopPlan, C>
    where
        R: Rng + ?Sized,
        C: Clock,
    {
        Sequencer::new(self.plan(rng), self.timing, clock)
    }

    /// [`Self::sequencer`] over a freshly seeded production rng.
    pub fn start<C: Clock>(&self, clock: C) -> Sequencer<StroopPlan, C> {
        self.sequencer(&mut stimulus::entropy_rng(), clock)
    }
}

impl ScoredTask for StroopPlan {
    type Attempt = StroopAttempt;

    const HISTORY_KEY: &'static str = HISTORY_KEY;

    fn score(
        &self,
        id: String,
        created_at: String,
        summary: RunSummary<StroopTrialResult>,
    ) -> StroopAttempt {
        build_stroop_attempt(id, created_at, summary.total_elapsed_ms, summary.results)
    }
}
