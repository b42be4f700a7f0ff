//! Dot-probe attention-bias task: the participant picks the threat word in the
//! first phase and the neutral word in the second.

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
use super::stimulus::{self, Side};

pub use engine::{build_trials, build_two_stage_questions, DotProbePlan, Slot};
pub use metrics::build_attempt;
pub use words::clamp_trials_per_phase;

pub const HISTORY_KEY: &str = "mk_dot_probe_history_v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Threat,
    Neutral,
}

impl Phase {
    pub fn label(self) -> String {
        match self {
            Phase::Threat => t!("phase-threat"),
            Phase::Neutral => t!("phase-neutral"),
        }
    }

    /// Instruction shown above the pair.
    pub fn prompt(self) -> String {
        match self {
            Phase::Threat => t!("prompt-find-threat"),
            Phase::Neutral => t!("prompt-find-neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: String,
    pub threat_word: String,
    pub neutral_word: String,
    pub threat_side: Side,
}

/// One item of the two-stage word-question presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub stage: Phase,
    pub prompt: String,
    pub correct: Side,
    pub left_label: String,
    pub right_label: String,
    pub threat_word: String,
    pub neutral_word: String,
}

impl Question {
    pub fn threat_side(&self) -> Side {
        match self.stage {
            Phase::Threat => self.correct,
            Phase::Neutral => self.correct.opposite(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialResult {
    pub trial_id: String,
    pub phase: Phase,
    pub shown_at_ms: f64,
    pub response_at_ms: f64,
    pub rt_ms: u64,
    pub picked: Option<Side>,
    pub correct_side: Side,
    pub correct: bool,
    pub threat_word: String,
    pub neutral_word: String,
    #[serde(default)]
    pub threat_side: Option<Side>,
    #[serde(default)]
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    #[serde(rename = "createdAtIso")]
    pub created_at: String,
    pub total_trials_per_phase: usize,
    pub total_ms: u64,
    pub accuracy_pct: f64,
    pub threat: BlockSummary,
    pub neutral: BlockSummary,
    /// Attention bias score, threat mean RT minus neutral mean RT. Signed.
    pub abs_ms: f64,
    pub results: Vec<TrialResult>,
}

impl HistoryEntry for Attempt {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotProbeConfig {
    pub trials_per_phase: usize,
    pub timing: TimingConfig,
}

impl Default for DotProbeConfig {
    fn default() -> Self {
        Self {
            trials_per_phase: words::DEFAULT_TRIALS_PER_PHASE,
            timing: TimingConfig {
                fixation_ms: 500,
                feedback_ms: Some(500),
                block_break_secs: 3,
                response_timeout_ms: None,
            },
        }
    }
}

impl DotProbeConfig {
    /// Standard two-phase plan over freshly drawn trials.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> DotProbePlan {
        DotProbePlan::standard(build_trials(self.trials_per_phase, rng))
    }

    pub fn sequencer<R, C>(&self, rng: &mut R, clock: C) -> Sequencer<DotProbePlan, C>
    where
        R: Rng + ?Sized,
        C: Clock,
    {
        Sequencer::new(self.plan(rng), self.timing, clock)
    }

    /// [`Self::sequencer`] over a freshly seeded production rng.
    pub fn start<C: Clock>(&self, clock: C) -> Sequencer<DotProbePlan, C> {
        self.sequencer(&mut stimulus::entropy_rng(), clock)
    }
}

impl ScoredTask for DotProbePlan {
    type Attempt = Attempt;

    const HISTORY_KEY: &'static str = HISTORY_KEY;

    fn score(&self, id: String, created_at: String, summary: RunSummary<TrialResult>) -> Attempt {
        build_attempt(
            id,
            created_at,
            self.trials_per_phase(),
            summary.total_elapsed_ms,
            summary.results,
        )
    }
}
