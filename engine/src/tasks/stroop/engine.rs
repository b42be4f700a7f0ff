//! Stroop trial batches and the sequencer plan.

use rand::Rng;

use crate::tasks::sequencer::{ResponseWindow, TaskPlan};
use crate::tasks::stimulus::{self, InkColor};

use super::words::{clamp_trials_per_condition, COLOR_WORDS, NEUTRAL_WORDS};
use super::{Condition, StroopTrial, StroopTrialResult};

fn trial<R: Rng + ?Sized>(
    rng: &mut R,
    condition: Condition,
    word: &str,
    ink: InkColor,
) -> StroopTrial {
    StroopTrial {
        id: stimulus::trial_id(rng),
        condition,
        word: word.to_string(),
        ink,
        correct_ink: ink,
    }
}

/// Congruent, incongruent and neutral batches in that order. Each batch holds
/// `min(clamp(n), pool)` trials since words never repeat within a batch.
pub fn make_trials<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<StroopTrial> {
    let n = clamp_trials_per_condition(n);
    let mut trials = Vec::with_capacity(n * 3);

    for word in stimulus::sample_distinct(&COLOR_WORDS, n, rng) {
        let ink = InkColor::from_word(word).unwrap_or_else(|| InkColor::random(rng, None));
        trials.push(trial(rng, Condition::Congruent, word, ink));
    }

    for word in stimulus::sample_distinct(&COLOR_WORDS, n, rng) {
        let base = InkColor::from_word(word).unwrap_or_else(|| InkColor::random(rng, None));
        let ink = InkColor::random(rng, Some(base));
        trials.push(trial(rng, Condition::Incongruent, word, ink));
    }

    for word in stimulus::sample_distinct(&NEUTRAL_WORDS, n, rng) {
        let ink = InkColor::random(rng, None);
        trials.push(trial(rng, Condition::Neutral, word, ink));
    }

    trials
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StroopPlan {
    trials: Vec<StroopTrial>,
}

impl StroopPlan {
    pub fn new(trials: Vec<StroopTrial>) -> Self {
        Self { trials }
    }

    pub fn trials(&self) -> &[StroopTrial] {
        &self.trials
    }

    pub fn trial(&self, index: usize) -> Option<&StroopTrial> {
        self.trials.get(index)
    }
}

impl TaskPlan for StroopPlan {
    type Block = Condition;
    type Response = InkColor;
    type Outcome = StroopTrialResult;

    fn len(&self) -> usize {
        self.trials.len()
    }

    fn block(&self, index: usize) -> Condition {
        self.trials[index].condition
    }

    fn resolve(
        &self,
        index: usize,
        response: Option<InkColor>,
        window: ResponseWindow,
    ) -> StroopTrialResult {
        let trial = &self.trials[index];
        StroopTrialResult {
            trial_id: trial.id.clone(),
            condition: trial.condition,
            word: trial.word.clone(),
            ink: trial.ink,
            correct_ink: trial.correct_ink,
            picked: response,
            correct: response == Some(trial.correct_ink),
            rt_ms: window.rt_ms,
            shown_at_ms: window.shown_at.as_ms(),
            response_at_ms: window.responded_at.as_ms(),
            timed_out: window.timed_out,
        }
    }
}
