//! Attempt scoring for Stroop runs.
//!
//! Condition mean RT is taken over correct answers only and rounded to whole
//! milliseconds. Accuracy covers every trial in the condition.

use crate::tasks::metrics::{mean, pct, BlockSummary};

use super::{Condition, StroopAttempt, StroopTrialResult};

fn summarize(results: &[StroopTrialResult], condition: Condition) -> BlockSummary {
    let in_condition: Vec<&StroopTrialResult> =
        results.iter().filter(|r| r.condition == condition).collect();
    let correct: Vec<u64> = in_condition
        .iter()
        .filter(|r| r.correct && !r.timed_out)
        .map(|r| r.rt_ms)
        .collect();
    BlockSummary {
        mean_rt_ms: mean(correct.iter().copied()).round(),
        accuracy_pct: pct(correct.len(), in_condition.len()),
    }
}

pub fn build_stroop_attempt(
    id: String,
    created_at: String,
    total_ms: u64,
    results: Vec<StroopTrialResult>,
) -> StroopAttempt {
    let congruent = summarize(&results, Condition::Congruent);
    let incongruent = summarize(&results, Condition::Incongruent);
    let neutral = summarize(&results, Condition::Neutral);
    let correct = results.iter().filter(|r| r.correct).count();

    StroopAttempt {
        id,
        created_at,
        total_ms,
        total_trials: results.len(),
        accuracy_pct: pct(correct, results.len()),
        congruent,
        incongruent,
        neutral,
        interference_ms: (incongruent.mean_rt_ms - congruent.mean_rt_ms).round() as i64,
        results,
    }
}
