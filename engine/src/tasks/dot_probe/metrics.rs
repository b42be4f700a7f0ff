//! Attempt scoring for dot-probe runs.
//!
//! Phase mean RT covers every answered trial in the phase, correct or not.
//! Timed-out trials count against accuracy only.

use crate::tasks::metrics::{mean, pct, BlockSummary};

use super::{Attempt, Phase, TrialResult};

fn summarize<'a>(results: impl Iterator<Item = &'a TrialResult> + Clone) -> BlockSummary {
    let total = results.clone().count();
    let correct = results.clone().filter(|r| r.correct).count();
    BlockSummary {
        mean_rt_ms: mean(results.filter(|r| !r.timed_out).map(|r| r.rt_ms)),
        accuracy_pct: pct(correct, total),
    }
}

pub fn build_attempt(
    id: String,
    created_at: String,
    total_trials_per_phase: usize,
    total_ms: u64,
    results: Vec<TrialResult>,
) -> Attempt {
    let in_phase = |phase: Phase| results.iter().filter(move |r| r.phase == phase);
    let threat = summarize(in_phase(Phase::Threat));
    let neutral = summarize(in_phase(Phase::Neutral));
    let correct = results.iter().filter(|r| r.correct).count();

    Attempt {
        id,
        created_at,
        total_trials_per_phase,
        total_ms,
        accuracy_pct: pct(correct, results.len()),
        threat,
        neutral,
        abs_ms: threat.mean_rt_ms - neutral.mean_rt_ms,
        results,
    }
}
