//! Localized text digests of attempts and countdown copy.

use crate::core::format::{format_clock, format_ms, format_percent, format_signed_ms};
use crate::t;
use crate::tasks::dot_probe::{Attempt, Phase};
use crate::tasks::metrics::BlockSummary;
use crate::tasks::stroop::{Condition, StroopAttempt};

fn block_line(label: String, block: BlockSummary) -> String {
    t!(
        "summary-block",
        label = label,
        rt = format_ms(block.mean_rt_ms),
        accuracy = format_percent(block.accuracy_pct)
    )
}

pub fn summary_lines(attempt: &Attempt) -> Vec<String> {
    vec![
        t!("summary-total-time", time = format_clock(attempt.total_ms)),
        t!("summary-accuracy", value = format_percent(attempt.accuracy_pct)),
        block_line(Phase::Threat.label(), attempt.threat),
        block_line(Phase::Neutral.label(), attempt.neutral),
        t!("summary-abs", value = format_signed_ms(attempt.abs_ms)),
    ]
}

pub fn stroop_summary_lines(attempt: &StroopAttempt) -> Vec<String> {
    let mut lines = vec![
        t!("summary-total-time", time = format_clock(attempt.total_ms)),
        t!("summary-accuracy", value = format_percent(attempt.accuracy_pct)),
    ];
    lines.extend(
        Condition::ORDER
            .into_iter()
            .map(|condition| block_line(condition.label(), attempt.summary(condition))),
    );
    lines.push(t!(
        "summary-interference",
        value = format_signed_ms(attempt.interference_ms as f64)
    ));
    lines
}

/// Title and remaining-seconds copy for the block-break screen.
pub fn block_break_message(remaining_secs: u32) -> (String, String) {
    (
        t!("block-break-title"),
        t!("block-break-remaining", seconds = remaining_secs),
    )
}
