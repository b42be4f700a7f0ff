//! Unified history table across both tasks, newest first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::t;
use crate::tasks::{Attempt, StroopAttempt};

use super::ranking::pick_best;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    DotProbe,
    Stroop,
}

impl TaskKind {
    pub fn label(self) -> String {
        match self {
            TaskKind::DotProbe => t!("task-dot-probe"),
            TaskKind::Stroop => t!("task-stroop"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Only(TaskKind),
}

impl TaskFilter {
    pub fn admits(self, kind: TaskKind) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Only(only) => only == kind,
        }
    }
}

/// One labelled metric cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value_ms: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub task: TaskKind,
    pub task_label: String,
    pub id: String,
    pub created_at: String,
    pub total_ms: u64,
    pub accuracy_pct: f64,
    pub key_metric: Metric,
    pub extra: [Metric; 2],
    /// Best attempt of its task.
    pub is_best: bool,
}

fn metric(label: String, value: f64) -> Metric {
    Metric {
        label,
        value_ms: value.round() as i64,
    }
}

pub fn dot_probe_row(attempt: &Attempt, is_best: bool) -> HistoryRow {
    HistoryRow {
        task: TaskKind::DotProbe,
        task_label: TaskKind::DotProbe.label(),
        id: attempt.id.clone(),
        created_at: attempt.created_at.clone(),
        total_ms: attempt.total_ms,
        accuracy_pct: attempt.accuracy_pct,
        key_metric: metric(t!("metric-abs"), attempt.abs_ms),
        extra: [
            metric(t!("metric-threat-rt"), attempt.threat.mean_rt_ms),
            metric(t!("metric-neutral-rt"), attempt.neutral.mean_rt_ms),
        ],
        is_best,
    }
}

pub fn stroop_row(attempt: &StroopAttempt, is_best: bool) -> HistoryRow {
    HistoryRow {
        task: TaskKind::Stroop,
        task_label: TaskKind::Stroop.label(),
        id: attempt.id.clone(),
        created_at: attempt.created_at.clone(),
        total_ms: attempt.total_ms,
        accuracy_pct: attempt.accuracy_pct,
        key_metric: metric(t!("metric-interference"), attempt.interference_ms as f64),
        extra: [
            metric(t!("metric-congruent-rt"), attempt.congruent.mean_rt_ms),
            metric(t!("metric-incongruent-rt"), attempt.incongruent.mean_rt_ms),
        ],
        is_best,
    }
}

/// Newest first. Unparseable timestamps sort after every parseable one and
/// fall back to a plain string compare among themselves.
fn newest_first(a: &str, b: &str) -> Ordering {
    let parse = |value: &str| OffsetDateTime::parse(value, &Rfc3339).ok();
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// Rows for both histories, sorted by `created_at` descending.
pub fn unified_rows(
    dot_probe: &[Attempt],
    stroop: &[StroopAttempt],
    filter: TaskFilter,
) -> Vec<HistoryRow> {
    let best_dot = pick_best(dot_probe).map(|a| a.id.as_str());
    let best_stroop = pick_best(stroop).map(|a| a.id.as_str());

    let mut rows = Vec::new();
    if filter.admits(TaskKind::DotProbe) {
        rows.extend(
            dot_probe
                .iter()
                .map(|a| dot_probe_row(a, Some(a.id.as_str()) == best_dot)),
        );
    }
    if filter.admits(TaskKind::Stroop) {
        rows.extend(
            stroop
                .iter()
                .map(|a| stroop_row(a, Some(a.id.as_str()) == best_stroop)),
        );
    }
    rows.sort_by(|a, b| newest_first(&a.created_at, &b.created_at));
    rows
}
