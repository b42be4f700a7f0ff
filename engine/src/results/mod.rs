pub mod export;
pub mod list;
pub mod ranking;
pub mod summary;

pub use export::{dot_probe_csv, export_file_name, stroop_csv};
pub use list::{unified_rows, HistoryRow, TaskFilter, TaskKind};
pub use ranking::{compare_to_best, pick_best, AttemptDelta, Ranked};
pub use summary::{block_break_message, stroop_summary_lines, summary_lines};

use crate::core::storage::{History, KeyValueStore, StorageError};
use crate::tasks::{Attempt, StroopAttempt};

/// Both task histories as loaded for the results views.
#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    pub dot_probe: Vec<Attempt>,
    pub stroop: Vec<StroopAttempt>,
}

impl ResultsState {
    pub fn load<S, T>(dot_probe: &History<Attempt, S>, stroop: &History<StroopAttempt, T>) -> Self
    where
        S: KeyValueStore,
        T: KeyValueStore,
    {
        Self {
            dot_probe: dot_probe.load(),
            stroop: stroop.load(),
        }
    }

    pub fn rows(&self, filter: TaskFilter) -> Vec<HistoryRow> {
        unified_rows(&self.dot_probe, &self.stroop, filter)
    }

    /// Clear the stored histories admitted by `filter` and their loaded rows.
    pub fn clear<S, T>(
        &mut self,
        filter: TaskFilter,
        dot_probe: &History<Attempt, S>,
        stroop: &History<StroopAttempt, T>,
    ) -> Result<(), StorageError>
    where
        S: KeyValueStore,
        T: KeyValueStore,
    {
        if filter.admits(TaskKind::DotProbe) {
            dot_probe.clear()?;
            self.dot_probe.clear();
        }
        if filter.admits(TaskKind::Stroop) {
            stroop.clear()?;
            self.stroop.clear();
        }
        Ok(())
    }

    pub fn best_dot_probe(&self) -> Option<&Attempt> {
        pick_best(&self.dot_probe)
    }

    pub fn best_stroop(&self) -> Option<&StroopAttempt> {
        pick_best(&self.stroop)
    }

    pub fn dot_probe_attempt(&self, id: &str) -> Option<&Attempt> {
        self.dot_probe.iter().find(|a| a.id == id)
    }

    pub fn stroop_attempt(&self, id: &str) -> Option<&StroopAttempt> {
        self.stroop.iter().find(|a| a.id == id)
    }
}
