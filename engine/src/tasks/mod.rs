pub mod dot_probe;
pub mod driver;
pub mod metrics;
pub mod sequencer;
pub mod session;
pub mod stimulus;
pub mod stroop;

pub use dot_probe::{Attempt, DotProbeConfig, DotProbePlan};
pub use sequencer::{RunState, Sequencer, TaskPlan, TimingConfig};
pub use stroop::{StroopAttempt, StroopConfig, StroopPlan};
