//! Whole runs driven by hand through `Sequencer::tick`.

use engine::core::timing::{Clock, InstantStamp, ManualClock};
use engine::tasks::dot_probe::{self, DotProbePlan, Phase};
use engine::tasks::sequencer::{Effect, RunEvent, RunState, RunSummary, Sequencer, TaskPlan};
use engine::tasks::stimulus::InkColor;
use engine::tasks::stroop::{self, Condition, StroopPlan, StroopTrial};
use engine::tasks::{DotProbeConfig, StroopConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fires pending timers (advancing the clock by their delay) and answers each
/// stimulus after `rt_ms`, until the run completes.
struct Harness<P: TaskPlan> {
    sequencer: Sequencer<P, ManualClock>,
    clock: ManualClock,
    pending: Option<(engine::tasks::sequencer::TimerToken, u64)>,
    breaks_seen: usize,
    summary: Option<RunSummary<P::Outcome>>,
}

impl<P: TaskPlan> Harness<P> {
    fn new(plan: P, timing: engine::tasks::TimingConfig) -> Self {
        let clock = ManualClock::new(1_000.0);
        Self {
            sequencer: Sequencer::new(plan, timing, clock.clone()),
            clock,
            pending: None,
            breaks_seen: 0,
            summary: None,
        }
    }

    fn apply(&mut self, event: RunEvent<P::Response>) {
        let before = self.sequencer.state();
        let transition = self.sequencer.tick(event);
        if matches!(transition.state, RunState::BlockBreak { .. })
            && !matches!(before, RunState::BlockBreak { .. })
        {
            self.breaks_seen += 1;
        }
        for effect in transition.effects {
            match effect {
                Effect::ScheduleTimer { token, delay_ms } => self.pending = Some((token, delay_ms)),
                Effect::CancelTimer(token) => {
                    if self.pending.map(|(t, _)| t) == Some(token) {
                        self.pending = None;
                    }
                }
                Effect::EmitResult(_) => {}
                Effect::Completed(summary) => self.summary = Some(summary),
            }
        }
    }

    fn run(
        mut self,
        rt_ms: u64,
        answer: impl Fn(&P, usize) -> P::Response,
    ) -> (Self, RunSummary<P::Outcome>) {
        self.apply(RunEvent::Start);
        while self.summary.is_none() {
            match self.sequencer.state() {
                RunState::Stimulus { index, .. } => {
                    self.clock.advance(rt_ms as f64);
                    let response = answer(self.sequencer.plan(), index);
                    let at = self.clock.now();
                    self.apply(RunEvent::Respond { response, at });
                }
                _ => {
                    let (token, delay) = self.pending.take().expect("a timer is pending");
                    self.clock.advance(delay as f64);
                    self.apply(RunEvent::TimerFired(token));
                }
            }
        }
        let summary = self.summary.take().expect("run completed");
        (self, summary)
    }
}

fn stroop_trial(i: usize, condition: Condition) -> StroopTrial {
    StroopTrial {
        id: format!("t{i}"),
        condition,
        word: "RED".into(),
        ink: InkColor::Blue,
        correct_ink: InkColor::Blue,
    }
}

#[test]
fn block_break_fires_once_per_condition_boundary() {
    use Condition::*;
    let blocks = [Congruent, Congruent, Incongruent, Incongruent, Neutral, Neutral];
    let plan = StroopPlan::new(
        blocks
            .iter()
            .enumerate()
            .map(|(i, c)| stroop_trial(i, *c))
            .collect(),
    );

    let (harness, summary) = Harness::new(plan, StroopConfig::default().timing)
        .run(400, |plan, i| plan.trials()[i].correct_ink);

    assert_eq!(harness.breaks_seen, 2);
    assert_eq!(summary.block_breaks, 2);
    assert_eq!(summary.results.len(), 6);

    // Six trials of 500 + 400 plus two 3 s breaks.
    assert_eq!(summary.total_elapsed_ms, 6 * 900 + 2 * 3_000);

    let attempt = stroop::build_stroop_attempt(
        "a".into(),
        String::new(),
        summary.total_elapsed_ms,
        summary.results,
    );
    assert_eq!(attempt.accuracy_pct, 100.0);
    assert_eq!(attempt.congruent.mean_rt_ms, 400.0);
    assert_eq!(attempt.interference_ms, 0);
}

#[test]
fn results_arrive_in_trial_order() {
    let plan = StroopConfig::default().plan(&mut StdRng::seed_from_u64(10));
    let ids: Vec<String> = plan.trials().iter().map(|t| t.id.clone()).collect();

    let (_, summary) = Harness::new(plan, StroopConfig::default().timing)
        .run(250, |plan, i| plan.trials()[i].correct_ink);

    let recorded: Vec<String> = summary.results.iter().map(|r| r.trial_id.clone()).collect();
    assert_eq!(recorded, ids);
}

#[test]
fn dot_probe_run_scores_threat_then_neutral() {
    let config = DotProbeConfig {
        trials_per_phase: 6,
        ..DotProbeConfig::default()
    };
    let plan = config.plan(&mut StdRng::seed_from_u64(12));

    // Wrong on every neutral-phase slot.
    let (_, summary) = Harness::new(plan, config.timing).run(350, |plan: &DotProbePlan, i| {
        let slot = &plan.slots()[i];
        match slot.phase {
            Phase::Threat => slot.correct,
            Phase::Neutral => slot.correct.opposite(),
        }
    });

    assert_eq!(summary.block_breaks, 1);
    let attempt = dot_probe::build_attempt(
        "a".into(),
        String::new(),
        6,
        summary.total_elapsed_ms,
        summary.results,
    );
    assert_eq!(attempt.threat.accuracy_pct, 100.0);
    assert_eq!(attempt.neutral.accuracy_pct, 0.0);
    assert_eq!(attempt.accuracy_pct, 50.0);
    assert_eq!(attempt.threat.mean_rt_ms, 350.0);
    assert_eq!(attempt.neutral.mean_rt_ms, 350.0);
    assert_eq!(attempt.abs_ms, 0.0);
    // 12 × (500 + 350) + 11 × 500 feedback + 3 s break.
    assert_eq!(attempt.total_ms, 12 * 850 + 11 * 500 + 3_000);
}

#[test]
fn clock_running_backwards_never_yields_negative_rt() {
    let plan = DotProbePlan::standard(dot_probe::build_trials(6, &mut StdRng::seed_from_u64(1)));
    let clock = ManualClock::new(5_000.0);
    let mut sequencer = Sequencer::new(plan, DotProbeConfig::default().timing, clock.clone());

    let start = sequencer.tick(RunEvent::Start);
    let token = start
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::ScheduleTimer { token, .. } => Some(*token),
            _ => None,
        })
        .unwrap();
    clock.advance(500.0);
    sequencer.tick(RunEvent::TimerFired(token));

    let answered = sequencer.tick(RunEvent::Respond {
        response: engine::tasks::stimulus::Side::Left,
        at: InstantStamp(10.0),
    });
    let result = answered
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::EmitResult(r) => Some(r.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(result.rt_ms, 0);
}

#[test]
fn entropy_seeded_sequencers_start_idle_with_full_plans() {
    let dot = DotProbeConfig::default().start(ManualClock::new(0.0));
    assert_eq!(dot.state(), RunState::Idle);
    assert_eq!(dot.plan().len(), 24);

    let stroop = StroopConfig::default().start(ManualClock::new(0.0));
    assert_eq!(stroop.state(), RunState::Idle);
    assert_eq!(stroop.plan().trials().len(), 11 + 11 + 12);
}
