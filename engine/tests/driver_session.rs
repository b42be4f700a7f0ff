//! Async driver and session runs on a paused tokio clock.

use std::time::Duration;

use engine::core::storage::{History, HistoryConfig, MemoryStore};
use engine::core::timing::MonotonicClock;
use engine::tasks::dot_probe::{self, DotProbeConfig, DotProbePlan};
use engine::tasks::driver::{self, RunHandle};
use engine::tasks::sequencer::{RunState, Sequencer, TaskPlan, TimingConfig, Transition};
use engine::tasks::session::{open_history, run_session, run_session_with};
use engine::tasks::stimulus::{InkColor, Side};
use engine::tasks::stroop::{StroopConfig, StroopPlan};
use engine::tasks::Attempt;
use rand::rngs::StdRng;
use rand::SeedableRng;

const RT_MS: u64 = 300;

/// Observer that answers every stimulus `RT_MS` later with `answer(index)`.
fn responder<P, F>(
    handle: RunHandle<P::Response, MonotonicClock>,
    answer: F,
) -> impl FnMut(&Transition<P::Outcome>)
where
    P: TaskPlan,
    P::Response: Send + 'static,
    F: Fn(usize) -> P::Response,
{
    move |transition| {
        if let RunState::Stimulus { index, .. } = transition.state {
            let handle = handle.clone();
            let response = answer(index);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(RT_MS)).await;
                handle.respond(response);
            });
        }
    }
}

#[tokio::test(start_paused = true)]
async fn dot_probe_run_completes_with_expected_timing() {
    let clock = MonotonicClock::new();
    let config = DotProbeConfig {
        trials_per_phase: 6,
        ..DotProbeConfig::default()
    };
    let mut sequencer = config.sequencer(&mut StdRng::seed_from_u64(1), clock);
    let plan = sequencer.plan().clone();

    let (handle, events) = driver::channel(clock);
    let observe = responder::<DotProbePlan, _>(handle, move |index| {
        plan.slot(index).map(|slot| slot.correct).unwrap_or(Side::Left)
    });

    let summary = driver::drive_with(&mut sequencer, events, observe)
        .await
        .expect("run completes");

    assert_eq!(summary.results.len(), 12);
    assert_eq!(summary.block_breaks, 1);
    assert!(summary.results.iter().all(|r| r.correct));
    assert!(summary
        .results
        .iter()
        .all(|r| (RT_MS..=RT_MS + 2).contains(&r.rt_ms)));

    // 12 × (fixation + rt) + 11 feedback pauses + one 3 s break.
    let expected = 12 * (500 + RT_MS) + 11 * 500 + 3_000;
    assert!(
        (expected..expected + 50).contains(&summary.total_elapsed_ms),
        "total {} vs expected {expected}",
        summary.total_elapsed_ms
    );
    assert_eq!(sequencer.state(), RunState::Done);
}

#[tokio::test(start_paused = true)]
async fn stroop_session_saves_scored_attempt() {
    let clock = MonotonicClock::new();
    let mut sequencer = StroopConfig::default().sequencer(&mut StdRng::seed_from_u64(2), clock);
    let plan: StroopPlan = sequencer.plan().clone();
    let store = MemoryStore::new();
    let history = open_history::<StroopPlan, _>(&store, HistoryConfig::default());

    let (handle, events) = driver::channel(clock);
    let observe = responder::<StroopPlan, _>(handle, move |index| {
        plan.trial(index).map(|trial| trial.correct_ink).unwrap_or(InkColor::Red)
    });

    let attempt = run_session_with(&mut sequencer, events, &history, observe)
        .await
        .expect("storage ok")
        .expect("run completes");

    assert_eq!(attempt.accuracy_pct, 100.0);
    assert!(attempt.interference_ms.abs() <= 2);
    assert_eq!(attempt.total_trials, sequencer.plan().len());
    let stored = history.load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, attempt.id);
    let found = history.find(&attempt.id).expect("stored attempt is found");
    assert_eq!(found.results.len(), attempt.results.len());
    assert_eq!(found.total_ms, attempt.total_ms);
}

#[tokio::test(start_paused = true)]
async fn cancelled_run_persists_nothing() {
    let clock = MonotonicClock::new();
    let store = MemoryStore::new();
    let history: History<Attempt, _> =
        open_history::<DotProbePlan, _>(&store, HistoryConfig::default());

    let earlier = dot_probe::build_attempt(
        "earlier".into(),
        "2024-01-01T00:00:00Z".into(),
        6,
        1_000,
        Vec::new(),
    );
    history.save(earlier.clone()).unwrap();

    let mut sequencer = DotProbeConfig::default().sequencer(&mut StdRng::seed_from_u64(3), clock);
    let (handle, events) = driver::channel::<Side, _>(clock);
    let canceller = tokio::spawn({
        let handle = handle.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(2_000)).await;
            handle.cancel();
        }
    });

    let outcome = run_session(&mut sequencer, events, &history).await.unwrap();
    let _ = canceller.await;

    assert!(outcome.is_none());
    assert_eq!(sequencer.state(), RunState::Cancelled);
    assert!(sequencer.results().is_empty());
    assert_eq!(history.load(), vec![earlier]);
    assert!(handle.is_closed());
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_cancels() {
    let clock = MonotonicClock::new();
    let mut sequencer = DotProbeConfig::default().sequencer(&mut StdRng::seed_from_u64(4), clock);
    let (handle, events) = driver::channel::<Side, _>(clock);
    drop(handle);

    assert!(driver::drive(&mut sequencer, events).await.is_none());
    assert_eq!(sequencer.state(), RunState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn abandoning_the_driver_future_stops_the_run() {
    let clock = MonotonicClock::new();
    let store = MemoryStore::new();
    let history = open_history::<DotProbePlan, _>(&store, HistoryConfig::default());
    let mut sequencer = DotProbeConfig::default().sequencer(&mut StdRng::seed_from_u64(5), clock);
    let (handle, events) = driver::channel::<Side, _>(clock);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(1_200),
        run_session(&mut sequencer, events, &history),
    )
    .await;
    assert!(abandoned.is_err());

    // The receiver went away with the future; nothing was written.
    assert!(handle.is_closed());
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(history.load().is_empty());
    assert!(!sequencer.state().is_terminal());
}

#[tokio::test(start_paused = true)]
async fn timeout_policy_advances_without_input() {
    let clock = MonotonicClock::new();
    let timing = TimingConfig {
        fixation_ms: 500,
        feedback_ms: None,
        block_break_secs: 0,
        response_timeout_ms: Some(1_000),
    };
    let trials = dot_probe::build_trials(6, &mut StdRng::seed_from_u64(6));
    let mut sequencer = Sequencer::new(DotProbePlan::standard(trials), timing, clock);
    let (_handle, events) = driver::channel::<Side, _>(clock);

    let summary = driver::drive(&mut sequencer, events).await.expect("completes");
    assert_eq!(summary.results.len(), 12);
    assert!(summary.results.iter().all(|r| r.timed_out && !r.correct));
    assert!(summary.results.iter().all(|r| r.picked.is_none()));
}
