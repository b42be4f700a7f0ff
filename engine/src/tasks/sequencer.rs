//! Trial-run state machine shared by every task.
//!
//! A run walks `Fixation → Stimulus → Feedback? → BlockBreak? → …` until the
//! plan is exhausted. The machine never sleeps: each [`Sequencer::tick`]
//! consumes one [`RunEvent`] and answers with the next [`RunState`] plus the
//! [`Effect`]s the caller must carry out (arm or cancel a timer, forward a
//! result, hand over the finished run). The async driver in
//! [`super::driver`] executes those effects; tests execute them by hand.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::timing::{Clock, InstantStamp};

/// Task descriptor: the ordered trial slots, their block labels and the
/// correctness rule.
pub trait TaskPlan {
    /// Block/phase label. A change between adjacent slots inserts a break.
    type Block: Copy + Eq + fmt::Debug;
    type Response: Copy + fmt::Debug;
    type Outcome: Clone + fmt::Debug;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn block(&self, index: usize) -> Self::Block;

    /// Build the result for slot `index`. `response` is `None` on timeout.
    fn resolve(
        &self,
        index: usize,
        response: Option<Self::Response>,
        window: ResponseWindow,
    ) -> Self::Outcome;
}

/// Fixed per-task delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub fixation_ms: u64,
    /// Post-response pause with input locked. `None` skips the feedback state.
    pub feedback_ms: Option<u64>,
    /// Countdown length between blocks, decremented once per second.
    pub block_break_secs: u32,
    /// Auto-advance after this long without a response. Off unless set.
    pub response_timeout_ms: Option<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixation_ms: 500,
            feedback_ms: None,
            block_break_secs: 3,
            response_timeout_ms: None,
        }
    }
}

/// Timing facts handed to [`TaskPlan::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseWindow {
    pub shown_at: InstantStamp,
    pub responded_at: InstantStamp,
    pub rt_ms: u64,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Fixation,
    ResponseTimeout,
    Feedback,
    BreakTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub id: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Idle,
    Fixation {
        index: usize,
    },
    Stimulus {
        index: usize,
        shown_at: InstantStamp,
    },
    Feedback {
        index: usize,
    },
    BlockBreak {
        next_index: usize,
        remaining_secs: u32,
    },
    Done,
    Cancelled,
}

impl RunState {
    pub fn accepts_input(&self) -> bool {
        matches!(self, RunState::Stimulus { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Cancelled)
    }

    /// Slot currently on screen, if any.
    pub fn trial_index(&self) -> Option<usize> {
        match *self {
            RunState::Fixation { index }
            | RunState::Stimulus { index, .. }
            | RunState::Feedback { index } => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent<R> {
    Start,
    TimerFired(TimerToken),
    Respond { response: R, at: InstantStamp },
    Cancel,
}

/// Everything the scoring side needs from a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary<O> {
    pub total_elapsed_ms: u64,
    pub block_breaks: usize,
    pub results: Vec<O>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect<O> {
    ScheduleTimer { token: TimerToken, delay_ms: u64 },
    CancelTimer(TimerToken),
    EmitResult(O),
    Completed(RunSummary<O>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    pub state: RunState,
    pub effects: Vec<Effect<O>>,
}

pub struct Sequencer<P: TaskPlan, C> {
    plan: P,
    timing: TimingConfig,
    clock: C,
    state: RunState,
    results: Vec<P::Outcome>,
    started_at: Option<InstantStamp>,
    last_response_at: Option<InstantStamp>,
    pending: Option<TimerToken>,
    next_timer_id: u64,
    last_break_boundary: Option<usize>,
    block_breaks: usize,
}

impl<P: TaskPlan, C: Clock> Sequencer<P, C> {
    pub fn new(plan: P, timing: TimingConfig, clock: C) -> Self {
        Self {
            plan,
            timing,
            clock,
            state: RunState::Idle,
            results: Vec::new(),
            started_at: None,
            last_response_at: None,
            pending: None,
            next_timer_id: 0,
            last_break_boundary: None,
            block_breaks: 0,
        }
    }

    pub fn plan(&self) -> &P {
        &self.plan
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn results(&self) -> &[P::Outcome] {
        &self.results
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The timer the machine is currently waiting on.
    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.pending
    }

    pub fn block_breaks(&self) -> usize {
        self.block_breaks
    }

    pub fn tick(&mut self, event: RunEvent<P::Response>) -> Transition<P::Outcome> {
        let mut effects = Vec::new();
        match event {
            RunEvent::Start => self.on_start(&mut effects),
            RunEvent::TimerFired(token) => self.on_timer(token, &mut effects),
            RunEvent::Respond { response, at } => self.on_response(response, at, &mut effects),
            RunEvent::Cancel => self.on_cancel(&mut effects),
        }
        Transition {
            state: self.state,
            effects,
        }
    }

    fn on_start(&mut self, effects: &mut Vec<Effect<P::Outcome>>) {
        if self.state != RunState::Idle {
            debug!(state = ?self.state, "start ignored; run already begun");
            return;
        }
        self.started_at = Some(self.clock.now());
        info!(slots = self.plan.len(), "run started");
        if self.plan.is_empty() {
            self.finish(effects);
        } else {
            self.enter_fixation(0, effects);
        }
    }

    fn on_timer(&mut self, token: TimerToken, effects: &mut Vec<Effect<P::Outcome>>) {
        if self.pending != Some(token) {
            debug!(?token, pending = ?self.pending, "stale timer ignored");
            return;
        }
        self.pending = None;

        match (self.state, token.kind) {
            (RunState::Fixation { index }, TimerKind::Fixation) => {
                let shown_at = self.clock.now();
                self.state = RunState::Stimulus { index, shown_at };
                if let Some(timeout_ms) = self.timing.response_timeout_ms {
                    self.schedule(TimerKind::ResponseTimeout, timeout_ms, effects);
                }
            }
            (RunState::Stimulus { index, shown_at }, TimerKind::ResponseTimeout) => {
                let now = self.clock.now();
                let window = ResponseWindow {
                    shown_at,
                    responded_at: now,
                    rt_ms: now.elapsed_since(shown_at),
                    timed_out: true,
                };
                debug!(index, "response window expired");
                self.record(index, None, window, effects);
            }
            (RunState::Feedback { index }, TimerKind::Feedback) => {
                self.advance(index, effects);
            }
            (
                RunState::BlockBreak {
                    next_index,
                    remaining_secs,
                },
                TimerKind::BreakTick,
            ) => {
                let remaining_secs = remaining_secs.saturating_sub(1);
                if remaining_secs == 0 {
                    self.enter_fixation(next_index, effects);
                } else {
                    self.state = RunState::BlockBreak {
                        next_index,
                        remaining_secs,
                    };
                    self.schedule(TimerKind::BreakTick, 1_000, effects);
                }
            }
            (state, kind) => {
                debug!(?state, ?kind, "timer did not match state");
            }
        }
    }

    fn on_response(
        &mut self,
        response: P::Response,
        at: InstantStamp,
        effects: &mut Vec<Effect<P::Outcome>>,
    ) {
        let RunState::Stimulus { index, shown_at } = self.state else {
            debug!(state = ?self.state, ?response, "response outside stimulus ignored");
            return;
        };

        if let Some(token) = self.pending.take() {
            effects.push(Effect::CancelTimer(token));
        }

        let window = ResponseWindow {
            shown_at,
            responded_at: at,
            rt_ms: at.elapsed_since(shown_at),
            timed_out: false,
        };
        self.record(index, Some(response), window, effects);
    }

    fn on_cancel(&mut self, effects: &mut Vec<Effect<P::Outcome>>) {
        if self.state.is_terminal() {
            return;
        }
        if let Some(token) = self.pending.take() {
            effects.push(Effect::CancelTimer(token));
        }
        info!(recorded = self.results.len(), "run cancelled");
        self.state = RunState::Cancelled;
        self.results.clear();
    }

    fn record(
        &mut self,
        index: usize,
        response: Option<P::Response>,
        window: ResponseWindow,
        effects: &mut Vec<Effect<P::Outcome>>,
    ) {
        let outcome = self.plan.resolve(index, response, window);
        debug!(index, rt_ms = window.rt_ms, timed_out = window.timed_out, "trial recorded");
        self.results.push(outcome.clone());
        self.last_response_at = Some(window.responded_at);
        effects.push(Effect::EmitResult(outcome));

        match self.timing.feedback_ms {
            Some(feedback_ms) => {
                self.state = RunState::Feedback { index };
                self.schedule(TimerKind::Feedback, feedback_ms, effects);
            }
            None => self.advance(index, effects),
        }
    }

    fn advance(&mut self, index: usize, effects: &mut Vec<Effect<P::Outcome>>) {
        let next = index + 1;
        if next >= self.plan.len() {
            self.finish(effects);
            return;
        }

        let crosses_boundary = self.plan.block(index) != self.plan.block(next);
        if crosses_boundary && self.last_break_boundary != Some(next) {
            self.last_break_boundary = Some(next);
            self.block_breaks += 1;
            info!(
                from = ?self.plan.block(index),
                to = ?self.plan.block(next),
                "block break"
            );
            if self.timing.block_break_secs > 0 {
                self.state = RunState::BlockBreak {
                    next_index: next,
                    remaining_secs: self.timing.block_break_secs,
                };
                self.schedule(TimerKind::BreakTick, 1_000, effects);
                return;
            }
        }

        self.enter_fixation(next, effects);
    }

    fn enter_fixation(&mut self, index: usize, effects: &mut Vec<Effect<P::Outcome>>) {
        self.state = RunState::Fixation { index };
        self.schedule(TimerKind::Fixation, self.timing.fixation_ms, effects);
    }

    fn finish(&mut self, effects: &mut Vec<Effect<P::Outcome>>) {
        let started_at = self.started_at.unwrap_or_else(|| self.clock.now());
        let ended_at = self.last_response_at.unwrap_or_else(|| self.clock.now());
        let summary = RunSummary {
            total_elapsed_ms: ended_at.elapsed_since(started_at),
            block_breaks: self.block_breaks,
            results: self.results.clone(),
        };
        info!(
            trials = summary.results.len(),
            total_ms = summary.total_elapsed_ms,
            "run completed"
        );
        self.state = RunState::Done;
        effects.push(Effect::Completed(summary));
    }

    fn schedule(&mut self, kind: TimerKind, delay_ms: u64, effects: &mut Vec<Effect<P::Outcome>>) {
        self.next_timer_id += 1;
        let token = TimerToken {
            id: self.next_timer_id,
            kind,
        };
        self.pending = Some(token);
        effects.push(Effect::ScheduleTimer { token, delay_ms });
    }
}
