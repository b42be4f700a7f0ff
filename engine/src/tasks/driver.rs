//! Runs a [`Sequencer`] on the ambient event loop.
//!
//! Timers are detached sleeps that post their token back over a channel, the
//! same chaining the task views use. Every spawned sleep is abortable and the
//! driver aborts whatever is still outstanding when it returns or is dropped.

use std::collections::HashMap;

use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures_util::future::{abortable, AbortHandle};
use futures_util::StreamExt;
use tracing::debug;

use crate::core::platform;
use crate::core::timing::{self, Clock};

use super::sequencer::{Effect, RunEvent, RunSummary, Sequencer, TaskPlan, TimerToken, Transition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverEvent<R> {
    Respond {
        response: R,
        at: timing::InstantStamp,
    },
    Cancel,
}

/// Caller-side half of a run: forwards input into [`drive`].
///
/// Dropping every handle is treated as a cancellation.
pub struct RunHandle<R, C> {
    sender: UnboundedSender<DriverEvent<R>>,
    clock: C,
}

impl<R, C: Clone> Clone for RunHandle<R, C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<R, C: Clock> RunHandle<R, C> {
    /// Post a response stamped with the run clock.
    pub fn respond(&self, response: R) -> bool {
        let at = self.clock.now();
        self.respond_at(response, at)
    }

    pub fn respond_at(&self, response: R, at: timing::InstantStamp) -> bool {
        self.sender
            .unbounded_send(DriverEvent::Respond { response, at })
            .is_ok()
    }

    pub fn cancel(&self) -> bool {
        self.sender.unbounded_send(DriverEvent::Cancel).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half consumed by [`drive`].
pub struct RunEvents<R> {
    receiver: UnboundedReceiver<DriverEvent<R>>,
}

pub fn channel<R, C: Clock>(clock: C) -> (RunHandle<R, C>, RunEvents<R>) {
    let (sender, receiver) = mpsc::unbounded();
    (RunHandle { sender, clock }, RunEvents { receiver })
}

#[derive(Default)]
struct Timers {
    armed: HashMap<TimerToken, AbortHandle>,
}

impl Timers {
    fn arm(&mut self, token: TimerToken, delay_ms: u64, fired: UnboundedSender<TimerToken>) {
        let (sleep, handle) = abortable(async move {
            timing::sleep_ms(delay_ms).await;
            let _ = fired.unbounded_send(token);
        });
        platform::spawn_future(async move {
            let _ = sleep.await;
        });
        self.armed.insert(token, handle);
    }

    fn disarm(&mut self, token: TimerToken) {
        if let Some(handle) = self.armed.remove(&token) {
            handle.abort();
        }
    }

    fn fired(&mut self, token: TimerToken) {
        self.armed.remove(&token);
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.armed.drain() {
            handle.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Drive `sequencer` until it completes or is cancelled.
pub async fn drive<P, C>(
    sequencer: &mut Sequencer<P, C>,
    events: RunEvents<P::Response>,
) -> Option<RunSummary<P::Outcome>>
where
    P: TaskPlan,
    C: Clock,
{
    drive_with(sequencer, events, |_| {}).await
}

/// Like [`drive`], reporting every transition to `observe` before its effects
/// run. Views use this to mirror the current state.
pub async fn drive_with<P, C, F>(
    sequencer: &mut Sequencer<P, C>,
    events: RunEvents<P::Response>,
    mut observe: F,
) -> Option<RunSummary<P::Outcome>>
where
    P: TaskPlan,
    C: Clock,
    F: FnMut(&Transition<P::Outcome>),
{
    let (fired_tx, mut fired_rx) = mpsc::unbounded::<TimerToken>();
    let mut input = events.receiver;
    let mut timers = Timers::default();

    let mut next = Some(RunEvent::Start);
    loop {
        let event = match next.take() {
            Some(event) => event,
            None => futures_util::select_biased! {
                user = input.next() => match user {
                    Some(DriverEvent::Respond { response, at }) => {
                        RunEvent::Respond { response, at }
                    }
                    Some(DriverEvent::Cancel) | None => RunEvent::Cancel,
                },
                token = fired_rx.next() => match token {
                    Some(token) => {
                        timers.fired(token);
                        RunEvent::TimerFired(token)
                    }
                    None => continue,
                },
            },
        };

        let transition = sequencer.tick(event);
        observe(&transition);

        for effect in transition.effects {
            match effect {
                Effect::ScheduleTimer { token, delay_ms } => {
                    timers.arm(token, delay_ms, fired_tx.clone());
                }
                Effect::CancelTimer(token) => timers.disarm(token),
                Effect::EmitResult(_) => {}
                Effect::Completed(summary) => {
                    timers.abort_all();
                    return Some(summary);
                }
            }
        }

        if transition.state.is_terminal() {
            debug!(state = ?transition.state, outstanding = timers.armed.len(), "driver stopping");
            timers.abort_all();
            return None;
        }
    }
}
