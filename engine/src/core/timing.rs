//! High-resolution timing utilities for task engines.
//!
//! Everything downstream of the sequencer reads time through [`Clock`], so a
//! run can be replayed with a [`ManualClock`] in tests.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in milliseconds, relative to an arbitrary origin.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct InstantStamp(pub f64);

impl InstantStamp {
    pub fn as_ms(self) -> f64 {
        self.0
    }

    /// Whole milliseconds from `earlier` to `self`, never negative.
    pub fn elapsed_since(self, earlier: InstantStamp) -> u64 {
        let delta = self.0 - earlier.0;
        if delta.is_finite() && delta > 0.0 {
            delta.round() as u64
        } else {
            0
        }
    }
}

pub trait Clock {
    fn now(&self) -> InstantStamp;
}

/// Wall-independent clock backed by `tokio::time` on native targets (so paused
/// test runtimes advance it) and `performance.now()` on the web.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> InstantStamp {
        InstantStamp(self.origin.elapsed().as_secs_f64() * 1000.0)
    }

    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> InstantStamp {
        let ms = web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now())
            .unwrap_or(0.0);
        InstantStamp(ms)
    }
}

/// Hand-driven clock for deterministic tests. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> InstantStamp {
        InstantStamp(self.now_ms.get())
    }
}

/// Suspend the current task for `ms` milliseconds.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}
