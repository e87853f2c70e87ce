//! # Runtime Guard
//!
//! Bounds the wall-clock time of a batch. The guard is only consulted between
//! domains: it stops new domains from starting, it cannot interrupt one that is
//! already being scanned.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Within,
    Exceeded { elapsed: Duration },
}

pub struct RuntimeGuard {
    clock: Arc<dyn Clock>,
    started: Instant,
    ceiling: Duration,
}

impl RuntimeGuard {
    /// Starts the clock now.
    pub fn start(clock: Arc<dyn Clock>, ceiling: Duration) -> Self {
        let started = clock.now();
        Self {
            clock,
            started,
            ceiling,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started)
    }

    pub fn remaining(&self) -> Duration {
        self.ceiling.saturating_sub(self.elapsed())
    }

    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// Exceeded once strictly more than the ceiling has elapsed.
    pub fn check(&self) -> GuardStatus {
        let elapsed = self.elapsed();
        if elapsed > self.ceiling {
            GuardStatus::Exceeded { elapsed }
        } else {
            GuardStatus::Within
        }
    }
}
