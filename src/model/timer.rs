//! Owned timer handles
//!
//! Timers are deadlines polled by the event loop (see `SortWorkflow::tick`).
//! Each handle belongs to exactly one owner; cancelling clears the deadline,
//! so nothing can fire after its owner is shut down.

use std::time::{Duration, Instant};

/// One-shot deadline (notification dismissal, progress reset)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timeout, replacing any pending deadline
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the deadline has passed, disarming the handle
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Repeating timer (progress ticks)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        debug_assert!(!period.is_zero(), "interval period must be non-zero");
        Self { period, next: None }
    }

    /// Start (or restart) the interval; the first tick is one period from `now`
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Count the ticks that elapsed up to `now` and advance the schedule past them
    ///
    /// A stalled event loop gets every missed tick delivered at once.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        if self.period.is_zero() {
            return 0;
        }

        let mut ticks = 0;
        while now >= next {
            ticks += 1;
            next += self.period;
        }
        self.next = Some(next);
        ticks
    }
}
