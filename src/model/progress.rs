//! Synthetic Progress
//!
//! The sort service reports no incremental progress, so the indicator is
//! synthesized here. While running it creeps upward in random steps but stays
//! at or below `RUNNING_CAP`; only a settled job moves it to 100.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::timer::{Interval, Timeout};

/// Value shown as soon as a job starts
pub const START_VALUE: u8 = 5;

/// Highest value reachable before the real result arrives
pub const RUNNING_CAP: u8 = 92;

/// Value after a successful settlement
pub const COMPLETE_VALUE: u8 = 100;

/// Time between synthetic increments
pub const TICK_INTERVAL: Duration = Duration::from_millis(350);

/// How long a settled value stays visible before resetting to 0
pub const RESET_DELAY: Duration = Duration::from_millis(1200);

/// Half-open range of each random increment
const JUMP_MIN: u8 = 1;
const JUMP_MAX: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressPhase {
    Idle,
    Running,
    Settled,
}

#[derive(Clone, Debug)]
pub struct ProgressSimulator {
    value: u8,
    phase: ProgressPhase,
    tick: Interval,
    reset: Timeout,
    rng: StdRng,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Build with a caller-supplied RNG (deterministic tests)
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            value: 0,
            phase: ProgressPhase::Idle,
            tick: Interval::new(TICK_INTERVAL),
            reset: Timeout::new(),
            rng,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn phase(&self) -> ProgressPhase {
        self.phase
    }

    /// Whether the tick timer is live
    pub fn is_ticking(&self) -> bool {
        self.tick.is_running()
    }

    pub fn reset_pending(&self) -> bool {
        self.reset.is_armed()
    }

    /// Begin a run. Replaces any live tick timer and any pending reset.
    pub fn start(&mut self, now: Instant) {
        self.tick.cancel();
        self.reset.cancel();
        self.value = START_VALUE;
        self.phase = ProgressPhase::Running;
        self.tick.start(now);
    }

    pub fn succeed(&mut self) {
        self.tick.cancel();
        self.value = COMPLETE_VALUE;
        self.phase = ProgressPhase::Settled;
    }

    pub fn fail(&mut self) {
        self.tick.cancel();
        self.value = 0;
        self.phase = ProgressPhase::Settled;
    }

    /// Schedule the return to 0 after the settled value has been visible for `delay`
    pub fn settle_and_reset(&mut self, now: Instant, delay: Duration) {
        self.tick.cancel();
        self.reset.arm(now, delay);
    }

    /// Immediate return to idle (selection changed)
    pub fn reset(&mut self) {
        self.tick.cancel();
        self.reset.cancel();
        self.value = 0;
        self.phase = ProgressPhase::Idle;
    }

    /// Drive the timers. Returns true if the value changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.value;

        if self.reset.fire(now) {
            self.value = 0;
            self.phase = ProgressPhase::Idle;
        }

        for _ in 0..self.tick.poll(now) {
            self.advance();
        }

        self.value != before
    }

    /// Cancel every timer (teardown)
    pub fn shutdown(&mut self) {
        self.tick.cancel();
        self.reset.cancel();
    }

    fn advance(&mut self) {
        if self.value >= RUNNING_CAP {
            return;
        }
        let jump = self.rng.gen_range(JUMP_MIN..JUMP_MAX);
        self.value = self.value.saturating_add(jump).min(RUNNING_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> ProgressSimulator {
        ProgressSimulator::with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_new_simulator_is_idle() {
        let sim = seeded();
        assert_eq!(sim.value(), 0);
        assert_eq!(sim.phase(), ProgressPhase::Idle);
        assert!(!sim.is_ticking());
    }

    #[test]
    fn test_start_sets_initial_value() {
        let now = Instant::now();
        let mut sim = seeded();
        sim.start(now);

        assert_eq!(sim.value(), START_VALUE);
        assert_eq!(sim.phase(), ProgressPhase::Running);
        assert!(sim.is_ticking());
    }

    #[test]
    fn test_running_value_is_monotonic_and_capped() {
        let start = Instant::now();
        let mut sim = seeded();
        sim.start(start);

        let mut previous = sim.value();
        for step in 1..400u32 {
            sim.tick(start + TICK_INTERVAL * step);
            let value = sim.value();
            assert!(value >= previous, "value went backwards: {} -> {}", previous, value);
            assert!(value <= RUNNING_CAP, "value exceeded cap: {}", value);
            previous = value;
        }
        assert_eq!(sim.value(), RUNNING_CAP);
    }

    #[test]
    fn test_each_tick_jumps_between_one_and_four() {
        let start = Instant::now();
        let mut sim = seeded();
        sim.start(start);

        for step in 1..10u32 {
            let before = sim.value();
            sim.tick(start + TICK_INTERVAL * step);
            let jump = sim.value() - before;
            assert!((1..=4).contains(&jump), "unexpected jump {}", jump);
        }
    }

    #[test]
    fn test_no_tick_before_interval() {
        let start = Instant::now();
        let mut sim = seeded();
        sim.start(start);

        assert!(!sim.tick(start + Duration::from_millis(349)));
        assert_eq!(sim.value(), START_VALUE);
    }

    #[test]
    fn test_restart_replaces_timer() {
        let start = Instant::now();
        let mut sim = seeded();
        sim.start(start);
        sim.tick(start + TICK_INTERVAL * 3);
        assert!(sim.value() > START_VALUE);

        let restart = start + TICK_INTERVAL * 3;
        sim.start(restart);
        assert_eq!(sim.value(), START_VALUE);

        // One timer: exactly one tick one period after the restart
        sim.tick(restart + TICK_INTERVAL);
        assert!(sim.value() <= START_VALUE + 4);
    }

    #[test]
    fn test_succeed_jumps_to_complete() {
        let now = Instant::now();
        let mut sim = seeded();
        sim.start(now);
        sim.succeed();

        assert_eq!(sim.value(), COMPLETE_VALUE);
        assert!(!sim.is_ticking());

        // Stopped timer cannot nudge the value afterwards
        sim.tick(now + Duration::from_secs(10));
        assert_eq!(sim.value(), COMPLETE_VALUE);
    }

    #[test]
    fn test_fail_drops_to_zero() {
        let now = Instant::now();
        let mut sim = seeded();
        sim.start(now);
        sim.tick(now + TICK_INTERVAL * 4);
        sim.fail();

        assert_eq!(sim.value(), 0);
        assert!(!sim.is_ticking());
    }

    #[test]
    fn test_settle_and_reset_after_delay() {
        let now = Instant::now();
        let mut sim = seeded();
        sim.start(now);
        sim.succeed();
        sim.settle_and_reset(now, RESET_DELAY);

        sim.tick(now + Duration::from_millis(1199));
        assert_eq!(sim.value(), COMPLETE_VALUE);

        sim.tick(now + RESET_DELAY);
        assert_eq!(sim.value(), 0);
        assert_eq!(sim.phase(), ProgressPhase::Idle);
    }

    #[test]
    fn test_start_cancels_pending_reset() {
        let now = Instant::now();
        let mut sim = seeded();
        sim.start(now);
        sim.succeed();
        sim.settle_and_reset(now, RESET_DELAY);

        let second = now + Duration::from_millis(500);
        sim.start(second);
        sim.tick(now + RESET_DELAY);

        assert_eq!(sim.phase(), ProgressPhase::Running);
        assert!(sim.value() >= START_VALUE);
    }

    #[test]
    fn test_shutdown_cancels_all_timers() {
        let now = Instant::now();
        let mut sim = seeded();
        sim.start(now);
        sim.settle_and_reset(now, RESET_DELAY);
        sim.shutdown();

        assert!(!sim.is_ticking());
        assert!(!sim.reset_pending());
    }
}
