//! Cancellable periodic tick task.
//!
//! The owner polls `due(now)` from its event loop; time is always passed in,
//! so tests drive the clock directly.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct TickTask {
    next_due: Instant,
}

/// Holds at most one scheduled task.
#[derive(Debug, Clone)]
pub struct TickTimer {
    period: Duration,
    task: Option<TickTask>,
}

impl TickTimer {
    /// Panics on a zero period.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "timer period must be > 0");
        Self { period, task: None }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Schedule a fresh task; any previous task is cancelled first.
    pub fn start(&mut self, now: Instant) {
        self.cancel();
        self.task = Some(TickTask {
            next_due: now + self.period,
        });
    }

    /// Drop the pending task. Safe with nothing scheduled.
    pub fn cancel(&mut self) {
        self.task = None;
    }

    /// Whole periods elapsed up to `now` that have not been reported yet.
    pub fn due(&mut self, now: Instant) -> u32 {
        let period = self.period;
        let Some(task) = self.task.as_mut() else {
            return 0;
        };
        let mut n = 0u32;
        while task.next_due <= now {
            task.next_due += period;
            n = n.saturating_add(1);
        }
        n
    }

    /// Time left until the next tick, if a task is scheduled.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.task
            .map(|t| t.next_due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn idle_timer_reports_nothing() {
        let mut t = TickTimer::new(SEC);
        let now = Instant::now();
        assert_eq!(t.due(now + SEC * 10), 0);
        assert!(t.until_next(now).is_none());
    }

    #[test]
    fn counts_whole_periods_once() {
        let mut t = TickTimer::new(SEC);
        let t0 = Instant::now();
        t.start(t0);
        assert_eq!(t.due(t0 + Duration::from_millis(999)), 0);
        assert_eq!(t.due(t0 + SEC), 1);
        assert_eq!(t.due(t0 + SEC), 0);
        assert_eq!(t.due(t0 + Duration::from_millis(3_500)), 2);
        assert_eq!(t.until_next(t0 + Duration::from_millis(3_500)), Some(Duration::from_millis(500)));
    }

    #[test]
    fn cancel_stops_ticks_and_is_idempotent() {
        let mut t = TickTimer::new(SEC);
        let t0 = Instant::now();
        t.cancel();
        t.start(t0);
        t.cancel();
        t.cancel();
        assert!(!t.is_running());
        assert_eq!(t.due(t0 + SEC * 5), 0);
    }

    #[test]
    fn restart_replaces_previous_task() {
        let mut t = TickTimer::new(SEC);
        let t0 = Instant::now();
        t.start(t0);
        t.start(t0 + Duration::from_millis(600));
        assert_eq!(t.due(t0 + SEC), 0);
        assert_eq!(t.due(t0 + Duration::from_millis(1_600)), 1);
    }

    #[test]
    #[should_panic(expected = "period")]
    fn zero_period_rejected() {
        let _ = TickTimer::new(Duration::ZERO);
    }
}
