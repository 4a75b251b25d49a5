//! Cancellable single-shot delayed action.
//!
//! [`SettleTimer`] holds at most one pending value. Every [`arm`] replaces
//! it and every [`cancel`] drops it; both bump a generation counter so a
//! token from an earlier arm can never fire.
//!
//! The timer does not own a clock. Hosts pass monotonic time as a
//! [`Duration`] since any fixed epoch, which also works on targets without
//! `std::time::Instant`.
//!
//! [`arm`]: SettleTimer::arm
//! [`cancel`]: SettleTimer::cancel

use std::time::Duration;

/// Token identifying one arm of a [`SettleTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Generation {
    fn from(value: u64) -> Self {
        Generation(value)
    }
}

#[derive(Debug, Clone)]
struct Armed<T> {
    generation: u64,
    deadline: Duration,
    value: T,
}

/// Arm/cancel/fire state machine with a quiet-period deadline.
#[derive(Debug, Clone)]
pub struct SettleTimer<T> {
    window: Duration,
    generation: u64,
    armed: Option<Armed<T>>,
}

impl<T> SettleTimer<T> {
    /// A disarmed timer that settles after `window` of quiet.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            armed: None,
        }
    }

    /// Settle window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending value with `value`, due at `now + window`.
    pub fn arm(&mut self, value: T, now: Duration) -> Generation {
        self.generation += 1;
        self.armed = Some(Armed {
            generation: self.generation,
            deadline: now.saturating_add(self.window),
            value,
        });
        Generation(self.generation)
    }

    /// Drop the pending value. Outstanding tokens become stale.
    pub fn cancel(&mut self) -> Option<T> {
        self.generation += 1;
        self.armed.take().map(|a| a.value)
    }

    /// Take the pending value if `generation` is the latest arm.
    pub fn fire(&mut self, generation: Generation) -> Option<T> {
        let current = self.armed.as_ref().is_some_and(|a| a.generation == generation.0);
        if current {
            self.armed.take().map(|a| a.value)
        } else {
            None
        }
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let due = self.armed.as_ref().is_some_and(|a| now >= a.deadline);
        if due {
            self.armed.take().map(|a| a.value)
        } else {
            None
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Duration> {
        self.armed.as_ref().map(|a| a.deadline)
    }

    /// Token of the pending arm.
    pub fn generation(&self) -> Option<Generation> {
        self.armed.as_ref().map(|a| Generation(a.generation))
    }

    pub fn pending(&self) -> Option<&T> {
        self.armed.as_ref().map(|a| &a.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_poll_fires_after_window() {
        let mut timer = SettleTimer::new(WINDOW);
        timer.arm("a", ms(100));
        assert_eq!(timer.deadline(), Some(ms(600)));
        assert_eq!(timer.poll(ms(599)), None);
        assert_eq!(timer.poll(ms(600)), Some("a"));
        assert!(!timer.is_armed());
        assert_eq!(timer.poll(ms(2000)), None, "single-shot");
    }

    #[test]
    fn test_rearm_resets_deadline_and_value() {
        let mut timer = SettleTimer::new(WINDOW);
        timer.arm(1, ms(0));
        timer.arm(2, ms(400));
        assert_eq!(timer.poll(ms(500)), None);
        assert_eq!(timer.pending(), Some(&2));
        assert_eq!(timer.poll(ms(900)), Some(2));
    }

    #[test]
    fn test_stale_generation_never_fires() {
        let mut timer = SettleTimer::new(WINDOW);
        let first = timer.arm(1, ms(0));
        let second = timer.arm(2, ms(10));
        assert_ne!(first, second);
        assert_eq!(timer.fire(first), None);
        assert_eq!(timer.generation(), Some(second));
        assert_eq!(timer.fire(second), Some(2));
        assert_eq!(timer.fire(second), None, "single-shot");
    }

    #[test]
    fn test_fire_after_cancel_is_rejected() {
        let mut timer = SettleTimer::new(WINDOW);
        let token = timer.arm(1, ms(0));
        assert_eq!(timer.cancel(), Some(1));
        assert_eq!(timer.fire(token), None);
        assert_eq!(timer.poll(ms(10_000)), None);
    }

    #[test]
    fn test_cancel_then_arm_gets_fresh_generation() {
        let mut timer = SettleTimer::new(WINDOW);
        let old = timer.arm(1, ms(0));
        timer.cancel();
        let new = timer.arm(2, ms(0));
        assert!(new > old);
        assert_eq!(timer.fire(old), None);
        assert_eq!(timer.fire(new), Some(2));
    }

    #[test]
    fn test_zero_window_is_due_immediately() {
        let mut timer = SettleTimer::new(Duration::ZERO);
        timer.arm((), ms(5));
        assert_eq!(timer.poll(ms(5)), Some(()));
    }
}
