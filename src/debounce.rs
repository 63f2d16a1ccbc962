//! Deadline-based debounce with restart-on-trigger semantics.

use std::time::Duration;

/// Cancellable deferred action driven by an injected monotonic clock.
///
/// `arm` discards any pending deadline and reschedules it one window
/// ahead; `fire_due` consumes the deadline once it has passed. This is
/// the only timing logic in the tracker.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Duration) {
        self.deadline = Some(now + self.window);
    }

    /// Returns true exactly once per elapsed deadline.
    pub fn fire_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_after_the_window() {
        let mut debounce = Debouncer::new(MS * 100);
        debounce.arm(Duration::ZERO);

        assert!(!debounce.fire_due(MS * 50));
        assert!(debounce.fire_due(MS * 100));
        assert!(!debounce.fire_due(MS * 200));
    }

    #[test]
    fn rearming_restarts_the_window() {
        let mut debounce = Debouncer::new(MS * 100);
        debounce.arm(Duration::ZERO);
        debounce.arm(MS * 80);

        assert!(!debounce.fire_due(MS * 100));
        assert!(debounce.fire_due(MS * 180));
    }

    #[test]
    fn cancel_discards_the_deadline() {
        let mut debounce = Debouncer::new(MS * 100);
        debounce.arm(Duration::ZERO);
        debounce.cancel();

        assert!(!debounce.is_pending());
        assert!(!debounce.fire_due(MS * 500));
    }
}
