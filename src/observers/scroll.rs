use std::collections::BTreeSet;
use std::time::Duration;

use crate::debounce::Debouncer;

/// Depth milestones reported once per page load, in percent.
pub const SCROLL_MILESTONES: [u8; 4] = [25, 50, 75, 90];

/// Debounced scroll-depth tracking.
///
/// Raw scroll signals only record the deepest position and restart the
/// debounce window; once the window settles, every milestone reached for
/// the first time is reported in ascending order. Scrolling back up never
/// un-reports a milestone.
pub struct ScrollObserver {
    debounce: Debouncer,
    deepest: u8,
    seen: BTreeSet<u8>,
}

impl ScrollObserver {
    pub fn new(window: Duration) -> Self {
        Self {
            debounce: Debouncer::new(window),
            deepest: 0,
            seen: BTreeSet::new(),
        }
    }

    pub fn on_scroll(&mut self, percent: f64, now: Duration) {
        let depth = percent.clamp(0.0, 100.0) as u8;
        self.deepest = self.deepest.max(depth);
        self.debounce.arm(now);
    }

    /// Milestones newly due at `now`, ascending; empty while the debounce
    /// window is still open.
    pub fn poll(&mut self, now: Duration) -> Vec<u8> {
        if !self.debounce.fire_due(now) {
            return Vec::new();
        }
        let mut due = Vec::new();
        for milestone in SCROLL_MILESTONES {
            if milestone <= self.deepest && self.seen.insert(milestone) {
                due.push(milestone);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn milestones_fire_once_in_ascending_order() {
        let mut scroll = ScrollObserver::new(WINDOW);

        scroll.on_scroll(30.0, at(0));
        scroll.on_scroll(60.0, at(10));
        assert_eq!(scroll.poll(at(50)), Vec::<u8>::new());
        assert_eq!(scroll.poll(at(110)), vec![25, 50]);

        scroll.on_scroll(40.0, at(200));
        assert_eq!(scroll.poll(at(300)), Vec::<u8>::new());

        scroll.on_scroll(95.0, at(400));
        assert_eq!(scroll.poll(at(500)), vec![75, 90]);

        scroll.on_scroll(100.0, at(600));
        assert_eq!(scroll.poll(at(700)), Vec::<u8>::new());
    }

    #[test]
    fn new_scroll_restarts_the_window() {
        let mut scroll = ScrollObserver::new(WINDOW);
        scroll.on_scroll(50.0, at(0));
        scroll.on_scroll(50.0, at(90));

        assert_eq!(scroll.poll(at(100)), Vec::<u8>::new());
        assert_eq!(scroll.poll(at(190)), vec![25, 50]);
    }

    #[test]
    fn shallow_scrolls_report_nothing() {
        let mut scroll = ScrollObserver::new(WINDOW);
        scroll.on_scroll(10.0, at(0));
        assert_eq!(scroll.poll(at(200)), Vec::<u8>::new());
    }
}
