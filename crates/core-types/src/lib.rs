use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Stable pseudo-random visitor identifier, immutable for the client lifetime.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page-level context captured once at session bootstrap.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageContext {
    pub url: String,
    pub title: String,
    pub referrer: String,
    pub user_agent: String,
}

/// Well-known event names appended to the data layer.
pub mod events {
    pub const SESSION_START: &str = "session_start";
    pub const PAGE_VIEW: &str = "page_view";
    pub const SCROLL_DEPTH: &str = "scroll_depth";
    pub const NAV_CLICK: &str = "nav_click";
    pub const CTA_CLICK: &str = "cta_click";
    pub const FOOTER_CLICK: &str = "footer_click";
    pub const TAB_CLICK: &str = "tab_click";
    pub const CLICK: &str = "click";
    pub const FORM_START: &str = "form_start";
    pub const FORM_SUBMIT: &str = "form_submit";
    pub const EXIT_INTENT: &str = "exit_intent";
    pub const PAGE_HIDE: &str = "page_hide";
    pub const PAGE_SHOW: &str = "page_show";
}

/// Clock port injected into the session so guards and the scroll debounce
/// stay testable without touching host timers.
///
/// `wall` stamps envelopes; `elapsed` is monotonic time since navigation
/// start and drives debounce deadlines and time-on-page.
pub trait Clock: Send + Sync {
    fn wall(&self) -> DateTime<Utc>;
    fn elapsed(&self) -> Duration;
}

/// Host clock backed by the system time sources.
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn wall(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Deterministic clock for tests and scripted replays.
pub struct ManualClock {
    inner: Mutex<ManualState>,
}

struct ManualState {
    wall: DateTime<Utc>,
    elapsed: Duration,
}

impl ManualClock {
    pub fn starting_at(wall: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ManualState {
                wall,
                elapsed: Duration::ZERO,
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.inner.lock();
        state.elapsed += by;
        state.wall += chrono::Duration::milliseconds(by.as_millis() as i64);
    }
}

impl Clock for ManualClock {
    fn wall(&self) -> DateTime<Utc> {
        self.inner.lock().wall
    }

    fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances_both_time_sources() {
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        clock.advance(Duration::from_millis(1_500));

        assert_eq!(clock.elapsed(), Duration::from_millis(1_500));
        assert_eq!(
            clock.wall(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap() + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn system_clock_elapsed_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(second >= first);
    }
}
