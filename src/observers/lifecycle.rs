use std::time::Duration;

use serde_json::{Map, Value};
use tracker_core_types::events;

/// Visibility and exit-intent signals. Visibility changes always report;
/// exit intent fires at most once per page load, when the pointer leaves
/// the viewport through the top edge.
#[derive(Debug, Default)]
pub struct LifecycleObserver {
    exit_fired: bool,
}

impl LifecycleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility_event(hidden: bool) -> &'static str {
        if hidden {
            events::PAGE_HIDE
        } else {
            events::PAGE_SHOW
        }
    }

    /// Payload for `exit_intent`, carrying whole seconds on page since
    /// navigation start.
    pub fn on_pointer_leave(
        &mut self,
        client_y: f64,
        time_on_page: Duration,
    ) -> Option<Map<String, Value>> {
        if self.exit_fired || client_y > 0.0 {
            return None;
        }
        self.exit_fired = true;
        let mut payload = Map::new();
        payload.insert(
            "time_on_page".into(),
            Value::Number(time_on_page.as_secs().into()),
        );
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_intent_requires_the_top_edge_and_fires_once() {
        let mut lifecycle = LifecycleObserver::new();

        assert!(lifecycle
            .on_pointer_leave(240.0, Duration::from_secs(3))
            .is_none());

        let payload = lifecycle
            .on_pointer_leave(0.0, Duration::from_secs(12))
            .expect("top-edge exit");
        assert_eq!(payload["time_on_page"], 12);

        assert!(lifecycle
            .on_pointer_leave(-5.0, Duration::from_secs(20))
            .is_none());
    }

    #[test]
    fn visibility_maps_to_hide_and_show() {
        assert_eq!(LifecycleObserver::visibility_event(true), "page_hide");
        assert_eq!(LifecycleObserver::visibility_event(false), "page_show");
    }
}
