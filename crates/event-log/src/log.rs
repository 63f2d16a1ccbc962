use std::panic;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::model::EventEnvelope;

pub type PostHook = Arc<dyn Fn(&EventEnvelope) + Send + Sync + 'static>;

/// Process-wide append-only event log.
///
/// Initialized empty, never reset for the page's lifetime; entries are
/// never removed or mutated. Downstream consumers observe appends through
/// registered hooks, which run behind a panic guard so a broken consumer
/// cannot disrupt the host page.
#[derive(Default)]
pub struct EventLog {
    entries: RwLock<Vec<EventEnvelope>>,
    hooks: RwLock<Vec<PostHook>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Appends one envelope; the log grows by exactly one entry per call.
    pub fn append(&self, envelope: EventEnvelope) {
        self.entries.write().push(envelope.clone());

        let snapshot: Vec<PostHook> = self.hooks.read().iter().cloned().collect();
        for hook in snapshot {
            if panic::catch_unwind(panic::AssertUnwindSafe(|| (hook)(&envelope))).is_err() {
                warn!("event log post-hook panicked; continuing");
            }
        }
    }

    pub fn register_hook<F>(&self, hook: F)
    where
        F: Fn(&EventEnvelope) + Send + Sync + 'static,
    {
        self.hooks.write().push(Arc::new(hook));
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<EventEnvelope> {
        self.entries.read().clone()
    }

    pub fn tail(&self, limit: usize) -> Vec<EventEnvelope> {
        let entries = self.entries.read();
        let skip = entries.len().saturating_sub(limit);
        entries[skip..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attribution::{AdPlatform, AttributionRecord, TrafficChannel};
    use chrono::Utc;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn envelope(event: &str) -> EventEnvelope {
        EventEnvelope {
            event: event.into(),
            activity_type: event.into(),
            event_id: format!("ev-{event}"),
            tracking_key: "acme".into(),
            env: "prod".into(),
            client_id: "cid_1".into(),
            page_url: String::new(),
            page_title: String::new(),
            referrer: String::new(),
            timestamp: Utc::now(),
            browser: String::new(),
            os: String::new(),
            device: String::new(),
            attribution: AttributionRecord::default(),
            ad: AdPlatform::default(),
            traffic_channel: TrafficChannel::Direct,
            payload: Map::new(),
        }
    }

    #[test]
    fn append_grows_by_exactly_one() {
        let log = EventLog::new();
        assert!(log.is_empty());

        log.append(envelope("page_view"));
        log.append(envelope("scroll_depth"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.tail(1)[0].event, "scroll_depth");
    }

    #[test]
    fn hooks_observe_every_append() {
        let log = EventLog::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        log.register_hook(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        log.append(envelope("a"));
        log.append(envelope("b"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_hook_does_not_poison_the_log() {
        let log = EventLog::new();
        log.register_hook(|_| panic!("consumer bug"));

        log.append(envelope("a"));
        assert_eq!(log.len(), 1);

        log.append(envelope("b"));
        assert_eq!(log.len(), 2);
    }
}
