use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

use client_tracker::{
    CookieJar, EventLog, ManualClock, MemoryStore, PageContext, TrackerConfig, TrackerHost,
    TrackerSession,
};

fn session_on(log: Arc<EventLog>) -> TrackerSession {
    TrackerSession::bootstrap(
        TrackerConfig {
            tracking_key: "acme".to_owned(),
            env: "staging".to_owned(),
            debug: false,
        },
        TrackerHost {
            page: PageContext {
                url: "https://example.com/pricing?utm_source=x&fbclid=f-1".to_owned(),
                title: "Pricing".to_owned(),
                referrer: "https://news.example.org/".to_owned(),
                user_agent: String::new(),
            },
            cookies: CookieJar::empty(),
            durable: MemoryStore::shared(),
            session: MemoryStore::shared(),
            log,
            clock: Arc::new(ManualClock::starting_at(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )),
        },
    )
}

#[test]
fn data_layer_objects_are_flat_and_payload_wins() {
    let log = EventLog::new();
    let session = session_on(log.clone());

    let mut payload = Map::new();
    payload.insert("page_title".into(), Value::String("override".into()));
    payload.insert("plan".into(), Value::String("team".into()));
    session.emit_custom("plan_selected", payload);

    let flat = log.tail(1)[0].to_data_layer();
    assert_eq!(flat["event"], "plan_selected");
    assert_eq!(flat["tracking_key"], "acme");
    assert_eq!(flat["env"], "staging");
    assert_eq!(flat["utm_source"], "x");
    assert_eq!(flat["ad_platform"], "Facebook/Instagram");
    assert_eq!(flat["ad_click_id"], "f-1");
    assert_eq!(flat["plan"], "team");
    // Payload keys win over envelope fields on collision.
    assert_eq!(flat["page_title"], "override");
}

#[test]
fn downstream_hooks_observe_appends_in_order() {
    let log = EventLog::new();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    log.register_hook(move |envelope| {
        assert!(!envelope.event.is_empty());
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let session = session_on(log.clone());
    session.page_view();
    session.on_frame_message(&json!({"event": "video_play", "video_id": "v-9"}));

    // session_start, page_view, video_play
    assert_eq!(log.len(), 3);
    assert_eq!(seen.load(Ordering::SeqCst), 3);

    let names: Vec<String> = log
        .snapshot()
        .iter()
        .map(|envelope| envelope.event.clone())
        .collect();
    assert_eq!(names, vec!["session_start", "page_view", "video_play"]);
}
