//! Tracker session: one per page load, owning all observer guard state.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

use attribution::{classify_ad_platform, resolve_with_referrer, traffic_channel};
use attribution::{AdPlatform, AttributionRecord};
use client_identity::get_or_create_client_id;
use client_storage::{CookieJar, KeyValueStore};
use tracker_core_types::{events, ClientId, Clock, PageContext};
use tracker_event_log::EventLog;

use crate::config::TrackerConfig;
use crate::emitter::EventEmitter;
use crate::environment;
use crate::observers::click::{classify_click, click_payload, ClickTarget};
use crate::observers::form::{FormMeta, FormObserver};
use crate::observers::frame::interpret_message;
use crate::observers::lifecycle::LifecycleObserver;
use crate::observers::scroll::ScrollObserver;

/// Scroll debounce window: a new scroll signal within this window
/// discards the pending evaluation and reschedules it.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);

/// Host bindings captured once at session bootstrap.
pub struct TrackerHost {
    pub page: PageContext,
    pub cookies: CookieJar,
    pub durable: Arc<dyn KeyValueStore>,
    pub session: Arc<dyn KeyValueStore>,
    pub log: Arc<EventLog>,
    pub clock: Arc<dyn Clock>,
}

/// One tracker session per page load.
///
/// Identity and attribution are resolved once at bootstrap and cached for
/// the page's lifetime; observers hand their payloads to the emitter,
/// which owns the session-start gate. All methods take `&self` so a
/// shared handle can serve independent host callbacks; callbacks run to
/// completion, so the inner locks are never contended in the host.
pub struct TrackerSession {
    emitter: EventEmitter,
    clock: Arc<dyn Clock>,
    scroll: Mutex<ScrollObserver>,
    form: Mutex<FormObserver>,
    lifecycle: Mutex<LifecycleObserver>,
}

impl TrackerSession {
    pub fn bootstrap(config: TrackerConfig, host: TrackerHost) -> Self {
        let client_id = get_or_create_client_id(&host.cookies, host.durable.as_ref(), host.clock.as_ref());
        let attribution =
            resolve_with_referrer(&host.page.url, &host.page.referrer, host.session.as_ref());
        let ad = classify_ad_platform(&attribution);
        let channel = traffic_channel(&attribution, &host.page.referrer);
        let env_info = environment::detect(&host.page.user_agent);

        if config.debug {
            debug!(
                client_id = %client_id,
                channel = channel.as_str(),
                url = %host.page.url,
                "tracker session bootstrapped"
            );
        }

        let emitter = EventEmitter::new(
            config,
            client_id,
            attribution,
            ad,
            channel,
            env_info,
            host.page,
            host.log,
            host.session,
            host.clock.clone(),
        );

        Self {
            emitter,
            clock: host.clock,
            scroll: Mutex::new(ScrollObserver::new(SCROLL_DEBOUNCE)),
            form: Mutex::new(FormObserver::new()),
            lifecycle: Mutex::new(LifecycleObserver::new()),
        }
    }

    /// Fires on every page load.
    pub fn page_view(&self) {
        self.emitter.emit(events::PAGE_VIEW, Map::new());
    }

    pub fn on_scroll(&self, percent: f64) {
        let now = self.clock.elapsed();
        self.scroll.lock().on_scroll(percent, now);
    }

    /// Flushes the scroll debounce; each due milestone emits one
    /// `scroll_depth` event, in ascending order.
    pub fn poll(&self) {
        let now = self.clock.elapsed();
        let due = self.scroll.lock().poll(now);
        for milestone in due {
            let mut payload = Map::new();
            payload.insert("percent_scrolled".into(), Value::Number(milestone.into()));
            self.emitter.emit(events::SCROLL_DEPTH, payload);
        }
    }

    pub fn on_click(&self, target: &ClickTarget) {
        let Some(category) = classify_click(target) else {
            return;
        };
        self.emitter
            .emit(category.event_name(), click_payload(target, category));
    }

    pub fn on_field_focus(&self, form: &FormMeta) {
        if let Some(payload) = self.form.lock().on_field_focus(form) {
            self.emitter.emit(events::FORM_START, payload);
        }
    }

    pub fn on_form_submit(&self, form: &FormMeta, fields: &BTreeMap<String, String>) {
        self.emitter
            .emit(events::FORM_SUBMIT, FormObserver::submit_payload(form, fields));
    }

    /// Cross-frame messages without an `event` field are ignored.
    pub fn on_frame_message(&self, message: &Value) {
        if let Some((event, payload)) = interpret_message(message) {
            self.emitter.emit(&event, payload);
        }
    }

    pub fn on_visibility(&self, hidden: bool) {
        self.emitter
            .emit(LifecycleObserver::visibility_event(hidden), Map::new());
    }

    pub fn on_pointer_leave(&self, client_y: f64) {
        let time_on_page = self.clock.elapsed();
        if let Some(payload) = self.lifecycle.lock().on_pointer_leave(client_y, time_on_page) {
            self.emitter.emit(events::EXIT_INTENT, payload);
        }
    }

    /// Public API surface for other scripts.
    pub fn emit_custom(&self, event: &str, payload: Map<String, Value>) {
        self.emitter.emit(event, payload);
    }

    pub fn client_id(&self) -> &ClientId {
        self.emitter.client_id()
    }

    pub fn attribution(&self) -> &AttributionRecord {
        self.emitter.attribution()
    }

    pub fn ad_platform(&self) -> &AdPlatform {
        self.emitter.ad_platform()
    }

    pub fn config(&self) -> &TrackerConfig {
        self.emitter.config()
    }
}
