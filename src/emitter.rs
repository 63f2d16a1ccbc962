//! Envelope assembly and the session-start gate.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use attribution::{AdPlatform, AttributionRecord, TrafficChannel};
use client_storage::KeyValueStore;
use tracker_core_types::{events, ClientId, Clock, PageContext};
use tracker_event_log::{EventEnvelope, EventLog};

use crate::config::TrackerConfig;
use crate::environment::BrowserInfo;

/// Session-scoped marker gating exactly one `session_start` per session.
pub const SESSION_MARKER_KEY: &str = "session_started";

/// Assembles envelopes and appends them to the shared log.
///
/// Identity, attribution and page context are captured once at bootstrap
/// and stamped onto every envelope. Emission never fails; a missing
/// payload field is simply an empty slot.
pub struct EventEmitter {
    config: TrackerConfig,
    client_id: ClientId,
    attribution: AttributionRecord,
    ad: AdPlatform,
    channel: TrafficChannel,
    environment: BrowserInfo,
    page: PageContext,
    log: Arc<EventLog>,
    session_store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl EventEmitter {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: TrackerConfig,
        client_id: ClientId,
        attribution: AttributionRecord,
        ad: AdPlatform,
        channel: TrafficChannel,
        environment: BrowserInfo,
        page: PageContext,
        log: Arc<EventLog>,
        session_store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            client_id,
            attribution,
            ad,
            channel,
            environment,
            page,
            log,
            session_store,
            clock,
        }
    }

    /// Appends one envelope per call, emitting the session's single
    /// `session_start` first when the marker is still unset. Asking for
    /// `session_start` directly only runs the gate, so the singularity
    /// guarantee holds even against misbehaving callers.
    pub fn emit(&self, event: &str, payload: Map<String, Value>) {
        if event == events::SESSION_START {
            self.ensure_session_started();
            return;
        }
        self.ensure_session_started();
        self.append(event, payload);
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn attribution(&self) -> &AttributionRecord {
        &self.attribution
    }

    pub fn ad_platform(&self) -> &AdPlatform {
        &self.ad
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn ensure_session_started(&self) {
        if self.session_store.get(SESSION_MARKER_KEY).is_some() {
            return;
        }
        self.session_store.set(SESSION_MARKER_KEY, "1");
        self.append(events::SESSION_START, Map::new());
    }

    fn append(&self, event: &str, payload: Map<String, Value>) {
        if self.config.debug {
            debug!(event, payload_fields = payload.len(), "tracker event");
        }
        self.log.append(EventEnvelope {
            event: event.to_owned(),
            activity_type: event.to_owned(),
            event_id: Uuid::new_v4().to_string(),
            tracking_key: self.config.tracking_key.clone(),
            env: self.config.env.clone(),
            client_id: self.client_id.as_str().to_owned(),
            page_url: self.page.url.clone(),
            page_title: self.page.title.clone(),
            referrer: self.page.referrer.clone(),
            timestamp: self.clock.wall(),
            browser: self.environment.browser.clone(),
            os: self.environment.os.clone(),
            device: self.environment.device.clone(),
            attribution: self.attribution.clone(),
            ad: self.ad.clone(),
            traffic_channel: self.channel,
            payload,
        });
    }
}
