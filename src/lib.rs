//! Client-side event tracker core.
//!
//! The browser is an injected host: page context, cookie jar, storage
//! areas and a clock come in at session bootstrap, and the interaction
//! observers consume explicit host signals. Every observer funnels into
//! the event emitter, which stamps identity, attribution and page context
//! onto an envelope and appends it to the shared append-only event log.

pub mod config;
pub mod debounce;
pub mod emitter;
pub mod environment;
pub mod observers;
pub mod replay;
pub mod session;

pub use attribution::{
    classify_ad_platform, resolve, resolve_with_referrer, traffic_channel, AdPlatform,
    AttributionRecord, TrafficChannel, TRACKING_PARAMS_KEY,
};
pub use client_identity::{get_or_create_client_id, ANALYTICS_COOKIE, CLIENT_ID_KEY};
pub use client_storage::{CookieJar, KeyValueStore, MemoryStore};
pub use config::TrackerConfig;
pub use form_normalizer::{is_sensitive, normalize};
pub use session::{TrackerHost, TrackerSession};
pub use tracker_core_types::{events, ClientId, Clock, ManualClock, PageContext, SystemClock};
pub use tracker_event_log::{EventEnvelope, EventLog};
