pub mod channel;
pub mod platform;
pub mod record;
pub mod resolver;

pub use channel::{traffic_channel, TrafficChannel};
pub use platform::{classify_ad_platform, AdPlatform};
pub use record::{AttributionRecord, TRACKING_PARAMS_KEY};
pub use resolver::{resolve, resolve_with_referrer};
