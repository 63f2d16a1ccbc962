use attribution::{AdPlatform, AttributionRecord, TrafficChannel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unit appended to the shared data layer: identity, attribution, page
/// context and environment metadata plus the event-specific payload.
///
/// Every envelope carries the attribution record and ad classification
/// current at emission time, whatever the triggering event was.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: String,
    pub activity_type: String,
    pub event_id: String,
    pub tracking_key: String,
    pub env: String,
    pub client_id: String,
    pub page_url: String,
    pub page_title: String,
    pub referrer: String,
    pub timestamp: DateTime<Utc>,
    pub browser: String,
    pub os: String,
    pub device: String,
    pub attribution: AttributionRecord,
    pub ad: AdPlatform,
    pub traffic_channel: TrafficChannel,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl EventEnvelope {
    /// Flattens the envelope into the single object pushed to the data
    /// layer. Merge order: fixed metadata, identity, page context,
    /// attribution, ad classification, then the event payload — payload
    /// keys always win on collision.
    pub fn to_data_layer(&self) -> Value {
        let mut out = Map::new();
        out.insert("event".into(), Value::String(self.event.clone()));
        out.insert(
            "activity_type".into(),
            Value::String(self.activity_type.clone()),
        );
        out.insert("event_id".into(), Value::String(self.event_id.clone()));
        out.insert(
            "tracking_key".into(),
            Value::String(self.tracking_key.clone()),
        );
        out.insert("env".into(), Value::String(self.env.clone()));
        out.insert("client_id".into(), Value::String(self.client_id.clone()));
        out.insert("page_url".into(), Value::String(self.page_url.clone()));
        out.insert("page_title".into(), Value::String(self.page_title.clone()));
        out.insert("referrer".into(), Value::String(self.referrer.clone()));
        out.insert(
            "timestamp".into(),
            Value::String(self.timestamp.to_rfc3339()),
        );
        out.insert("browser".into(), Value::String(self.browser.clone()));
        out.insert("os".into(), Value::String(self.os.clone()));
        out.insert("device".into(), Value::String(self.device.clone()));

        for (key, value) in self.attribution.fields() {
            out.insert(key.into(), Value::String(value.to_owned()));
        }
        out.insert(
            "ad_platform".into(),
            Value::String(self.ad.ad_platform.clone()),
        );
        out.insert(
            "ad_click_id_type".into(),
            Value::String(self.ad.ad_click_id_type.clone()),
        );
        out.insert(
            "ad_click_id".into(),
            Value::String(self.ad.ad_click_id.clone()),
        );
        out.insert(
            "traffic_channel".into(),
            Value::String(self.traffic_channel.as_str().to_owned()),
        );

        for (key, value) in &self.payload {
            out.insert(key.clone(), value.clone());
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn envelope() -> EventEnvelope {
        EventEnvelope {
            event: "page_view".into(),
            activity_type: "page_view".into(),
            event_id: "ev-1".into(),
            tracking_key: "acme".into(),
            env: "prod".into(),
            client_id: "cid_1".into(),
            page_url: "https://example.com/".into(),
            page_title: "Example".into(),
            referrer: String::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            browser: "Chrome".into(),
            os: "Linux".into(),
            device: "Desktop".into(),
            attribution: AttributionRecord {
                utm_source: "x".into(),
                ..Default::default()
            },
            ad: AdPlatform::default(),
            traffic_channel: TrafficChannel::Direct,
            payload: Map::new(),
        }
    }

    #[test]
    fn data_layer_object_is_flat_and_complete() {
        let flat = envelope().to_data_layer();
        assert_eq!(flat["event"], "page_view");
        assert_eq!(flat["client_id"], "cid_1");
        assert_eq!(flat["utm_source"], "x");
        assert_eq!(flat["ad_platform"], "");
        assert_eq!(flat["traffic_channel"], "direct");
        assert_eq!(flat["timestamp"], "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn payload_keys_win_on_collision() {
        let mut env = envelope();
        env.payload
            .insert("page_title".into(), Value::String("override".into()));
        let flat = env.to_data_layer();
        assert_eq!(flat["page_title"], "override");
    }
}
