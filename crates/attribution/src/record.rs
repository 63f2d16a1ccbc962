use serde::{Deserialize, Serialize};

/// Session-scoped storage key holding the persisted attribution snapshot.
pub const TRACKING_PARAMS_KEY: &str = "tracking_params";

/// Canonical attribution snapshot for the current session.
///
/// Every field defaults to the empty string; a record is persisted only
/// when at least one field was observed on the URL, and a fresh non-empty
/// observation replaces the stored record wholesale.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttributionRecord {
    #[serde(default)]
    pub utm_source: String,
    #[serde(default)]
    pub utm_medium: String,
    #[serde(default)]
    pub utm_campaign: String,
    #[serde(default)]
    pub utm_term: String,
    #[serde(default)]
    pub utm_content: String,
    #[serde(default)]
    pub utm_campaign_id: String,
    #[serde(default)]
    pub fbclid: String,
    #[serde(default)]
    pub gclid: String,
    #[serde(default)]
    pub msclkid: String,
    #[serde(default)]
    pub li_fat_id: String,
}

impl AttributionRecord {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }

    /// Field view in declaration order, used when flattening into the
    /// data-layer object.
    pub fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("utm_source", &self.utm_source),
            ("utm_medium", &self.utm_medium),
            ("utm_campaign", &self.utm_campaign),
            ("utm_term", &self.utm_term),
            ("utm_content", &self.utm_content),
            ("utm_campaign_id", &self.utm_campaign_id),
            ("fbclid", &self.fbclid),
            ("gclid", &self.gclid),
            ("msclkid", &self.msclkid),
            ("li_fat_id", &self.li_fat_id),
        ]
    }

    pub(crate) fn apply(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = match key {
            "utm_source" => &mut self.utm_source,
            "utm_medium" => &mut self.utm_medium,
            "utm_campaign" => &mut self.utm_campaign,
            "utm_term" => &mut self.utm_term,
            "utm_content" => &mut self.utm_content,
            // utm_id is the ad-platform alias for the campaign id; an
            // explicit utm_campaign_id wins over the alias.
            "utm_campaign_id" => &mut self.utm_campaign_id,
            "utm_id" => {
                if self.utm_campaign_id.is_empty() {
                    self.utm_campaign_id = value.to_owned();
                }
                return;
            }
            "fbclid" => &mut self.fbclid,
            "gclid" => &mut self.gclid,
            "msclkid" => &mut self.msclkid,
            "li_fat_id" => &mut self.li_fat_id,
            _ => return,
        };
        if slot.is_empty() {
            *slot = value.to_owned();
        }
    }
}
