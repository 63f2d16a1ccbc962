use serde::{Deserialize, Serialize};

use crate::record::AttributionRecord;

/// Ad platform classification derived from the record's click identifiers.
/// All fields empty when no click identifier is present.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdPlatform {
    pub ad_platform: String,
    pub ad_click_id_type: String,
    pub ad_click_id: String,
}

impl AdPlatform {
    pub fn is_empty(&self) -> bool {
        self.ad_platform.is_empty()
    }
}

/// Priority-ordered click identifier lookup; first non-empty match wins.
pub fn classify_ad_platform(record: &AttributionRecord) -> AdPlatform {
    let priority: [(&str, &str, &str); 4] = [
        ("Facebook/Instagram", "fbclid", &record.fbclid),
        ("Google Ads", "gclid", &record.gclid),
        ("Microsoft Ads", "msclkid", &record.msclkid),
        ("LinkedIn Ads", "li_fat_id", &record.li_fat_id),
    ];

    for (platform, id_type, value) in priority {
        if !value.is_empty() {
            return AdPlatform {
                ad_platform: platform.to_owned(),
                ad_click_id_type: id_type.to_owned(),
                ad_click_id: value.to_owned(),
            };
        }
    }
    AdPlatform::default()
}
