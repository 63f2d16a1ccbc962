use serde::{Deserialize, Serialize};
use url::Url;

use crate::record::AttributionRecord;

/// Coarse channel grouping derived at classification time, never stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficChannel {
    Social,
    PaidSearch,
    Paid,
    Email,
    Referral,
    Direct,
}

impl TrafficChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            TrafficChannel::Social => "social",
            TrafficChannel::PaidSearch => "paid_search",
            TrafficChannel::Paid => "paid",
            TrafficChannel::Email => "email",
            TrafficChannel::Referral => "referral",
            TrafficChannel::Direct => "direct",
        }
    }
}

impl Default for TrafficChannel {
    fn default() -> Self {
        TrafficChannel::Direct
    }
}

const SOCIAL_SOURCES: &[&str] = &["facebook", "instagram", "linkedin", "twitter", "t.co"];
const SOCIAL_SOURCE_CODES: &[&str] = &["fb", "ig", "li", "x", "x.com"];
const SEARCH_SOURCES: &[&str] = &["google", "adwords", "gclid", "bing"];
const EMAIL_SOURCES: &[&str] = &["email", "newsletter", "mailchimp", "sendinblue", "mail"];
const CAMPAIGN_SOURCES: &[&str] = &["campaign", "promo", "offer", "sale", "launch", "paid"];
const REFERRAL_SOURCES: &[&str] = &["referral", "partner", "affiliate"];

const PAID_MEDIUMS: &[&str] = &[
    "cpc",
    "ppc",
    "paid",
    "display",
    "banner",
    "paid_social",
    "paidsocial",
];
const SOCIAL_MEDIUMS: &[&str] = &["social", "social_media", "socialmedia"];

const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "fb.com",
    "instagram.com",
    "linkedin.com",
    "twitter.com",
    "x.com",
    "t.co",
];
const SEARCH_DOMAINS: &[&str] = &["google.", "doubleclick", "bing.com"];

/// Channel classification with priority utm_source > utm_medium >
/// referrer > direct. Absence of every signal is `Direct`, not a failure.
pub fn traffic_channel(record: &AttributionRecord, referrer: &str) -> TrafficChannel {
    let source = record.utm_source.trim().to_ascii_lowercase();
    if !source.is_empty() {
        if matches_source(&source, SOCIAL_SOURCES, SOCIAL_SOURCE_CODES) {
            return TrafficChannel::Social;
        }
        if matches_source(&source, SEARCH_SOURCES, &[]) {
            return TrafficChannel::PaidSearch;
        }
        if matches_source(&source, EMAIL_SOURCES, &[]) {
            return TrafficChannel::Email;
        }
        if matches_source(&source, CAMPAIGN_SOURCES, &[]) {
            return TrafficChannel::Paid;
        }
        if matches_source(&source, REFERRAL_SOURCES, &[]) {
            return TrafficChannel::Referral;
        }
    }

    let medium = record.utm_medium.trim().to_ascii_lowercase();
    if !medium.is_empty() {
        if PAID_MEDIUMS.contains(&medium.as_str()) {
            return TrafficChannel::Paid;
        }
        if SOCIAL_MEDIUMS.contains(&medium.as_str()) {
            return TrafficChannel::Social;
        }
        if medium == "email" {
            return TrafficChannel::Email;
        }
    }

    referrer_channel(referrer).unwrap_or_default()
}

/// Long names match as substrings, short platform codes only exactly, so
/// a source like `design` never reads as Instagram.
fn matches_source(source: &str, substrings: &[&str], codes: &[&str]) -> bool {
    substrings.iter().any(|term| source.contains(term))
        || codes.iter().any(|code| source == *code)
}

fn referrer_channel(referrer: &str) -> Option<TrafficChannel> {
    let trimmed = referrer.trim().to_ascii_lowercase();
    if matches!(trimmed.as_str(), "" | "direct" | "(direct)" | "null" | "undefined") {
        return None;
    }
    let domain = Url::parse(&trimmed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))?;

    if SOCIAL_DOMAINS.iter().any(|known| domain_matches(&domain, known)) {
        return Some(TrafficChannel::Social);
    }
    if SEARCH_DOMAINS.iter().any(|known| domain.contains(known)) {
        return Some(TrafficChannel::PaidSearch);
    }
    Some(TrafficChannel::Referral)
}

fn domain_matches(domain: &str, known: &str) -> bool {
    domain == known || domain.ends_with(&format!(".{known}"))
}
