use client_storage::KeyValueStore;
use tracing::debug;
use url::Url;

use crate::record::{AttributionRecord, TRACKING_PARAMS_KEY};

/// Resolves the attribution record for the current page load.
///
/// A non-empty set of recognized query parameters on the current URL is
/// persisted to the session store and returned; otherwise the previously
/// persisted record is reused, else the all-empty record. Pure apart from
/// the session-store write on fresh observation.
pub fn resolve(current_url: &str, session: &dyn KeyValueStore) -> AttributionRecord {
    resolve_with_referrer(current_url, "", session)
}

/// Like [`resolve`], but when the current URL carries no recognized
/// parameters the referrer's query string is consulted before falling
/// back to the persisted record.
pub fn resolve_with_referrer(
    current_url: &str,
    referrer: &str,
    session: &dyn KeyValueStore,
) -> AttributionRecord {
    let observed = collect_params(current_url);
    if !observed.is_empty() {
        persist(&observed, session);
        debug!(url = current_url, "attribution captured from page url");
        return observed;
    }

    let from_referrer = collect_params(referrer);
    if !from_referrer.is_empty() {
        persist(&from_referrer, session);
        debug!(referrer, "attribution captured from referrer");
        return from_referrer;
    }

    load_persisted(session).unwrap_or_default()
}

fn collect_params(raw_url: &str) -> AttributionRecord {
    let mut record = AttributionRecord::default();
    if raw_url.is_empty() {
        return record;
    }
    let Ok(parsed) = Url::parse(raw_url) else {
        return record;
    };
    // The utm_id alias is applied last so an explicit utm_campaign_id
    // wins regardless of parameter order.
    for (key, value) in parsed.query_pairs() {
        if key.as_ref() != "utm_id" {
            record.apply(key.as_ref(), value.as_ref());
        }
    }
    for (key, value) in parsed.query_pairs() {
        if key.as_ref() == "utm_id" {
            record.apply(key.as_ref(), value.as_ref());
        }
    }
    record
}

fn persist(record: &AttributionRecord, session: &dyn KeyValueStore) {
    if let Ok(raw) = serde_json::to_string(record) {
        session.set(TRACKING_PARAMS_KEY, &raw);
    }
}

fn load_persisted(session: &dyn KeyValueStore) -> Option<AttributionRecord> {
    let raw = session.get(TRACKING_PARAMS_KEY)?;
    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn captures_and_persists_fresh_parameters() {
        let store = MemoryStore::new();
        let record = resolve("https://example.com/?utm_source=x&gclid=y", &store);

        assert_eq!(record.utm_source, "x");
        assert_eq!(record.gclid, "y");
        assert!(store.get(TRACKING_PARAMS_KEY).is_some());
    }

    #[test]
    fn bare_url_reuses_persisted_record() {
        let store = MemoryStore::new();
        resolve("https://example.com/?utm_source=x&gclid=y", &store);

        let second = resolve("https://example.com/pricing", &store);
        assert_eq!(second.utm_source, "x");
        assert_eq!(second.gclid, "y");
    }

    #[test]
    fn fresh_observation_replaces_record_atomically() {
        let store = MemoryStore::new();
        resolve("https://example.com/?utm_source=x&utm_campaign=spring", &store);

        let third = resolve("https://example.com/?utm_source=z", &store);
        assert_eq!(third.utm_source, "z");
        assert_eq!(third.utm_campaign, "");

        let reloaded = resolve("https://example.com/", &store);
        assert_eq!(reloaded, third);
    }

    #[test]
    fn referrer_parameters_fill_in_when_url_is_bare() {
        let store = MemoryStore::new();
        let record = resolve_with_referrer(
            "https://example.com/landing",
            "https://ads.example.net/out?utm_source=partner&utm_medium=cpc",
            &store,
        );

        assert_eq!(record.utm_source, "partner");
        assert_eq!(record.utm_medium, "cpc");
    }

    #[test]
    fn explicit_campaign_id_beats_the_alias_in_any_order() {
        let store = MemoryStore::new();
        let record = resolve("https://example.com/?utm_id=2&utm_campaign_id=1", &store);
        assert_eq!(record.utm_campaign_id, "1");

        let alias_only = resolve("https://example.com/?utm_id=2", &store);
        assert_eq!(alias_only.utm_campaign_id, "2");
    }

    #[test]
    fn unparseable_url_yields_persisted_or_empty() {
        let store = MemoryStore::new();
        assert!(resolve("not a url", &store).is_empty());

        resolve("https://example.com/?utm_source=x", &store);
        assert_eq!(resolve("not a url", &store).utm_source, "x");
    }
}
