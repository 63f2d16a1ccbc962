use client_storage::{CookieJar, KeyValueStore};
use tracing::debug;
use tracker_core_types::{ClientId, Clock};
use uuid::Uuid;

/// Durable storage key for the generated client id.
pub const CLIENT_ID_KEY: &str = "ga_client_id";

/// Name of the analytics cookie consulted before falling back to storage.
pub const ANALYTICS_COOKIE: &str = "_ga";

/// Resolves the stable visitor identifier.
///
/// Precedence: analytics cookie, then the durable store, then a freshly
/// generated id persisted for future calls. Idempotent for the client
/// lifetime — once either path yields an id it is never regenerated.
pub fn get_or_create_client_id(
    cookies: &CookieJar,
    durable: &dyn KeyValueStore,
    clock: &dyn Clock,
) -> ClientId {
    if let Some(from_cookie) = cookies.get(ANALYTICS_COOKIE).and_then(parse_analytics_cookie) {
        return ClientId(from_cookie);
    }

    if let Some(stored) = durable.get(CLIENT_ID_KEY).filter(|id| !id.is_empty()) {
        return ClientId(stored);
    }

    let generated = format!(
        "cid_{}{}",
        base36(Uuid::new_v4().as_u128()),
        clock.wall().timestamp_millis()
    );
    durable.set(CLIENT_ID_KEY, &generated);
    debug!(client_id = %generated, "generated new client id");
    ClientId(generated)
}

/// The analytics cookie is dot-delimited; the visitor id is segments 3
/// and 4 joined by a dot. Anything shorter is malformed and falls through.
fn parse_analytics_cookie(value: &str) -> Option<String> {
    let segments: Vec<&str> = value.split('.').collect();
    if segments.len() < 4 || segments[2].is_empty() || segments[3].is_empty() {
        return None;
    }
    Some(format!("{}.{}", segments[2], segments[3]))
}

fn base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut out = String::new();
    while value > 0 {
        out.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use client_storage::MemoryStore;
    use tracker_core_types::ManualClock;

    fn clock() -> ManualClock {
        ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn analytics_cookie_wins() {
        let jar = CookieJar::parse("_ga=GA1.1.123456789.987654321");
        let durable = MemoryStore::new();
        durable.set(CLIENT_ID_KEY, "cid_stored");

        let id = get_or_create_client_id(&jar, &durable, &clock());
        assert_eq!(id.as_str(), "123456789.987654321");
    }

    #[test]
    fn malformed_cookie_falls_through_to_storage() {
        let jar = CookieJar::parse("_ga=GA1.1");
        let durable = MemoryStore::new();
        durable.set(CLIENT_ID_KEY, "cid_stored");

        let id = get_or_create_client_id(&jar, &durable, &clock());
        assert_eq!(id.as_str(), "cid_stored");
    }

    #[test]
    fn generated_id_is_persisted_and_idempotent() {
        let jar = CookieJar::empty();
        let durable = MemoryStore::new();
        let clock = clock();

        let first = get_or_create_client_id(&jar, &durable, &clock);
        assert!(first.as_str().starts_with("cid_"));
        assert!(first.as_str().len() > "cid_".len() + 11);
        assert_eq!(durable.get(CLIENT_ID_KEY), Some(first.as_str().to_owned()));

        let second = get_or_create_client_id(&jar, &durable, &clock);
        assert_eq!(first, second);
    }

    #[test]
    fn base36_encodes_round_numbers() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
    }
}
