//! Cross-frame message interpretation.
//!
//! The contract accepts any message whose data carries an `event` field.
//! `form_submit` messages are treated as a normalized-form payload source
//! and tagged `form_type: iframe`; other event values are forwarded under
//! their own name; everything else is ignored.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracker_core_types::events;

pub fn interpret_message(message: &Value) -> Option<(String, Map<String, Value>)> {
    let object = message.as_object()?;
    let event = object.get("event")?.as_str()?.trim();
    if event.is_empty() {
        return None;
    }

    let mut payload = Map::new();
    let mut text_fields: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in object {
        if key == "event" || form_normalizer::is_sensitive(key) {
            continue;
        }
        match value.as_str() {
            Some(text) => {
                text_fields.insert(key.clone(), text.to_owned());
            }
            None => {
                payload.insert(key.clone(), value.clone());
            }
        }
    }

    if event == events::FORM_SUBMIT {
        for (name, value) in form_normalizer::normalize(&text_fields) {
            payload.insert(name, Value::String(value));
        }
        payload.insert("form_type".into(), Value::String("iframe".into()));
    } else {
        for (name, value) in text_fields {
            payload.insert(name, Value::String(value));
        }
    }

    Some((event.to_owned(), payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_submit_messages_are_normalized_and_tagged() {
        let message = json!({
            "event": "form_submit",
            "first_name": "Jo",
            "password": "secret",
            "attempt": 2,
        });

        let (event, payload) = interpret_message(&message).expect("accepted");
        assert_eq!(event, "form_submit");
        assert_eq!(payload["firstName"], "Jo");
        assert_eq!(payload["form_type"], "iframe");
        assert_eq!(payload["attempt"], 2);
        assert!(!payload.contains_key("password"));
    }

    #[test]
    fn other_events_are_forwarded_under_their_name() {
        let message = json!({"event": "video_play", "video_id": "v-1"});
        let (event, payload) = interpret_message(&message).expect("accepted");
        assert_eq!(event, "video_play");
        assert_eq!(payload["video_id"], "v-1");
        assert!(!payload.contains_key("form_type"));
    }

    #[test]
    fn messages_without_an_event_field_are_ignored() {
        assert!(interpret_message(&json!({"data": 1})).is_none());
        assert!(interpret_message(&json!({"event": ""})).is_none());
        assert!(interpret_message(&json!({"event": 42})).is_none());
        assert!(interpret_message(&json!("not an object")).is_none());
    }
}
