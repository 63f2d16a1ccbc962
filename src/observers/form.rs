use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifying metadata for a form, best-effort; absent attributes are
/// empty strings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub action: String,
}

impl FormMeta {
    fn describe(&self, payload: &mut Map<String, Value>) {
        payload.insert("form_name".into(), Value::String(self.name.clone()));
        payload.insert("form_id".into(), Value::String(self.id.clone()));
        payload.insert("form_action".into(), Value::String(self.action.clone()));
    }
}

/// Form lifecycle guard: `form_start` fires at most once per page load,
/// across all forms, attributed to the first form touched.
#[derive(Debug, Default)]
pub struct FormObserver {
    started: bool,
}

impl FormObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload for `form_start` on the first field focus, `None` after.
    pub fn on_field_focus(&mut self, form: &FormMeta) -> Option<Map<String, Value>> {
        if self.started {
            return None;
        }
        self.started = true;
        let mut payload = Map::new();
        form.describe(&mut payload);
        Some(payload)
    }

    /// Payload for a native `form_submit`: all field pairs after denylist
    /// filtering and normalization, plus the form metadata.
    pub fn submit_payload(
        form: &FormMeta,
        fields: &BTreeMap<String, String>,
    ) -> Map<String, Value> {
        let mut payload = Map::new();
        for (name, value) in form_normalizer::normalize(fields) {
            payload.insert(name, Value::String(value));
        }
        form.describe(&mut payload);
        payload
    }
}
