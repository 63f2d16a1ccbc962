use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracker_core_types::events;

const TEXT_LIMIT: usize = 100;

/// Snapshot of the clicked element as reported by the host.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClickTarget {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub dataset: BTreeMap<String, String>,
}

impl ClickTarget {
    fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class.eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClickCategory {
    Nav,
    Cta,
    FooterLink,
    Tab,
    Generic,
}

impl ClickCategory {
    pub fn event_name(self) -> &'static str {
        match self {
            ClickCategory::Nav => events::NAV_CLICK,
            ClickCategory::Cta => events::CTA_CLICK,
            ClickCategory::FooterLink => events::FOOTER_CLICK,
            ClickCategory::Tab => events::TAB_CLICK,
            ClickCategory::Generic => events::CLICK,
        }
    }
}

/// First matching specific category wins; plain links and buttons fall
/// back to the generic category; anything else is not tracked.
pub fn classify_click(target: &ClickTarget) -> Option<ClickCategory> {
    if target.has_class("nav-item") || target.has_class("nav-link") {
        return Some(ClickCategory::Nav);
    }
    if target.has_class("cta") || target.dataset.contains_key("cta") {
        return Some(ClickCategory::Cta);
    }
    if target.has_class("footer-link") {
        return Some(ClickCategory::FooterLink);
    }
    if target.has_class("tab") || target.role.eq_ignore_ascii_case("tab") {
        return Some(ClickCategory::Tab);
    }
    if target.tag.eq_ignore_ascii_case("a") || target.tag.eq_ignore_ascii_case("button") {
        return Some(ClickCategory::Generic);
    }
    None
}

/// Event payload for a classified click. Missing element metadata shows
/// up as empty fields rather than being dropped.
pub fn click_payload(target: &ClickTarget, category: ClickCategory) -> Map<String, Value> {
    let text: String = target.text.chars().take(TEXT_LIMIT).collect();
    let href = target.href.clone().unwrap_or_default();

    let mut payload = Map::new();
    payload.insert("element".into(), Value::String(target.tag.clone()));
    payload.insert("element_text".into(), Value::String(text.clone()));
    payload.insert("link_url".into(), Value::String(href.clone()));
    payload.insert("element_id".into(), Value::String(target.id.clone()));
    payload.insert(
        "element_classes".into(),
        Value::String(target.classes.join(" ")),
    );

    match category {
        ClickCategory::Nav => {
            payload.insert("nav_target".into(), Value::String(href));
        }
        ClickCategory::Cta => {
            payload.insert("cta_name".into(), Value::String(text));
            payload.insert(
                "cta_location".into(),
                Value::String(dataset_value(target, "cta-location")),
            );
        }
        ClickCategory::Tab => {
            payload.insert(
                "tab_target".into(),
                Value::String(dataset_value(target, "tab-target")),
            );
        }
        ClickCategory::FooterLink | ClickCategory::Generic => {}
    }
    payload
}

fn dataset_value(target: &ClickTarget, key: &str) -> String {
    target.dataset.get(key).cloned().unwrap_or_default()
}
