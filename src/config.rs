//! Tracker configuration, read once from the script inclusion tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resolved configuration for a deployment.
///
/// `tracking_key` identifies the tenant (the legacy `org` attribute is
/// accepted as an input alias), `env` labels the deployment environment
/// and `debug` enables the diagnostic sink.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub tracking_key: String,
    pub env: String,
    pub debug: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tracking_key: "unknown".to_owned(),
            env: "prod".to_owned(),
            debug: false,
        }
    }
}

impl TrackerConfig {
    /// Reads configuration from the inclusion tag's attributes. Both bare
    /// and `data-` prefixed attribute names are accepted; missing values
    /// fall back to the defaults.
    pub fn from_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let tracking_key = lookup(attrs, "tracking_key")
            .or_else(|| lookup(attrs, "org"))
            .unwrap_or_else(|| "unknown".to_owned());
        let env = lookup(attrs, "env").unwrap_or_else(|| "prod".to_owned());
        let debug = lookup(attrs, "debug")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            tracking_key,
            env,
            debug,
        }
    }
}

fn lookup(attrs: &BTreeMap<String, String>, name: &str) -> Option<String> {
    let prefixed = format!("data-{}", name.replace('_', "-"));
    attrs
        .get(name)
        .or_else(|| attrs.get(&prefixed))
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
