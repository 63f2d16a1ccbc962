//! Browser, OS and device family detection from the user-agent string.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BrowserInfo {
    pub browser: String,
    pub os: String,
    pub device: String,
}

impl Default for BrowserInfo {
    fn default() -> Self {
        Self {
            browser: "Unknown".to_owned(),
            os: "Unknown".to_owned(),
            device: "Desktop".to_owned(),
        }
    }
}

const TABLET_MARKERS: &[&str] = &["iPad", "Tablet", "PlayBook", "Kindle"];
const MOBILE_MARKERS: &[&str] = &[
    "Mobile",
    "Android",
    "iPhone",
    "iPod",
    "BlackBerry",
    "Windows Phone",
    "Opera Mini",
    "IEMobile",
];

/// Best-effort family detection; an empty or unrecognized user agent
/// degrades to `Unknown`/`Desktop`. Match order matters: Edge and Opera
/// embed `Chrome/` in their user agents.
pub fn detect(user_agent: &str) -> BrowserInfo {
    if user_agent.is_empty() {
        return BrowserInfo::default();
    }

    let browser = if user_agent.contains("Edg/") || user_agent.contains("Edge/") {
        "Edge"
    } else if user_agent.contains("OPR/") || user_agent.contains("Opera") {
        "Opera"
    } else if user_agent.contains("Chrome/") && user_agent.contains("Safari/") {
        "Chrome"
    } else if user_agent.contains("Safari/") && !user_agent.contains("Chrome") {
        "Safari"
    } else if user_agent.contains("Firefox/") {
        "Firefox"
    } else if user_agent.contains("MSIE") || user_agent.contains("Trident/") {
        "Internet Explorer"
    } else {
        "Unknown"
    };

    let os = if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("Mac OS X") && !user_agent.contains("iPhone") {
        "macOS"
    } else if user_agent.contains("Android") {
        "Android"
    } else if user_agent.contains("iPhone") || user_agent.contains("iPad") || user_agent.contains("iPod")
    {
        "iOS"
    } else if user_agent.contains("CrOS") {
        "Chrome OS"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else {
        "Unknown"
    };

    let mut device = if TABLET_MARKERS.iter().any(|m| user_agent.contains(m)) {
        "Tablet"
    } else if MOBILE_MARKERS.iter().any(|m| user_agent.contains(m)) {
        "Mobile"
    } else {
        "Desktop"
    };
    // Android without the Mobile token is a tablet user agent.
    if user_agent.contains("Android") && !user_agent.contains("Mobile") {
        device = "Tablet";
    }

    BrowserInfo {
        browser: browser.to_owned(),
        os: os.to_owned(),
        device: device.to_owned(),
    }
}
