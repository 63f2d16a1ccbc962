//! Scripted replay: feeds a JSONL signal script through a session against
//! an in-memory host, for demos and end-to-end inspection of the data
//! layer without a browser.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use client_storage::{CookieJar, MemoryStore};
use tracker_core_types::{ManualClock, PageContext};
use tracker_event_log::EventLog;

use crate::config::TrackerConfig;
use crate::observers::click::ClickTarget;
use crate::observers::form::FormMeta;
use crate::session::{TrackerHost, TrackerSession, SCROLL_DEBOUNCE};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read signal script")]
    Io(#[from] std::io::Error),
    #[error("malformed signal on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One line of a signal script.
#[derive(Debug, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    PageView,
    Scroll {
        percent: f64,
    },
    Click {
        #[serde(flatten)]
        target: ClickTarget,
    },
    FieldFocus {
        #[serde(default)]
        form: FormMeta,
    },
    FormSubmit {
        #[serde(default)]
        form: FormMeta,
        #[serde(default)]
        fields: BTreeMap<String, String>,
    },
    FrameMessage {
        message: Value,
    },
    Visibility {
        hidden: bool,
    },
    PointerLeave {
        client_y: f64,
    },
    Custom {
        event: String,
        #[serde(default)]
        payload: Map<String, Value>,
    },
    Wait {
        ms: u64,
    },
}

/// Replays a script read from disk. See [`run_lines`].
pub fn run_file(
    path: &Path,
    config: TrackerConfig,
    page: PageContext,
) -> Result<Vec<Value>, ReplayError> {
    let script = std::fs::read_to_string(path)?;
    run_lines(&script, config, page)
}

/// Replays a JSONL signal script against a fresh in-memory host and
/// returns the flattened data-layer objects in append order. Blank lines
/// and `#` comments are skipped; `wait` advances the manual clock and
/// flushes the scroll debounce.
pub fn run_lines(
    script: &str,
    config: TrackerConfig,
    page: PageContext,
) -> Result<Vec<Value>, ReplayError> {
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    let log = EventLog::new();
    let session = TrackerSession::bootstrap(
        config,
        TrackerHost {
            page,
            cookies: CookieJar::empty(),
            durable: MemoryStore::shared(),
            session: MemoryStore::shared(),
            log: log.clone(),
            clock: clock.clone(),
        },
    );

    for (index, line) in script.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let signal: Signal = serde_json::from_str(trimmed).map_err(|source| ReplayError::Parse {
            line: index + 1,
            source,
        })?;
        apply(&session, &clock, signal);
    }

    // Settle any scroll still inside the debounce window.
    clock.advance(SCROLL_DEBOUNCE);
    session.poll();

    Ok(log.snapshot().iter().map(|env| env.to_data_layer()).collect())
}

fn apply(session: &TrackerSession, clock: &ManualClock, signal: Signal) {
    match signal {
        Signal::PageView => session.page_view(),
        Signal::Scroll { percent } => session.on_scroll(percent),
        Signal::Click { target } => session.on_click(&target),
        Signal::FieldFocus { form } => session.on_field_focus(&form),
        Signal::FormSubmit { form, fields } => session.on_form_submit(&form, &fields),
        Signal::FrameMessage { message } => session.on_frame_message(&message),
        Signal::Visibility { hidden } => session.on_visibility(hidden),
        Signal::PointerLeave { client_y } => session.on_pointer_leave(client_y),
        Signal::Custom { event, payload } => session.emit_custom(&event, payload),
        Signal::Wait { ms } => {
            clock.advance(Duration::from_millis(ms));
            session.poll();
        }
    }
}
