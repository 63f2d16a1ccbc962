use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use url::Url;

use client_tracker::config::TrackerConfig;
use client_tracker::replay;
use client_tracker::PageContext;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const DEMO_SCRIPT: &str = r#"
{"signal": "page_view"}
{"signal": "scroll", "percent": 35}
{"signal": "wait", "ms": 150}
{"signal": "click", "tag": "a", "classes": ["cta"], "text": "Start free trial", "href": "https://example.com/signup", "dataset": {"cta-location": "hero"}}
{"signal": "field_focus", "form": {"name": "contact", "id": "contact-form", "action": "/submit"}}
{"signal": "form_submit", "form": {"name": "contact", "id": "contact-form", "action": "/submit"}, "fields": {"first_name": "Jo", "email": "jo@example.com", "password": "hunter2"}}
{"signal": "scroll", "percent": 92}
{"signal": "wait", "ms": 150}
{"signal": "pointer_leave", "client_y": -2}
{"signal": "visibility", "hidden": true}
"#;

#[derive(Parser)]
#[command(
    name = "tracker",
    version,
    about = "Replay interaction signals through the client tracker and print the data layer"
)]
struct Cli {
    /// Enable verbose diagnostic output.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL signal script.
    Replay {
        /// Path to the signal script, one JSON object per line.
        script: PathBuf,

        #[arg(long, default_value = "https://example.com/?utm_source=demo&utm_medium=cpc")]
        url: String,

        #[arg(long, default_value = "")]
        referrer: String,

        #[arg(long, default_value = "demo-tenant")]
        tracking_key: String,

        #[arg(long, default_value = "dev")]
        env: String,

        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// Pretty-print the emitted data-layer objects.
        #[arg(long)]
        pretty: bool,
    },
    /// Replay a built-in demonstration sequence.
    Demo {
        #[arg(long)]
        pretty: bool,
    },
}

static TRACING: OnceCell<()> = OnceCell::new();

fn init_tracing(debug: bool) {
    TRACING.get_or_init(|| {
        let default_filter = if debug { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        let fmt_layer = fmt::layer().with_ansi(false).with_target(false);
        let subscriber = Registry::default().with(filter).with(fmt_layer);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let events = match cli.command {
        Commands::Replay {
            script,
            url,
            referrer,
            tracking_key,
            env,
            user_agent,
            pretty,
        } => {
            Url::parse(&url).with_context(|| format!("invalid --url {url}"))?;
            let config = TrackerConfig {
                tracking_key,
                env,
                debug: cli.debug,
            };
            let page = PageContext {
                url,
                title: "Replay".to_owned(),
                referrer,
                user_agent,
            };
            let events = replay::run_file(&script, config, page)
                .with_context(|| format!("replaying {}", script.display()))?;
            print_events(&events, pretty)?;
            events
        }
        Commands::Demo { pretty } => {
            let config = TrackerConfig {
                tracking_key: "demo-tenant".to_owned(),
                env: "dev".to_owned(),
                debug: cli.debug,
            };
            let page = PageContext {
                url: "https://example.com/?utm_source=newsletter&gclid=demo-click".to_owned(),
                title: "Demo".to_owned(),
                referrer: "https://news.example.org/issue-42".to_owned(),
                user_agent: DEFAULT_USER_AGENT.to_owned(),
            };
            let events = replay::run_lines(DEMO_SCRIPT, config, page)
                .context("replaying the built-in demo script")?;
            print_events(&events, pretty)?;
            events
        }
    };

    tracing::info!(count = events.len(), "replay complete");
    Ok(())
}

fn print_events(events: &[Value], pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(events)
    } else {
        serde_json::to_string(events)
    }
    .context("serializing data-layer output")?;
    println!("{rendered}");
    Ok(())
}
