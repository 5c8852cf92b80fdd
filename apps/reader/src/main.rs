use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use client_core::{ContentStore, SharedContentStore};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use config::{load_settings, Settings, DEFAULT_CONFIG_FILE};
use controller::events::UiEvent;
use ui::app::{spawn_input_reader, ReaderApp};

#[derive(Parser, Debug)]
#[command(name = "reader", about = "Terminal reader for a CMS posts feed")]
struct Args {
    /// Posts collection endpoint, e.g. https://example.org/wp-json/wp/v2/posts
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Skip the fetch and show the bundled posts only.
    #[arg(long)]
    offline: bool,
    /// Start with nothing loaded instead of the bundled posts.
    #[arg(long)]
    no_seed: bool,
    /// Reject fetched lists with duplicate ids or bad dates.
    #[arg(long)]
    validate: bool,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn apply_args(settings: &mut Settings, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if args.timeout_secs.is_some() {
        settings.request_timeout_secs = args.timeout_secs;
    }
    settings.offline |= args.offline;
    settings.validate_posts |= args.validate;
    if args.no_seed {
        settings.seed = false;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    apply_args(&mut settings, &args);
    tracing::debug!(?settings, "resolved settings");

    let store = if settings.seed {
        SharedContentStore::seeded()
    } else {
        SharedContentStore::new(ContentStore::new())
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx.clone(), store.clone());
    spawn_input_reader(ui_tx);

    let mut app = ReaderApp::new(store, cmd_tx, settings);
    app.run(ui_rx, &mut io::stdout().lock())
}
