//! AyurSutra portal command line
//!
//! Admin and patient screens of the portal, driven from a terminal against
//! the configured backend.

use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ayur_auth::{FileSessionStore, SessionContext};
use ayur_core::config::PortalConfig;
use ayur_services::Portal;

mod commands;
mod output;

use commands::Command;
use output::ConsoleNotifier;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(name = "ayursutra")]
struct Cli {
    /// Config file (TOML, YAML or JSON; extension optional)
    #[arg(long, global = true, env = "AYURSUTRA_CONFIG")]
    config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = PortalConfig::load(cli.config.as_deref())?;
    debug!(base_url = %config.api.base_url, "configuration loaded");

    let store = FileSessionStore::new(config.session.storage_path.clone());
    let session = SessionContext::new(Arc::new(store));
    if let Some(restored) = session.restore()? {
        debug!(user = %restored.user.id, "session restored");
    }

    let portal = Portal::new(config, session, Arc::new(ConsoleNotifier))?;
    info!(version = env!("CARGO_PKG_VERSION"), "portal ready");

    commands::run(cli.command, &portal).await
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,ayur_services=debug,ayur_client=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
