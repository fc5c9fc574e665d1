//! UserDesk - user management desk
//!
//! Sign in against the stored directory and manage its users from the
//! terminal.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userdesk_core::{Backend, DeskConfig};

mod console;
mod state;

/// UserDesk - manage a small user directory
#[derive(Parser)]
#[command(name = "userdesk", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long)]
    memory: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if cli.memory {
        config.storage.backend = Backend::Memory;
    }

    tracing::info!(backend = ?config.storage.backend, "Starting UserDesk");

    let mut app_state = match state::AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(e) = console::run(&mut app_state.desk, stdin.lock(), &mut stdout) {
        tracing::error!("Console I/O failed: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> userdesk_core::Result<DeskConfig> {
    match cli.config.clone().or_else(DeskConfig::default_path) {
        Some(path) => DeskConfig::load(path),
        None => Ok(DeskConfig::default()),
    }
}
