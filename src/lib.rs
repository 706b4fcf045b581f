//! rGameNight library root.
//! Exposes the CLI parser, the high-level run() function and the signup
//! coordinator with its collaborators.

pub mod cli;
pub mod collab;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Setup { .. } => cli::commands::setup::handle(&cli.command, cfg),
        Commands::React { .. } | Commands::Unreact { .. } => {
            cli::commands::react::handle(&cli.command, cfg)
        }
        Commands::Listen => cli::commands::listen::handle(cfg),
        Commands::Status => cli::commands::status::handle(cfg),
        Commands::Clear | Commands::Reset { .. } => {
            cli::commands::clear::handle(&cli.command, cfg)
        }
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Diagnostics on stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = Config::load()?;
    if let Some(data) = &cli.data {
        cfg.data_dir = data.clone();
    }

    dispatch(&cli, &cfg)
}
