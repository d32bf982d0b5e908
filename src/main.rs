//! wsrp CLI - manage WSRP producer connections and portlet exports
//!
//! Usage: wsrp <COMMAND>
//!
//! Commands:
//!   consumers  List, create, rename, remove, activate or deactivate producers
//!   export     Encode or decode portlet export data

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli) {
        ui::error::print_error(&err, json);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (mut config, warnings) =
        wsrp::config::load(cli.config.as_deref()).map_err(wsrp::WsrpError::from)?;
    if let Some(store) = &cli.store {
        config.store.path = Some(store.clone());
    }

    init_tracing(cli.verbose, &config.logging.level);
    ui::output::print_config_warnings(&warnings, cli.json);

    match cli.command {
        Commands::Consumers(command) => commands::consumers::run(command, &config, cli.json),
        Commands::Export(command) => commands::export::run(command, cli.json),
    }
}

/// `WSRP_LOG` wins, then `-v`, then the configured level
fn init_tracing(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_env("WSRP_LOG").unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new(configured),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
