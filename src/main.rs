//! `stockroom` binary: parse the command line, set up logging, run one command.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stockroom::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    tracing::debug!(?config, version = env!("CARGO_PKG_VERSION"), "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::CreateAdmin(args) => commands::create_admin::execute(args, config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// `--verbose` forces debug; otherwise `RUST_LOG`, falling back to info.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
