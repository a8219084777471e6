mod config;
mod error;

use clap::Parser;
use config::{Cli, Commands, RelayConfig};
use error::StandaloneError;

mod cmd;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), StandaloneError> {
    let config = RelayConfig::resolve(cli.config.as_deref())?;
    match cli.command {
        Commands::Publish(args) => cmd::publish::run(config, args),
        Commands::Check(args) => cmd::check::run(config, args),
    }
}
