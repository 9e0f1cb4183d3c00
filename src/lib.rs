pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod editor;
pub mod envelope;
pub mod error;
pub mod format;
pub mod likes;
pub mod models;
pub mod query;
pub mod session;
pub mod validation;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use client::ApiClient;
pub use config::Config;
pub use error::ClientError;
pub use session::Session;

/// Parses the command line and runs it against an already loaded config.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    config.validate()?;

    init_tracing(&config);

    cli::dispatch(cli, config).await
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // Logs go to stderr; stdout carries command output.
    let (plain, json) = if config.general.json_logs {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain)
        .with(json)
        .init();
}
