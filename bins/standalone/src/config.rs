use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use relay_producer::ProducerConfig;
use relay_store::BrokerConfig;

use crate::error::StandaloneError;

#[derive(Parser)]
#[command(name = "relay-standalone", about = "Standalone in-memory event broker")]
pub struct Cli {
    /// Path to the TOML config file. Built-in defaults apply when absent.
    #[arg(long, global = true, env = "RELAY_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish JSON-lines events and print the assigned message ids
    Publish(PublishArgs),
    /// Check that a topic exists, optionally after replaying events
    Check(CheckArgs),
}

#[derive(Args, Clone, Debug)]
pub struct PublishArgs {
    /// Events file, one CloudEvent JSON object per line. `-` reads stdin.
    #[arg(long, short, default_value = "-")]
    pub input: String,

    #[arg(long, value_enum, default_value_t = SendMode::Sync)]
    pub mode: SendMode,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub topic: String,

    /// Events to publish before checking.
    #[arg(long, short)]
    pub input: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendMode {
    /// `publish`, prints `topic<TAB>message_id`
    Sync,
    /// `send_oneway`, prints nothing
    Oneway,
    /// `send_async`, prints from the completion callback
    Async,
}

// ---- TOML Config ----

#[derive(Debug, Default, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub producer: ProducerConfig,
}

impl RelayConfig {
    pub fn load(path: &str) -> Result<Self, StandaloneError> {
        let content = std::fs::read_to_string(path).map_err(|e| StandaloneError::Config {
            context: "read",
            detail: format!("'{path}': {e}"),
        })?;
        Self::parse(&content).map_err(|e| match e {
            StandaloneError::Config { context, detail } => StandaloneError::Config {
                context,
                detail: format!("'{path}': {detail}"),
            },
            other => other,
        })
    }

    pub fn parse(toml_str: &str) -> Result<Self, StandaloneError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| StandaloneError::Config {
            context: "parse",
            detail: e.to_string(),
        })?;
        config.broker.validate().map_err(|e| StandaloneError::Config {
            context: "validate",
            detail: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn resolve(path: Option<&str>) -> Result<Self, StandaloneError> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::info!(config = %path, "loaded config");
                Ok(config)
            }
            None => {
                tracing::info!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}
