//! Tracing bootstrap shared by the SDK demos and downstream services.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Plain,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    File,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct LogConfig {
    /// Default filter directive, e.g. "info" or "nexus_sdk=debug".
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Required when `output` is `file`.
    pub file_path: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// The configured level acts as the default filter directive; a `RUST_LOG`
/// environment variable overrides it.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let subscriber = Registry::default().with(filter);

    match config.output {
        LogOutput::File => {
            let path = config
                .file_path
                .as_deref()
                .context("log output is 'file' but 'file-path' is not set")?;
            let log_file = File::create(path)?;
            match config.format {
                LogFormat::Json => subscriber
                    .with(fmt::layer().with_writer(log_file).json())
                    .init(),
                LogFormat::Plain => subscriber
                    .with(fmt::layer().with_writer(log_file).with_ansi(false))
                    .init(),
            }
        }
        LogOutput::Stdout => match config.format {
            LogFormat::Json => subscriber.with(fmt::layer().json()).init(),
            LogFormat::Plain => subscriber.with(fmt::layer().pretty()).init(),
        },
    };

    Ok(())
}
