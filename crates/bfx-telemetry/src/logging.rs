//! Structured logging initialization.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{TelemetryError, TelemetryResult};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON when `RUST_ENV=production`, pretty otherwise.
    #[default]
    Auto,
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is unset. Default: `info,bfx=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Plain-text log file appended to alongside the console. Default: `bot.log`.
    /// An empty path disables it.
    #[serde(default = "default_file")]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info,bfx=debug".to_string()
}

fn default_file() -> Option<PathBuf> {
    Some(PathBuf::from("bot.log"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: default_file(),
        }
    }
}

impl LoggingConfig {
    fn use_json(&self) -> bool {
        match self.format {
            LogFormat::Json => true,
            LogFormat::Pretty => false,
            LogFormat::Auto => std::env::var("RUST_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),
        }
    }
}

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber is already installed or the log file cannot be opened.
pub fn init_logging(config: &LoggingConfig) -> TelemetryResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            TelemetryError::LoggingInit(format!("bad filter {:?}: {e}", config.level))
        })?,
    };

    let file = match &config.file {
        Some(path) if !path.as_os_str().is_empty() => {
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        _ => None,
    };

    if config.use_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(file_layer(file))
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(true))
            .with(file_layer(file))
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Plain single-line records without colour codes.
fn file_layer<S>(file: Option<File>) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    file.map(|f| {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(f))
    })
}
