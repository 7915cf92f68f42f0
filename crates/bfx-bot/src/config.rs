//! Application configuration.
//!
//! Resolution order: `--config`, then `BFX_CONFIG`, then `config/default.toml`.
//! An explicitly named file must exist; the default path falls back to
//! built-in defaults when absent. Environment overrides apply on top.

use std::path::{Path, PathBuf};

use bfx_executor::{Environment, ExecutorConfig};
use bfx_strategy::{GridConfig, TwapConfig, MAX_GRID_LEVELS};
use bfx_telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_ENV_VAR: &str = "BFX_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Venue environment. Takes precedence over `executor.environment`.
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub twap: TwapConfig,
}

impl AppConfig {
    /// Resolve, read, override and validate.
    ///
    /// Returns the file actually read, if any.
    pub fn load(cli_path: Option<&str>) -> AppResult<(Self, Option<PathBuf>)> {
        let explicit = cli_path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());

        let (mut config, source) = match explicit {
            Some(path) => (Self::from_file(&path)?, Some(PathBuf::from(path))),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => (
                Self::from_file(DEFAULT_CONFIG_PATH)?,
                Some(PathBuf::from(DEFAULT_CONFIG_PATH)),
            ),
            None => (Self::default(), None),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok((config, source))
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.executor.environment = config.environment;
        Ok(config)
    }

    /// `USE_TESTNET` selects the environment when set.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup("USE_TESTNET") {
            self.environment = Environment::from_testnet_flag(&flag);
        }
        self.executor.environment = self.environment;
    }

    pub fn validate(&self) -> AppResult<()> {
        self.executor.validate()?;
        if !(2..=MAX_GRID_LEVELS).contains(&self.grid.levels) {
            return Err(AppError::Config(format!(
                "grid.levels must be within 2..={MAX_GRID_LEVELS}, got {}",
                self.grid.levels
            )));
        }
        if self.twap.intervals == 0 || self.twap.duration_secs == 0 {
            return Err(AppError::Config(
                "twap.intervals and twap.duration_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            environment: self.environment,
            ..self.executor.clone()
        }
    }
}
