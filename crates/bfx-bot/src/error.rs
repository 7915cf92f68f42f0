//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Executor configuration error: {0}")]
    Executor(#[from] bfx_executor::ConfigError),

    #[error("Order error: {0}")]
    Order(#[from] bfx_executor::OrderError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] bfx_strategy::StrategyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] bfx_telemetry::TelemetryError),

    /// The run completed but the venue accepted none of its orders.
    #[error("No orders placed: {0}")]
    NothingPlaced(String),

    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
