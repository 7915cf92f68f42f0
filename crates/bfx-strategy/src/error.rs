//! Strategy error types.

use bfx_core::CoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    /// Rejected before any order was submitted.
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Unable to fetch current price for {0}")]
    PriceUnavailable(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;
