//! Multi-order strategies built on the order gateway.
//!
//! - [`TwapScheduler`]: splits a parent quantity into equal slices spread
//!   evenly over a duration
//! - [`GridPlanner`]: symmetric ladder of limit orders around the current price

pub mod config;
pub mod error;
pub mod grid;
pub mod twap;

pub use config::{GridConfig, TwapConfig};
pub use error::{StrategyError, StrategyResult};
pub use grid::{plan_ladder, GridLeg, GridLevel, GridOutcome, GridPlanner, MAX_GRID_LEVELS};
pub use twap::{TwapExecution, TwapPlan, TwapRequest, TwapScheduler, TwapState, TwapSummary};
