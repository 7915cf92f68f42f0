//! Structured logging and Prometheus metrics.
//!
//! - `init_logging`: tracing subscriber with env filter, pretty or JSON output,
//!   optionally mirrored to a log file
//! - `Metrics`: request, TWAP slice and grid order counters

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::Metrics;
