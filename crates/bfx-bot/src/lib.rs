//! Command-line front end for the futures execution toolkit.
//!
//! Loads configuration, wires one executor for the selected environment and
//! dispatches a single command per process.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::Application;
pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
