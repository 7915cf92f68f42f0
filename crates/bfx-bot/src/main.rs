//! bfx - futures order execution CLI.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use bfx_bot::app::{confirm, twap_order_type};
use bfx_bot::{AppConfig, Application, Cli, Command};
use bfx_executor::Credentials;
use bfx_telemetry::{init_logging, Metrics};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // `.env` is optional
    dotenv::dotenv().ok();

    let args = Cli::parse();

    let (config, source) = AppConfig::load(args.config.as_deref())?;
    init_logging(&config.logging)?;

    info!("Starting bfx v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => info!(
            path = %path.display(),
            environment = %config.environment,
            "Configuration loaded"
        ),
        None => warn!(
            environment = %config.environment,
            "Config file not found, using defaults"
        ),
    }

    if let Command::Twap {
        intervals,
        duration,
        limit_price,
        yes: false,
        ..
    } = &args.command
    {
        let intervals = intervals.unwrap_or(config.twap.intervals);
        let duration = duration.unwrap_or(config.twap.duration_secs);
        let order_type = twap_order_type(limit_price.as_deref());
        println!("\n⚠️  TWAP will place {intervals} {order_type} orders over {duration}s.");
        let stdin = io::stdin();
        if !confirm(&mut stdin.lock(), &mut io::stdout(), "Proceed?")? {
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let log_hint = config
        .logging
        .file
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| format!("Check {} for details.", p.display()))
        .unwrap_or_else(|| "Check the logs for details.".to_string());

    let app = Application::new(config, Credentials::from_env())?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current request");
            ctrl_c.cancel();
        }
    });

    let code = match app.run(args.command, cancel).await {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("❌ {e}. {log_hint}");
            ExitCode::FAILURE
        }
    };

    if args.metrics {
        print!("{}", Metrics::render()?);
    }

    Ok(code)
}
