//! Command-line interface.

use bfx_core::{PositionSide, ResponseType, Size, TimeInForce, WorkingType};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Futures order execution toolkit
#[derive(Parser, Debug)]
#[command(name = "bfx", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (can also be set via BFX_CONFIG env var)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Print Prometheus metrics after the command completes
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Place a market order
    Market {
        symbol: String,
        side: String,
        quantity: String,
        #[arg(long, default_value = "BOTH")]
        position_side: PositionSide,
        #[arg(long)]
        reduce_only: bool,
    },

    /// Place a limit order
    Limit {
        symbol: String,
        side: String,
        quantity: String,
        price: String,
        #[arg(long, default_value = "GTC")]
        time_in_force: TimeInForce,
        #[arg(long, default_value = "BOTH")]
        position_side: PositionSide,
        #[arg(long)]
        reduce_only: bool,
        /// ACK or RESULT
        #[arg(long)]
        response_type: Option<ResponseType>,
    },

    /// Place a stop-limit order
    StopLimit {
        symbol: String,
        side: String,
        quantity: String,
        price: String,
        stop_price: String,
        #[arg(long, default_value = "GTC", value_parser = stop_limit_time_in_force)]
        time_in_force: TimeInForce,
        #[arg(long, default_value = "BOTH")]
        position_side: PositionSide,
        #[arg(long)]
        reduce_only: bool,
        #[arg(long, default_value = "CONTRACT_PRICE")]
        working_type: WorkingType,
    },

    /// Place a one-cancels-other take-profit / stop-limit pair
    Oco {
        symbol: String,
        side: String,
        quantity: String,
        take_profit_price: String,
        stop_price: String,
        stop_limit_price: String,
        #[arg(long, default_value = "GTC", value_parser = oco_time_in_force)]
        time_in_force: TimeInForce,
    },

    /// Place a symmetric grid of limit orders around the current price
    Grid {
        symbol: String,
        total_quantity: String,
        /// Orders per side (default from config)
        #[arg(long)]
        levels: Option<u32>,
        /// Level spacing in percent (default from config)
        #[arg(long)]
        profit_percent: Option<Decimal>,
    },

    /// Split an order into equal slices spread over a duration
    Twap {
        symbol: String,
        side: String,
        quantity: String,
        /// Number of slices (default from config)
        #[arg(long)]
        intervals: Option<u32>,
        /// Total duration in seconds (default from config)
        #[arg(long)]
        duration: Option<u64>,
        /// Rest every slice as a GTC limit order at this price
        #[arg(long)]
        limit_price: Option<String>,
        #[arg(long, default_value = "BOTH")]
        position_side: PositionSide,
        /// Round each slice down to this quantity step
        #[arg(long)]
        lot_size: Option<Size>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show the current price of a symbol
    Price { symbol: String },
}

fn restricted_time_in_force(raw: &str, allowed: &[TimeInForce]) -> Result<TimeInForce, String> {
    let tif = raw.parse::<TimeInForce>().map_err(|e| e.to_string())?;
    if allowed.contains(&tif) {
        Ok(tif)
    } else {
        let names: Vec<_> = allowed.iter().map(TimeInForce::as_wire).collect();
        Err(format!("expected one of {}", names.join(", ")))
    }
}

fn stop_limit_time_in_force(raw: &str) -> Result<TimeInForce, String> {
    restricted_time_in_force(raw, &[TimeInForce::Gtc, TimeInForce::Gtx])
}

fn oco_time_in_force(raw: &str) -> Result<TimeInForce, String> {
    restricted_time_in_force(raw, &[TimeInForce::Gtc, TimeInForce::Ioc, TimeInForce::Fok])
}
