//! Wiring and command dispatch.

use std::io::{BufRead, Write};
use std::sync::Arc;

use bfx_core::{DiagnosticSink, OrderType, Symbol, TracingSink};
use bfx_executor::{
    Credentials, LimitArgs, MarketArgs, OcoArgs, OrderService, PriceOracle, PriceSource,
    RequestExecutor, StopLimitArgs, SystemClock,
};
use bfx_strategy::{GridPlanner, TwapRequest, TwapScheduler};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// System wired for one process: one environment, one executor.
pub struct Application {
    config: AppConfig,
    oracle: Arc<PriceOracle<SystemClock>>,
    orders: OrderService,
    grid: GridPlanner,
    twap: TwapScheduler,
    sink: Arc<dyn DiagnosticSink>,
}

impl Application {
    pub fn new(config: AppConfig, credentials: Credentials) -> AppResult<Self> {
        Self::with_sink(config, credentials, Arc::new(TracingSink))
    }

    pub fn with_sink(
        config: AppConfig,
        credentials: Credentials,
        sink: Arc<dyn DiagnosticSink>,
    ) -> AppResult<Self> {
        let executor = Arc::new(RequestExecutor::new(
            &config.executor_config(),
            credentials,
            sink.clone(),
        )?);
        info!(
            environment = %config.environment,
            base_url = executor.base_url(),
            "Executor ready"
        );

        let oracle = Arc::new(PriceOracle::new(executor.clone(), sink.clone()));
        let orders = OrderService::new(executor.clone(), oracle.clone(), sink.clone());
        let grid = GridPlanner::new(executor.clone(), oracle.clone(), sink.clone())
            .with_price_decimals(config.grid.price_decimals);
        let twap = TwapScheduler::new(executor, sink.clone());

        Ok(Self {
            config,
            oracle,
            orders,
            grid,
            twap,
            sink,
        })
    }

    /// Run one command and return the success message.
    ///
    /// `cancel` only affects TWAP runs.
    pub async fn run(&self, command: Command, cancel: CancellationToken) -> AppResult<String> {
        match command {
            Command::Market {
                symbol,
                side,
                quantity,
                position_side,
                reduce_only,
            } => {
                let args = MarketArgs {
                    position_side,
                    reduce_only,
                    ..MarketArgs::new(&symbol, &side, &quantity)
                };
                let result = self.orders.place_market(&args).await?;
                Ok(format!(
                    "✅ Market order placed successfully: {}",
                    display_order_id(result.order_id)
                ))
            }

            Command::Limit {
                symbol,
                side,
                quantity,
                price,
                time_in_force,
                position_side,
                reduce_only,
                response_type,
            } => {
                let args = LimitArgs {
                    time_in_force,
                    position_side,
                    reduce_only,
                    response_type,
                    ..LimitArgs::new(&symbol, &side, &quantity, &price)
                };
                let result = self.orders.place_limit(&args).await?;
                Ok(format!(
                    "✅ Limit order placed successfully: {}",
                    display_order_id(result.order_id)
                ))
            }

            Command::StopLimit {
                symbol,
                side,
                quantity,
                price,
                stop_price,
                time_in_force,
                position_side,
                reduce_only,
                working_type,
            } => {
                let args = StopLimitArgs {
                    time_in_force,
                    position_side,
                    reduce_only,
                    working_type,
                    ..StopLimitArgs::new(&symbol, &side, &quantity, &price, &stop_price)
                };
                let result = self.orders.place_stop_limit(&args).await?;
                Ok(format!(
                    "✅ Stop-limit order placed successfully: {}",
                    display_order_id(result.order_id)
                ))
            }

            Command::Oco {
                symbol,
                side,
                quantity,
                take_profit_price,
                stop_price,
                stop_limit_price,
                time_in_force,
            } => {
                let args = OcoArgs {
                    time_in_force,
                    ..OcoArgs::new(
                        &symbol,
                        &side,
                        &quantity,
                        &take_profit_price,
                        &stop_price,
                        &stop_limit_price,
                    )
                };
                self.orders.place_oco(&args).await?;
                Ok("✅ OCO order placed successfully.".to_string())
            }

            Command::Grid {
                symbol,
                total_quantity,
                levels,
                profit_percent,
            } => {
                let levels = levels.unwrap_or(self.config.grid.levels);
                let profit_percent = profit_percent.unwrap_or(self.config.grid.profit_percent);
                let outcome = self
                    .grid
                    .place(&symbol, &total_quantity, levels, profit_percent)
                    .await?;
                if outcome.placed.is_empty() {
                    return Err(AppError::NothingPlaced(format!(
                        "all {} grid orders rejected",
                        outcome.failed
                    )));
                }
                Ok(format!(
                    "✅ {} grid orders placed successfully ({} failed) around {}.",
                    outcome.placed.len(),
                    outcome.failed,
                    outcome.reference_price
                ))
            }

            Command::Twap {
                symbol,
                side,
                quantity,
                intervals,
                duration,
                limit_price,
                position_side,
                lot_size,
                yes: _,
            } => {
                let request = TwapRequest {
                    symbol,
                    side,
                    total_quantity: quantity,
                    intervals: intervals.unwrap_or(self.config.twap.intervals),
                    duration_secs: duration.unwrap_or(self.config.twap.duration_secs),
                    order_type: twap_order_type(limit_price.as_deref()),
                    limit_price,
                    position_side,
                    lot_size,
                };
                let execution = self.twap.execute_with_cancel(&request, cancel).await?;
                if execution.is_empty() {
                    return Err(AppError::NothingPlaced(format!(
                        "all {} TWAP slices failed",
                        execution.attempted
                    )));
                }
                let cancelled = execution.cancelled;
                let summary = execution.summarize();
                let headline = if cancelled {
                    "⚠️  TWAP Execution Cancelled"
                } else {
                    "✅ TWAP Execution Completed"
                };
                Ok(format!(
                    "{headline}\nTotal Orders: {}\nTotal Quantity: {}\nAverage Price: {}",
                    summary.count,
                    summary.total_executed_quantity,
                    summary.volume_weighted_average_price
                ))
            }

            Command::Price { symbol } => {
                let symbol = bfx_core::validate::parse_symbol(&symbol, self.sink.as_ref())
                    .ok_or_else(|| AppError::Config(format!("Invalid symbol: {symbol}")))?;
                self.price(&symbol).await
            }
        }
    }

    async fn price(&self, symbol: &Symbol) -> AppResult<String> {
        match self.oracle.current_price(symbol).await {
            Some(price) => Ok(format!("{symbol}: {price}")),
            None => Err(AppError::PriceUnavailable(symbol.to_string())),
        }
    }
}

fn display_order_id(order_id: Option<u64>) -> String {
    order_id.map_or_else(|| "<none>".to_string(), |id| id.to_string())
}

/// LIMIT when a price is given, MARKET otherwise.
pub fn twap_order_type(limit_price: Option<&str>) -> OrderType {
    if limit_price.is_some() {
        OrderType::Limit
    } else {
        OrderType::Market
    }
}

/// Ask a yes/no question; only `yes` or `y` (any case) confirm.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> std::io::Result<bool> {
    write!(output, "{prompt} (yes/no): ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "yes" | "y"))
}
