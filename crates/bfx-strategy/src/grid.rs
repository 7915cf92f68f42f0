//! Symmetric limit-order ladder around the current price.

use std::sync::Arc;

use bfx_core::validate::{parse_quantity, parse_symbol};
use bfx_core::{
    CoreError, DiagnosticSink, ExecutionResult, LimitOrder, OrderRequest, OrderSide, PositionSide,
    Price, Size, TimeInForce,
};
use bfx_executor::{OrderGateway, PriceSource};
use bfx_telemetry::Metrics;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::GridConfig;
use crate::error::{StrategyError, StrategyResult};

const COMPONENT: &str = "grid";

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLevel {
    pub side: OrderSide,
    /// Distance from the reference price in steps, starting at 1.
    pub level: u32,
    pub price: Price,
}

/// Largest accepted `levels`. The venue caps open orders per symbol at 200.
pub const MAX_GRID_LEVELS: u32 = 100;

/// Ladder prices: BUY rungs below `reference` first, then SELL rungs above,
/// each rounded to `price_decimals`. Rungs that would be non-positive are
/// dropped.
///
/// Returns `None` when a rung falls outside the decimal range.
pub fn plan_ladder(
    reference: Price,
    levels: u32,
    profit_percent: Decimal,
    price_decimals: u32,
) -> Option<Vec<GridLevel>> {
    let reference = reference.inner();
    let step = reference.checked_mul(profit_percent.checked_div(Decimal::ONE_HUNDRED)?)?;
    let mut ladder = Vec::new();

    for side in [OrderSide::Buy, OrderSide::Sell] {
        for level in 1..=levels {
            let offset = step.checked_mul(Decimal::from(level))?;
            let raw = match side {
                OrderSide::Buy => reference.checked_sub(offset)?,
                OrderSide::Sell => reference.checked_add(offset)?,
            };
            let price = Price::new(raw).round_dp(price_decimals);
            if !price.is_positive() {
                continue;
            }
            ladder.push(GridLevel { side, level, price });
        }
    }
    Some(ladder)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLeg {
    pub level: GridLevel,
    pub result: ExecutionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridOutcome {
    pub reference_price: Price,
    pub quantity_per_order: Size,
    /// Accepted legs in submission order.
    pub placed: Vec<GridLeg>,
    pub failed: u32,
}

pub struct GridPlanner {
    gateway: Arc<dyn OrderGateway>,
    prices: Arc<dyn PriceSource>,
    sink: Arc<dyn DiagnosticSink>,
    price_decimals: u32,
}

impl GridPlanner {
    pub fn new(
        gateway: Arc<dyn OrderGateway>,
        prices: Arc<dyn PriceSource>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            gateway,
            prices,
            sink,
            price_decimals: GridConfig::default().price_decimals,
        }
    }

    pub fn with_price_decimals(mut self, price_decimals: u32) -> Self {
        self.price_decimals = price_decimals;
        self
    }

    /// Place `levels` BUY and `levels` SELL limit orders, each for
    /// `total_quantity / (2 * levels)`.
    ///
    /// A rejected leg is reported and skipped; the rest of the ladder is still
    /// placed and nothing is cancelled afterwards.
    pub async fn place(
        &self,
        symbol: &str,
        total_quantity: &str,
        levels: u32,
        profit_percent: Decimal,
    ) -> StrategyResult<GridOutcome> {
        let sink = self.sink.as_ref();
        let symbol =
            parse_symbol(symbol, sink).ok_or_else(|| CoreError::validation("symbol", symbol))?;
        let total = parse_quantity(total_quantity, sink)
            .ok_or_else(|| CoreError::validation("quantity", total_quantity))?;

        if levels <= 1 {
            sink.error(COMPONENT, "Grid levels must be > 1");
            return Err(CoreError::validation("levels", levels.to_string()).into());
        }
        if levels > MAX_GRID_LEVELS {
            sink.error(COMPONENT, &format!("Grid levels must be <= {MAX_GRID_LEVELS}"));
            return Err(CoreError::validation("levels", levels.to_string()).into());
        }
        if profit_percent <= Decimal::ZERO {
            sink.error(COMPONENT, "Grid profit percent must be > 0");
            return Err(CoreError::validation("profit percent", profit_percent.to_string()).into());
        }

        let reference_price = self.prices.current_price(&symbol).await;
        let Some(reference_price) = reference_price.filter(Price::is_positive) else {
            sink.error(COMPONENT, "Unable to fetch current price");
            return Err(StrategyError::PriceUnavailable(symbol.to_string()));
        };

        let Some(ladder) =
            plan_ladder(reference_price, levels, profit_percent, self.price_decimals)
        else {
            sink.error(COMPONENT, "Grid step overflows the price range");
            return Err(CoreError::validation("profit percent", profit_percent.to_string()).into());
        };

        let quantity = total.split(levels * 2);
        sink.info(
            COMPONENT,
            &format!("Placing {levels}+{levels} grid orders of {quantity} at {reference_price}"),
        );

        let mut outcome = GridOutcome {
            reference_price,
            quantity_per_order: quantity,
            placed: Vec::new(),
            failed: 0,
        };

        for level in ladder {
            let order = OrderRequest::Limit(LimitOrder {
                symbol: symbol.clone(),
                side: level.side,
                quantity,
                price: level.price,
                time_in_force: TimeInForce::Gtc,
                position_side: PositionSide::Both,
                reduce_only: false,
                response_type: None,
            });

            match self.gateway.submit(order).await {
                Ok(body) => {
                    sink.info(
                        COMPONENT,
                        &format!("{} Grid {}: {}", level.side, level.level, level.price),
                    );
                    Metrics::grid_order(level.side.as_wire(), true);
                    outcome.placed.push(GridLeg {
                        level,
                        result: ExecutionResult::from_response(body),
                    });
                }
                Err(e) => {
                    sink.error(
                        COMPONENT,
                        &format!("Failed to place {} grid {}: {e}", level.side, level.level),
                    );
                    Metrics::grid_order(level.side.as_wire(), false);
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }
}
