//! Time-weighted slicing of a parent order.
//!
//! A run moves Idle → Running → Completed, or Idle → Failed when the request
//! does not validate (nothing is submitted in that case). Every slice carries
//! `total / intervals`; there is no remainder redistribution. Slices are spaced
//! `duration / intervals` apart and the wait suspends only the running task.
//! A failed slice is reported and skipped. Nothing is rolled back.

use std::sync::Arc;
use std::time::Duration;

use bfx_core::validate::{parse_price, parse_quantity, parse_side, parse_symbol};
use bfx_core::{
    CoreError, DiagnosticSink, ExecutionResult, OrderRequest, OrderSide, OrderType, PositionSide,
    Price, Size, SliceOrder, Symbol,
};
use bfx_executor::OrderGateway;
use bfx_telemetry::Metrics;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{StrategyError, StrategyResult};

const COMPONENT: &str = "twap";

/// Raw TWAP parameters as entered by the user.
#[derive(Debug, Clone)]
pub struct TwapRequest {
    pub symbol: String,
    pub side: String,
    pub total_quantity: String,
    pub intervals: u32,
    pub duration_secs: u64,
    /// `Market` or `Limit`. A limit run requires `limit_price`.
    pub order_type: OrderType,
    pub limit_price: Option<String>,
    pub position_side: PositionSide,
    /// Venue quantity step; slices are rounded down to it when set.
    pub lot_size: Option<Size>,
}

impl TwapRequest {
    pub fn market(
        symbol: &str,
        side: &str,
        total_quantity: &str,
        intervals: u32,
        duration_secs: u64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            total_quantity: total_quantity.to_string(),
            intervals,
            duration_secs,
            order_type: OrderType::Market,
            limit_price: None,
            position_side: PositionSide::Both,
            lot_size: None,
        }
    }

    pub fn limit(
        symbol: &str,
        side: &str,
        total_quantity: &str,
        intervals: u32,
        duration_secs: u64,
        limit_price: &str,
    ) -> Self {
        Self {
            order_type: OrderType::Limit,
            limit_price: Some(limit_price.to_string()),
            ..Self::market(symbol, side, total_quantity, intervals, duration_secs)
        }
    }
}

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwapPlan {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub total_quantity: Size,
    pub intervals: u32,
    pub slice_quantity: Size,
    pub inter_slice_delay: Duration,
    pub position_side: PositionSide,
    pub limit_price: Option<Price>,
}

impl TwapPlan {
    /// Validate `request`. The first invalid field is reported to `sink`.
    pub fn from_request(request: &TwapRequest, sink: &dyn DiagnosticSink) -> StrategyResult<Self> {
        let symbol = parse_symbol(&request.symbol, sink)
            .ok_or_else(|| CoreError::validation("symbol", &request.symbol))?;
        let side = parse_side(&request.side, sink)
            .ok_or_else(|| CoreError::validation("side", &request.side))?;
        let total_quantity = parse_quantity(&request.total_quantity, sink)
            .ok_or_else(|| CoreError::validation("quantity", &request.total_quantity))?;

        if request.intervals == 0 || request.duration_secs == 0 {
            sink.error(COMPONENT, "Invalid intervals or duration");
            return Err(CoreError::validation(
                "intervals/duration",
                format!("{}/{}", request.intervals, request.duration_secs),
            )
            .into());
        }

        let limit_price = match (request.order_type, request.limit_price.as_deref()) {
            (OrderType::Limit, Some(raw)) => Some(
                parse_price(raw, sink).ok_or_else(|| CoreError::validation("limit price", raw))?,
            ),
            (OrderType::Limit, None) => {
                sink.error(COMPONENT, "LIMIT TWAP requires a limit price");
                return Err(CoreError::validation("limit price", "").into());
            }
            (OrderType::Market, Some(raw)) => {
                sink.warn(
                    COMPONENT,
                    &format!("Ignoring limit price {raw:?} for MARKET TWAP"),
                );
                None
            }
            (OrderType::Market, None) => None,
            (other, _) => {
                sink.error(COMPONENT, &format!("Unsupported TWAP order type: {other}"));
                return Err(CoreError::validation("order type", other.as_wire()).into());
            }
        };

        let mut slice_quantity = total_quantity.split(request.intervals);
        if let Some(lot) = request.lot_size {
            slice_quantity = slice_quantity.round_to_lot(lot);
        }
        if !slice_quantity.is_positive() {
            sink.error(
                COMPONENT,
                &format!("Slice quantity {slice_quantity} is not tradable"),
            );
            return Err(CoreError::validation("slice quantity", slice_quantity.to_string()).into());
        }

        Ok(Self {
            symbol,
            side,
            total_quantity,
            intervals: request.intervals,
            slice_quantity,
            inter_slice_delay: Duration::from_secs(request.duration_secs) / request.intervals,
            position_side: request.position_side,
            limit_price,
        })
    }

    pub fn order_type(&self) -> OrderType {
        self.slice().order_type()
    }

    /// The order every slice submits.
    pub fn slice(&self) -> SliceOrder {
        SliceOrder {
            symbol: self.symbol.clone(),
            side: self.side,
            quantity: self.slice_quantity,
            position_side: self.position_side,
            limit_price: self.limit_price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TwapState {
    Idle,
    Running { next_slice: u32 },
    Completed,
    Failed,
}

/// Accumulator owned by one run.
#[derive(Debug, Clone, Serialize)]
pub struct TwapExecution {
    pub plan: TwapPlan,
    /// Successful slices in submission order.
    pub results: Vec<ExecutionResult>,
    pub attempted: u32,
    pub failed: u32,
    pub cancelled: bool,
    pub state: TwapState,
}

impl TwapExecution {
    fn new(plan: TwapPlan) -> Self {
        Self {
            plan,
            results: Vec::new(),
            attempted: 0,
            failed: 0,
            cancelled: false,
            state: TwapState::Idle,
        }
    }

    /// No slice succeeded.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Fewer slices succeeded than were planned.
    pub fn is_partial(&self) -> bool {
        (self.results.len() as u64) < u64::from(self.plan.intervals)
    }

    pub fn summarize(self) -> TwapSummary {
        TwapSummary::from_results(&self.results)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwapSummary {
    pub count: usize,
    pub total_executed_quantity: Size,
    /// Σ(avgPrice · executedQty) / Σ(executedQty); zero when nothing executed.
    pub volume_weighted_average_price: Price,
}

impl TwapSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let total_executed_quantity: Size = results.iter().map(|r| r.executed_qty).sum();
        let notional: Decimal = results.iter().map(ExecutionResult::notional).sum();

        let volume_weighted_average_price = if total_executed_quantity.is_zero() {
            Price::ZERO
        } else {
            Price::new(notional / total_executed_quantity.inner())
        };

        Self {
            count: results.len(),
            total_executed_quantity,
            volume_weighted_average_price,
        }
    }
}

pub struct TwapScheduler {
    gateway: Arc<dyn OrderGateway>,
    sink: Arc<dyn DiagnosticSink>,
}

impl TwapScheduler {
    pub fn new(gateway: Arc<dyn OrderGateway>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { gateway, sink }
    }

    pub async fn execute(&self, request: &TwapRequest) -> StrategyResult<TwapExecution> {
        self.execute_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Validate and run to completion, or until `cancel` fires.
    ///
    /// Cancellation is observed before each slice and during the wait between
    /// slices, never mid-request.
    pub async fn execute_with_cancel(
        &self,
        request: &TwapRequest,
        cancel: CancellationToken,
    ) -> StrategyResult<TwapExecution> {
        let plan = TwapPlan::from_request(request, self.sink.as_ref()).map_err(|e| {
            tracing::debug!(state = ?TwapState::Failed, error = %e, "TWAP rejected");
            e
        })?;
        Ok(self.run(plan, cancel).await)
    }

    pub async fn run(&self, plan: TwapPlan, cancel: CancellationToken) -> TwapExecution {
        let intervals = plan.intervals;
        let delay = plan.inter_slice_delay;
        self.sink.info(
            COMPONENT,
            &format!(
                "Executing TWAP: {intervals} {} orders of {} {} every {:.2}s",
                plan.order_type(),
                plan.slice_quantity,
                plan.symbol,
                delay.as_secs_f64()
            ),
        );

        let slice = plan.slice();
        let mut execution = TwapExecution::new(plan);

        for i in 0..intervals {
            if cancel.is_cancelled() {
                execution.cancelled = true;
                break;
            }
            execution.state = TwapState::Running { next_slice: i };
            execution.attempted += 1;

            match self.gateway.submit(OrderRequest::Slice(slice.clone())).await {
                Ok(body) => {
                    let result = ExecutionResult::from_response(body);
                    self.sink.info(
                        COMPONENT,
                        &format!(
                            "TWAP order {}/{intervals} placed: {:?}",
                            i + 1,
                            result.order_id
                        ),
                    );
                    Metrics::twap_slice_placed();
                    execution.results.push(result);
                }
                Err(e) => {
                    self.sink
                        .error(COMPONENT, &format!("TWAP order {} failed: {e}", i + 1));
                    Metrics::twap_slice_failed();
                    execution.failed += 1;
                }
            }

            if i + 1 < intervals {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {
                        execution.cancelled = true;
                        break;
                    }
                }
            }
        }

        if execution.cancelled {
            self.sink.warn(
                COMPONENT,
                &format!(
                    "TWAP cancelled after {}/{intervals} slices",
                    execution.attempted
                ),
            );
        }
        execution.state = TwapState::Completed;
        execution
    }
}
