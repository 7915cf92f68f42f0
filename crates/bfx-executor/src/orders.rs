//! Order placement service.
//!
//! Each `place_*` call validates raw inputs, builds the typed request and
//! submits it once through the gateway. Validation failures are reported to
//! the sink before anything touches the network.

use std::sync::Arc;

use bfx_core::validate::{parse_price, parse_quantity, parse_side, parse_symbol};
use bfx_core::{
    CoreError, DiagnosticSink, ExecutionResult, LimitOrder, MarketOrder, OcoOrder, OrderRequest,
    PositionSide, Price, ResponseType, StopLimitOrder, TimeInForce, WorkingType,
};

use crate::error::OrderError;
use crate::gateway::OrderGateway;
use crate::oracle::PriceSource;

const COMPONENT: &str = "orders";

#[derive(Debug, Clone, Default)]
pub struct MarketArgs {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub position_side: PositionSide,
    pub reduce_only: bool,
}

impl MarketArgs {
    pub fn new(symbol: &str, side: &str, quantity: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity: quantity.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LimitArgs {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub time_in_force: TimeInForce,
    pub position_side: PositionSide,
    pub reduce_only: bool,
    pub response_type: Option<ResponseType>,
}

impl LimitArgs {
    pub fn new(symbol: &str, side: &str, quantity: &str, price: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StopLimitArgs {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub stop_price: String,
    pub time_in_force: TimeInForce,
    pub position_side: PositionSide,
    pub reduce_only: bool,
    pub working_type: WorkingType,
}

impl StopLimitArgs {
    pub fn new(symbol: &str, side: &str, quantity: &str, price: &str, stop_price: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            stop_price: stop_price.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OcoArgs {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub take_profit_price: String,
    pub stop_price: String,
    pub stop_limit_price: String,
    pub time_in_force: TimeInForce,
}

impl OcoArgs {
    pub fn new(
        symbol: &str,
        side: &str,
        quantity: &str,
        take_profit_price: &str,
        stop_price: &str,
        stop_limit_price: &str,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity: quantity.to_string(),
            take_profit_price: take_profit_price.to_string(),
            stop_price: stop_price.to_string(),
            stop_limit_price: stop_limit_price.to_string(),
            time_in_force: TimeInForce::Gtc,
        }
    }
}

fn require<T>(value: Option<T>, field: &'static str, raw: &str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::validation(field, raw))
}

/// Validate and build a market order. Stops at the first invalid field.
pub fn build_market(
    args: &MarketArgs,
    sink: &dyn DiagnosticSink,
) -> Result<OrderRequest, CoreError> {
    Ok(OrderRequest::Market(MarketOrder {
        symbol: require(parse_symbol(&args.symbol, sink), "symbol", &args.symbol)?,
        side: require(parse_side(&args.side, sink), "side", &args.side)?,
        quantity: require(parse_quantity(&args.quantity, sink), "quantity", &args.quantity)?,
        position_side: args.position_side,
        reduce_only: args.reduce_only,
    }))
}

pub fn build_limit(args: &LimitArgs, sink: &dyn DiagnosticSink) -> Result<OrderRequest, CoreError> {
    Ok(OrderRequest::Limit(LimitOrder {
        symbol: require(parse_symbol(&args.symbol, sink), "symbol", &args.symbol)?,
        side: require(parse_side(&args.side, sink), "side", &args.side)?,
        quantity: require(parse_quantity(&args.quantity, sink), "quantity", &args.quantity)?,
        price: require(parse_price(&args.price, sink), "price", &args.price)?,
        time_in_force: args.time_in_force,
        position_side: args.position_side,
        reduce_only: args.reduce_only,
        response_type: args.response_type,
    }))
}

pub fn build_stop_limit(
    args: &StopLimitArgs,
    sink: &dyn DiagnosticSink,
) -> Result<OrderRequest, CoreError> {
    Ok(OrderRequest::StopLimit(StopLimitOrder {
        symbol: require(parse_symbol(&args.symbol, sink), "symbol", &args.symbol)?,
        side: require(parse_side(&args.side, sink), "side", &args.side)?,
        quantity: require(parse_quantity(&args.quantity, sink), "quantity", &args.quantity)?,
        price: require(parse_price(&args.price, sink), "price", &args.price)?,
        stop_price: require(parse_price(&args.stop_price, sink), "stop price", &args.stop_price)?,
        time_in_force: args.time_in_force,
        position_side: args.position_side,
        reduce_only: args.reduce_only,
        working_type: args.working_type,
    }))
}

pub fn build_oco(args: &OcoArgs, sink: &dyn DiagnosticSink) -> Result<OrderRequest, CoreError> {
    let symbol = require(parse_symbol(&args.symbol, sink), "symbol", &args.symbol)?;
    let side = require(parse_side(&args.side, sink), "side", &args.side)?;
    let quantity = require(parse_quantity(&args.quantity, sink), "quantity", &args.quantity)?;

    let prices = oco_prices(args, sink);
    let Some((take_profit_price, stop_price, stop_limit_price)) = prices else {
        sink.error(COMPONENT, "Invalid prices for OCO order.");
        return Err(CoreError::validation(
            "OCO prices",
            format!(
                "{}/{}/{}",
                args.take_profit_price, args.stop_price, args.stop_limit_price
            ),
        ));
    };

    Ok(OrderRequest::Oco(OcoOrder {
        symbol,
        side,
        quantity,
        take_profit_price,
        stop_price,
        stop_limit_price,
        stop_limit_time_in_force: args.time_in_force,
    }))
}

fn oco_prices(args: &OcoArgs, sink: &dyn DiagnosticSink) -> Option<(Price, Price, Price)> {
    Some((
        parse_price(&args.take_profit_price, sink)?,
        parse_price(&args.stop_price, sink)?,
        parse_price(&args.stop_limit_price, sink)?,
    ))
}

/// Market, limit, stop-limit and OCO placement over one gateway.
pub struct OrderService {
    gateway: Arc<dyn OrderGateway>,
    prices: Arc<dyn PriceSource>,
    sink: Arc<dyn DiagnosticSink>,
}

impl OrderService {
    pub fn new(
        gateway: Arc<dyn OrderGateway>,
        prices: Arc<dyn PriceSource>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            gateway,
            prices,
            sink,
        }
    }

    pub async fn place_market(&self, args: &MarketArgs) -> Result<ExecutionResult, OrderError> {
        let order = build_market(args, self.sink.as_ref())?;
        self.submit(order, "Market order").await
    }

    pub async fn place_limit(&self, args: &LimitArgs) -> Result<ExecutionResult, OrderError> {
        let order = build_limit(args, self.sink.as_ref())?;
        self.submit(order, "Limit order").await
    }

    /// Logs the current price before submitting; a missing price does not
    /// block the order.
    pub async fn place_stop_limit(
        &self,
        args: &StopLimitArgs,
    ) -> Result<ExecutionResult, OrderError> {
        let order = build_stop_limit(args, self.sink.as_ref())?;
        if let Some(current) = self.prices.current_price(order.symbol()).await {
            self.sink
                .info(COMPONENT, &format!("Current price: {current}"));
        }
        self.submit(order, "Stop-limit order").await
    }

    pub async fn place_oco(&self, args: &OcoArgs) -> Result<ExecutionResult, OrderError> {
        let order = build_oco(args, self.sink.as_ref())?;
        self.submit(order, "OCO order").await
    }

    async fn submit(
        &self,
        order: OrderRequest,
        label: &str,
    ) -> Result<ExecutionResult, OrderError> {
        match self.gateway.submit(order).await {
            Ok(body) => {
                let result = ExecutionResult::from_response(body);
                self.sink.info(
                    COMPONENT,
                    &format!("{label} placed: orderId={:?} body={}", result.order_id, result.raw),
                );
                Ok(result)
            }
            Err(e) => {
                self.sink
                    .error(COMPONENT, &format!("Failed to place {}: {e}", label.to_lowercase()));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockOrderGateway;
    use crate::oracle::StaticPriceSource;
    use bfx_core::{DiagnosticLevel, MemorySink, OrderSide, Size};
    use rust_decimal_macros::dec;

    struct Harness {
        gateway: Arc<MockOrderGateway>,
        prices: Arc<StaticPriceSource>,
        sink: Arc<MemorySink>,
        service: OrderService,
    }

    fn harness() -> Harness {
        let gateway = Arc::new(MockOrderGateway::new().with_fill_price(Price::new(dec!(64000))));
        let prices = Arc::new(StaticPriceSource::new());
        let sink = Arc::new(MemorySink::new());
        let service = OrderService::new(gateway.clone(), prices.clone(), sink.clone());
        Harness {
            gateway,
            prices,
            sink,
            service,
        }
    }

    #[tokio::test]
    async fn test_place_market_submits_typed_order() {
        let h = harness();
        let mut args = MarketArgs::new("btcusdt", "buy", "0.01");
        args.reduce_only = true;

        let result = h.service.place_market(&args).await.unwrap();
        assert_eq!(result.order_id, Some(1));
        assert_eq!(result.executed_qty, Size::new(dec!(0.01)));

        let sent = h.gateway.submissions();
        assert_eq!(sent.len(), 1);
        let params = sent[0].to_params();
        assert_eq!(params.get("symbol"), Some("BTCUSDT"));
        assert_eq!(params.get("side"), Some("BUY"));
        assert_eq!(params.get("reduceOnly"), Some("true"));
        assert!(h.sink.contains(DiagnosticLevel::Info, "Market order placed"));
    }

    #[tokio::test]
    async fn test_invalid_quantity_never_submits() {
        let h = harness();
        let err = h
            .service
            .place_market(&MarketArgs::new("BTCUSDT", "BUY", "0"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        assert_eq!(h.gateway.submission_count(), 0);
        assert!(h.sink.contains(DiagnosticLevel::Error, "Invalid quantity"));
    }

    #[tokio::test]
    async fn test_validation_stops_at_first_failure() {
        let h = harness();
        let args = LimitArgs::new("BTC-USDT", "hold", "abc", "-1");
        assert!(h.service.place_limit(&args).await.is_err());
        assert_eq!(h.sink.at_level(DiagnosticLevel::Error).len(), 1);
        assert!(h.sink.contains(DiagnosticLevel::Error, "Invalid symbol"));
    }

    #[tokio::test]
    async fn test_place_limit_with_options() {
        let h = harness();
        let mut args = LimitArgs::new("ETHUSDT", "sell", "2", "3500.5");
        args.time_in_force = TimeInForce::Gtx;
        args.position_side = PositionSide::Short;
        args.response_type = Some(ResponseType::Result);

        h.service.place_limit(&args).await.unwrap();
        let OrderRequest::Limit(order) = &h.gateway.submissions()[0] else {
            panic!("expected limit order");
        };
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.price, Price::new(dec!(3500.5)));
        assert_eq!(order.time_in_force, TimeInForce::Gtx);
        assert_eq!(order.response_type, Some(ResponseType::Result));
    }

    #[tokio::test]
    async fn test_stop_limit_logs_current_price_when_known() {
        let h = harness();
        h.prices.set("BTCUSDT", Price::new(dec!(61000)));
        let mut args = StopLimitArgs::new("BTCUSDT", "SELL", "0.1", "59000", "59500");
        args.working_type = WorkingType::MarkPrice;

        h.service.place_stop_limit(&args).await.unwrap();
        assert!(h.sink.contains(DiagnosticLevel::Info, "Current price: 61000"));
        let params = h.gateway.submissions()[0].to_params();
        assert_eq!(params.get("type"), Some("STOP"));
        assert_eq!(params.get("workingType"), Some("MARK_PRICE"));
    }

    #[tokio::test]
    async fn test_stop_limit_proceeds_without_price() {
        let h = harness();
        let args = StopLimitArgs::new("BTCUSDT", "SELL", "0.1", "59000", "59500");
        assert!(h.service.place_stop_limit(&args).await.is_ok());
        assert!(!h.sink.contains(DiagnosticLevel::Info, "Current price"));
    }

    #[tokio::test]
    async fn test_oco_invalid_prices() {
        let h = harness();
        let args = OcoArgs::new("BTCUSDT", "SELL", "0.1", "70000", "0", "59900");
        let err = h.service.place_oco(&args).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        assert!(h.sink.contains(DiagnosticLevel::Error, "Invalid price"));
        assert!(h.sink.contains(DiagnosticLevel::Error, "Invalid prices for OCO order"));
        assert_eq!(h.gateway.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_oco_goes_to_oco_endpoint() {
        let h = harness();
        let args = OcoArgs::new("BTCUSDT", "SELL", "0.1", "70000", "60000", "59900");
        h.service.place_oco(&args).await.unwrap();
        assert_eq!(h.gateway.submissions()[0].path(), bfx_core::OCO_PATH);
    }

    #[tokio::test]
    async fn test_rejection_surfaces_as_execution_error() {
        let h = harness();
        h.gateway.push_rejection(-2019, "Margin is insufficient.");
        let err = h
            .service
            .place_market(&MarketArgs::new("BTCUSDT", "BUY", "1"))
            .await
            .unwrap_err();
        let OrderError::Execution(e) = err else {
            panic!("expected execution error");
        };
        assert_eq!(e.path, "/fapi/v1/order");
        assert!(h.sink.contains(DiagnosticLevel::Error, "Failed to place market order"));
    }
}
