//! Order submission seam.
//!
//! Services and strategies submit through [`OrderGateway`] so tests can swap
//! the REST executor for [`MockOrderGateway`].

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bfx_core::{OrderRequest, Price};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::client::{HttpMethod, RequestExecutor};
use crate::clock::Clock;
use crate::error::{ExecutionError, TransportError};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Places one order and returns the venue's response body.
pub trait OrderGateway: Send + Sync {
    fn submit(&self, order: OrderRequest) -> BoxFuture<'_, Result<Value, ExecutionError>>;
}

impl<C: Clock> OrderGateway for RequestExecutor<C> {
    fn submit(&self, order: OrderRequest) -> BoxFuture<'_, Result<Value, ExecutionError>> {
        Box::pin(async move {
            self.execute(HttpMethod::Post, order.path(), order.to_params(), true)
                .await
        })
    }
}

/// Arc wrapper for OrderGateway trait objects.
pub type DynOrderGateway = Arc<dyn OrderGateway>;

/// Scripted gateway for tests.
///
/// Responses queued with [`push_response`](Self::push_response) are returned
/// first, in order. Once the queue is empty every order fills in full at the
/// configured fill price.
#[derive(Debug)]
pub struct MockOrderGateway {
    submissions: Mutex<Vec<(Instant, OrderRequest)>>,
    scripted: Mutex<VecDeque<Result<Value, ExecutionError>>>,
    fill_price: Mutex<Price>,
    next_order_id: AtomicU64,
}

impl Default for MockOrderGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrderGateway {
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            fill_price: Mutex::new(Price::ZERO),
            next_order_id: AtomicU64::new(1),
        }
    }

    pub fn with_fill_price(self, price: Price) -> Self {
        *self.fill_price.lock() = price;
        self
    }

    pub fn push_response(&self, response: Result<Value, ExecutionError>) {
        self.scripted.lock().push_back(response);
    }

    /// Queue a venue rejection for the next order.
    pub fn push_rejection(&self, code: i64, message: &str) {
        self.push_response(Err(ExecutionError::new(
            HttpMethod::Post,
            "/fapi/v1/order",
            TransportError::Api {
                status: 400,
                code,
                message: message.to_string(),
            },
        )));
    }

    pub fn submissions(&self) -> Vec<OrderRequest> {
        self.submissions
            .lock()
            .iter()
            .map(|(_, order)| order.clone())
            .collect()
    }

    /// When each submission arrived, on the tokio clock.
    pub fn submission_times(&self) -> Vec<Instant> {
        self.submissions.lock().iter().map(|(at, _)| *at).collect()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().len()
    }

    fn fill(&self, order: &OrderRequest) -> Value {
        let order_id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        json!({
            "orderId": order_id,
            "symbol": order.symbol().as_str(),
            "side": order.side().as_wire(),
            "status": "FILLED",
            "origQty": order.quantity().to_wire(),
            "executedQty": order.quantity().to_wire(),
            "avgPrice": self.fill_price.lock().to_wire(),
        })
    }
}

impl OrderGateway for MockOrderGateway {
    fn submit(&self, order: OrderRequest) -> BoxFuture<'_, Result<Value, ExecutionError>> {
        Box::pin(async move {
            let scripted = self.scripted.lock().pop_front();
            let response = match scripted {
                Some(response) => response,
                None => Ok(self.fill(&order)),
            };
            self.submissions.lock().push((Instant::now(), order));
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfx_core::{ExecutionResult, MarketOrder, OrderSide, PositionSide, Size, Symbol};
    use rust_decimal_macros::dec;

    fn market(qty: Size) -> OrderRequest {
        OrderRequest::Market(MarketOrder {
            symbol: Symbol::parse("BTCUSDT").unwrap(),
            side: OrderSide::Buy,
            quantity: qty,
            position_side: PositionSide::Both,
            reduce_only: false,
        })
    }

    #[tokio::test]
    async fn test_mock_fills_at_configured_price() {
        let gateway = MockOrderGateway::new().with_fill_price(Price::new(dec!(100)));
        let body = gateway.submit(market(Size::new(dec!(0.5)))).await.unwrap();
        let result = ExecutionResult::from_response(body);
        assert_eq!(result.order_id, Some(1));
        assert_eq!(result.executed_qty, Size::new(dec!(0.5)));
        assert_eq!(result.avg_price, Price::new(dec!(100)));
        assert_eq!(gateway.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_responses_first() {
        let gateway = MockOrderGateway::new();
        gateway.push_rejection(-2019, "Margin is insufficient.");
        let err = gateway.submit(market(Size::new(dec!(1)))).await.unwrap_err();
        assert!(err.to_string().contains("Margin is insufficient"));
        assert!(gateway.submit(market(Size::new(dec!(1)))).await.is_ok());
        assert_eq!(gateway.submissions().len(), 2);
    }
}
