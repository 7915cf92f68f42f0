//! Last-trade price lookup.

use std::collections::HashMap;
use std::sync::Arc;

use bfx_core::{DiagnosticSink, Price, QueryParams, Symbol};
use parking_lot::Mutex;
use serde_json::Value;

use crate::client::{HttpMethod, RequestExecutor};
use crate::clock::Clock;
use crate::gateway::BoxFuture;

/// Public ticker endpoint.
pub const TICKER_PRICE_PATH: &str = "/fapi/v1/ticker/price";

const COMPONENT: &str = "oracle";

/// Source of a symbol's current price. `None` means unavailable.
pub trait PriceSource: Send + Sync {
    fn current_price<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, Option<Price>>;
}

/// Ticker lookup over the public endpoint. Never fails: any transport or
/// parse problem is reported to the sink and yields `None`.
pub struct PriceOracle<C: Clock> {
    executor: Arc<RequestExecutor<C>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<C: Clock> PriceOracle<C> {
    pub fn new(executor: Arc<RequestExecutor<C>>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { executor, sink }
    }

    pub async fn fetch(&self, symbol: &Symbol) -> Option<Price> {
        let params = QueryParams::new().with("symbol", symbol);
        let body = match self
            .executor
            .execute(HttpMethod::Get, TICKER_PRICE_PATH, params, false)
            .await
        {
            Ok(body) => body,
            Err(e) => {
                self.sink
                    .error(COMPONENT, &format!("Failed to get current price: {e}"));
                return None;
            }
        };

        match parse_ticker(&body) {
            Some(price) => Some(price),
            None => {
                self.sink.error(
                    COMPONENT,
                    &format!("Failed to get current price: malformed ticker for {symbol}: {body}"),
                );
                None
            }
        }
    }
}

impl<C: Clock> PriceSource for PriceOracle<C> {
    fn current_price<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, Option<Price>> {
        Box::pin(self.fetch(symbol))
    }
}

/// `{"symbol": "...", "price": "64000.10", ...}`; the price may also be numeric.
/// A zero or negative price counts as malformed.
fn parse_ticker(body: &Value) -> Option<Price> {
    let price: Price = match body.get("price")? {
        Value::String(s) => s.parse().ok()?,
        Value::Number(n) => n.to_string().parse().ok()?,
        _ => return None,
    };
    Some(price).filter(Price::is_positive)
}

/// Fixed price table for tests and dry runs.
#[derive(Debug, Default)]
pub struct StaticPriceSource {
    prices: Mutex<HashMap<String, Price>>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, symbol: &str, price: Price) -> Self {
        self.set(symbol, price);
        self
    }

    pub fn set(&self, symbol: &str, price: Price) {
        self.prices.lock().insert(symbol.to_ascii_uppercase(), price);
    }

    pub fn remove(&self, symbol: &str) {
        self.prices.lock().remove(&symbol.to_ascii_uppercase());
    }
}

impl PriceSource for StaticPriceSource {
    fn current_price<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, Option<Price>> {
        let price = self.prices.lock().get(symbol.as_str()).copied();
        Box::pin(async move { price })
    }
}
