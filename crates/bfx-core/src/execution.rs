//! Accepted-order result.

use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

use crate::{Price, Size};

/// Outcome of one accepted order.
///
/// Only `orderId`, `executedQty` and `avgPrice` are interpreted; the full
/// response is retained in `raw`. Fields the venue leaves out (a resting limit
/// order has no fill yet, OCO responses carry no top-level fill) read as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub order_id: Option<u64>,
    pub executed_qty: Size,
    pub avg_price: Price,
    pub raw: Value,
}

impl ExecutionResult {
    pub fn from_response(raw: Value) -> Self {
        let order_id = raw.get("orderId").and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
        let executed_qty = decimal_field::<Size>(&raw, "executedQty").unwrap_or(Size::ZERO);
        let avg_price = decimal_field::<Price>(&raw, "avgPrice").unwrap_or(Price::ZERO);

        Self {
            order_id,
            executed_qty,
            avg_price,
            raw,
        }
    }

    /// Fill notional: executed quantity times average price.
    pub fn notional(&self) -> rust_decimal::Decimal {
        self.executed_qty.notional(self.avg_price)
    }
}

/// Venue decimals arrive as strings ("0.010") but tolerate plain numbers.
fn decimal_field<T: FromStr>(raw: &Value, key: &str) -> Option<T> {
    match raw.get(key)? {
        Value::String(s) if !s.is_empty() => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_filled_market_order() {
        let raw = json!({
            "orderId": 283194212,
            "symbol": "BTCUSDT",
            "status": "FILLED",
            "executedQty": "0.002",
            "avgPrice": "64123.40",
        });
        let result = ExecutionResult::from_response(raw.clone());
        assert_eq!(result.order_id, Some(283194212));
        assert_eq!(result.executed_qty, Size::new(dec!(0.002)));
        assert_eq!(result.avg_price, Price::new(dec!(64123.40)));
        assert_eq!(result.raw, raw);
    }

    #[test]
    fn test_missing_fill_fields_read_as_zero() {
        let result = ExecutionResult::from_response(json!({"orderId": 7, "avgPrice": ""}));
        assert_eq!(result.executed_qty, Size::ZERO);
        assert_eq!(result.avg_price, Price::ZERO);
    }

    #[test]
    fn test_numeric_fields_accepted() {
        let result = ExecutionResult::from_response(json!({"executedQty": 1.5, "avgPrice": 10}));
        assert_eq!(result.order_id, None);
        assert_eq!(result.executed_qty, Size::new(dec!(1.5)));
        assert_eq!(result.notional(), dec!(15));
    }
}
