//! Input validators.
//!
//! None of these raise. Each `parse_*` returns the typed value or `None`
//! after reporting an error record; each `valid_*` is the boolean form of the
//! matching parser. Callers must check the result before going further.

use crate::diagnostics::DiagnosticSink;
use crate::order::OrderSide;
use crate::symbol::Symbol;
use crate::{Price, Size};

const COMPONENT: &str = "validate";

/// Typed symbol if `raw` is non-empty ASCII alphanumerics.
pub fn parse_symbol(raw: &str, sink: &dyn DiagnosticSink) -> Option<Symbol> {
    let symbol = Symbol::parse(raw);
    if symbol.is_none() {
        sink.error(COMPONENT, &format!("Invalid symbol: {raw:?}"));
    }
    symbol
}

/// Typed side if `raw` is BUY or SELL in any case.
pub fn parse_side(raw: &str, sink: &dyn DiagnosticSink) -> Option<OrderSide> {
    match raw.parse::<OrderSide>() {
        Ok(side) => Some(side),
        Err(_) => {
            sink.error(COMPONENT, &format!("Invalid side: {raw:?}"));
            None
        }
    }
}

/// Typed quantity if `raw` is a number strictly greater than zero.
///
/// Scientific notation is accepted; see [`crate::decimal::parse_decimal`].
pub fn parse_quantity(raw: &str, sink: &dyn DiagnosticSink) -> Option<Size> {
    match raw.parse::<Size>() {
        Ok(qty) if qty.is_positive() => Some(qty),
        _ => {
            sink.error(COMPONENT, &format!("Invalid quantity: {raw:?}"));
            None
        }
    }
}

/// Typed price if `raw` is a number strictly greater than zero.
pub fn parse_price(raw: &str, sink: &dyn DiagnosticSink) -> Option<Price> {
    match raw.parse::<Price>() {
        Ok(price) if price.is_positive() => Some(price),
        _ => {
            sink.error(COMPONENT, &format!("Invalid price: {raw:?}"));
            None
        }
    }
}

pub fn valid_symbol(raw: &str, sink: &dyn DiagnosticSink) -> bool {
    parse_symbol(raw, sink).is_some()
}

pub fn valid_side(raw: &str, sink: &dyn DiagnosticSink) -> bool {
    parse_side(raw, sink).is_some()
}

pub fn valid_quantity(raw: &str, sink: &dyn DiagnosticSink) -> bool {
    parse_quantity(raw, sink).is_some()
}

pub fn valid_price(raw: &str, sink: &dyn DiagnosticSink) -> bool {
    parse_price(raw, sink).is_some()
}
