//! Typed order requests.
//!
//! One variant per order kind, each carrying only the fields that kind
//! accepts. [`OrderRequest::to_params`] produces the unsigned wire parameters
//! in the order the venue documents them.

use serde::{Deserialize, Serialize};

use crate::order::{OrderSide, OrderType, PositionSide, ResponseType, TimeInForce, WorkingType};
use crate::params::QueryParams;
use crate::symbol::Symbol;
use crate::{Price, Size};

/// Single-order endpoint (market, limit, stop, TWAP slices, grid legs).
pub const ORDER_PATH: &str = "/fapi/v1/order";
/// One-cancels-other endpoint.
pub const OCO_PATH: &str = "/fapi/v1/order/oco";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Size,
    pub position_side: PositionSide,
    pub reduce_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Size,
    pub price: Price,
    pub time_in_force: TimeInForce,
    pub position_side: PositionSide,
    pub reduce_only: bool,
    pub response_type: Option<ResponseType>,
}

/// Limit order armed when the working price crosses `stop_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLimitOrder {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Size,
    pub price: Price,
    pub stop_price: Price,
    pub time_in_force: TimeInForce,
    pub position_side: PositionSide,
    pub reduce_only: bool,
    pub working_type: WorkingType,
}

/// Take-profit leg at `take_profit_price`, stop-limit leg triggered at
/// `stop_price` and resting at `stop_limit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcoOrder {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Size,
    pub take_profit_price: Price,
    pub stop_price: Price,
    pub stop_limit_price: Price,
    pub stop_limit_time_in_force: TimeInForce,
}

/// One TWAP slice. Market unless a limit price is attached, in which case it
/// rests GTC at that price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceOrder {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Size,
    pub position_side: PositionSide,
    pub limit_price: Option<Price>,
}

impl SliceOrder {
    pub fn order_type(&self) -> OrderType {
        if self.limit_price.is_some() {
            OrderType::Limit
        } else {
            OrderType::Market
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderRequest {
    Market(MarketOrder),
    Limit(LimitOrder),
    StopLimit(StopLimitOrder),
    Oco(OcoOrder),
    Slice(SliceOrder),
}

impl OrderRequest {
    /// Endpoint path the request is posted to.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Oco(_) => OCO_PATH,
            _ => ORDER_PATH,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Market(o) => &o.symbol,
            Self::Limit(o) => &o.symbol,
            Self::StopLimit(o) => &o.symbol,
            Self::Oco(o) => &o.symbol,
            Self::Slice(o) => &o.symbol,
        }
    }

    pub fn side(&self) -> OrderSide {
        match self {
            Self::Market(o) => o.side,
            Self::Limit(o) => o.side,
            Self::StopLimit(o) => o.side,
            Self::Oco(o) => o.side,
            Self::Slice(o) => o.side,
        }
    }

    pub fn quantity(&self) -> Size {
        match self {
            Self::Market(o) => o.quantity,
            Self::Limit(o) => o.quantity,
            Self::StopLimit(o) => o.quantity,
            Self::Oco(o) => o.quantity,
            Self::Slice(o) => o.quantity,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Market(_) => "market",
            Self::Limit(_) => "limit",
            Self::StopLimit(_) => "stop_limit",
            Self::Oco(_) => "oco",
            Self::Slice(_) => "slice",
        }
    }

    /// Unsigned wire parameters.
    pub fn to_params(&self) -> QueryParams {
        let mut p = QueryParams::new();
        match self {
            Self::Market(o) => {
                p.push("symbol", &o.symbol)
                    .push("side", o.side)
                    .push("type", OrderType::Market)
                    .push("quantity", o.quantity.to_wire())
                    .push("positionSide", o.position_side);
                if o.reduce_only {
                    p.push("reduceOnly", "true");
                }
            }
            Self::Limit(o) => {
                p.push("symbol", &o.symbol)
                    .push("side", o.side)
                    .push("type", OrderType::Limit)
                    .push("quantity", o.quantity.to_wire())
                    .push("price", o.price.to_wire())
                    .push("timeInForce", o.time_in_force)
                    .push("positionSide", o.position_side);
                if let Some(resp) = o.response_type {
                    p.push("newOrderRespType", resp);
                }
                if o.reduce_only {
                    p.push("reduceOnly", "true");
                }
            }
            Self::StopLimit(o) => {
                p.push("symbol", &o.symbol)
                    .push("side", o.side)
                    .push("type", OrderType::Stop)
                    .push("quantity", o.quantity.to_wire())
                    .push("price", o.price.to_wire())
                    .push("stopPrice", o.stop_price.to_wire())
                    .push("timeInForce", o.time_in_force)
                    .push("positionSide", o.position_side)
                    .push("workingType", o.working_type);
                if o.reduce_only {
                    p.push("reduceOnly", "true");
                }
            }
            Self::Oco(o) => {
                p.push("symbol", &o.symbol)
                    .push("side", o.side)
                    .push("quantity", o.quantity.to_wire())
                    .push("price", o.take_profit_price.to_wire())
                    .push("stopPrice", o.stop_price.to_wire())
                    .push("stopLimitPrice", o.stop_limit_price.to_wire())
                    .push("stopLimitTimeInForce", o.stop_limit_time_in_force);
            }
            Self::Slice(o) => {
                p.push("symbol", &o.symbol)
                    .push("side", o.side)
                    .push("type", o.order_type())
                    .push("quantity", o.quantity.to_wire())
                    .push("positionSide", o.position_side);
                if let Some(price) = o.limit_price {
                    p.push("price", price.to_wire())
                        .push("timeInForce", TimeInForce::Gtc);
                }
            }
        }
        p
    }
}
