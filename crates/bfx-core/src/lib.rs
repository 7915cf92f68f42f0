//! Core domain types for the futures order-execution toolkit.
//!
//! This crate provides the types shared by every other crate:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `Symbol`, `OrderSide`, `PositionSide`, `TimeInForce`: Trading enums and identifiers
//! - `OrderRequest`: One typed variant per order kind
//! - `QueryParams`: Ordered wire parameters
//! - `validate`: Input predicates used before any network call
//! - `DiagnosticSink`: Injected destination for diagnostic records

pub mod decimal;
pub mod diagnostics;
pub mod error;
pub mod execution;
pub mod order;
pub mod params;
pub mod request;
pub mod symbol;
pub mod validate;

pub use decimal::{Price, Size};
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticSink, MemorySink, TracingSink};
pub use error::{CoreError, Result};
pub use execution::ExecutionResult;
pub use order::{OrderSide, OrderType, PositionSide, ResponseType, TimeInForce, WorkingType};
pub use params::QueryParams;
pub use request::{
    LimitOrder, MarketOrder, OcoOrder, OrderRequest, SliceOrder, StopLimitOrder, OCO_PATH,
    ORDER_PATH,
};
pub use symbol::Symbol;
