//! Request signing and REST order execution.
//!
//! # Key Components
//!
//! - [`Signer`]: HMAC-SHA256 query signing with `timestamp` and `recvWindow`
//! - [`RequestExecutor`]: Signed/unsigned REST dispatch with uniform errors
//! - [`OrderGateway`]: Submission seam used by services and strategies
//! - [`PriceOracle`]: Ticker price lookup that degrades to `None`
//! - [`OrderService`]: Market, limit, stop-limit and OCO placement
//!
//! No component retries. Every failure surfaces to the caller as a value.

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod oracle;
pub mod orders;
pub mod signer;

pub use client::{HttpMethod, RequestExecutor, API_KEY_HEADER};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Credentials, Environment, ExecutorConfig, MAINNET_URL, TESTNET_URL};
pub use error::{
    ConfigError, ExecutionError, ExecutorResult, OrderError, SignerError, TransportError,
};
pub use gateway::{BoxFuture, DynOrderGateway, MockOrderGateway, OrderGateway};
pub use oracle::{PriceOracle, PriceSource, StaticPriceSource, TICKER_PRICE_PATH};
pub use orders::{
    build_limit, build_market, build_oco, build_stop_limit, LimitArgs, MarketArgs, OcoArgs,
    OrderService, StopLimitArgs,
};
pub use signer::{hmac_sha256_hex, sign_at, SignedRequest, Signer, DEFAULT_RECV_WINDOW_MS};
