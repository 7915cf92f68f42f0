//! Request executor, oracle and order service against an in-process venue.

mod common;
use common::mock_venue::MockVenue;

use std::sync::Arc;

use bfx_core::{DiagnosticLevel, MemorySink, Price, QueryParams, Size, Symbol};
use bfx_executor::{
    hmac_sha256_hex, Credentials, ExecutorConfig, FixedClock, HttpMethod, MarketArgs, OcoArgs,
    OrderError, OrderService, PriceOracle, PriceSource, RequestExecutor, TransportError,
    API_KEY_HEADER,
};
use rust_decimal_macros::dec;

const SECRET: &str = "test-secret";

fn executor(url: &str, sink: Arc<MemorySink>) -> RequestExecutor<FixedClock> {
    RequestExecutor::with_clock(
        &ExecutorConfig::with_base_url(url),
        Credentials::new("test-key", SECRET),
        FixedClock::new(1_700_000_000_000),
        sink,
    )
    .unwrap()
}

#[tokio::test]
async fn test_signed_post_carries_key_and_valid_signature() {
    let venue = MockVenue::start().await;
    let sink = Arc::new(MemorySink::new());
    let exec = executor(&venue.url(), sink.clone());

    let params = QueryParams::new()
        .with("symbol", "BTCUSDT")
        .with("side", "BUY")
        .with("type", "MARKET")
        .with("quantity", "0.01");
    let body = exec
        .execute(HttpMethod::Post, "/fapi/v1/order", params, true)
        .await
        .unwrap();
    assert_eq!(body["orderId"], 42);

    let req = venue.last_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.api_key.as_deref(), Some("test-key"));
    assert_eq!(req.param("timestamp").as_deref(), Some("1700000000000"));
    assert_eq!(req.param("recvWindow").as_deref(), Some("5000"));

    let (payload, signature) = req.query.split_once("&signature=").unwrap();
    assert!(payload.starts_with("symbol=BTCUSDT&side=BUY&type=MARKET&quantity=0.01&timestamp="));
    assert_eq!(signature, hmac_sha256_hex(SECRET.as_bytes(), payload).unwrap());
    assert!(sink.records().is_empty());

    venue.shutdown();
}

#[tokio::test]
async fn test_unauthenticated_get_sends_no_key_or_signature() {
    let venue = MockVenue::start().await;
    let exec = executor(&venue.url(), Arc::new(MemorySink::new()));

    exec.execute(
        HttpMethod::Get,
        "/fapi/v1/ticker/price",
        QueryParams::new().with("symbol", "BTCUSDT"),
        false,
    )
    .await
    .unwrap();

    let req = venue.last_request();
    assert_eq!(req.api_key, None);
    assert_eq!(req.query, "symbol=BTCUSDT");
    assert!(req.param("signature").is_none());
    assert_eq!(API_KEY_HEADER.to_ascii_lowercase(), "x-mbx-apikey");

    venue.shutdown();
}

#[tokio::test]
async fn test_venue_rejection_carries_method_path_and_code() {
    let venue = MockVenue::start().await;
    let sink = Arc::new(MemorySink::new());
    let exec = executor(&venue.url(), sink.clone());

    let err = exec
        .execute(
            HttpMethod::Post,
            "/fapi/v1/order",
            QueryParams::new().with("symbol", "FAILUSDT"),
            true,
        )
        .await
        .unwrap_err();

    assert_eq!(err.method, HttpMethod::Post);
    assert_eq!(err.path, "/fapi/v1/order");
    assert_eq!(
        err.cause,
        TransportError::Api {
            status: 400,
            code: -1121,
            message: "Invalid symbol.".to_string()
        }
    );
    assert!(sink.contains(DiagnosticLevel::Error, "POST /fapi/v1/order failed"));
    // No internal retry.
    assert_eq!(venue.requests().len(), 1);

    venue.shutdown();
}

#[tokio::test]
async fn test_non_json_success_is_decode_error() {
    let venue = MockVenue::start().await;
    let exec = executor(&venue.url(), Arc::new(MemorySink::new()));

    let err = exec
        .execute(HttpMethod::Get, "/garbage", QueryParams::new(), false)
        .await
        .unwrap_err();
    assert!(matches!(err.cause, TransportError::Decode(_)));
    assert_eq!(venue.last_request().query, "");

    venue.shutdown();
}

#[tokio::test]
async fn test_slow_venue_times_out() {
    let venue = MockVenue::start().await;
    let config = ExecutorConfig {
        request_timeout_secs: 1,
        ..ExecutorConfig::with_base_url(venue.url())
    };
    let exec = RequestExecutor::new(
        &config,
        Credentials::new("k", "s"),
        Arc::new(MemorySink::new()),
    )
    .unwrap();

    let err = exec
        .execute(HttpMethod::Get, "/slow", QueryParams::new(), false)
        .await
        .unwrap_err();
    assert!(matches!(err.cause, TransportError::Timeout(_)));

    venue.shutdown();
}

#[tokio::test]
async fn test_unreachable_venue_is_network_error() {
    let exec = executor("http://127.0.0.1:1", Arc::new(MemorySink::new()));
    let err = exec
        .execute(HttpMethod::Get, "/fapi/v1/ticker/price", QueryParams::new(), false)
        .await
        .unwrap_err();
    assert!(matches!(err.cause, TransportError::Network(_)));
}

#[tokio::test]
async fn test_missing_credentials_warn_and_send_empty_signature() {
    let venue = MockVenue::start().await;
    let sink = Arc::new(MemorySink::new());
    let exec = RequestExecutor::with_clock(
        &ExecutorConfig::with_base_url(venue.url()),
        Credentials::default(),
        FixedClock::new(1),
        sink.clone(),
    )
    .unwrap();
    assert!(sink.contains(DiagnosticLevel::Warning, "credentials incomplete"));

    exec.execute(
        HttpMethod::Post,
        "/fapi/v1/order",
        QueryParams::new().with("symbol", "BTCUSDT"),
        true,
    )
    .await
    .unwrap();
    assert!(venue.last_request().query.ends_with("&signature="));
    assert!(sink.contains(DiagnosticLevel::Warning, "empty signature"));

    venue.shutdown();
}

#[tokio::test]
async fn test_oracle_price_and_degradation() {
    let venue = MockVenue::start().await;
    let sink = Arc::new(MemorySink::new());
    let exec = Arc::new(executor(&venue.url(), sink.clone()));
    let oracle = PriceOracle::new(exec, sink.clone());

    let btc = Symbol::parse("btcusdt").unwrap();
    assert_eq!(
        oracle.current_price(&btc).await,
        Some(Price::new(dec!(64000.10)))
    );
    assert_eq!(venue.last_request().query, "symbol=BTCUSDT");
    assert_eq!(venue.last_request().api_key, None);

    let malformed = Symbol::parse("NOPRICE").unwrap();
    assert_eq!(oracle.current_price(&malformed).await, None);

    let zero = Symbol::parse("ZEROUSDT").unwrap();
    assert_eq!(oracle.current_price(&zero).await, None);
    assert!(sink.contains(DiagnosticLevel::Error, "malformed ticker for ZEROUSDT"));

    let down = Symbol::parse("ETHUSDT").unwrap();
    assert_eq!(oracle.current_price(&down).await, None);
    assert!(sink.contains(DiagnosticLevel::Error, "Failed to get current price"));

    venue.shutdown();
}

#[tokio::test]
async fn test_order_service_round_trip() {
    let venue = MockVenue::start().await;
    let sink = Arc::new(MemorySink::new());
    let exec = Arc::new(executor(&venue.url(), sink.clone()));
    let oracle = Arc::new(PriceOracle::new(exec.clone(), sink.clone()));
    let service = OrderService::new(exec, oracle, sink.clone());

    let result = service
        .place_market(&MarketArgs::new("btcusdt", "sell", "0.25"))
        .await
        .unwrap();
    assert_eq!(result.order_id, Some(42));
    assert_eq!(result.executed_qty, Size::new(dec!(0.25)));
    assert_eq!(result.avg_price, Price::new(dec!(100.5)));

    let oco = OcoArgs::new("BTCUSDT", "SELL", "0.1", "70000", "60000", "59900");
    service.place_oco(&oco).await.unwrap();
    let req = venue.last_request();
    assert_eq!(req.path, "/fapi/v1/order/oco");
    assert_eq!(req.param("stopLimitTimeInForce").as_deref(), Some("GTC"));

    let err = service
        .place_market(&MarketArgs::new("FAILUSDT", "BUY", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Execution(_)));

    venue.shutdown();
}
