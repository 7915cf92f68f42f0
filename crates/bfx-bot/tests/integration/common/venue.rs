//! Minimal futures venue: every ticker trades at 100, orders fill in full,
//! `FAILUSDT` is rejected.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Orders {
    queries: Mutex<Vec<String>>,
}

pub struct Venue {
    addr: SocketAddr,
    orders: Arc<Orders>,
    handle: JoinHandle<()>,
}

fn query_param(query: &str, key: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

async fn ticker(RawQuery(query): RawQuery) -> Response {
    let symbol = query
        .as_deref()
        .and_then(|q| query_param(q, "symbol"))
        .unwrap_or_default();
    Json(json!({"symbol": symbol, "price": "100"})).into_response()
}

async fn order(State(orders): State<Arc<Orders>>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    orders.queries.lock().push(query.clone());

    if query_param(&query, "symbol").as_deref() == Some("FAILUSDT") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
            .into_response();
    }
    let id = orders.queries.lock().len();
    Json(json!({
        "orderId": id,
        "executedQty": query_param(&query, "quantity").unwrap_or_default(),
        "avgPrice": query_param(&query, "price").unwrap_or_else(|| "100".to_string()),
    }))
    .into_response()
}

impl Venue {
    pub async fn start() -> Self {
        let orders = Arc::new(Orders::default());
        let app = Router::new()
            .route("/fapi/v1/ticker/price", get(ticker))
            .route("/fapi/v1/order", post(order))
            .route("/fapi/v1/order/oco", post(order))
            .with_state(orders.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            orders,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn order_queries(&self) -> Vec<String> {
        self.orders.queries.lock().clone()
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}
