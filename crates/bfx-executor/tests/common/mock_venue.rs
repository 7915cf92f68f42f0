//! In-process HTTP server standing in for the futures venue.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tokio::task::JoinHandle;

/// One request as the venue saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub api_key: Option<String>,
}

impl RecordedRequest {
    pub fn params(&self) -> Vec<(String, String)> {
        serde_urlencoded::from_str(&self.query).unwrap_or_default()
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Default)]
struct VenueState {
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockVenue {
    addr: SocketAddr,
    state: Arc<VenueState>,
    handle: JoinHandle<()>,
}

impl MockVenue {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(VenueState::default());
        let app = Router::new().fallback(respond).with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Routes:
/// - `GET /fapi/v1/ticker/price`: BTCUSDT priced, NOPRICE malformed, ZEROUSDT at 0, others 500
/// - `POST /fapi/v1/order[/oco]`: FAILUSDT rejected with a venue error, others filled
/// - `GET /slow`: answers after 3 s
/// - `GET /garbage`: 200 with a non-JSON body
async fn respond(
    State(state): State<Arc<VenueState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let query = uri.query().unwrap_or_default().to_string();
    let api_key = headers
        .get("x-mbx-apikey")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: query.clone(),
        api_key,
    });

    let params: Vec<(String, String)> = serde_urlencoded::from_str(&query).unwrap_or_default();

    match (method.as_str(), uri.path()) {
        ("GET", "/fapi/v1/ticker/price") => match param(&params, "symbol") {
            Some("BTCUSDT") => {
                Json(json!({"symbol": "BTCUSDT", "price": "64000.10", "time": 1})).into_response()
            }
            Some("NOPRICE") => Json(json!({"symbol": "NOPRICE"})).into_response(),
            Some("ZEROUSDT") => {
                Json(json!({"symbol": "ZEROUSDT", "price": "0.00"})).into_response()
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        },
        ("POST", "/fapi/v1/order") | ("POST", "/fapi/v1/order/oco")
            if param(&params, "symbol") == Some("FAILUSDT") =>
        {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"code": -1121, "msg": "Invalid symbol."})),
            )
                .into_response()
        }
        ("POST", "/fapi/v1/order") | ("POST", "/fapi/v1/order/oco") => Json(json!({
            "orderId": 42,
            "status": "FILLED",
            "executedQty": param(&params, "quantity").unwrap_or("0"),
            "avgPrice": "100.5",
        }))
        .into_response(),
        ("GET", "/slow") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({})).into_response()
        }
        ("GET", "/garbage") => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
