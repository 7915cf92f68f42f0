//! REST request executor.
//!
//! One request per call, no internal retry. Authenticated calls are signed and
//! carry the API-key header; public calls carry neither. Every parameter goes
//! in the query string, including on POST.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bfx_core::{DiagnosticSink, QueryParams};
use bfx_telemetry::Metrics;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::{Credentials, ExecutorConfig};
use crate::error::{ConfigError, ExecutionError, TransportError};
use crate::signer::Signer;

/// API-key header attached to authenticated requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

const COMPONENT: &str = "executor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Venue error body on non-2xx responses.
#[derive(Debug, Deserialize)]
struct VenueError {
    code: i64,
    msg: String,
}

pub struct RequestExecutor<C: Clock = SystemClock> {
    client: Client,
    base_url: String,
    api_key: String,
    signer: Signer<C>,
    timeout: Duration,
    sink: Arc<dyn DiagnosticSink>,
}

impl RequestExecutor<SystemClock> {
    pub fn new(
        config: &ExecutorConfig,
        credentials: Credentials,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(config, credentials, SystemClock, sink)
    }
}

impl<C: Clock> RequestExecutor<C> {
    pub fn with_clock(
        config: &ExecutorConfig,
        credentials: Credentials,
        clock: C,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        if !credentials.is_complete() {
            sink.warn(
                COMPONENT,
                "API credentials incomplete; authenticated requests will be rejected",
            );
        }

        let Credentials {
            api_key,
            api_secret,
        } = credentials;

        Ok(Self {
            client,
            base_url: config.resolved_base_url().to_string(),
            api_key,
            signer: Signer::new(api_secret, config.recv_window_ms, clock, sink.clone()),
            timeout,
            sink,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the parsed JSON body.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all come
    /// back as [`ExecutionError`] tagged with `method` and `path`.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        params: QueryParams,
        authenticated: bool,
    ) -> Result<Value, ExecutionError> {
        let started = Instant::now();
        let result = self
            .dispatch(method, path, &params, authenticated)
            .await
            .map_err(|cause| ExecutionError::new(method, path, cause));
        let latency_ms = started.elapsed().as_secs_f64() * 1_000.0;

        match &result {
            Ok(_) => {
                Metrics::request(method.as_str(), path, "ok", latency_ms);
                debug!(%method, path, latency_ms, "Request succeeded");
            }
            Err(e) => {
                Metrics::request(method.as_str(), path, e.cause.label(), latency_ms);
                self.sink.error(COMPONENT, &format!("Request failed: {e}"));
            }
        }
        result
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        params: &QueryParams,
        authenticated: bool,
    ) -> Result<Value, TransportError> {
        let query = if authenticated {
            self.signer
                .sign(params)
                .map_err(|e| TransportError::Encode(e.to_string()))?
                .query_string()
        } else {
            serde_urlencoded::to_string(params)
                .map_err(|e| TransportError::Encode(e.to_string()))?
        };
        let url = build_url(&self.base_url, path, &query);

        let mut request = self.client.request(method.into(), &url);
        if authenticated {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        debug!(%method, path, authenticated, "Sending request");
        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_decode() || err.is_body() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl<C: Clock> fmt::Debug for RequestExecutor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("signer", &self.signer)
            .finish()
    }
}

/// `base + path`, plus `?query` when there is one.
pub(crate) fn build_url(base: &str, path: &str, query: &str) -> String {
    if query.is_empty() {
        format!("{base}{path}")
    } else {
        format!("{base}{path}?{query}")
    }
}

fn status_error(status: u16, body: String) -> TransportError {
    match serde_json::from_str::<VenueError>(&body) {
        Ok(venue) => TransportError::Api {
            status,
            code: venue.code,
            message: venue.msg,
        },
        Err(_) => TransportError::Status { status, body },
    }
}
