//! HMAC-SHA256 query signing.
//!
//! The signed string is the URL-encoded query with `timestamp` and
//! `recvWindow` appended after the caller's parameters. The signature is
//! computed over exactly that string and sent as the final `signature` pair.

use std::fmt;
use std::sync::Arc;

use bfx_core::{DiagnosticSink, QueryParams};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::clock::{Clock, SystemClock};
use crate::error::SignerError;

type HmacSha256 = Hmac<Sha256>;

/// Validity window the venue applies to `timestamp`.
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;

const COMPONENT: &str = "signer";

/// Lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
pub fn hmac_sha256_hex(secret: &[u8], message: &str) -> Result<String, SignerError> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| SignerError::Hmac(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Query ready to send: caller params, timestamp, recvWindow, signature.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Parameters including `timestamp` and `recvWindow`, excluding `signature`.
    pub params: QueryParams,
    pub timestamp: u64,
    pub recv_window: u64,
    /// Encoded form of `params`; the exact bytes the signature covers.
    pub payload: String,
    /// Empty when no secret is configured.
    pub signature: String,
}

impl SignedRequest {
    /// True when the request carries an empty signature.
    pub fn is_unsigned(&self) -> bool {
        self.signature.is_empty()
    }

    /// `payload&signature=<hex>`.
    pub fn query_string(&self) -> String {
        let mut query = String::with_capacity(self.payload.len() + 11 + self.signature.len());
        query.push_str(&self.payload);
        query.push_str("&signature=");
        query.push_str(&self.signature);
        query
    }
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("payload", &self.payload)
            .field("signed", &!self.signature.is_empty())
            .finish()
    }
}

/// Sign `params` at an explicit timestamp.
///
/// An empty `secret` yields an empty signature; callers decide whether to warn.
pub fn sign_at(
    params: &QueryParams,
    secret: &str,
    timestamp: u64,
    recv_window: u64,
) -> Result<SignedRequest, SignerError> {
    let mut params = params.clone();
    params
        .push("timestamp", timestamp)
        .push("recvWindow", recv_window);

    let payload =
        serde_urlencoded::to_string(&params).map_err(|e| SignerError::Encode(e.to_string()))?;

    let signature = if secret.is_empty() {
        String::new()
    } else {
        hmac_sha256_hex(secret.as_bytes(), &payload)?
    };

    Ok(SignedRequest {
        params,
        timestamp,
        recv_window,
        payload,
        signature,
    })
}

/// Stamps and signs queries with the configured secret.
pub struct Signer<C: Clock = SystemClock> {
    secret: Zeroizing<String>,
    recv_window_ms: u64,
    clock: C,
    sink: Arc<dyn DiagnosticSink>,
}

impl<C: Clock> Signer<C> {
    pub fn new(
        secret: Zeroizing<String>,
        recv_window_ms: u64,
        clock: C,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            secret,
            recv_window_ms,
            clock,
            sink,
        }
    }

    /// No secret configured; requests go out unsigned and the venue will reject them.
    pub fn is_degraded(&self) -> bool {
        self.secret.is_empty()
    }

    pub fn recv_window_ms(&self) -> u64 {
        self.recv_window_ms
    }

    pub fn sign(&self, params: &QueryParams) -> Result<SignedRequest, SignerError> {
        let signed = sign_at(
            params,
            &self.secret,
            self.clock.now_ms(),
            self.recv_window_ms,
        )?;
        if signed.is_unsigned() {
            self.sink.warn(
                COMPONENT,
                "API secret not configured; sending request with empty signature",
            );
        }
        Ok(signed)
    }
}

impl<C: Clock> fmt::Debug for Signer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("secret", &"<redacted>")
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}
