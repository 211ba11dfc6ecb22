//! Error types and error handling for the proxy
//!
//! This module defines the single error-normalization policy for the chat
//! proxy. Every failure mode maps to one fixed JSON shape via
//! `IntoResponse`, so callers never see a raw transport error or an
//! unwrapped upstream body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Proxy-level error types
///
/// Each variant implements automatic conversion to an HTTP response via
/// `IntoResponse`:
///
/// - [`ProxyError::UpstreamNonJson`] → upstream status (502 when unusable),
///   body `{"error": "upstream_non_json", "status": <u16>, "details": <excerpt>}`
/// - [`ProxyError::Upstream`] → 500, body `{"error": <transport message>}`
/// - [`ProxyError::BadRequest`] → 500, body `{"error": <rejection message>}`
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Upstream responded, but the body was not parseable JSON
    #[error("upstream returned non-JSON body (status {status})")]
    UpstreamNonJson {
        /// HTTP status code reported by the upstream
        status: u16,
        /// Bounded excerpt of the raw upstream body, for diagnostics
        details: String,
    },

    /// The outbound request to the upstream failed (connect, DNS, etc.)
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The inbound request body was not parseable JSON
    #[error("invalid request body: {0}")]
    BadRequest(#[from] JsonRejection),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::UpstreamNonJson { status, details } => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let body = Json(json!({
                    "error": "upstream_non_json",
                    "status": status,
                    "details": details,
                }));
                (code, body).into_response()
            }
            ProxyError::Upstream(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
            ProxyError::BadRequest(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.body_text() })),
            )
                .into_response(),
        }
    }
}
