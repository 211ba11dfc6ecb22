//! Chat proxy endpoint
//!
//! Flow: chat view -> `POST /api/chat` -> upstream `POST <base>/chat` -> chat view
//!
//! The handler forwards the inbound message to the configured upstream chat
//! service and relays whatever JSON the upstream sends back, verbatim and
//! with the upstream's own status code. The upstream contract (reply text,
//! citations, safety flags, error schema) is versionless and owned entirely
//! by the upstream; nothing here inspects or validates it.
//!
//! One attempt per inbound call. No retries, no backoff, no timeout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ProxyError;
use crate::state::AppState;

/// Longest upstream-body excerpt included in error responses
pub const MAX_DETAILS_LEN: usize = 500;

/// Inbound chat request
///
/// The `message` field is forwarded as-is; its type and presence are not
/// checked beyond the structural JSON parse of the body. A missing field
/// is forwarded as an explicit `null`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User-authored free text (or whatever the caller sent)
    #[serde(default)]
    pub message: Value,
}

/// Chat proxy handler for `POST /api/chat`
///
/// Extraction failures (non-JSON inbound body) take the same 500 error
/// path as a failed outbound request, so the rejection is accepted here
/// instead of letting axum answer with its own 4xx.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let Json(request) = body?;
    proxy_chat(&state.client, &state.upstream_base, request).await
}

/// Forward one chat message upstream and relay the result
///
/// - Upstream body parses as JSON: relayed unchanged with the upstream
///   status code.
/// - Upstream body is not JSON: [`ProxyError::UpstreamNonJson`] carrying
///   the upstream status and a bounded body excerpt.
/// - Outbound request fails: [`ProxyError::Upstream`].
async fn proxy_chat(
    client: &reqwest::Client,
    base_url: &str,
    request: ChatRequest,
) -> Result<Response, ProxyError> {
    let url = format!("{}/chat", base_url);
    debug!(url = %url, "Forwarding chat message upstream");

    let response = client.post(&url).json(&request).send().await?;
    let status = response.status().as_u16();
    let raw = response.text().await?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(parsed) => {
            debug!(
                status = status,
                body_len = raw.len(),
                "Relaying upstream reply"
            );
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((code, Json(parsed)).into_response())
        }
        Err(_) => {
            warn!(
                status = status,
                body_len = raw.len(),
                "Upstream returned a non-JSON body"
            );
            Err(ProxyError::UpstreamNonJson {
                status,
                details: excerpt(&raw, MAX_DETAILS_LEN),
            })
        }
    }
}

/// Bounded excerpt of the raw upstream body for diagnostics
///
/// Truncates to at most `max_len` bytes, backing off to the previous char
/// boundary so multi-byte text never splits.
fn excerpt(raw: &str, max_len: usize) -> String {
    if raw.len() <= max_len {
        return raw.to_string();
    }
    let mut end = max_len;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    raw[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;

    fn request(message: Value) -> ChatRequest {
        ChatRequest { message }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_proxy_chat_relays_upstream_json() {
        let mut server = Server::new_async().await;
        let upstream_body =
            r#"{"reply":"hello","citations":[],"safety":{"crisis":false,"out_of_scope":false}}"#;
        let mock = server
            .mock("POST", "/chat")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "message": "hi" })))
            .with_status(200)
            .with_body(upstream_body)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = proxy_chat(&client, &server.url(), request(json!("hi"))).await;

        mock.assert_async().await;
        let response = result.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::from_str::<Value>(upstream_body).unwrap()
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_proxy_chat_relays_upstream_error_status() {
        // Upstream JSON error bodies pass through untouched, status included
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(400)
            .with_body(r#"{"detail":"Empty message"}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = proxy_chat(&client, &server.url(), request(json!(""))).await;

        mock.assert_async().await;
        let response = result.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "detail": "Empty message" }));
    }

    #[tokio::test]
    #[serial]
    async fn test_proxy_chat_wraps_non_json_upstream() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(503)
            .with_body("<html>Service Unavailable</html>")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = proxy_chat(&client, &server.url(), request(json!("hi"))).await;

        mock.assert_async().await;
        match result.unwrap_err() {
            ProxyError::UpstreamNonJson { status, details } => {
                assert_eq!(status, 503);
                assert_eq!(details, "<html>Service Unavailable</html>");
            }
            other => panic!("expected UpstreamNonJson, got: {}", other),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_proxy_chat_bounds_non_json_details() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(500)
            .with_body("x".repeat(2000))
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = proxy_chat(&client, &server.url(), request(json!("hi"))).await;

        mock.assert_async().await;
        match result.unwrap_err() {
            ProxyError::UpstreamNonJson { details, .. } => {
                assert_eq!(details.len(), MAX_DETAILS_LEN);
            }
            other => panic!("expected UpstreamNonJson, got: {}", other),
        }
    }

    #[tokio::test]
    async fn test_proxy_chat_connection_refused() {
        // Port 9 is discard; nothing listens there in test environments
        let client = reqwest::Client::new();
        let result = proxy_chat(&client, "http://127.0.0.1:9", request(json!("hi"))).await;

        let error = result.unwrap_err();
        assert!(matches!(error, ProxyError::Upstream(_)));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    #[serial]
    async fn test_proxy_chat_forwards_missing_message_as_null() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_body(Matcher::Json(json!({ "message": null })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let inbound: ChatRequest = serde_json::from_str("{}").unwrap();
        let client = reqwest::Client::new();
        let result = proxy_chat(&client, &server.url(), inbound).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_excerpt_short_body_unchanged() {
        assert_eq!(excerpt("short", MAX_DETAILS_LEN), "short");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        // 'é' is two bytes; a naive byte slice at 5 would split it
        let raw = "aaaaé";
        assert_eq!(excerpt(raw, 5), "aaaa");
        assert_eq!(excerpt(raw, 6), "aaaaé");
    }
}
