//! HTTP transport for OpenAI-compatible endpoints
//!
//! [`ChatTransport`] is the seam between the request runner and the network:
//! production code uses [`HttpTransport`], tests substitute a double.

use super::types::{OpenAIErrorBody, OpenAIRequest, OpenAIResponse};
use crate::config::Endpoint;
use crate::error::{CallError, CallResult};
use crate::logging::{log_debug, log_error, log_warn};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

/// Delivers one chat-completion request and decodes the reply.
///
/// Implementations perform exactly one attempt; they must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(
        &self,
        endpoint: &Endpoint,
        request: &OpenAIRequest,
        timeout: Duration,
    ) -> CallResult<OpenAIResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured reqwest client (proxies, custom TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the bearer authentication headers for OpenAI-compatible APIs
    pub fn build_auth_headers(credential: &str) -> CallResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {credential}")).map_err(|e| {
                CallError::invalid_request(format!("API key is not a valid header value: {e}"))
            })?,
        );

        Ok(headers)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(
        &self,
        endpoint: &Endpoint,
        request: &OpenAIRequest,
        timeout: Duration,
    ) -> CallResult<OpenAIResponse> {
        let url = endpoint.chat_completions_url();
        let headers = Self::build_auth_headers(&endpoint.credential)?;

        log_debug!(
            url = %url,
            model = %request.model,
            message_count = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| map_send_error(e, &url, timeout))?;

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        parse_success_response(response, timeout).await
    }
}

fn map_send_error(e: reqwest::Error, url: &str, timeout: Duration) -> CallError {
    if e.is_timeout() {
        return CallError::timeout(timeout);
    }
    log_error!(
        url = %url,
        error = %e,
        is_connect = e.is_connect(),
        "HTTP request failed"
    );
    CallError::transport_error(format!("Request failed: {e}"), Some(Box::new(e)))
}

/// Handle non-success HTTP responses
async fn handle_error_response(response: reqwest::Response) -> CallError {
    let status = response.status();
    let error_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            log_warn!(
                status = status.as_u16(),
                error = %e,
                "Could not read error response body; using the status reason"
            );
            String::new()
        }
    };

    CallError::remote_error(status.as_u16(), remote_message(status, &error_text))
}

/// Pick the most useful message out of an error body.
///
/// OpenAI sends `{"error": {...}}`; Gemini's compatibility layer sometimes
/// wraps the same envelope in a one-element array.
pub(crate) fn remote_message(status: reqwest::StatusCode, body: &str) -> String {
    let from_envelope = serde_json::from_str::<OpenAIErrorBody>(body)
        .ok()
        .or_else(|| {
            serde_json::from_str::<Vec<OpenAIErrorBody>>(body)
                .ok()
                .and_then(|v| v.into_iter().next())
        })
        .and_then(|b| b.error.message);

    match from_envelope {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

/// Parse successful HTTP response into OpenAIResponse
async fn parse_success_response(
    response: reqwest::Response,
    timeout: Duration,
) -> CallResult<OpenAIResponse> {
    let raw_body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            return CallError::timeout(timeout);
        }
        CallError::transport_error(format!("Failed to read response body: {e}"), Some(Box::new(e)))
    })?;

    serde_json::from_str(&raw_body).map_err(|e| {
        log_error!(
            error = %e,
            raw_body = %raw_body.chars().take(500).collect::<String>(),
            "Failed to parse response"
        );
        CallError::malformed_response(format!("Invalid response body: {e}"))
    })
}
