//! Single-shot request runner.
//!
//! [`RequestRunner::complete`] performs exactly one chat-completion call:
//!
//! 1. resolve the provider endpoint from the [`Configuration`]
//!    (fails with `MissingConfiguration` before touching the network)
//! 2. validate the messages and options into a [`ChatRequest`]
//! 3. send it through the [`ChatTransport`], bounded by the call's timeout
//! 4. extract the first choice and the token usage
//!
//! There is no internal retry. Callers who want one repeat the call, see
//! [`crate::retry`].

use crate::config::{Configuration, ProviderSlot};
use crate::core_types::{ChatRequest, Message, RequestOptions, Response};
use crate::error::{CallError, CallResult};
use crate::logging::{log_debug, log_info};
use crate::providers::openai_shared::OpenAIRequest;
use crate::providers::{ChatTransport, HttpTransport};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Issues one request per call through an injectable transport.
#[derive(Debug, Clone, Default)]
pub struct RequestRunner<T = HttpTransport> {
    transport: T,
}

impl RequestRunner<HttpTransport> {
    /// Runner backed by a fresh reqwest client.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: ChatTransport> RequestRunner<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `messages` to the primary provider.
    ///
    /// # Errors
    ///
    /// Exactly one [`CallError`]; see [`RequestRunner::complete_with`].
    pub async fn complete(
        &self,
        config: &Configuration,
        messages: &[Message],
        options: &RequestOptions,
    ) -> CallResult<Response> {
        self.complete_with(config, ProviderSlot::Primary, messages, options)
            .await
    }

    /// Send `messages` to the provider in `slot`.
    ///
    /// # Errors
    ///
    /// - [`CallError::MissingConfiguration`] if the slot's credential or model is unset or empty
    /// - [`CallError::InvalidRequest`] if the messages or options break the call contract
    /// - [`CallError::Timeout`] if no reply arrives within the effective timeout
    /// - [`CallError::TransportError`] on connection, DNS or TLS failure
    /// - [`CallError::RemoteError`] on a non-success status
    /// - [`CallError::MalformedResponse`] if the reply lacks a choice with content
    ///   or reports inconsistent usage
    pub async fn complete_with(
        &self,
        config: &Configuration,
        slot: ProviderSlot,
        messages: &[Message],
        options: &RequestOptions,
    ) -> CallResult<Response> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("llm_call", %request_id, provider = %slot);

        async move {
            let endpoint = config.endpoint(slot)?;
            let request = ChatRequest::build(&endpoint, messages, options)?;
            let wire = OpenAIRequest::from(&request);
            let timeout = request.timeout();

            log_debug!(
                model = %request.model_id(),
                message_count = request.messages().len(),
                timeout_ms = timeout.as_millis() as u64,
                temperature = ?request.temperature(),
                "Executing LLM request"
            );

            let start_time = Instant::now();
            // Dropping the in-flight future on expiry releases its connection.
            let reply = tokio::time::timeout(timeout, self.transport.send(&endpoint, &wire, timeout))
                .await
                .map_err(|_| CallError::timeout(timeout))??;
            let duration_ms = start_time.elapsed().as_millis() as u64;

            let response = reply.into_response()?;

            log_info!(
                model = %request.model_id(),
                duration_ms = duration_ms,
                prompt_tokens = response.usage.map(|u| u.prompt_tokens),
                completion_tokens = response.usage.map(|u| u.completion_tokens),
                total_tokens = response.usage.map(|u| u.total_tokens),
                "LLM request completed"
            );

            Ok(response)
        }
        .instrument(span)
        .await
    }
}

/// One call to the primary provider with a default [`HttpTransport`].
///
/// Convenience for scripts that make a single request; reuse a
/// [`RequestRunner`] when making several.
pub async fn complete(
    config: &Configuration,
    messages: &[Message],
    options: &RequestOptions,
) -> CallResult<Response> {
    RequestRunner::new().complete(config, messages, options).await
}
