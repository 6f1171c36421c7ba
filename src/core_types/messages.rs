//! Chat messages and the per-call request value.

use crate::config::Endpoint;
use crate::error::{CallError, CallResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout applied when [`RequestOptions::timeout`] is not set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Allowed temperature range, inclusive.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// Message roles accepted by chat-completion endpoints.
///
/// Serializes to exactly `"system"`, `"user"` and `"assistant"`; endpoints
/// validate this vocabulary strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Optional per-call settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RequestOptions {
    /// Deadline for the whole call; [`DEFAULT_TIMEOUT`] when `None`.
    pub timeout: Option<Duration>,
    /// Sampling temperature in `0.0..=2.0`; endpoint default when `None`.
    pub temperature: Option<f64>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The timeout that will actually be enforced.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// A validated request for exactly one call.
///
/// Constructed fresh per call by [`ChatRequest::build`]; it has no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    model_id: String,
    messages: Vec<Message>,
    timeout: Duration,
    temperature: Option<f64>,
}

impl ChatRequest {
    /// Validate the call inputs against the resolved endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::InvalidRequest`] if:
    /// - `messages` is empty or has no `user` entry
    /// - the temperature is outside `0.0..=2.0` (or not a number)
    /// - the timeout is zero
    pub fn build(
        endpoint: &Endpoint,
        messages: &[Message],
        options: &RequestOptions,
    ) -> CallResult<Self> {
        if messages.is_empty() {
            return Err(CallError::invalid_request("messages must not be empty"));
        }
        if !messages.iter().any(|m| m.role == MessageRole::User) {
            return Err(CallError::invalid_request(
                "messages must contain at least one user message",
            ));
        }
        if let Some(t) = options.temperature {
            if !TEMPERATURE_RANGE.contains(&t) {
                return Err(CallError::invalid_request(format!(
                    "temperature {t} is outside 0.0..=2.0"
                )));
            }
        }
        let timeout = options.effective_timeout();
        if timeout.is_zero() {
            return Err(CallError::invalid_request("timeout must be greater than zero"));
        }

        Ok(Self {
            model_id: endpoint.model_id.clone(),
            messages: messages.to_vec(),
            timeout,
            temperature: options.temperature,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }
}
