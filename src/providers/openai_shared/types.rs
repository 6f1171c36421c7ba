//! OpenAI-compatible data structures and types
//!
//! Contains the request/response structures of the `/chat/completions` route,
//! which both OpenAI and Gemini's compatibility endpoint speak.

use crate::core_types::{ChatRequest, MessageRole, Response, TokenUsage};
use crate::error::{CallError, CallResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible message structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: MessageRole,
    pub content: String,
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl From<&ChatRequest> for OpenAIRequest {
    fn from(request: &ChatRequest) -> Self {
        Self {
            model: request.model_id().to_string(),
            messages: request
                .messages()
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.temperature(),
        }
    }
}

/// OpenAI-compatible chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Unix timestamp in seconds
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

/// Choice in OpenAI response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub message: Option<OpenAIResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message in OpenAI response choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage information in OpenAI response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<OpenAIUsage> for TokenUsage {
    fn from(usage: OpenAIUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorBody {
    pub error: OpenAIErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl OpenAIResponse {
    /// Extract `choices[0].message.content` and check the usage arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::MalformedResponse`] if there is no choice, the
    /// first choice has no text content, or the reported total differs from
    /// prompt + completion tokens.
    pub fn into_response(self) -> CallResult<Response> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CallError::malformed_response("No choices in response"))?;

        let text = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| CallError::malformed_response("First choice has no message content"))?;

        let usage = self.usage.map(TokenUsage::from);
        if let Some(u) = usage {
            if !u.is_consistent() {
                return Err(CallError::malformed_response(format!(
                    "Usage total {} does not equal prompt {} + completion {}",
                    u.total_tokens, u.prompt_tokens, u.completion_tokens
                )));
            }
        }

        Ok(Response {
            text,
            usage,
            id: self.id,
            model: self.model,
            finish_reason: choice.finish_reason,
            created: self
                .created
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        })
    }
}
