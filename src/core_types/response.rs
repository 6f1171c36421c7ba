//! Response and token usage types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token usage information
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens billed (prompt + completion)
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build usage from the two counts, deriving the total.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Whether `total_tokens == prompt_tokens + completion_tokens`.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.prompt_tokens) + u64::from(self.completion_tokens)
            == u64::from(self.total_tokens)
    }
}

/// Result of one successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Text of the first choice
    pub text: String,
    /// Token usage, when the endpoint reported it
    pub usage: Option<TokenUsage>,
    /// Completion id assigned by the endpoint
    pub id: Option<String>,
    /// Model that actually answered
    pub model: Option<String>,
    /// Why generation stopped (`stop`, `length`, ...)
    pub finish_reason: Option<String>,
    /// When the endpoint created the completion
    pub created: Option<DateTime<Utc>>,
}

impl Response {
    /// A response carrying only text and usage.
    pub fn new(text: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            text: text.into(),
            usage,
            id: None,
            model: None,
            finish_reason: None,
            created: None,
        }
    }
}
