//! Token counting and cost accounting.
//!
//! Tokens are "pieces of words": roughly four characters or three quarters of
//! a word each. Endpoints report exact counts in
//! [`TokenUsage`](crate::TokenUsage); this module turns those counts into
//! money and estimates prompt size locally before a request is sent.
//!
//! # Usage
//!
//! ```rust
//! use llm_labs::{CostBreakdown, TokenPricing, TokenUsage};
//!
//! let usage = TokenUsage::new(15, 53);
//! let cost = CostBreakdown::from_usage(&usage, &TokenPricing::GPT_4_1_MINI);
//! assert!(cost.output_cost > cost.input_cost);
//! ```

use crate::core_types::{Message, TokenUsage};
use crate::logging::{log_debug, log_warn};

use thiserror::Error;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Price of input and output tokens, in currency units per 1,000 tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl TokenPricing {
    /// GPT-4.1-mini: $0.80 / 1M input tokens, $3.20 / 1M output tokens.
    pub const GPT_4_1_MINI: Self = Self {
        input_per_1k: 0.0008,
        output_per_1k: 0.0032,
    };

    pub fn per_1k(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    /// Build from the per-million prices providers usually publish.
    pub fn per_million(input_per_1m: f64, output_per_1m: f64) -> Self {
        Self::per_1k(input_per_1m / 1000.0, output_per_1m / 1000.0)
    }
}

/// Cost of one call, split by direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    pub fn from_usage(usage: &TokenUsage, pricing: &TokenPricing) -> Self {
        let input_cost = f64::from(usage.prompt_tokens) / 1000.0 * pricing.input_per_1k;
        let output_cost = f64::from(usage.completion_tokens) / 1000.0 * pricing.output_per_1k;

        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to initialize tokenizer for {model}: {message}")]
pub struct TokenizerError {
    pub model: String,
    pub message: String,
}

/// Local token estimator backed by tiktoken.
///
/// | Model prefix | Encoding |
/// |--------------|----------|
/// | gpt-4o, gpt-4.1, gpt-5, o1, o3, o4 | o200k_base |
/// | gpt-4, gpt-3.5 | cl100k_base |
/// | anything else | cl100k_base (approximate) |
pub struct TokenCounter {
    tokenizer: CoreBPE,
    model_name: String,
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("model_name", &self.model_name)
            .finish()
    }
}

const O200K_PREFIXES: [&str; 6] = ["gpt-4o", "gpt-4.1", "gpt-5", "o1", "o3", "o4"];

impl TokenCounter {
    pub fn for_model(model: &str) -> Result<Self, TokenizerError> {
        let uses_o200k = O200K_PREFIXES.iter().any(|p| model.starts_with(p));
        let known = uses_o200k || model.starts_with("gpt-4") || model.starts_with("gpt-3.5");
        if !known {
            log_warn!(model = %model, "Unknown model, estimating with cl100k_base");
        }

        let tokenizer = if uses_o200k { o200k_base() } else { cl100k_base() }.map_err(|e| {
            TokenizerError {
                model: model.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            tokenizer,
            model_name: model.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn count_tokens(&self, text: &str) -> u32 {
        self.tokenizer.encode_with_special_tokens(text).len() as u32
    }

    /// Estimate the prompt tokens a conversation will be billed for,
    /// including per-message formatting overhead.
    pub fn count_message_tokens(&self, messages: &[Message]) -> u32 {
        let mut total_tokens = 3u32; // Base conversation formatting

        for message in messages {
            total_tokens += 4; // Message formatting tokens
            total_tokens += self.count_tokens(&message.role.to_string());
            total_tokens += self.count_tokens(&message.content);
        }

        total_tokens += 3; // Reply priming

        log_debug!(
            total_tokens = total_tokens,
            message_count = messages.len(),
            model = %self.model_name,
            "Estimated prompt token count"
        );

        total_tokens
    }
}
