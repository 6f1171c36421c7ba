//! # llm-labs
//!
//! A single hosted LLM call, done carefully: typed configuration from the
//! environment, one request with a bounded timeout, token usage and cost, and
//! output-shaping strategies that turn the reply into structured values.
//!
//! ## Key Features
//!
//! - **Configuration**: `OPENAI_*` and `GEMINI_*`/`GOOGLE_MODEL` variables read into an immutable value
//! - **Single-shot runner**: exactly one call, typed [`CallError`] for every failure
//! - **Output shaping**: text, lists, JSON, schema-checked records, regex extraction, fixed choices
//! - **Composition**: prompt templates, chains and a one-shot repair call
//! - **Accounting**: token usage, local estimation and cost per call
//!
//! ## Example
//!
//! ```rust,no_run
//! use llm_labs::{complete, Configuration, Message, RequestOptions};
//!
//! # async fn example() -> Result<(), llm_labs::CallError> {
//! let config = Configuration::load();
//! let messages = [
//!     Message::system("You are a helpful assistant."),
//!     Message::user("What is an LLM?"),
//! ];
//!
//! let response = complete(&config, &messages, &RequestOptions::default()).await?;
//! println!("{}", response.text);
//! if let Some(usage) = response.usage {
//!     println!("{} tokens", usage.total_tokens);
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod chain;
pub mod config;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod retry;
pub mod runner;
pub mod shaping;
pub mod tokens;

#[cfg(test)]
pub mod tests;

pub use chain::Chain;
pub use config::{Configuration, ConfigurationBuilder, Endpoint, ProviderSlot};
pub use error::{
    CallError, CallResult, ChainError, FieldIssue, FieldProblem, MissingReason, RepairError,
    ShapeError, ShapeResult, TemplateError,
};
pub use prompt::PromptTemplate;
pub use providers::{ChatTransport, HttpTransport};
pub use retry::{complete_with_retry, RetryPolicy};
pub use runner::{complete, RequestRunner};
pub use shaping::{
    DelimitedList, FieldKind, FieldSpec, FixedChoice, OutputSchema, OutputShaper,
    PatternExtraction, PlainText, Repair, RepairableShaper, SchemaTyped, ShapedOutput,
    StructuredData,
};
pub use tokens::{CostBreakdown, TokenCounter, TokenPricing, TokenizerError};

pub use core_types::{Message, MessageRole, RequestOptions, Response, TokenUsage, DEFAULT_TIMEOUT};
