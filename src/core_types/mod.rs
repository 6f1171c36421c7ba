//! Core value types shared by the runner, shaping and chain layers
//!
//! ## Organization
//! - `messages` - Roles, messages, per-call options and the validated request
//! - `response` - Response text and token usage

pub mod messages;
pub mod response;

pub use messages::{ChatRequest, Message, MessageRole, RequestOptions, DEFAULT_TIMEOUT};
pub use response::{Response, TokenUsage};
