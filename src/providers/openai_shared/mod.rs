//! Shared OpenAI-compatible API structures and transport
//!
//! - `types` - Wire request/response structures
//! - `http` - The [`ChatTransport`] seam and its reqwest implementation

pub mod http;
pub mod types;

pub use http::{ChatTransport, HttpTransport};
pub use types::*;
