//! Provider wire formats
//!
//! Both configured providers are addressed through the OpenAI-compatible
//! `/chat/completions` route:
//!
//! ```text
//! openai_shared   <- wire types + HTTP transport
//!      |
//!      +-- ProviderSlot::Primary   (OPENAI_API_BASE, default api.openai.com/v1)
//!      +-- ProviderSlot::Secondary (GEMINI_API_BASE, default Gemini's OpenAI endpoint)
//! ```

pub mod openai_shared;

pub use openai_shared::{ChatTransport, HttpTransport};
