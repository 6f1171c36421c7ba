//! Configuration resolved from the process environment.
//!
//! [`Configuration::load`] reads a fixed set of variables once per call and
//! never fails: absent values stay `None` and are reported later, when a
//! request actually needs them, through
//! [`CallError::MissingConfiguration`](crate::CallError::MissingConfiguration).
//!
//! | Variable | Field |
//! |----------|-------|
//! | `OPENAI_API_KEY` | `credential` |
//! | `OPENAI_API_BASE` | `endpoint_base` |
//! | `OPENAI_MODEL` | `model_id` |
//! | `GEMINI_API_KEY` | `secondary_credential` |
//! | `GEMINI_API_BASE` | `secondary_endpoint_base` |
//! | `GOOGLE_MODEL` | `secondary_model_id` |

use crate::error::{CallError, CallResult, MissingReason};
use crate::logging::log_debug;
use std::fmt;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GEMINI_API_BASE: &str = "GEMINI_API_BASE";
pub const GOOGLE_MODEL: &str = "GOOGLE_MODEL";

/// Base URL used when `OPENAI_API_BASE` is not set.
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible base URL of the Gemini API, used when `GEMINI_API_BASE` is not set.
pub const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Number of credential characters shown by [`Configuration::masked_credential`].
const VISIBLE_CREDENTIAL_CHARS: usize = 10;

/// Which provider a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderSlot {
    /// OpenAI (or any OpenAI-compatible endpoint behind `OPENAI_API_BASE`)
    Primary,
    /// Gemini through its OpenAI-compatible endpoint
    Secondary,
}

impl fmt::Display for ProviderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSlot::Primary => write!(f, "openai"),
            ProviderSlot::Secondary => write!(f, "gemini"),
        }
    }
}

/// Fully resolved address of one provider: where to send, with what, for which model.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub slot: ProviderSlot,
    pub base_url: String,
    pub credential: String,
    pub model_id: String,
}

impl Endpoint {
    /// URL of the chat-completion route under this endpoint's base.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("slot", &self.slot)
            .field("base_url", &self.base_url)
            .field("credential", &mask(&self.credential))
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// Immutable settings for one process run.
///
/// Build it once at startup with [`Configuration::load`] and pass it by
/// reference to whatever needs it. Tests build one with
/// [`Configuration::builder`] or [`Configuration::from_lookup`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub credential: Option<String>,
    pub endpoint_base: Option<String>,
    pub model_id: Option<String>,
    pub secondary_credential: Option<String>,
    pub secondary_endpoint_base: Option<String>,
    pub secondary_model_id: Option<String>,
}

impl Configuration {
    /// Read the configuration from the process environment.
    ///
    /// Never fails. A variable that is set to the empty string is kept as
    /// `Some("")` so callers can tell it apart from one that is unset.
    pub fn load() -> Self {
        let config = Self::from_lookup(|key| std::env::var(key).ok());

        log_debug!(
            has_credential = config.credential.is_some(),
            has_endpoint_base = config.endpoint_base.is_some(),
            model_id = config.model_id.as_deref().unwrap_or("<unset>"),
            has_secondary_credential = config.secondary_credential.is_some(),
            secondary_model_id = config.secondary_model_id.as_deref().unwrap_or("<unset>"),
            "Configuration loaded from environment"
        );

        config
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            credential: lookup(OPENAI_API_KEY),
            endpoint_base: lookup(OPENAI_API_BASE),
            model_id: lookup(OPENAI_MODEL),
            secondary_credential: lookup(GEMINI_API_KEY),
            secondary_endpoint_base: lookup(GEMINI_API_BASE),
            secondary_model_id: lookup(GOOGLE_MODEL),
        }
    }

    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Resolve the settings of one provider slot.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::MissingConfiguration`] naming the first required
    /// variable (credential, then model) that is unset or empty.
    pub fn endpoint(&self, slot: ProviderSlot) -> CallResult<Endpoint> {
        let (credential, base, model, default_base) = match slot {
            ProviderSlot::Primary => (
                (OPENAI_API_KEY, &self.credential),
                &self.endpoint_base,
                (OPENAI_MODEL, &self.model_id),
                DEFAULT_OPENAI_BASE,
            ),
            ProviderSlot::Secondary => (
                (GEMINI_API_KEY, &self.secondary_credential),
                &self.secondary_endpoint_base,
                (GOOGLE_MODEL, &self.secondary_model_id),
                DEFAULT_GEMINI_BASE,
            ),
        };

        let credential = require(credential.0, credential.1)?;
        let model_id = require(model.0, model.1)?;
        let base_url = match base.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => default_base.to_string(),
        };

        Ok(Endpoint {
            slot,
            base_url,
            credential,
            model_id,
        })
    }

    /// The primary credential with everything after the first ten characters hidden.
    pub fn masked_credential(&self) -> Option<String> {
        self.credential.as_deref().map(mask)
    }
}

fn require(variable: &'static str, value: &Option<String>) -> CallResult<String> {
    match value.as_deref() {
        None => Err(CallError::missing_configuration(variable, MissingReason::Unset)),
        Some(v) if v.trim().is_empty() => {
            Err(CallError::missing_configuration(variable, MissingReason::Empty))
        }
        Some(v) => Ok(v.trim().to_string()),
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(VISIBLE_CREDENTIAL_CHARS).collect();
    format!("{visible}...")
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("credential", &self.credential.as_deref().map(mask))
            .field("endpoint_base", &self.endpoint_base)
            .field("model_id", &self.model_id)
            .field(
                "secondary_credential",
                &self.secondary_credential.as_deref().map(mask),
            )
            .field("secondary_endpoint_base", &self.secondary_endpoint_base)
            .field("secondary_model_id", &self.secondary_model_id)
            .finish()
    }
}

/// Programmatic construction of a [`Configuration`].
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    pub fn credential(mut self, value: impl Into<String>) -> Self {
        self.config.credential = Some(value.into());
        self
    }

    pub fn endpoint_base(mut self, value: impl Into<String>) -> Self {
        self.config.endpoint_base = Some(value.into());
        self
    }

    pub fn model_id(mut self, value: impl Into<String>) -> Self {
        self.config.model_id = Some(value.into());
        self
    }

    pub fn secondary_credential(mut self, value: impl Into<String>) -> Self {
        self.config.secondary_credential = Some(value.into());
        self
    }

    pub fn secondary_endpoint_base(mut self, value: impl Into<String>) -> Self {
        self.config.secondary_endpoint_base = Some(value.into());
        self
    }

    pub fn secondary_model_id(mut self, value: impl Into<String>) -> Self {
        self.config.secondary_model_id = Some(value.into());
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}
