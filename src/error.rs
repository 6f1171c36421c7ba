//! Error types for llm-labs.
//!
//! Two disjoint taxonomies cover the two layers of every lab:
//!
//! - [`CallError`] for configuration and network failures of a single request
//! - [`ShapeError`] for failures while shaping raw model text into a value
//!
//! [`TemplateError`] covers prompt template construction and rendering;
//! [`RepairError`] and [`ChainError`] wrap the above for composed calls.
//!
//! Every variant keeps enough detail (the missing variable name, the configured
//! timeout, the full list of mismatched fields) for a caller to print a
//! distinct, actionable message. Use the constructor methods: they log the
//! error at the appropriate level before returning it.
//!
//! # Example
//!
//! ```rust
//! use llm_labs::{CallError, error::ErrorCategory};
//! use std::time::Duration;
//!
//! let err = CallError::timeout(Duration::from_secs(30));
//! assert!(err.is_retryable());
//! assert_eq!(err.category(), ErrorCategory::Transient);
//! println!("{}", err.user_message());
//! ```

use crate::logging::{log_error, log_warn};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
///
/// Use [`CallError::category()`] to get the category for any call error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller can fix this (missing key, bad request, rejected credential).
    Client,

    /// The endpoint or the network misbehaved.
    External,

    /// Temporary failure; a repeated call may succeed.
    Transient,
}

/// Severity level for logging decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed and needs attention.
    Error,

    /// Unexpected but recoverable situation.
    Warning,
}

// ============================================================================
// Call errors
// ============================================================================

/// Result alias for request runner operations.
pub type CallResult<T> = std::result::Result<T, CallError>;

/// Why a required configuration value could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    /// The environment variable was never set.
    Unset,
    /// The environment variable is set to an empty string.
    Empty,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::Unset => write!(f, "not set"),
            MissingReason::Empty => write!(f, "set but empty"),
        }
    }
}

/// Errors that can occur while performing a single chat-completion call.
///
/// A call either fully succeeds with a [`Response`](crate::Response) or fails
/// with exactly one of these.
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `MissingConfiguration` | Client | No |
/// | `InvalidRequest` | Client | No |
/// | `Timeout` | Transient | Yes |
/// | `TransportError` | External | Yes |
/// | `RemoteError` | Client / Transient / External | 408, 429 and 5xx only |
/// | `MalformedResponse` | External | No |
#[derive(Error, Debug)]
pub enum CallError {
    /// A required configuration value is absent or empty.
    ///
    /// Raised before any network attempt.
    #[error("Missing configuration: {variable} is {reason}")]
    MissingConfiguration {
        /// Environment variable that has to be set.
        variable: &'static str,
        /// Whether it was unset or empty.
        reason: MissingReason,
    },

    /// The request itself violates the call contract (no user message,
    /// temperature out of range, zero timeout).
    ///
    /// Raised before any network attempt.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What is wrong with the request.
        message: String,
    },

    /// No reply arrived within the configured duration.
    #[error("Request timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// Connection, DNS, TLS or body-transfer failure.
    #[error("Transport error: {message}")]
    TransportError {
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The endpoint answered with a non-success status.
    #[error("Remote error {status}: {message}")]
    RemoteError {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the endpoint (or the raw body).
        message: String,
    },

    /// The reply did not have the expected choice/usage shape.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Details about what was missing or inconsistent.
        message: String,
    },
}

impl CallError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfiguration { .. } => ErrorCategory::Client,
            Self::InvalidRequest { .. } => ErrorCategory::Client,
            Self::Timeout { .. } => ErrorCategory::Transient,
            Self::TransportError { .. } => ErrorCategory::External,
            Self::RemoteError { status, .. } => match status {
                408 | 429 => ErrorCategory::Transient,
                s if *s >= 500 => ErrorCategory::External,
                _ => ErrorCategory::Client,
            },
            Self::MalformedResponse { .. } => ErrorCategory::External,
        }
    }

    /// Get the error severity for logging.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingConfiguration { .. } => ErrorSeverity::Error,
            Self::InvalidRequest { .. } => ErrorSeverity::Error,
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::TransportError { .. } => ErrorSeverity::Error,
            Self::RemoteError { status, .. } if *status == 429 => ErrorSeverity::Warning,
            Self::RemoteError { .. } => ErrorSeverity::Error,
            Self::MalformedResponse { .. } => ErrorSeverity::Warning,
        }
    }

    /// Whether a repeated, independently timed call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::TransportError { .. } => true,
            Self::RemoteError { status, .. } => matches!(status, 408 | 429) || *status >= 500,
            _ => false,
        }
    }

    /// Convert to an actionable message suitable for printing to the user.
    ///
    /// Every kind produces a different message so the lab scripts can tell
    /// the learner what to fix.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingConfiguration { variable, reason } => {
                format!("Set the {variable} environment variable (it is currently {reason})")
            }
            Self::InvalidRequest { message } => {
                format!("The request was not sent because it is invalid: {message}")
            }
            Self::Timeout { timeout } => format!(
                "The model did not answer within {}s. Try again or raise the timeout",
                timeout.as_secs_f64()
            ),
            Self::TransportError { .. } => {
                "Could not reach the model endpoint. Check the base URL and your network connection"
                    .to_string()
            }
            Self::RemoteError { status, message } => match status {
                401 | 403 => format!(
                    "The endpoint rejected the credential (HTTP {status}). Check your API key"
                ),
                404 => format!("The endpoint or model was not found (HTTP 404): {message}"),
                429 => "The endpoint is rate limiting requests. Wait a moment and try again"
                    .to_string(),
                _ => format!("The endpoint returned HTTP {status}: {message}"),
            },
            Self::MalformedResponse { .. } => {
                "The endpoint replied, but not in the chat-completion format. Check the base URL"
                    .to_string()
            }
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn missing_configuration(variable: &'static str, reason: MissingReason) -> Self {
        log_error!(
            error_type = "missing_configuration",
            variable = variable,
            reason = %reason,
            "Required configuration value is missing"
        );
        Self::MissingConfiguration { variable, reason }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "invalid_request",
            message = %message,
            "Chat request rejected before sending"
        );
        Self::InvalidRequest { message }
    }

    pub fn timeout(timeout: Duration) -> Self {
        log_warn!(
            error_type = "timeout",
            timeout_ms = timeout.as_millis() as u64,
            "LLM request timed out"
        );
        Self::Timeout { timeout }
    }

    pub fn transport_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(
            error_type = "transport_error",
            message = %message,
            has_source = source.is_some(),
            "LLM request could not be delivered"
        );
        Self::TransportError { message, source }
    }

    pub fn remote_error(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "remote_error",
            status = status,
            message = %message,
            "LLM endpoint returned an error status"
        );
        Self::RemoteError { status, message }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "malformed_response",
            message = %message,
            "LLM response format invalid"
        );
        Self::MalformedResponse { message }
    }
}

// ============================================================================
// Shape errors
// ============================================================================

/// Result alias for output-shaping strategies.
pub type ShapeResult<T> = std::result::Result<T, ShapeError>;

/// What is wrong with a single schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// A required field is absent.
    Missing,
    /// The field is present with the wrong JSON type.
    WrongType {
        /// Type declared by the schema.
        expected: String,
        /// Type found in the output.
        found: String,
    },
}

/// One missing or mistyped field in a schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    pub field: String,
    pub issue: FieldIssue,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            FieldIssue::Missing => write!(f, "`{}` is missing", self.field),
            FieldIssue::WrongType { expected, found } => {
                write!(f, "`{}` should be {expected} but is {found}", self.field)
            }
        }
    }
}

fn join_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors produced by output-shaping strategies.
///
/// Plain-text and delimited-list shaping never fail; the other strategies
/// document which of these they return.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// The text is not valid structured data.
    #[error("Invalid syntax: {message} (near `{offending}`)")]
    InvalidSyntax {
        /// Parser diagnostic.
        message: String,
        /// Substring of the input around the failure position.
        offending: String,
    },

    /// The parsed data does not match the declared schema.
    #[error("Output does not match schema `{schema}`: {}", join_problems(.problems))]
    SchemaMismatch {
        /// Name of the schema that was checked.
        schema: String,
        /// Every missing or mistyped field.
        problems: Vec<FieldProblem>,
    },

    /// The extraction pattern did not match the text.
    #[error("Pattern `{pattern}` did not match the output")]
    NoMatch {
        /// The pattern that was tried.
        pattern: String,
        /// The text it was tried against.
        text: String,
    },

    /// The text is not one of the allowed choices.
    #[error("`{value}` is not one of: {}", .allowed.join(", "))]
    NotAMember {
        /// The trimmed input.
        value: String,
        /// The declared choices.
        allowed: Vec<String>,
    },

    /// An extraction pattern could not be built.
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ShapeError {
    /// Names of the fields reported by a `SchemaMismatch`, in report order.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::SchemaMismatch { problems, .. } => {
                problems.iter().map(|p| p.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn invalid_syntax(message: impl Into<String>, offending: impl Into<String>) -> Self {
        let message = message.into();
        let offending = offending.into();
        log_warn!(
            error_type = "invalid_syntax",
            message = %message,
            offending = %offending,
            "Model output is not valid structured data"
        );
        Self::InvalidSyntax { message, offending }
    }

    pub fn schema_mismatch(schema: impl Into<String>, problems: Vec<FieldProblem>) -> Self {
        let schema = schema.into();
        log_warn!(
            error_type = "schema_mismatch",
            schema = %schema,
            problem_count = problems.len(),
            problems = %join_problems(&problems),
            "Model output does not match schema"
        );
        Self::SchemaMismatch { schema, problems }
    }

    pub fn no_match(pattern: impl Into<String>, text: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let text = text.into();
        log_warn!(
            error_type = "no_match",
            pattern = %pattern,
            text_preview = %text.chars().take(200).collect::<String>(),
            "Extraction pattern did not match model output"
        );
        Self::NoMatch { pattern, text }
    }

    pub fn not_a_member(value: impl Into<String>, allowed: Vec<String>) -> Self {
        let value = value.into();
        log_warn!(
            error_type = "not_a_member",
            value = %value,
            allowed = %allowed.join(", "),
            "Model output is not an allowed choice"
        );
        Self::NotAMember { value, allowed }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let message = message.into();
        log_error!(
            error_type = "invalid_pattern",
            pattern = %pattern,
            message = %message,
            "Extraction pattern rejected"
        );
        Self::InvalidPattern { pattern, message }
    }
}

// ============================================================================
// Template errors
// ============================================================================

/// Errors from building or rendering a [`PromptTemplate`](crate::PromptTemplate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A declared input variable was not supplied at render time.
    #[error("Missing value for template variable `{name}`")]
    MissingVariable { name: String },

    /// The template uses a placeholder that is neither an input nor a partial.
    #[error("Template placeholder `{name}` is not a declared input variable")]
    UndeclaredVariable { name: String },

    /// A `{` or `}` without a partner that is not escaped as `{{` / `}}`.
    #[error("Unbalanced brace at byte {position} in template")]
    UnbalancedBrace { position: usize },
}

// ============================================================================
// Composite errors
// ============================================================================

/// Outcome of a failed [`Repair`](crate::Repair) attempt.
///
/// Both variants carry the shape error that triggered the repair, so the
/// caller sees the original problem rather than a second-hand one.
#[derive(Error, Debug)]
pub enum RepairError {
    /// The corrective reply still could not be shaped.
    #[error("Output still invalid after one repair attempt: {0}")]
    StillInvalid(ShapeError),

    /// The corrective call itself failed.
    #[error("Repair call failed; original error: {original}")]
    CallFailed {
        original: ShapeError,
        #[source]
        source: CallError,
    },
}

impl RepairError {
    /// The shape error that triggered the repair.
    pub fn original(&self) -> &ShapeError {
        match self {
            Self::StillInvalid(original) | Self::CallFailed { original, .. } => original,
        }
    }
}

/// Failure of one stage of a [`Chain`](crate::Chain).
#[derive(Error, Debug)]
pub enum ChainError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
