// Unit Tests for Error Types
//
// UNIT UNDER TEST: CallError, ShapeError, RepairError, ChainError
//
// BUSINESS RESPONSIBILITY:
//   - Distinguish every failure kind so callers can react precisely
//   - Classify call errors for retry decisions and logging severity
//   - Produce a distinct, actionable user message per kind
//   - Keep the original shape error visible through repair failures
//
// TEST COVERAGE:
//   - Category, severity and retryability per variant
//   - User message distinctness
//   - Display output of shape errors
//   - Source chaining of composite errors

use crate::error::{
    CallError, ChainError, ErrorCategory, ErrorSeverity, FieldIssue, FieldProblem, MissingReason,
    RepairError, ShapeError, TemplateError,
};
use std::collections::HashSet;
use std::error::Error as _;
use std::time::Duration;

fn one_of_each_call_error() -> Vec<CallError> {
    vec![
        CallError::missing_configuration("OPENAI_MODEL", MissingReason::Unset),
        CallError::invalid_request("messages must not be empty"),
        CallError::timeout(Duration::from_secs(30)),
        CallError::transport_error("connection refused", None),
        CallError::remote_error(500, "internal error"),
        CallError::malformed_response("No choices in response"),
    ]
}

#[cfg(test)]
mod call_error_classification_tests {
    use super::*;

    #[test]
    fn test_only_transient_kinds_are_retryable() {
        let retryable: Vec<bool> = one_of_each_call_error()
            .iter()
            .map(CallError::is_retryable)
            .collect();

        assert_eq!(retryable, vec![false, false, true, true, true, false]);
    }

    #[test]
    fn test_remote_error_retryability_depends_on_status() {
        assert!(CallError::remote_error(429, "slow down").is_retryable());
        assert!(CallError::remote_error(408, "request timeout").is_retryable());
        assert!(CallError::remote_error(503, "unavailable").is_retryable());
        assert!(!CallError::remote_error(401, "bad key").is_retryable());
        assert!(!CallError::remote_error(400, "bad request").is_retryable());
    }

    #[test]
    fn test_categories_route_client_and_transient_failures() {
        assert_eq!(
            CallError::missing_configuration("OPENAI_API_KEY", MissingReason::Empty).category(),
            ErrorCategory::Client
        );
        assert_eq!(
            CallError::timeout(Duration::from_secs(1)).category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            CallError::remote_error(429, "slow down").category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            CallError::remote_error(401, "bad key").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            CallError::remote_error(502, "bad gateway").category(),
            ErrorCategory::External
        );
    }

    #[test]
    fn test_rate_limit_is_logged_as_warning() {
        assert_eq!(
            CallError::remote_error(429, "slow down").severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(
            CallError::remote_error(500, "boom").severity(),
            ErrorSeverity::Error
        );
    }

    #[test]
    fn test_every_kind_has_a_distinct_user_message() {
        // Test verifies the labs can tell the learner exactly what to fix per failure kind

        let messages: HashSet<String> = one_of_each_call_error()
            .iter()
            .map(CallError::user_message)
            .collect();

        assert_eq!(messages.len(), 6);
    }

    #[test]
    fn test_missing_configuration_message_names_variable_and_reason() {
        let err = CallError::missing_configuration("OPENAI_MODEL", MissingReason::Empty);

        assert_eq!(err.to_string(), "Missing configuration: OPENAI_MODEL is set but empty");
        assert!(err.user_message().contains("OPENAI_MODEL"));
    }

    #[test]
    fn test_remote_error_keeps_status_and_message() {
        let err = CallError::remote_error(401, "Incorrect API key provided");

        match &err {
            CallError::RemoteError { status, message } => {
                assert_eq!(*status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("Expected RemoteError, got {other:?}"),
        }
        assert!(err.user_message().contains("API key"));
    }
}

#[cfg(test)]
mod shape_error_tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_lists_every_problem() {
        let err = ShapeError::schema_mismatch(
            "TechInfo",
            vec![
                FieldProblem {
                    field: "creator".to_string(),
                    issue: FieldIssue::Missing,
                },
                FieldProblem {
                    field: "year_released".to_string(),
                    issue: FieldIssue::WrongType {
                        expected: "integer".to_string(),
                        found: "string".to_string(),
                    },
                },
            ],
        );

        assert_eq!(err.field_names(), vec!["creator", "year_released"]);
        assert_eq!(
            err.to_string(),
            "Output does not match schema `TechInfo`: `creator` is missing; \
             `year_released` should be integer but is string"
        );
    }

    #[test]
    fn test_not_a_member_lists_allowed_values() {
        let err = ShapeError::not_a_member(
            "expert",
            vec!["beginner".to_string(), "advanced".to_string()],
        );

        assert_eq!(err.to_string(), "`expert` is not one of: beginner, advanced");
        assert!(err.field_names().is_empty());
    }
}

#[cfg(test)]
mod composite_error_tests {
    use super::*;

    #[test]
    fn test_repair_error_exposes_original_shape_error() {
        let original = ShapeError::invalid_syntax("expected value", "{oops");

        let still_invalid = RepairError::StillInvalid(original.clone());
        let call_failed = RepairError::CallFailed {
            original: original.clone(),
            source: CallError::timeout(Duration::from_secs(5)),
        };

        assert_eq!(still_invalid.original(), &original);
        assert_eq!(call_failed.original(), &original);
        assert!(call_failed
            .source()
            .is_some_and(|s| s.to_string().contains("timed out")));
    }

    #[test]
    fn test_chain_error_wraps_each_stage_transparently() {
        let template: ChainError = TemplateError::MissingVariable {
            name: "topic".to_string(),
        }
        .into();
        let call: ChainError = CallError::remote_error(500, "boom").into();

        assert_eq!(template.to_string(), "Missing value for template variable `topic`");
        assert!(matches!(call, ChainError::Call(CallError::RemoteError { status: 500, .. })));
    }
}
