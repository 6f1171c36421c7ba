//! Test helper utilities for llm-labs integration tests
//!
//! This module provides reusable fixtures for tests that talk to a
//! wiremock server over real HTTP.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use llm_labs::{Configuration, Message};
use serde_json::Value;
use wiremock::ResponseTemplate;

pub const TEST_API_KEY: &str = "sk-test-integration-key";
pub const TEST_MODEL: &str = "gpt-4.1-mini";

/// Configuration whose primary endpoint is the mock server.
///
/// # Example
///
/// ```ignore
/// let mock_server = MockServer::start().await;
/// let config = create_test_config(&mock_server.uri());
/// ```
pub fn create_test_config(base_url: &str) -> Configuration {
    Configuration::builder()
        .credential(TEST_API_KEY)
        .endpoint_base(format!("{base_url}/v1"))
        .model_id(TEST_MODEL)
        .secondary_credential("gemini-test-key")
        .secondary_endpoint_base(format!("{base_url}/gemini"))
        .secondary_model_id("gemini-2.5-flash")
        .build()
}

/// Chat-completion body with one choice and consistent usage.
pub fn create_completion_body(text: &str, prompt_tokens: u32, completion_tokens: u32) -> Value {
    serde_json::json!({
        "id": "chatcmpl-integration",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": TEST_MODEL,
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": text
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

pub fn create_completion_response(text: &str, prompt_tokens: u32, completion_tokens: u32) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(create_completion_body(text, prompt_tokens, completion_tokens))
}

/// OpenAI-style error envelope.
pub fn create_error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "code": null
        }
    }))
}

pub fn create_test_messages() -> Vec<Message> {
    vec![
        Message::system("You are a helpful assistant."),
        Message::user("Say hello"),
    ]
}
