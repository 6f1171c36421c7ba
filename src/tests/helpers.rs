//! Test helper utilities for llm-labs unit tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use crate::config::{Configuration, Endpoint};
use crate::error::CallResult;
use crate::providers::openai_shared::{
    OpenAIChoice, OpenAIRequest, OpenAIResponse, OpenAIResponseMessage, OpenAIUsage,
};
use crate::providers::ChatTransport;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuration with both provider slots fully populated.
pub fn create_test_config() -> Configuration {
    Configuration::builder()
        .credential("sk-test-0123456789abcdef")
        .endpoint_base("https://api.test.invalid/v1")
        .model_id("gpt-4.1-mini")
        .secondary_credential("gemini-test-key")
        .secondary_model_id("gemini-2.5-flash")
        .build()
}

/// Successful wire reply with one choice and consistent usage.
pub fn create_success_reply(text: &str, prompt_tokens: u32, completion_tokens: u32) -> OpenAIResponse {
    OpenAIResponse {
        id: Some("chatcmpl-test".to_string()),
        model: Some("gpt-4.1-mini".to_string()),
        created: Some(1_700_000_000),
        choices: vec![OpenAIChoice {
            message: Some(OpenAIResponseMessage {
                role: Some("assistant".to_string()),
                content: Some(text.to_string()),
            }),
            finish_reason: Some("stop".to_string()),
        }],
        usage: Some(OpenAIUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }),
    }
}

/// Transport that waits before answering, for exercising the runner's deadline.
///
/// Use with `#[tokio::test(start_paused = true)]` so the wait costs no real time.
pub struct SlowTransport {
    pub delay: Duration,
    pub reply: OpenAIResponse,
}

#[async_trait]
impl ChatTransport for SlowTransport {
    async fn send(
        &self,
        _endpoint: &Endpoint,
        _request: &OpenAIRequest,
        _timeout: Duration,
    ) -> CallResult<OpenAIResponse> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

pub type ScriptedReply = fn() -> CallResult<OpenAIResponse>;

/// Transport that answers from a fixed script and counts calls.
///
/// Each call takes the next reply; once the script is exhausted the last
/// reply is repeated.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Vec<ScriptedReply>,
    calls: Arc<AtomicU32>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_with(mut self, reply: ScriptedReply) -> Self {
        self.replies.push(reply);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(
        &self,
        _endpoint: &Endpoint,
        _request: &OpenAIRequest,
        _timeout: Duration,
    ) -> CallResult<OpenAIResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let idx = call.min(self.replies.len().saturating_sub(1));
        (self.replies[idx])()
    }
}
