//! One-shot corrective re-invocation
//!
//! When a structured-data or schema-typed strategy rejects a reply,
//! [`Repair`] sends exactly one follow-up request showing the model its
//! format instructions, the rejected text and the error, then shapes the new
//! reply with the same strategy. If that also fails, the *original* error is
//! returned inside [`RepairError`].
//!
//! With the original prompt included ([`Repair::repair_with_prompt`]) the
//! model can answer the question again instead of only fixing the format.

use super::{preview, RepairableShaper, ShapedOutput};
use crate::config::{Configuration, ProviderSlot};
use crate::core_types::{Message, RequestOptions};
use crate::error::{RepairError, ShapeError};
use crate::logging::{log_info, log_warn};
use crate::providers::ChatTransport;
use crate::runner::RequestRunner;

#[derive(Debug, Clone)]
pub struct Repair<S> {
    base: S,
    slot: ProviderSlot,
    options: RequestOptions,
}

impl<S: RepairableShaper> Repair<S> {
    pub fn new(base: S) -> Self {
        Self {
            base,
            slot: ProviderSlot::Primary,
            options: RequestOptions::default(),
        }
    }

    /// Provider used for the corrective call.
    pub fn with_slot(mut self, slot: ProviderSlot) -> Self {
        self.slot = slot;
        self
    }

    /// Options for the corrective call.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn base(&self) -> &S {
        &self.base
    }

    /// Shape `raw`, falling back to one repair call if the base strategy rejects it.
    pub async fn shape_or_repair<T: ChatTransport>(
        &self,
        runner: &RequestRunner<T>,
        config: &Configuration,
        raw: &str,
    ) -> Result<ShapedOutput, RepairError> {
        match self.base.shape(raw) {
            Ok(output) => Ok(output),
            Err(error) => self.repair(runner, config, raw, error).await,
        }
    }

    /// Ask the model to fix `failed`, which the base strategy rejected with `error`.
    ///
    /// # Errors
    ///
    /// - [`RepairError::CallFailed`] if the corrective call fails
    /// - [`RepairError::StillInvalid`] if its reply is rejected too
    pub async fn repair<T: ChatTransport>(
        &self,
        runner: &RequestRunner<T>,
        config: &Configuration,
        failed: &str,
        error: ShapeError,
    ) -> Result<ShapedOutput, RepairError> {
        self.attempt(runner, config, failed, error, None).await
    }

    /// Like [`Repair::repair`], with the prompt that produced `failed`.
    pub async fn repair_with_prompt<T: ChatTransport>(
        &self,
        runner: &RequestRunner<T>,
        config: &Configuration,
        failed: &str,
        error: ShapeError,
        original_prompt: &str,
    ) -> Result<ShapedOutput, RepairError> {
        self.attempt(runner, config, failed, error, Some(original_prompt))
            .await
    }

    async fn attempt<T: ChatTransport>(
        &self,
        runner: &RequestRunner<T>,
        config: &Configuration,
        failed: &str,
        error: ShapeError,
        original_prompt: Option<&str>,
    ) -> Result<ShapedOutput, RepairError> {
        log_info!(
            error = %error,
            failed_preview = %preview(failed),
            with_prompt = original_prompt.is_some(),
            "Requesting repaired model output"
        );

        let prompt = self.repair_prompt(failed, &error, original_prompt);
        let messages = [Message::user(prompt)];

        let response = match runner
            .complete_with(config, self.slot, &messages, &self.options)
            .await
        {
            Ok(response) => response,
            Err(source) => {
                return Err(RepairError::CallFailed {
                    original: error,
                    source,
                })
            }
        };

        match self.base.shape(&response.text) {
            Ok(output) => {
                log_info!("Repaired model output accepted");
                Ok(output)
            }
            Err(second) => {
                log_warn!(
                    repair_error = %second,
                    "Repaired model output still rejected"
                );
                Err(RepairError::StillInvalid(error))
            }
        }
    }

    fn repair_prompt(&self, failed: &str, error: &ShapeError, original_prompt: Option<&str>) -> String {
        let mut prompt = String::new();

        if let Some(original) = original_prompt {
            prompt.push_str(&format!("Prompt:\n---\n{original}\n---\n\n"));
        }
        if let Some(instructions) = self.base.format_instructions() {
            prompt.push_str(&format!("Instructions:\n---\n{instructions}\n---\n\n"));
        }
        prompt.push_str(&format!(
            "Completion:\n---\n{failed}\n---\n\n\
             The completion above was rejected with this error:\n---\n{error}\n---\n\n"
        ));
        prompt.push_str(if original_prompt.is_some() {
            "Answer the prompt again, satisfying the instructions. Reply with the answer only."
        } else {
            "Rewrite the completion so it satisfies the instructions. Reply with the corrected completion only."
        });

        prompt
    }
}
