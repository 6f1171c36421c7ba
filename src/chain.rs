//! Template → call → shape, composed explicitly.
//!
//! A [`Chain`] renders its [`PromptTemplate`] into a single user message, runs
//! one request and shapes the reply. Each stage fails with its own
//! [`ChainError`] variant.
//!
//! If the template declares a `format_instructions` input and the shaper has
//! instructions, the chain fills that variable in itself.

use crate::config::{Configuration, ProviderSlot};
use crate::core_types::RequestOptions;
use crate::error::ChainError;
use crate::logging::log_debug;
use crate::prompt::PromptTemplate;
use crate::providers::ChatTransport;
use crate::runner::RequestRunner;
use crate::shaping::{OutputShaper, ShapedOutput};

/// Input variable the chain fills with the shaper's format instructions.
pub const FORMAT_INSTRUCTIONS: &str = "format_instructions";

#[derive(Debug, Clone)]
pub struct Chain<S> {
    template: PromptTemplate,
    shaper: S,
    options: RequestOptions,
    slot: ProviderSlot,
}

impl<S: OutputShaper> Chain<S> {
    pub fn new(template: PromptTemplate, shaper: S) -> Self {
        let declares_instructions = template
            .input_variables()
            .iter()
            .any(|v| v == FORMAT_INSTRUCTIONS);

        let template = match shaper.format_instructions() {
            Some(instructions) if declares_instructions => {
                template.with_partial(FORMAT_INSTRUCTIONS, instructions)
            }
            _ => template,
        };

        Self {
            template,
            shaper,
            options: RequestOptions::default(),
            slot: ProviderSlot::Primary,
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_slot(mut self, slot: ProviderSlot) -> Self {
        self.slot = slot;
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn shaper(&self) -> &S {
        &self.shaper
    }

    /// Render, call once, shape.
    ///
    /// # Errors
    ///
    /// - [`ChainError::Template`] if a variable is missing (no call is made)
    /// - [`ChainError::Call`] if the request fails
    /// - [`ChainError::Shape`] if the reply is rejected by the shaper
    pub async fn run<T, I, K, V>(
        &self,
        runner: &RequestRunner<T>,
        config: &Configuration,
        vars: I,
    ) -> Result<ShapedOutput, ChainError>
    where
        T: ChatTransport,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages = self.template.render_messages(vars)?;
        let response = runner
            .complete_with(config, self.slot, &messages, &self.options)
            .await?;

        log_debug!(
            response_length = response.text.len(),
            can_fail = self.shaper.can_fail(),
            "Shaping chain response"
        );

        Ok(self.shaper.shape(&response.text)?)
    }
}
