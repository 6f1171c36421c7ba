use super::{OutputShaper, ShapedOutput};
use crate::error::{ShapeError, ShapeResult};

/// Matches trimmed text case-insensitively against a closed set of choices.
///
/// The declared spelling is returned, so `" ADVANCED "` against
/// `["beginner", "intermediate", "advanced"]` gives `Choice("advanced")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedChoice {
    choices: Vec<String>,
}

impl FixedChoice {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl OutputShaper for FixedChoice {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        let value = raw.trim();
        let wanted = value.to_lowercase();

        self.choices
            .iter()
            .find(|choice| choice.to_lowercase() == wanted)
            .map(|choice| ShapedOutput::Choice(choice.clone()))
            .ok_or_else(|| ShapeError::not_a_member(value, self.choices.clone()))
    }

    fn format_instructions(&self) -> Option<String> {
        Some(format!(
            "Select one of the following options: {}",
            self.choices.join(", ")
        ))
    }
}
