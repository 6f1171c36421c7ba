use super::{OutputShaper, ShapedOutput};
use crate::error::ShapeResult;

pub const DEFAULT_SEPARATOR: &str = ",";

/// Splits text on a separator into trimmed elements.
///
/// Never fails. Whitespace-only input gives an empty list, and elements that
/// are empty after trimming are dropped, so `"a, , b,"` gives `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedList {
    separator: String,
}

impl Default for DelimitedList {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl DelimitedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl OutputShaper for DelimitedList {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(ShapedOutput::List(Vec::new()));
        }
        if self.separator.is_empty() {
            return Ok(ShapedOutput::List(vec![trimmed.to_string()]));
        }

        let items = trimmed
            .split(self.separator.as_str())
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        Ok(ShapedOutput::List(items))
    }

    fn can_fail(&self) -> bool {
        false
    }

    fn format_instructions(&self) -> Option<String> {
        Some(if self.separator == DEFAULT_SEPARATOR {
            "Your response should be a list of comma separated values, \
             eg: `foo, bar, baz`"
                .to_string()
        } else {
            format!(
                "Your response should be a list of values separated by `{}`",
                self.separator
            )
        })
    }
}
