use super::{OutputShaper, ShapedOutput};
use crate::error::{ShapeError, ShapeResult};
use regex::Regex;
use serde_json::{Map, Value};

/// Extracts named values from the first match of a regular expression.
///
/// Capture group `n` becomes the value of key `n - 1`. A group that did not
/// take part in the match yields an empty string.
///
/// ```rust
/// use llm_labs::{OutputShaper, PatternExtraction};
///
/// let shaper = PatternExtraction::new(
///     r"Confidence:\s*(\d+)\s*\nReasoning:\s*(.*)",
///     ["confidence", "reasoning"],
/// )?;
/// let record = shaper.shape("Confidence: 85\nReasoning: well tested")?;
/// assert_eq!(record.as_record().unwrap()["confidence"], "85");
/// # Ok::<(), llm_labs::ShapeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PatternExtraction {
    regex: Regex,
    keys: Vec<String>,
}

impl PatternExtraction {
    /// # Errors
    ///
    /// [`ShapeError::InvalidPattern`] if `pattern` does not compile or has
    /// fewer capture groups than `keys`.
    pub fn new<I, S>(pattern: &str, keys: I) -> ShapeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regex =
            Regex::new(pattern).map_err(|e| ShapeError::invalid_pattern(pattern, e.to_string()))?;
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();

        let groups = regex.captures_len() - 1;
        if groups < keys.len() {
            return Err(ShapeError::invalid_pattern(
                pattern,
                format!("{groups} capture groups for {} keys", keys.len()),
            ));
        }

        Ok(Self { regex, keys })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl OutputShaper for PatternExtraction {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        let captures = self
            .regex
            .captures(raw)
            .ok_or_else(|| ShapeError::no_match(self.regex.as_str(), raw))?;

        let record: Map<String, Value> = self
            .keys
            .iter()
            .enumerate()
            .map(|(idx, key)| {
                let value = captures.get(idx + 1).map_or("", |m| m.as_str());
                (key.clone(), Value::String(value.to_string()))
            })
            .collect();

        Ok(ShapedOutput::Record(record))
    }
}
