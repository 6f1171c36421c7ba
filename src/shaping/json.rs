//! JSON shaping with a 3-tier fallback
//!
//! Models often wrap JSON in markdown fences or surround it with prose, so
//! parsing is tried in order:
//!
//! 1. direct parse of the trimmed text
//! 2. parse after removing code fences and control characters
//! 3. parse of the widest balanced object or array found in the text, so a
//!    bracketed note in the prose (`see [1]`) does not shadow the payload
//!
//! If none succeeds the error from tier 2 is reported, with the text around
//! its position.

use super::{preview, OutputShaper, RepairableShaper, ShapedOutput};
use crate::error::{ShapeError, ShapeResult};
use crate::logging::log_debug;
use serde_json::Value;

/// Characters of context kept on each side of a parse error.
const OFFENDING_CONTEXT: usize = 20;

/// Parses text into a JSON value tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuredData;

impl OutputShaper for StructuredData {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        parse_llm_json(raw).map(ShapedOutput::Json)
    }

    fn format_instructions(&self) -> Option<String> {
        Some("Return only valid JSON, with no surrounding text.".to_string())
    }
}

impl RepairableShaper for StructuredData {}

pub(crate) fn parse_llm_json(raw: &str) -> ShapeResult<Value> {
    log_debug!(
        content_length = raw.len(),
        content_preview = %preview(raw),
        "Parsing model output as JSON"
    );

    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let cleaned = clean_artifacts(trimmed);
    let error = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => {
            log_debug!("Parsed JSON after removing fences");
            return Ok(value);
        }
        Err(error) => error,
    };

    if let Some((extracted, value)) = extract_embedded(&cleaned) {
        log_debug!(
            extracted_length = extracted.len(),
            "Parsed JSON extracted from mixed content"
        );
        return Ok(value);
    }

    let offset = byte_offset(&cleaned, error.line(), error.column());
    Err(ShapeError::invalid_syntax(
        error.to_string(),
        offending_snippet(&cleaned, offset),
    ))
}

fn clean_artifacts(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

/// Widest balanced `{...}` or `[...]` in `text` that parses; the earliest wins a tie.
///
/// Every opening bracket is tried as a start. Starts inside an accepted
/// candidate are skipped since they can only yield a shorter one.
fn extract_embedded(text: &str) -> Option<(&str, Value)> {
    let mut best: Option<(&str, Value)> = None;
    let mut resume = 0;

    for (start, _) in text.match_indices(['{', '[']) {
        if start < resume {
            continue;
        }
        let Some(candidate) = balanced_from(&text[start..]) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        resume = start + candidate.len();
        if best.as_ref().map_or(true, |(b, _)| candidate.len() > b.len()) {
            best = Some((candidate, value));
        }
    }

    best
}

/// Balanced group opening at the start of `text`, ignoring brackets inside strings.
fn balanced_from(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

fn offending_snippet(text: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(OFFENDING_CONTEXT);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + OFFENDING_CONTEXT).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].to_string()
}
