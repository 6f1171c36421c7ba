use super::{OutputShaper, ShapedOutput};
use crate::error::ShapeResult;

/// Identity shaping: the raw text, untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainText;

impl OutputShaper for PlainText {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        Ok(ShapedOutput::Text(raw.to_string()))
    }

    fn can_fail(&self) -> bool {
        false
    }
}
