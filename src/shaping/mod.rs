//! Output-shaping strategies
//!
//! A shaper turns the raw text of a [`Response`](crate::Response) into a
//! [`ShapedOutput`]. Shaping is pure: no strategy touches the network, except
//! [`Repair`], which wraps a fallible strategy with one corrective call.
//!
//! | Strategy | Output | Fails with |
//! |----------|--------|------------|
//! | [`PlainText`] | `Text` | never |
//! | [`DelimitedList`] | `List` | never |
//! | [`StructuredData`] | `Json` | `InvalidSyntax` |
//! | [`SchemaTyped`] | `Record` | `InvalidSyntax`, `SchemaMismatch` |
//! | [`PatternExtraction`] | `Record` | `NoMatch` |
//! | [`FixedChoice`] | `Choice` | `NotAMember` |

mod choice;
mod json;
mod list;
mod pattern;
mod plain;
pub mod repair;
mod schema;

pub use choice::FixedChoice;
pub use json::StructuredData;
pub use list::DelimitedList;
pub use pattern::PatternExtraction;
pub use plain::PlainText;
pub use repair::Repair;
pub use schema::{FieldKind, FieldSpec, OutputSchema, SchemaTyped};

use crate::error::ShapeResult;
use serde_json::{Map, Value};

/// Value produced by a successful shaping step.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedOutput {
    Text(String),
    List(Vec<String>),
    Json(Value),
    /// Named fields, in the order they were declared or appeared.
    Record(Map<String, Value>),
    /// The declared spelling of the matched choice.
    Choice(String),
}

impl ShapedOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    /// Convert any variant into a JSON value.
    pub fn into_json(self) -> Value {
        match self {
            Self::Text(text) | Self::Choice(text) => Value::String(text),
            Self::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
            Self::Json(value) => value,
            Self::Record(fields) => Value::Object(fields),
        }
    }
}

/// Strategy for turning raw model text into a [`ShapedOutput`].
pub trait OutputShaper: Send + Sync {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput>;

    /// Whether [`OutputShaper::shape`] can return an error at all.
    fn can_fail(&self) -> bool {
        true
    }

    /// Text to put in the prompt so the model answers in a shape this
    /// strategy accepts.
    fn format_instructions(&self) -> Option<String> {
        None
    }
}

/// Strategies whose failures a corrective call can plausibly fix.
///
/// Only structured-data and schema-typed shaping qualify; see [`Repair`].
pub trait RepairableShaper: OutputShaper {}

impl<S: OutputShaper + ?Sized> OutputShaper for &S {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        (**self).shape(raw)
    }

    fn can_fail(&self) -> bool {
        (**self).can_fail()
    }

    fn format_instructions(&self) -> Option<String> {
        (**self).format_instructions()
    }
}

impl<S: RepairableShaper + ?Sized> RepairableShaper for &S {}

/// Text preview for log fields.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
