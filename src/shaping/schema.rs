//! Schema-typed shaping
//!
//! [`SchemaTyped`] parses JSON like [`StructuredData`](super::StructuredData)
//! and then checks it against an [`OutputSchema`]. Every missing or mistyped
//! field is reported, not just the first.

use super::json::parse_llm_json;
use super::{OutputShaper, RepairableShaper, ShapedOutput};
use crate::error::{FieldIssue, FieldProblem, ShapeError, ShapeResult};
use crate::logging::log_debug;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::fmt;

/// Path used in problems about the top-level value itself.
pub const ROOT_FIELD: &str = "$";

/// JSON type a field must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// An array whose elements all have the inner kind.
    Array(Box<FieldKind>),
    Object,
    Any,
}

impl FieldKind {
    pub fn array_of(item: FieldKind) -> Self {
        Self::Array(Box::new(item))
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array(_) => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Number => json!({ "type": "number" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Array(item) => json!({ "type": "array", "items": item.json_schema() }),
            Self::Object => json!({ "type": "object" }),
            Self::Any => json!({}),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array(item) => write!(f, "array of {item}"),
            Self::Object => write!(f, "object"),
            Self::Any => write!(f, "any"),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Shown to the model in the format instructions only.
    pub description: String,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// An optional field may be absent or `null`.
    pub fn optional(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    fn check(&self, value: Option<&Value>, problems: &mut Vec<FieldProblem>) {
        let value = match value {
            None | Some(Value::Null) if !self.required => return,
            None => {
                problems.push(FieldProblem {
                    field: self.name.clone(),
                    issue: FieldIssue::Missing,
                });
                return;
            }
            Some(value) => value,
        };

        if !self.kind.matches(value) {
            problems.push(FieldProblem {
                field: self.name.clone(),
                issue: FieldIssue::WrongType {
                    expected: self.kind.to_string(),
                    found: json_type_name(value).to_string(),
                },
            });
            return;
        }

        if let (FieldKind::Array(item), Value::Array(elements)) = (&self.kind, value) {
            for (idx, element) in elements.iter().enumerate() {
                if !item.matches(element) {
                    problems.push(FieldProblem {
                        field: format!("{}[{idx}]", self.name),
                        issue: FieldIssue::WrongType {
                            expected: item.to_string(),
                            found: json_type_name(element).to_string(),
                        },
                    });
                }
            }
        }
    }
}

/// Named set of fields a JSON object must carry.
///
/// ```rust
/// use llm_labs::{FieldKind, FieldSpec, OutputSchema};
///
/// let schema = OutputSchema::new("TechInfo")
///     .field(FieldSpec::required("name", FieldKind::String, "Name of the technology"))
///     .field(FieldSpec::required("year_released", FieldKind::Integer, "Year it was released"));
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// A schema of required string fields given as `(name, description)` pairs.
    pub fn from_response_schemas<'a>(
        name: impl Into<String>,
        schemas: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        schemas
            .into_iter()
            .fold(Self::new(name), |schema, (field, description)| {
                schema.field(FieldSpec::required(field, FieldKind::String, description))
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// JSON Schema document describing this schema.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut property = field.kind.json_schema();
            if let Value::Object(ref mut map) = property {
                map.insert("description".to_string(), Value::String(field.description.clone()));
            }
            properties.insert(field.name.clone(), property);
        }
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check `value` against every field.
    pub fn validate(&self, value: Value) -> ShapeResult<Map<String, Value>> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ShapeError::schema_mismatch(
                    &self.name,
                    vec![FieldProblem {
                        field: ROOT_FIELD.to_string(),
                        issue: FieldIssue::WrongType {
                            expected: "object".to_string(),
                            found: json_type_name(&other).to_string(),
                        },
                    }],
                ))
            }
        };

        let mut problems = Vec::new();
        for field in &self.fields {
            field.check(object.get(&field.name), &mut problems);
        }

        if problems.is_empty() {
            Ok(object)
        } else {
            Err(ShapeError::schema_mismatch(&self.name, problems))
        }
    }
}

/// Parses JSON and checks it against an [`OutputSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTyped {
    schema: OutputSchema,
}

impl SchemaTyped {
    pub fn new(schema: OutputSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Shape `raw` and deserialize the record into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`OutputShaper::shape`] returns, plus `SchemaMismatch` when
    /// the checked record still does not deserialize into `T`.
    pub fn shape_into<T: DeserializeOwned>(&self, raw: &str) -> ShapeResult<T> {
        let record = self.shape_record(raw)?;
        serde_json::from_value(Value::Object(record)).map_err(|e| {
            ShapeError::schema_mismatch(
                &self.schema.name,
                vec![FieldProblem {
                    field: ROOT_FIELD.to_string(),
                    issue: FieldIssue::WrongType {
                        expected: std::any::type_name::<T>().to_string(),
                        found: e.to_string(),
                    },
                }],
            )
        })
    }

    fn shape_record(&self, raw: &str) -> ShapeResult<Map<String, Value>> {
        let record = self.schema.validate(parse_llm_json(raw)?)?;
        log_debug!(
            schema = %self.schema.name,
            field_count = record.len(),
            "Model output matches schema"
        );
        Ok(record)
    }
}

impl OutputShaper for SchemaTyped {
    fn shape(&self, raw: &str) -> ShapeResult<ShapedOutput> {
        self.shape_record(raw).map(ShapedOutput::Record)
    }

    fn format_instructions(&self) -> Option<String> {
        let schema = serde_json::to_string_pretty(&self.schema.to_json_schema()).ok()?;
        Some(format!(
            "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
             ```json\n{schema}\n```\n\n\
             Return only the JSON instance, not the schema."
        ))
    }
}

impl RepairableShaper for SchemaTyped {}
