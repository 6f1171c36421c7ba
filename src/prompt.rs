//! Reusable prompt templates with `{variable}` placeholders.
//!
//! One template, many prompts: declare the input variables once, then render
//! with different values. Partial variables are filled in ahead of time,
//! which is how output-shaping format instructions get into a prompt.
//!
//! ```rust
//! use llm_labs::PromptTemplate;
//!
//! let template = PromptTemplate::new("Explain {topic} in {style}", ["topic", "style"])?;
//! let prompt = template.render([("topic", "LLM calls"), ("style", "5 sentences")])?;
//! assert_eq!(prompt, "Explain LLM calls in 5 sentences");
//! # Ok::<(), llm_labs::TemplateError>(())
//! ```
//!
//! Literal braces are written `{{` and `}}`.

use crate::core_types::Message;
use crate::error::TemplateError;
use crate::logging::log_debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}|[{}]")
        .expect("template token pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
    partial_variables: BTreeMap<String, String>,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Build a template whose placeholders are all declared input variables.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::UndeclaredVariable`] for a placeholder not listed in `input_variables`
    /// - [`TemplateError::UnbalancedBrace`] for an unescaped stray `{` or `}`
    pub fn new<I, S>(template: impl Into<String>, input_variables: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(template, input_variables, BTreeMap::new())
    }

    /// Build a template with some variables already filled in.
    pub fn from_parts<I, S>(
        template: impl Into<String>,
        input_variables: I,
        partial_variables: BTreeMap<String, String>,
    ) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let template = template.into();
        let input_variables: Vec<String> = input_variables.into_iter().map(Into::into).collect();
        let segments = parse(&template)?;

        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !input_variables.contains(name) && !partial_variables.contains_key(name) {
                    return Err(TemplateError::UndeclaredVariable { name: name.clone() });
                }
            }
        }

        Ok(Self {
            template,
            input_variables,
            partial_variables,
            segments,
        })
    }

    /// Build a template whose input variables are exactly its placeholders,
    /// in order of first appearance.
    pub fn from_template(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        let mut names: Vec<String> = Vec::new();
        for segment in parse(&template)? {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Self::new(template, names)
    }

    /// Pre-fill `name`; it stops being an input the caller has to supply.
    pub fn with_partial(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.input_variables.retain(|v| *v != name);
        self.partial_variables.insert(name, value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    pub fn partial_variables(&self) -> &BTreeMap<String, String> {
        &self.partial_variables
    }

    /// Substitute every placeholder.
    ///
    /// Values in `vars` take precedence over partials; names that the template
    /// does not use are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] for the first declared input
    /// variable without a value.
    pub fn render<I, K, V>(&self, vars: I) -> Result<String, TemplateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if let Some(missing) = self.input_variables.iter().find(|v| !vars.contains_key(*v)) {
            return Err(TemplateError::MissingVariable {
                name: missing.clone(),
            });
        }

        let mut rendered = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => {
                    let value = vars
                        .get(name)
                        .or_else(|| self.partial_variables.get(name))
                        .ok_or_else(|| TemplateError::MissingVariable { name: name.clone() })?;
                    rendered.push_str(value);
                }
            }
        }

        log_debug!(
            template_length = self.template.len(),
            rendered_length = rendered.len(),
            "Rendered prompt template"
        );

        Ok(rendered)
    }

    /// Render into a single user message, ready for the runner.
    pub fn render_messages<I, K, V>(&self, vars: I) -> Result<Vec<Message>, TemplateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(vec![Message::user(self.render(vars)?)])
    }
}

fn parse(template: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for captures in TOKEN.captures_iter(template) {
        let Some(token) = captures.get(0) else {
            continue;
        };
        literal.push_str(&template[last..token.start()]);
        last = token.end();

        match (token.as_str(), captures.get(1)) {
            ("{{", _) => literal.push('{'),
            ("}}", _) => literal.push('}'),
            (_, Some(name)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.as_str().to_string()));
            }
            _ => {
                return Err(TemplateError::UnbalancedBrace {
                    position: token.start(),
                })
            }
        }
    }

    literal.push_str(&template[last..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
