// Unit Tests for Prompt Templates
//
// UNIT UNDER TEST: PromptTemplate
//
// BUSINESS RESPONSIBILITY:
//   - Renders one declared template into many prompts
//   - Detects missing and undeclared variables before any call is made
//   - Supports pre-filled (partial) variables for format instructions
//
// TEST COVERAGE:
//   - Rendering with several variable sets
//   - Escaped braces
//   - Construction and render errors

use crate::error::TemplateError;
use crate::prompt::PromptTemplate;
use std::collections::HashMap;

#[cfg(test)]
mod rendering_tests {
    use super::*;

    #[test]
    fn test_same_template_renders_different_prompts() {
        // Arrange
        let template =
            PromptTemplate::new("Explain {topic} in {style}", ["topic", "style"]).unwrap();

        // Act
        let first = template
            .render([("topic", "Machine Learning"), ("style", "3 sentences")])
            .unwrap();
        let second = template
            .render([("topic", "Blockchain"), ("style", "a haiku")])
            .unwrap();

        // Assert
        assert_eq!(first, "Explain Machine Learning in 3 sentences");
        assert_eq!(second, "Explain Blockchain in a haiku");
    }

    #[test]
    fn test_repeated_placeholder_is_filled_everywhere() {
        let template = PromptTemplate::from_template("{word}, {word}, {word}!").unwrap();

        assert_eq!(template.input_variables(), ["word".to_string()]);
        assert_eq!(template.render([("word", "hello")]).unwrap(), "hello, hello, hello!");
    }

    #[test]
    fn test_escaped_braces_render_literally() {
        let template =
            PromptTemplate::new("Reply as {{\"answer\": ...}} about {topic}", ["topic"]).unwrap();

        assert_eq!(
            template.render([("topic", "Rust")]).unwrap(),
            "Reply as {\"answer\": ...} about Rust"
        );
    }

    #[test]
    fn test_partial_variable_is_prefilled() {
        let template = PromptTemplate::new(
            "List five {subject}.\n{format_instructions}",
            ["subject", "format_instructions"],
        )
        .unwrap()
        .with_partial("format_instructions", "Use commas.");

        assert_eq!(template.input_variables(), ["subject".to_string()]);
        assert_eq!(
            template.render([("subject", "ice cream flavors")]).unwrap(),
            "List five ice cream flavors.\nUse commas."
        );
    }

    #[test]
    fn test_render_accepts_a_hash_map_and_ignores_extra_values() {
        let template = PromptTemplate::from_template("Hi {name}").unwrap();
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ada".to_string());
        vars.insert("unused".to_string(), "x".to_string());

        assert_eq!(template.render(&vars).unwrap(), "Hi Ada");
    }

    #[test]
    fn test_render_messages_produces_one_user_message() {
        let template = PromptTemplate::from_template("Tell me about {topic}").unwrap();

        let messages = template.render_messages([("topic", "tokens")]).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Tell me about tokens");
    }
}

#[cfg(test)]
mod template_error_tests {
    use super::*;

    #[test]
    fn test_missing_variable_is_named() {
        let template =
            PromptTemplate::new("Explain {topic} in {style}", ["topic", "style"]).unwrap();

        let err = template.render([("topic", "LLMs")]).unwrap_err();

        assert_eq!(
            err,
            TemplateError::MissingVariable {
                name: "style".to_string()
            }
        );
    }

    #[test]
    fn test_undeclared_placeholder_is_rejected_at_construction() {
        let err = PromptTemplate::new("Explain {topic} to {audience}", ["topic"]).unwrap_err();

        assert_eq!(
            err,
            TemplateError::UndeclaredVariable {
                name: "audience".to_string()
            }
        );
    }

    #[test]
    fn test_stray_brace_is_rejected() {
        let err = PromptTemplate::from_template("Return {\"a\": 1}").unwrap_err();

        assert_eq!(err, TemplateError::UnbalancedBrace { position: 7 });
    }
}
