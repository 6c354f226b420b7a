//! Template engine implementation
//!
//! Pure text substitution: `{{ dotted.key }}` is replaced with the value found
//! in the context, everything else is copied through untouched.

use crate::template::error::TemplateError;
use toml::Value;

/// Count backslashes immediately before a position
fn count_backslashes_before(text: &str, pos: usize) -> usize {
    text.as_bytes()[..pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
}

/// Count newlines in text
fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Resolve a nested key from TOML data
fn resolve_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(data, |current, part| match current {
        Value::Table(table) => table.get(part),
        _ => None,
    })
}

/// Stringify a TOML value for template output
fn stringify_value(value: &Value, key: &str) -> Result<String, TemplateError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| stringify_value(item, key))
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.join(", ")),
        Value::Table(_) => Err(TemplateError::NotAValue {
            key: key.to_string(),
        }),
    }
}

/// Template context holding TOML data for rendering
#[derive(Debug, Clone)]
pub struct TemplateContext {
    data: Value,
}

impl TemplateContext {
    /// Create a new template context from TOML value
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Get the underlying TOML value
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// Template engine for rendering templates with TOML data
#[derive(Debug, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        Self
    }

    /// Render a template with the given context
    pub fn render(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(template.len());
        let mut line = 1;
        let mut pos = 0;

        while pos < template.len() {
            let remaining = &template[pos..];

            let Some(open) = remaining.find("{{") else {
                output.push_str(remaining);
                break;
            };

            let backslashes = count_backslashes_before(remaining, open);
            let text = &remaining[..open - backslashes];
            output.push_str(text);
            line += count_newlines(text);

            // Every pair of backslashes collapses to one literal backslash
            for _ in 0..(backslashes / 2) {
                output.push('\\');
            }
            let escaped = backslashes % 2 == 1;

            let body_start = open + 2;
            let close = remaining[body_start..]
                .find("}}")
                .ok_or_else(|| TemplateError::Syntax {
                    message: if escaped {
                        "Unclosed escaped placeholder".to_string()
                    } else {
                        "Unclosed placeholder".to_string()
                    },
                    line,
                })?;
            let body = &remaining[body_start..body_start + close];

            if escaped {
                output.push_str("{{");
                output.push_str(body);
                output.push_str("}}");
            } else {
                self.process_placeholder(body, context, &mut output, line)?;
            }

            line += count_newlines(body);
            pos += body_start + close + 2;
        }

        Ok(output)
    }

    /// Process a regular placeholder ({{key}})
    fn process_placeholder(
        &self,
        body: &str,
        context: &TemplateContext,
        output: &mut String,
        line: usize,
    ) -> Result<(), TemplateError> {
        let key = body.trim();
        if key.is_empty() {
            return Err(TemplateError::Syntax {
                message: "Empty placeholder".to_string(),
                line,
            });
        }

        let value = resolve_key(context.data(), key).ok_or_else(|| TemplateError::UnknownParameter {
            key: key.to_string(),
            line,
        })?;

        output.push_str(&stringify_value(value, key)?);
        Ok(())
    }
}

/// Convenience function to render a template
pub fn render(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    TemplateEngine::new().render(template, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::toml;

    fn cookiecutter_context() -> TemplateContext {
        let data = toml! {
            [cookiecutter]
            repo_name = "my.application"
            namespace = "my"
            package_name = "application"
            year = 2017
        };
        TemplateContext::new(Value::Table(data))
    }

    #[test]
    fn test_render_placeholder_with_and_without_spaces() {
        let context = cookiecutter_context();
        assert_eq!(
            render("{{cookiecutter.repo_name}}", &context).unwrap(),
            "my.application"
        );
        assert_eq!(
            render("{{ cookiecutter.repo_name }}", &context).unwrap(),
            "my.application"
        );
        assert_eq!(
            render("{{  cookiecutter.namespace  }}", &context).unwrap(),
            "my"
        );
    }

    #[test]
    fn test_render_multiple_placeholders_across_lines() {
        let context = cookiecutter_context();
        let template = "name = {{ cookiecutter.namespace }}\npackage = {{ cookiecutter.package_name }}\n";
        let result = render(template, &context).unwrap();
        assert_eq!(result, "name = my\npackage = application\n");
    }

    #[test]
    fn test_render_integer_value() {
        let context = cookiecutter_context();
        assert_eq!(
            render("(c) {{ cookiecutter.year }}", &context).unwrap(),
            "(c) 2017"
        );
    }

    #[test]
    fn test_render_no_placeholders() {
        let context = cookiecutter_context();
        let template = "Plain text with a single { brace and %percent%.";
        assert_eq!(render(template, &context).unwrap(), template);
    }

    #[test]
    fn test_escaped_placeholder_is_literal() {
        let context = cookiecutter_context();
        let result = render(r"<title>\{{ site_name }}</title>", &context).unwrap();
        assert_eq!(result, "<title>{{ site_name }}</title>");
    }

    #[test]
    fn test_double_backslash_renders_placeholder() {
        let context = cookiecutter_context();
        let result = render(r"\\{{ cookiecutter.namespace }}", &context).unwrap();
        assert_eq!(result, r"\my");
    }

    #[test]
    fn test_error_undefined_key_reports_line() {
        let context = cookiecutter_context();
        let template = "first\nsecond {{ cookiecutter.missing }}";
        match render(template, &context) {
            Err(TemplateError::UnknownParameter { key, line }) => {
                assert_eq!(key, "cookiecutter.missing");
                assert_eq!(line, 2);
            }
            other => panic!("Expected UnknownParameter error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_context_object_in_placeholder() {
        let context = cookiecutter_context();
        match render("{{ cookiecutter }}", &context) {
            Err(TemplateError::NotAValue { key }) => assert_eq!(key, "cookiecutter"),
            other => panic!("Expected NotAValue error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_unclosed_placeholder() {
        let context = cookiecutter_context();
        match render("value: {{ cookiecutter.namespace", &context) {
            Err(TemplateError::Syntax { message, line }) => {
                assert!(message.contains("Unclosed"));
                assert_eq!(line, 1);
            }
            other => panic!("Expected Syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_empty_placeholder() {
        let context = cookiecutter_context();
        assert!(matches!(
            render("{{ }}", &context),
            Err(TemplateError::Syntax { .. })
        ));
    }
}
