//! Marker patterns for unsubstituted placeholders

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// `{{` + optional whitespace + `cookiecutter.<field>` + `}}`
pub static TEMPLATE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(\s?cookiecutter)[.](.*?)\}\}").expect("template variable pattern is valid")
});

/// `%cookiecutter.<field>random%`
pub static SECRET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(cookiecutter)[.](.*?)random%").expect("secret pattern is valid")
});

/// Which class of leftover marker was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    TemplateVariable,
    Secret,
}

impl MarkerKind {
    pub fn pattern(&self) -> &'static Regex {
        match self {
            MarkerKind::TemplateVariable => &TEMPLATE_VARIABLE,
            MarkerKind::Secret => &SECRET,
        }
    }

    /// Human readable failure description
    pub fn description(&self) -> &'static str {
        match self {
            MarkerKind::TemplateVariable => "cookiecutter variable not replaced",
            MarkerKind::Secret => "secret variable not replaced",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Test one line; template variables are checked before secrets
pub fn find_marker(line: &str) -> Option<MarkerKind> {
    [MarkerKind::TemplateVariable, MarkerKind::Secret]
        .into_iter()
        .find(|kind| kind.pattern().is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_variable_marker_shapes() {
        assert_eq!(
            find_marker("name = '{{cookiecutter.repo_name}}'"),
            Some(MarkerKind::TemplateVariable)
        );
        assert_eq!(
            find_marker("name = '{{ cookiecutter.repo_name }}'"),
            Some(MarkerKind::TemplateVariable)
        );
        assert_eq!(
            find_marker("{{\tcookiecutter.namespace}}"),
            Some(MarkerKind::TemplateVariable)
        );
    }

    #[test]
    fn test_template_variable_requires_context_name() {
        assert_eq!(find_marker("<title>{{ site_name }}</title>"), None);
        assert_eq!(find_marker("{{ request.route_url('home') }}"), None);
        // Only a single optional whitespace is allowed after the braces
        assert_eq!(find_marker("{{  cookiecutter.repo_name }}"), None);
        assert_eq!(find_marker("{{ cookiecutter_repo }}"), None);
    }

    #[test]
    fn test_secret_marker_shapes() {
        assert_eq!(
            find_marker("websauna.secret = %cookiecutter.authentication_random%"),
            Some(MarkerKind::Secret)
        );
        assert_eq!(
            find_marker("key = %cookiecutter.session_secret_random%"),
            Some(MarkerKind::Secret)
        );
        assert_eq!(find_marker("key = %cookiecutter.session%"), None);
        assert_eq!(find_marker("100% random%"), None);
    }

    #[test]
    fn test_template_variable_wins_on_shared_line() {
        let line = "{{ cookiecutter.a }} %cookiecutter.brandom%";
        assert_eq!(find_marker(line), Some(MarkerKind::TemplateVariable));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(MarkerKind::TemplateVariable.to_string(), "cookiecutter variable not replaced");
        assert_eq!(MarkerKind::Secret.to_string(), "secret variable not replaced");
    }
}
