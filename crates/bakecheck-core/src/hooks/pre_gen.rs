//! Pre-generation hook - reject invalid Parameter Sets before rendering

use crate::params::{CreateVirtualenv, ParameterSet};
use crate::template::HookSettings;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Importable module identifier: letter or underscore first, no dots
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Reserved words of the generated project's language (Python 3)
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// A rejected parameter: names the field and the offending value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} '{value}' {reason}")]
pub struct ValidationError {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

fn field<'a>(params: &'a ParameterSet, name: &str) -> Result<&'a str, ValidationError> {
    params
        .get(name)
        .ok_or_else(|| ValidationError::new(name, "", "is required"))
}

/// Trait for pre-generation checks
pub trait PreGenCheck {
    /// Get the name of this check
    fn name(&self) -> &str;

    /// Run the check
    fn run(&self, params: &ParameterSet) -> Result<(), ValidationError>;
}

/// `namespace` and `package_name` must be importable identifiers
pub struct IdentifierCheck;

impl PreGenCheck for IdentifierCheck {
    fn name(&self) -> &str {
        "identifiers"
    }

    fn run(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        for name in ["namespace", "package_name"] {
            let value = field(params, name)?;
            if value.contains('.') {
                return Err(ValidationError::new(name, value, "must not contain dots"));
            }
            if !IDENTIFIER.is_match(value) {
                return Err(ValidationError::new(
                    name,
                    value,
                    "is not a valid identifier (letters, digits and '_', not starting with a digit)",
                ));
            }
            if PYTHON_KEYWORDS.contains(&value) {
                return Err(ValidationError::new(name, value, "is a reserved word"));
            }
        }
        Ok(())
    }
}

/// Literal values that are never allowed for one field
pub struct ReservedValueCheck {
    field: &'static str,
    reserved: Vec<String>,
}

impl ReservedValueCheck {
    pub fn new(field: &'static str, reserved: Vec<String>) -> Self {
        Self { field, reserved }
    }
}

impl PreGenCheck for ReservedValueCheck {
    fn name(&self) -> &str {
        self.field
    }

    fn run(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        let value = field(params, self.field)?;
        if self.reserved.iter().any(|r| r == value) {
            return Err(ValidationError::new(self.field, value, "is reserved"));
        }
        Ok(())
    }
}

/// `repo_name` must read `<namespace>.<...>.<package_name>`
pub struct RepoNameCheck;

impl PreGenCheck for RepoNameCheck {
    fn name(&self) -> &str {
        "repo_name"
    }

    fn run(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        let repo_name = field(params, "repo_name")?;
        let namespace = field(params, "namespace")?;
        let package_name = field(params, "package_name")?;

        let after_namespace = repo_name
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|rest| !rest.is_empty());
        if after_namespace.is_none() {
            return Err(ValidationError::new(
                "namespace",
                namespace,
                format!("is not the leading segment of repo_name '{}'", repo_name),
            ));
        }

        let before_package = repo_name
            .strip_suffix(package_name)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|rest| !rest.is_empty());
        if before_package.is_none() {
            return Err(ValidationError::new(
                "package_name",
                package_name,
                format!("is not the trailing segment of repo_name '{}'", repo_name),
            ));
        }

        Ok(())
    }
}

/// `create_virtualenv` accepts exactly "Yes" or "No"
pub struct VirtualenvFlagCheck;

impl PreGenCheck for VirtualenvFlagCheck {
    fn name(&self) -> &str {
        "create_virtualenv"
    }

    fn run(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        let value = field(params, "create_virtualenv")?;
        value
            .parse::<CreateVirtualenv>()
            .map(|_| ())
            .map_err(|reason| ValidationError::new("create_virtualenv", value, reason))
    }
}

/// The pre_gen_project hook - runs every registered check in order
pub struct PreGenHook {
    checks: Vec<Box<dyn PreGenCheck>>,
}

impl PreGenHook {
    /// Create the hook with all checks registered
    pub fn new(settings: &HookSettings) -> Self {
        let checks: Vec<Box<dyn PreGenCheck>> = vec![
            Box::new(IdentifierCheck),
            Box::new(ReservedValueCheck::new(
                "namespace",
                settings.reserved_namespaces.clone(),
            )),
            Box::new(ReservedValueCheck::new(
                "package_name",
                settings.reserved_package_names.clone(),
            )),
            Box::new(RepoNameCheck),
            Box::new(VirtualenvFlagCheck),
        ];
        Self { checks }
    }

    /// Stop at the first failing check
    pub fn run(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        for check in &self.checks {
            log::debug!("pre_gen_project: running '{}' check", check.name());
            check.run(params)?;
        }
        Ok(())
    }
}

impl Default for PreGenHook {
    fn default() -> Self {
        Self::new(&HookSettings::default())
    }
}

/// Validate a Parameter Set with the given hook settings
pub fn validate(params: &ParameterSet, settings: &HookSettings) -> Result<(), ValidationError> {
    PreGenHook::new(settings).run(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakecheck_testkit::default_context;

    fn params() -> ParameterSet {
        default_context().into_iter().collect()
    }

    fn with(overrides: &[(&str, &str)]) -> ParameterSet {
        let mut p = params();
        for (k, v) in overrides {
            p.insert(*k, *v);
        }
        p
    }

    #[test]
    fn test_default_context_passes() {
        assert_eq!(validate(&params(), &HookSettings::default()), Ok(()));
    }

    #[test]
    fn test_reserved_namespace_rejected() {
        let p = with(&[("repo_name", "websauna.application"), ("namespace", "websauna")]);
        let err = validate(&p, &HookSettings::default()).unwrap_err();
        assert_eq!(err.field, "namespace");
        assert_eq!(err.value, "websauna");
        assert_eq!(err.to_string(), "namespace 'websauna' is reserved");
    }

    #[test]
    fn test_reserved_package_name_rejected() {
        let p = with(&[("repo_name", "my.site"), ("package_name", "site")]);
        let err = validate(&p, &HookSettings::default()).unwrap_err();
        assert_eq!(err.field, "package_name");
        assert_eq!(err.value, "site");
    }

    #[test]
    fn test_reserved_sets_come_from_settings() {
        let settings = HookSettings {
            reserved_namespaces: vec![],
            reserved_package_names: vec!["application".to_string()],
        };
        let websauna = with(&[
            ("repo_name", "websauna.blog"),
            ("namespace", "websauna"),
            ("package_name", "blog"),
        ]);
        assert_eq!(validate(&websauna, &settings), Ok(()));

        let err = validate(&params(), &settings).unwrap_err();
        assert_eq!(err.field, "package_name");
    }

    #[test]
    fn test_identifier_rules() {
        let cases = [
            ("namespace", "1my", "not a valid identifier"),
            ("namespace", "my.ns", "must not contain dots"),
            ("namespace", "my-ns", "not a valid identifier"),
            ("package_name", "class", "reserved word"),
            ("package_name", "", "not a valid identifier"),
        ];
        for (name, value, expected) in cases {
            let err = IdentifierCheck.run(&with(&[(name, value)])).unwrap_err();
            assert_eq!(err.field, name);
            assert!(err.reason.contains(expected), "{} = '{}' gave '{}'", name, value, err.reason);
        }
        assert!(IdentifierCheck.run(&with(&[("package_name", "_private2")])).is_ok());
    }

    #[test]
    fn test_repo_name_must_decompose() {
        let err = RepoNameCheck.run(&with(&[("repo_name", "other.application")])).unwrap_err();
        assert_eq!(err.field, "namespace");

        let err = RepoNameCheck.run(&with(&[("repo_name", "my.app")])).unwrap_err();
        assert_eq!(err.field, "package_name");

        // Prefix must end on a segment boundary
        let err = RepoNameCheck.run(&with(&[("repo_name", "myapplication")])).unwrap_err();
        assert_eq!(err.field, "namespace");

        assert!(RepoNameCheck.run(&with(&[("repo_name", "my.extra.application")])).is_ok());
    }

    #[test]
    fn test_create_virtualenv_flag() {
        assert!(VirtualenvFlagCheck.run(&with(&[("create_virtualenv", "Yes")])).is_ok());
        let err = VirtualenvFlagCheck.run(&with(&[("create_virtualenv", "yes")])).unwrap_err();
        assert_eq!(err.value, "yes");
    }

    #[test]
    fn test_missing_field_is_reported() {
        let mut p = ParameterSet::new();
        p.insert("namespace", "my");
        let err = validate(&p, &HookSettings::default()).unwrap_err();
        assert_eq!(err.field, "package_name");
        assert_eq!(err.reason, "is required");
    }
}
