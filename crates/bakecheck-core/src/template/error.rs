//! Placeholder substitution failures

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{{ cookiecutter.x }}` where `x` is not in the Parameter Set
    #[error("parameter '{key}' is not defined (line {line})")]
    UnknownParameter { key: String, line: usize },

    #[error("bad placeholder at line {line}: {message}")]
    Syntax { message: String, line: usize },

    /// The key names the whole context object, not a single value
    #[error("'{key}' is a parameter group; reference one value such as '{key}.repo_name'")]
    NotAValue { key: String },
}
