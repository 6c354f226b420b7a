use std::path::PathBuf;
use thiserror::Error;

use crate::audit::AuditFailure;
use crate::hooks::ValidationError;

#[derive(Error, Debug)]
pub enum BakecheckError {
    // Template errors
    #[error("TEMPLATE_NOT_FOUND: cookiecutter.json not found in '{path}'")]
    TemplateNotFound { path: PathBuf },

    #[error("TEMPLATE_INVALID: {0}")]
    TemplateInvalid(String),

    #[error("TEMPLATE_CONFIG_INVALID: failed to parse {file}: {reason}")]
    TemplateConfigInvalid { file: String, reason: String },

    // Parameter errors
    #[error("PARAMETER_MISSING: required parameter '{0}' is not set")]
    ParameterMissing(String),

    #[error("PARAMETER_INVALID: {0}")]
    ParameterInvalid(String),

    // Hook errors
    #[error("HOOK_FAILED: Hook script failed: {hook}: {reason}")]
    HookFailed { hook: String, reason: String },

    // Generation errors
    #[error("OUTPUT_EXISTS: '{path}' already exists")]
    OutputExists { path: PathBuf },

    #[error("RENDER_FAILED: {path}: {reason}")]
    RenderFailed { path: PathBuf, reason: String },

    // Audit errors
    #[error("AUDIT_FAILED: {0}")]
    AuditFailed(#[from] AuditFailure),

    // Tooling errors
    #[error("TOOL_NOT_FOUND: {program}: {reason}")]
    ToolNotFound { program: String, reason: String },

    #[error("TOOL_FAILED: {tool} exited with {status}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl BakecheckError {
    /// Wrap a pre-generation validation failure
    pub fn pre_gen_failed(err: ValidationError) -> Self {
        BakecheckError::HookFailed {
            hook: "pre_gen_project".to_string(),
            reason: err.to_string(),
        }
    }

    /// True for failures raised by a generation hook
    pub fn is_hook_failure(&self) -> bool {
        matches!(self, BakecheckError::HookFailed { .. })
    }
}

impl From<serde_json::Error> for BakecheckError {
    fn from(err: serde_json::Error) -> Self {
        BakecheckError::Generic(format!("JSON error: {}", err))
    }
}

impl From<walkdir::Error> for BakecheckError {
    fn from(err: walkdir::Error) -> Self {
        BakecheckError::Generic(format!("Directory walk error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, BakecheckError>;
