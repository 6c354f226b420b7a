//! Style and self-test verification of a generated project
//!
//! Both tools are synchronous blocking calls; a non-zero exit from either
//! one is a hard failure carrying the captured output.

pub mod selftest;
pub mod style;
pub mod tool;

pub use selftest::{resolve_test_runner, run_self_test};
pub use style::{run_style_check, style_targets};
pub use tool::{env_executable, resolve_tool, run_tool, ToolOutput};

use crate::error::Result;
use crate::params::ParameterSet;
use crate::template::TemplateSettings;
use serde::Serialize;
use std::path::Path;

/// Outputs of a passing QA run
#[derive(Debug, Clone, Serialize)]
pub struct QaReport {
    pub style: ToolOutput,
    pub tests: ToolOutput,
}

/// Style check, then the test suite
pub fn verify_project(
    root: &Path,
    params: &ParameterSet,
    settings: &TemplateSettings,
) -> Result<QaReport> {
    let env_dir = settings.virtualenv.dir.as_str();
    let style = run_style_check(root, env_dir, &settings.qa, params)?;
    let tests = run_self_test(root, env_dir, &settings.qa)?;
    Ok(QaReport { style, tests })
}
