//! Full verification cycle: validate → render → audit → style check → test run

use crate::audit::{audit_tree, AuditReport, ScanPolicy};
use crate::error::Result;
use crate::generate::{BakeOptions, Baker, GeneratedProject};
use crate::params::ParameterSet;
use crate::qa::{verify_project, QaReport};
use crate::template::{Renderer, Template};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    pub bake: BakeOptions,
    /// Run the style checker and the test runner after the audit
    pub run_qa: bool,
}

/// Everything a passing verification produced
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub project: GeneratedProject,
    pub audit: AuditReport,
    pub qa: Option<QaReport>,
}

/// Verify a template with the default renderer
pub fn verify_template(
    template: Template,
    extra: &ParameterSet,
    output_dir: &Path,
    options: &VerifyOptions,
) -> Result<VerificationReport> {
    let baker = Baker::new(template).options(options.bake.clone());
    verify_with(&baker, extra, output_dir, options.run_qa)
}

/// Verify with any renderer; the first failing stage ends the cycle
pub fn verify_with<R: Renderer>(
    baker: &Baker<R>,
    extra: &ParameterSet,
    output_dir: &Path,
    run_qa: bool,
) -> Result<VerificationReport> {
    let project = baker.bake_project(extra, output_dir)?;
    let settings = &baker.template().settings;

    let policy = ScanPolicy::with_env_dir(settings.virtualenv.dir.as_str());
    let audit = audit_tree(project.path(), &policy)?;

    let qa = if run_qa {
        Some(verify_project(project.path(), project.params(), settings)?)
    } else {
        None
    };

    Ok(VerificationReport { project, audit, qa })
}
