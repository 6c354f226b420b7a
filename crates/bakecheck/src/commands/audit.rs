//! Audit command - scan a generated project for unreplaced markers

use crate::output;
use anyhow::{bail, Result};
use bakecheck_core::audit::{audit_tree, AuditFailure, AuditReport, MarkerKind, ScanPolicy};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct AuditOutput {
    root: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<AuditReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureInfo>,
}

#[derive(Debug, Serialize)]
struct FailureInfo {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<MarkerKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    message: String,
}

impl From<&AuditFailure> for FailureInfo {
    fn from(failure: &AuditFailure) -> Self {
        let (kind, line) = match failure {
            AuditFailure::MarkerFound { kind, line, .. } => (Some(*kind), Some(*line)),
            AuditFailure::Unreadable { .. } => (None, None),
        };
        FailureInfo {
            path: failure.path().display().to_string(),
            kind,
            line,
            message: failure.to_string(),
        }
    }
}

/// Audit an existing tree
///
/// A failing audit is reported as an error (exit 1); with `--json` the
/// failure is also described on stdout first.
pub fn run(dir: PathBuf, env_dir: String, json: bool, verbose: bool) -> Result<()> {
    if !dir.is_dir() {
        bail!("'{}' is not a directory", dir.display());
    }

    if verbose && !json {
        output::step(&format!(
            "Auditing {} (skipping '{}' and binary files)",
            dir.display(),
            env_dir
        ));
    }

    let result = audit_tree(&dir, &ScanPolicy::with_env_dir(env_dir));

    if json {
        let body = AuditOutput {
            root: dir.display().to_string(),
            passed: result.is_ok(),
            report: result.as_ref().ok().cloned(),
            failure: result.as_ref().err().map(FailureInfo::from),
        };
        output::print_json("audit", &body)?;
    }

    let report = result?;

    if !json {
        output::success(&format!(
            "No unreplaced markers: {} file(s) scanned, {} binary and {} artifact file(s) skipped",
            report.scanned, report.skipped_binary, report.skipped_artifact
        ));
    }
    Ok(())
}
