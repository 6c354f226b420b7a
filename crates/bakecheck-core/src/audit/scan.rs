//! Tree scanning for leftover markers

use crate::audit::markers::{find_marker, MarkerKind};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Bytes inspected when sniffing for binary content
const SNIFF_LEN: u64 = 8000;

/// Audit failures; the first one found ends the scan
#[derive(Debug, Error)]
pub enum AuditFailure {
    #[error("{kind} in {} (line {line})", .path.display())]
    MarkerFound {
        path: PathBuf,
        kind: MarkerKind,
        line: usize,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AuditFailure {
    /// File the failure is attributed to
    pub fn path(&self) -> &Path {
        match self {
            AuditFailure::MarkerFound { path, .. } | AuditFailure::Unreadable { path, .. } => path,
        }
    }

    fn unreadable(path: &Path, source: io::Error) -> Self {
        AuditFailure::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Directories exempt from scanning
#[derive(Debug, Clone, Serialize)]
pub struct ScanPolicy {
    pub artifact_dirs: Vec<String>,
}

impl ScanPolicy {
    pub fn new(artifact_dirs: Vec<String>) -> Self {
        Self { artifact_dirs }
    }

    /// Policy exempting a single environment directory
    pub fn with_env_dir(dir: impl Into<String>) -> Self {
        Self::new(vec![dir.into()])
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::with_env_dir("env")
    }
}

/// Why a file was not scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Binary,
    Artifact,
}

/// Summary of a passing audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub scanned: usize,
    pub skipped_binary: usize,
    pub skipped_artifact: usize,
}

impl AuditReport {
    pub fn total(&self) -> usize {
        self.scanned + self.skipped_binary + self.skipped_artifact
    }
}

/// Every file below `root`, recursively, in a stable order
pub fn build_files_list(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Content sniffing on the leading chunk
///
/// Binary means a NUL byte, or more than 30% control bytes. Text in any
/// 8-bit encoding (Latin-1, cp1252, UTF-8) stays scannable.
pub fn is_binary(path: &Path) -> io::Result<bool> {
    let mut head = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(looks_binary(&head))
}

/// Share of control bytes above which a file counts as binary
const CONTROL_RATIO: f64 = 0.3;

fn is_control(byte: u8) -> bool {
    match byte {
        // tab, newline, form feed, carriage return, backspace, escape
        b'\t' | b'\n' | 0x0c | b'\r' | 0x08 | 0x1b => false,
        0x00..=0x1f | 0x7f => true,
        _ => false,
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    if bytes.contains(&0) {
        return true;
    }
    let control = bytes.iter().filter(|&&b| is_control(b)).count();
    control as f64 / bytes.len() as f64 > CONTROL_RATIO
}

/// Does the path sit below one of the artifact directories of `root`?
pub fn in_artifact_subtree(root: &Path, path: &Path, policy: &ScanPolicy) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let Some(parent) = rel.parent() else {
        return false;
    };

    parent.components().any(|component| match component {
        Component::Normal(name) => policy.artifact_dirs.iter().any(|dir| name == dir.as_str()),
        _ => false,
    })
}

/// Reason to skip a file, if any. Artifact check first, it needs no IO.
pub fn skip_reason(
    root: &Path,
    path: &Path,
    policy: &ScanPolicy,
) -> io::Result<Option<SkipReason>> {
    if in_artifact_subtree(root, path, policy) {
        return Ok(Some(SkipReason::Artifact));
    }
    if is_binary(path)? {
        return Ok(Some(SkipReason::Binary));
    }
    Ok(None)
}

pub fn is_scannable(root: &Path, path: &Path, policy: &ScanPolicy) -> io::Result<bool> {
    Ok(skip_reason(root, path, policy)?.is_none())
}

/// First marker in a file as (line number, kind)
pub fn check_file(path: &Path) -> io::Result<Option<(usize, MarkerKind)>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Some(kind) = find_marker(&line) {
            return Ok(Some((line_number, kind)));
        }
    }
}

/// Check the given files; stops at the first marker
pub fn check_paths(
    root: &Path,
    paths: &[PathBuf],
    policy: &ScanPolicy,
) -> Result<AuditReport, AuditFailure> {
    let mut report = AuditReport::default();

    for path in paths {
        match skip_reason(root, path, policy).map_err(|e| AuditFailure::unreadable(path, e))? {
            Some(SkipReason::Artifact) => {
                report.skipped_artifact += 1;
                continue;
            }
            Some(SkipReason::Binary) => {
                log::debug!("Skipping binary file {}", path.display());
                report.skipped_binary += 1;
                continue;
            }
            None => {}
        }

        let found = check_file(path).map_err(|e| AuditFailure::unreadable(path, e))?;
        if let Some((line, kind)) = found {
            return Err(AuditFailure::MarkerFound {
                path: path.clone(),
                kind,
                line,
            });
        }
        report.scanned += 1;
    }

    Ok(report)
}

/// Audit every file below `root`
pub fn audit_tree(root: &Path, policy: &ScanPolicy) -> Result<AuditReport, AuditFailure> {
    let paths = build_files_list(root).map_err(|e| AuditFailure::unreadable(root, e))?;
    let report = check_paths(root, &paths, policy)?;

    log::info!(
        "Audited {}: {} scanned, {} binary skipped, {} artifact skipped",
        root.display(),
        report.scanned,
        report.skipped_binary,
        report.skipped_artifact
    );

    Ok(report)
}
