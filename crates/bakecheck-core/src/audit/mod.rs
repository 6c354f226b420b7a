//! Post-generation audit - prove every placeholder was substituted
//!
//! The audit walks a generated tree and fails on the first line that still
//! carries a template-variable marker (`{{ cookiecutter.field }}`) or a
//! secret marker (`%cookiecutter.fieldrandom%`). Binary files and the
//! environment artifact subtree are never read.

pub mod markers;
pub mod scan;

pub use markers::{find_marker, MarkerKind};
pub use scan::{
    audit_tree, build_files_list, check_file, check_paths, in_artifact_subtree, is_binary,
    is_scannable, skip_reason, AuditFailure, AuditReport, ScanPolicy, SkipReason,
};
