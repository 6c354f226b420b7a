//! Blocking external tool invocation

use crate::error::{BakecheckError, Result};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Result of one tool execution
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub program: String,
    pub args: Vec<String>,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into `ToolFailed`, keeping the captured output
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        let status = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "no exit code (terminated by signal)".to_string(),
        };
        Err(BakecheckError::ToolFailed {
            tool: self.program,
            status,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

/// Run `program args...` in `cwd` and wait for it
///
/// No retry and no timeout. A non-zero exit is not an error here, see
/// [`ToolOutput::into_result`].
pub fn run_tool(program: &Path, args: &[String], cwd: &Path) -> Result<ToolOutput> {
    let display = program.display().to_string();
    log::info!("Running {} {}", display, args.join(" "));

    let started = Instant::now();
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BakecheckError::ToolNotFound {
                program: display.clone(),
                reason: e.to_string(),
            },
            _ => BakecheckError::IoError(e),
        })?;

    let result = ToolOutput {
        program: display,
        args: args.to_vec(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    log::debug!("{} finished with {:?}", result.program, result.exit_code);

    Ok(result)
}

/// Path of an executable inside a project's virtualenv
pub fn env_executable(root: &Path, env_dir: &str, name: &str) -> PathBuf {
    if cfg!(windows) {
        root.join(env_dir).join("Scripts").join(format!("{}.exe", name))
    } else {
        root.join(env_dir).join("bin").join(name)
    }
}

/// Prefer the project's virtualenv copy of a tool, then PATH
///
/// Falls back to the bare name so the spawn error names the missing tool.
pub fn resolve_tool(root: &Path, env_dir: &str, name: &str) -> PathBuf {
    // Explicit paths from settings are used as given
    if Path::new(name).components().count() > 1 {
        return PathBuf::from(name);
    }

    let local = env_executable(root, env_dir, name);
    if local.is_file() {
        log::debug!("Using {} from virtualenv: {}", name, local.display());
        return local;
    }

    match which::which(name) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("{} not found on PATH: {}", name, e);
            PathBuf::from(name)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use bakecheck_testkit::{fake_tool, temp_dir_in_workspace};

    #[test]
    fn test_run_tool_captures_output() {
        let temp = temp_dir_in_workspace();
        let tool = fake_tool(temp.path(), "greet", "echo \"hello $1\"\necho oops >&2\n");

        let output = run_tool(&tool, &["world".to_string()], temp.path()).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello world\n");
        assert_eq!(output.stderr, "oops\n");
        assert_eq!(output.args, vec!["world"]);
    }

    #[test]
    fn test_non_zero_exit_becomes_tool_failed() {
        let temp = temp_dir_in_workspace();
        let tool = fake_tool(temp.path(), "lint", "echo 'setup.py:1:1: E999'\nexit 3\n");

        let output = run_tool(&tool, &[], temp.path()).unwrap();
        assert_eq!(output.exit_code, Some(3));
        match output.into_result() {
            Err(BakecheckError::ToolFailed { status, stdout, .. }) => {
                assert_eq!(status, "exit code 3");
                assert!(stdout.contains("E999"));
            }
            other => panic!("Expected ToolFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let temp = temp_dir_in_workspace();
        let result = run_tool(&temp.path().join("no-such-tool"), &[], temp.path());
        assert!(matches!(result, Err(BakecheckError::ToolNotFound { .. })));
    }

    #[test]
    fn test_resolve_tool_prefers_virtualenv() {
        let temp = temp_dir_in_workspace();
        let bin = temp.path().join("env/bin");
        std::fs::create_dir_all(&bin).unwrap();
        let local = fake_tool(&bin, "pytest", "exit 0\n");

        assert_eq!(resolve_tool(temp.path(), "env", "pytest"), local);
        assert_eq!(
            resolve_tool(temp.path(), "env", "bakecheck-surely-missing-tool"),
            PathBuf::from("bakecheck-surely-missing-tool")
        );
    }
}
