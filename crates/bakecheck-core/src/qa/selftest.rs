//! Running the generated project's own test suite

use crate::error::Result;
use crate::qa::tool::{resolve_tool, run_tool, ToolOutput};
use crate::template::QaSettings;
use std::path::{Path, PathBuf};

pub fn resolve_test_runner(root: &Path, env_dir: &str, qa: &QaSettings) -> PathBuf {
    resolve_tool(root, env_dir, &qa.test_runner)
}

/// Run the test runner from the project root
pub fn run_self_test(root: &Path, env_dir: &str, qa: &QaSettings) -> Result<ToolOutput> {
    let runner = resolve_test_runner(root, env_dir, qa);
    run_tool(&runner, &qa.test_args, root)?.into_result()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::BakecheckError;
    use bakecheck_testkit::{fake_tool, temp_dir_in_workspace};

    #[test]
    fn test_runner_runs_in_project_root() {
        let temp = temp_dir_in_workspace();
        fake_tool(&temp.path().join("env/bin"), "pytest", "pwd\n");

        let output = run_self_test(temp.path(), "env", &QaSettings::default()).unwrap();
        let reported = PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_failing_suite_is_tooling_failure() {
        let temp = temp_dir_in_workspace();
        fake_tool(
            &temp.path().join("env/bin"),
            "pytest",
            "echo '1 failed, 3 passed'\nexit 1\n",
        );
        let qa = QaSettings {
            test_args: vec!["-x".to_string()],
            ..QaSettings::default()
        };

        match run_self_test(temp.path(), "env", &qa) {
            Err(BakecheckError::ToolFailed { stdout, .. }) => assert!(stdout.contains("1 failed")),
            other => panic!("Expected ToolFailed, got {:?}", other),
        }
    }
}
