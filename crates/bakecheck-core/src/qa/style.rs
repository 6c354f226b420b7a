//! Style checking of the generated project

use crate::error::{BakecheckError, Result};
use crate::params::ParameterSet;
use crate::qa::tool::{resolve_tool, run_tool, ToolOutput};
use crate::template::{render, QaSettings, TemplateContext};
use std::path::Path;

/// Render the configured style targets with the Parameter Set
pub fn style_targets(qa: &QaSettings, params: &ParameterSet) -> Result<Vec<String>> {
    let context = TemplateContext::new(params.to_context_value());
    qa.style_targets
        .iter()
        .map(|target| {
            render(target, &context).map_err(|e| {
                BakecheckError::ParameterInvalid(format!("style target '{}': {}", target, e))
            })
        })
        .collect()
}

/// Run the style checker on the project's entry point and package directory
pub fn run_style_check(
    root: &Path,
    env_dir: &str,
    qa: &QaSettings,
    params: &ParameterSet,
) -> Result<ToolOutput> {
    let targets = style_targets(qa, params)?;
    let checker = resolve_tool(root, env_dir, &qa.style_checker);
    run_tool(&checker, &targets, root)?.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakecheck_testkit::default_context;

    #[test]
    fn test_default_targets_follow_namespace() {
        let params: ParameterSet = default_context().into_iter().collect();
        let targets = style_targets(&QaSettings::default(), &params).unwrap();
        assert_eq!(targets, vec!["setup.py", "my"]);
    }

    #[test]
    fn test_target_with_unknown_key() {
        let qa = QaSettings {
            style_targets: vec!["{{ cookiecutter.nope }}".to_string()],
            ..QaSettings::default()
        };
        let result = style_targets(&qa, &ParameterSet::new());
        assert!(matches!(result, Err(BakecheckError::ParameterInvalid(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_style_check_receives_targets() {
        use bakecheck_testkit::{fake_tool, temp_dir_in_workspace};

        let temp = temp_dir_in_workspace();
        fake_tool(&temp.path().join("env/bin"), "flake8", "echo \"checked $@\"\n");
        let params: ParameterSet = default_context().into_iter().collect();

        let output = run_style_check(temp.path(), "env", &QaSettings::default(), &params).unwrap();
        assert_eq!(output.stdout, "checked setup.py my\n");
    }
}
