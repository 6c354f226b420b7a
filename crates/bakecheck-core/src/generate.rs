//! Project generation - validate, render, move into place, post-process
//!
//! # Steps
//! 1. Merge template defaults with the caller's extra context
//! 2. Require every required key
//! 3. Run the pre_gen_project hook (nothing is written on failure)
//! 4. Refuse to replace an existing project unless asked
//! 5. Render into a temp directory next to the output → atomic rename
//! 6. Run the post_gen_project hook; on failure the project is removed

use crate::error::{BakecheckError, Result};
use crate::hooks::{pre_gen, run_post_gen};
use crate::params::ParameterSet;
use crate::template::{Renderer, Template, TreeRenderer};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Generation options
#[derive(Debug, Clone, Default)]
pub struct BakeOptions {
    /// Replace an existing project directory
    pub overwrite: bool,
}

/// Handle to a generated project root
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProject {
    root: PathBuf,
    params: ParameterSet,
}

impl GeneratedProject {
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory name of the project root
    pub fn basename(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    pub fn is_dir(&self) -> bool {
        self.root.is_dir()
    }

    /// The Parameter Set the project was generated with
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }
}

/// Outcome of [`Baker::bake`]
#[derive(Debug)]
pub struct BakeResult {
    /// 0 on success, 1 on failure
    pub exit_code: i32,
    pub exception: Option<BakecheckError>,
    pub project: Option<GeneratedProject>,
}

impl BakeResult {
    pub fn is_success(&self) -> bool {
        self.exception.is_none()
    }

    pub fn into_result(self) -> Result<GeneratedProject> {
        match (self.exception, self.project) {
            (Some(err), _) => Err(err),
            (None, Some(project)) => Ok(project),
            (None, None) => Err(BakecheckError::Generic(
                "generation reported success without a project".to_string(),
            )),
        }
    }
}

impl From<Result<GeneratedProject>> for BakeResult {
    fn from(result: Result<GeneratedProject>) -> Self {
        match result {
            Ok(project) => BakeResult {
                exit_code: 0,
                exception: None,
                project: Some(project),
            },
            Err(err) => BakeResult {
                exit_code: 1,
                exception: Some(err),
                project: None,
            },
        }
    }
}

/// Generates projects from one template
pub struct Baker<R = TreeRenderer> {
    template: Template,
    renderer: R,
    options: BakeOptions,
}

impl Baker<TreeRenderer> {
    pub fn new(template: Template) -> Self {
        Self::with_renderer(template, TreeRenderer::new())
    }
}

impl<R: Renderer> Baker<R> {
    pub fn with_renderer(template: Template, renderer: R) -> Self {
        Self {
            template,
            renderer,
            options: BakeOptions::default(),
        }
    }

    pub fn options(mut self, options: BakeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Steps 1 to 3: the complete Parameter Set, validated
    pub fn validate(&self, extra: &ParameterSet) -> Result<ParameterSet> {
        let params = self.template.manifest.defaults.merged(extra);
        params.ensure_required()?;
        pre_gen::validate(&params, &self.template.settings.hooks)
            .map_err(BakecheckError::pre_gen_failed)?;
        Ok(params)
    }

    /// Generate a project, reporting the outcome as a result object
    pub fn bake(&self, extra: &ParameterSet, output_dir: &Path) -> BakeResult {
        let result = self.bake_project(extra, output_dir);
        if let Err(err) = &result {
            log::debug!("Generation failed: {}", err);
        }
        result.into()
    }

    pub fn bake_project(
        &self,
        extra: &ParameterSet,
        output_dir: &Path,
    ) -> Result<GeneratedProject> {
        let params = self.validate(extra)?;
        let repo_name = params.repo_name()?;

        let target = output_dir.join(repo_name);
        self.check_target(&target)?;

        fs::create_dir_all(output_dir)?;
        let temp_dir = TempDir::new_in(output_dir)?;
        let rendered = self.renderer.render(&self.template, &params, temp_dir.path())?;

        // The project root must be named exactly after repo_name
        let rendered_name = rendered
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if rendered_name != repo_name {
            return Err(BakecheckError::TemplateInvalid(format!(
                "project directory '{}' renders to '{}', expected repo_name '{}'",
                self.template.project_dir, rendered_name, repo_name
            )));
        }

        if target.exists() {
            fs::remove_dir_all(&target)?;
        }

        fs::rename(&rendered, &target)?;
        log::info!("Generated {}", target.display());

        if let Err(err) = run_post_gen(&target, &params, &self.template.settings) {
            if let Err(cleanup) = fs::remove_dir_all(&target) {
                log::warn!("Failed to remove {}: {}", target.display(), cleanup);
            }
            return Err(err);
        }

        Ok(GeneratedProject {
            root: target,
            params,
        })
    }

    fn check_target(&self, target: &Path) -> Result<()> {
        if target.exists() && !self.options.overwrite {
            return Err(BakecheckError::OutputExists {
                path: target.to_path_buf(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{audit_tree, ScanPolicy};
    use bakecheck_testkit::{
        temp_dir_in_workspace, write_sample_manifest, write_sample_template, write_tree,
    };

    fn sample_baker(root: &Path) -> Baker {
        write_sample_template(root);
        Baker::new(Template::load(root).unwrap())
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
    }

    #[test]
    fn test_bake_with_defaults() {
        let temp = temp_dir_in_workspace();
        let baker = sample_baker(&temp.path().join("template"));
        let out = temp.path().join("out");

        let result = baker.bake(&ParameterSet::new(), &out);
        assert_eq!(result.exit_code, 0);
        assert!(result.exception.is_none());

        let project = result.project.unwrap();
        assert_eq!(project.basename(), "my.application");
        assert!(project.exists());
        assert!(project.is_dir());
        assert_eq!(project.params().get("namespace"), Some("my"));
        // Only the project, no leftover temp dir
        assert_eq!(entries(&out), 1);

        let ini = fs::read_to_string(project.path().join("development.ini")).unwrap();
        assert!(!ini.contains("random%"));
        assert!(audit_tree(project.path(), &ScanPolicy::default()).is_ok());
    }

    #[test]
    fn test_bake_reserved_namespace_writes_nothing() {
        let temp = temp_dir_in_workspace();
        let baker = sample_baker(&temp.path().join("template"));
        let out = temp.path().join("out");
        let extra = ParameterSet::new()
            .with("repo_name", "websauna.application")
            .with("namespace", "websauna");

        let result = baker.bake(&extra, &out);
        assert_ne!(result.exit_code, 0);
        assert!(result.project.is_none());
        let err = result.exception.unwrap();
        assert!(err.is_hook_failure());
        assert!(err.to_string().contains("Hook script failed"));
        assert!(!out.exists());
    }

    #[test]
    fn test_bake_missing_parameter() {
        let temp = temp_dir_in_workspace();
        let template_root = temp.path().join("template");
        write_tree(
            &template_root,
            &[
                ("cookiecutter.json", r#"{"repo_name": "my.application"}"#),
                ("{{ cookiecutter.repo_name }}/README.rst", "x\n"),
            ],
        );
        let baker = Baker::new(Template::load(&template_root).unwrap());

        match baker.bake_project(&ParameterSet::new(), &temp.path().join("out")) {
            Err(BakecheckError::ParameterMissing(key)) => assert_eq!(key, "full_name"),
            other => panic!("Expected ParameterMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_bake_refuses_existing_project() {
        let temp = temp_dir_in_workspace();
        let baker = sample_baker(&temp.path().join("template"));
        let out = temp.path().join("out");
        write_tree(&out, &[("my.application/keep.txt", "mine")]);

        match baker.bake_project(&ParameterSet::new(), &out) {
            Err(BakecheckError::OutputExists { path }) => {
                assert_eq!(path, out.join("my.application"))
            }
            other => panic!("Expected OutputExists, got {:?}", other),
        }
        assert!(out.join("my.application/keep.txt").exists());

        let baker = baker.options(BakeOptions { overwrite: true });
        let project = baker.bake_project(&ParameterSet::new(), &out).unwrap();
        assert!(!project.path().join("keep.txt").exists());
        assert!(project.path().join("setup.py").is_file());
    }

    #[test]
    fn test_post_gen_failure_removes_project() {
        let temp = temp_dir_in_workspace();
        let template_root = temp.path().join("template");
        write_sample_template(&template_root);
        write_tree(
            &template_root,
            &[("bakecheck.toml", "[virtualenv]\npython = \"bakecheck-no-such-python\"\n")],
        );
        let baker = Baker::new(Template::load(&template_root).unwrap());
        let out = temp.path().join("out");

        let result = baker.bake(&ParameterSet::new().with("create_virtualenv", "Yes"), &out);
        assert_eq!(result.exit_code, 1);
        assert!(matches!(
            result.exception,
            Some(BakecheckError::ToolNotFound { .. })
        ));
        assert!(!out.join("my.application").exists());
    }

    #[test]
    fn test_project_root_must_match_repo_name() {
        let temp = temp_dir_in_workspace();
        let template_root = temp.path().join("template");
        write_tree(&template_root, &[("{{ cookiecutter.package_name }}/setup.py", "x = 1\n")]);
        write_sample_manifest(&template_root);
        let baker = Baker::new(Template::load(&template_root).unwrap());
        let out = temp.path().join("out");

        let result = baker.bake(&ParameterSet::new(), &out);
        assert_eq!(result.exit_code, 1);
        match result.exception {
            Some(BakecheckError::TemplateInvalid(message)) => {
                assert!(message.contains("'application'"));
                assert!(message.contains("'my.application'"));
            }
            other => panic!("Expected TemplateInvalid, got {:?}", other),
        }
        assert_eq!(entries(&out), 0);
    }

    struct BrokenRenderer;

    impl Renderer for BrokenRenderer {
        fn render(&self, _: &Template, _: &ParameterSet, dest: &Path) -> Result<PathBuf> {
            write_tree(dest, &[("my.application/half.txt", "partial")]);
            Err(BakecheckError::RenderFailed {
                path: PathBuf::from("half.txt"),
                reason: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_render_failure_leaves_no_partial_tree() {
        let temp = temp_dir_in_workspace();
        let template_root = temp.path().join("template");
        write_sample_template(&template_root);
        let baker =
            Baker::with_renderer(Template::load(&template_root).unwrap(), BrokenRenderer);
        let out = temp.path().join("out");

        let result = baker.bake(&ParameterSet::new(), &out);
        assert!(!result.is_success());
        assert_eq!(entries(&out), 0);
    }
}
