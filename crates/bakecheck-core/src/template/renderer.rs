//! Rendering a template directory into a concrete project tree

use crate::audit::is_binary;
use crate::error::{BakecheckError, Result};
use crate::params::ParameterSet;
use crate::template::{Template, TemplateContext, TemplateEngine};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The rendering engine seam
///
/// Implementations receive an already validated Parameter Set and must write
/// the rendered project below `dest`, returning the rendered project root.
pub trait Renderer {
    fn render(&self, template: &Template, params: &ParameterSet, dest: &Path) -> Result<PathBuf>;
}

/// Default renderer: renders path names and text files, copies the rest
#[derive(Debug, Default)]
pub struct TreeRenderer {
    engine: TemplateEngine,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one path component and make sure it stays a single name
    fn render_name(&self, raw: &str, context: &TemplateContext, source: &Path) -> Result<String> {
        let rendered = self
            .engine
            .render(raw, context)
            .map_err(|e| BakecheckError::RenderFailed {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
        validate_rendered_name(&rendered).map_err(|reason| BakecheckError::RenderFailed {
            path: source.to_path_buf(),
            reason,
        })?;
        Ok(rendered)
    }

    fn render_relative(
        &self,
        rel: &Path,
        context: &TemplateContext,
        source: &Path,
    ) -> Result<PathBuf> {
        let mut out = PathBuf::new();
        for component in rel.components() {
            let raw = component.as_os_str().to_string_lossy();
            out.push(self.render_name(&raw, context, source)?);
        }
        Ok(out)
    }

    fn render_file(&self, source: &Path, target: &Path, context: &TemplateContext) -> Result<()> {
        // Text that is not UTF-8 cannot be rendered; list it in
        // _copy_without_render to keep it as is
        let content = String::from_utf8(fs::read(source)?).map_err(|e| {
            BakecheckError::RenderFailed {
                path: source.to_path_buf(),
                reason: format!("text file is not valid UTF-8: {}", e.utf8_error()),
            }
        })?;

        // fs::copy keeps permission bits (e.g. executable scripts)
        fs::copy(source, target)?;
        let rendered = self
            .engine
            .render(&content, context)
            .map_err(|e| BakecheckError::RenderFailed {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
        fs::write(target, rendered)?;
        Ok(())
    }
}

impl Renderer for TreeRenderer {
    fn render(&self, template: &Template, params: &ParameterSet, dest: &Path) -> Result<PathBuf> {
        let context = TemplateContext::new(params.to_context_value());
        let verbatim = build_globset(&template.manifest.copy_without_render)?;

        let source_root = template.project_template_dir();
        let root_name = self.render_name(&template.project_dir, &context, &source_root)?;
        let output_root = dest.join(root_name);
        fs::create_dir_all(&output_root)?;

        for entry in WalkDir::new(&source_root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let source = entry.path();
            let rel = source
                .strip_prefix(&source_root)
                .map_err(|e| BakecheckError::Generic(e.to_string()))?;
            let target = output_root.join(self.render_relative(rel, &context, source)?);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            if verbatim.is_match(rel) || is_binary(source)? {
                log::debug!("Copying without render: {}", rel.display());
                fs::copy(source, &target)?;
            } else {
                self.render_file(source, &target, &context)?;
            }
        }

        Ok(output_root)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| BakecheckError::TemplateConfigInvalid {
            file: crate::template::manifest::COOKIECUTTER_JSON.to_string(),
            reason: format!("_copy_without_render: {}", e),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| BakecheckError::Generic(e.to_string()))
}

/// A rendered path component must be exactly one normal name
///
/// Blocks empty names, `.`/`..`, separators and absolute paths so a
/// parameter value can never move output outside the project root.
fn validate_rendered_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("rendered name is empty".to_string());
    }

    let mut normal_count = 0;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => normal_count += 1,
            Component::CurDir => return Err(format!("rendered name '{}' is '.'", name)),
            Component::ParentDir => return Err(format!("rendered name '{}' contains '..'", name)),
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("rendered name '{}' is an absolute path", name))
            }
        }
    }

    if normal_count != 1 {
        return Err(format!(
            "rendered name '{}' must not contain path separators",
            name
        ));
    }

    Ok(())
}
