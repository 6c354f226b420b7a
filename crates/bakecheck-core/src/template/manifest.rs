//! Template loading: cookiecutter.json defaults and bakecheck.toml settings

use crate::error::{BakecheckError, Result};
use crate::params::{ParameterSet, CONTEXT_NAME};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

/// Parameter defaults file at the template root
pub const COOKIECUTTER_JSON: &str = "cookiecutter.json";

/// Optional settings file at the template root
pub const SETTINGS_FILE: &str = "bakecheck.toml";

/// bakecheck.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSettings {
    #[serde(default)]
    pub hooks: HookSettings,
    #[serde(default)]
    pub virtualenv: VirtualenvSettings,
    #[serde(default)]
    pub qa: QaSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookSettings {
    /// Namespace values rejected by the pre-generation hook
    #[serde(default = "default_reserved_namespaces")]
    pub reserved_namespaces: Vec<String>,
    /// Package names rejected by the pre-generation hook
    #[serde(default = "default_reserved_package_names")]
    pub reserved_package_names: Vec<String>,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            reserved_namespaces: default_reserved_namespaces(),
            reserved_package_names: default_reserved_package_names(),
        }
    }
}

fn default_reserved_namespaces() -> Vec<String> {
    vec!["websauna".to_string()]
}

fn default_reserved_package_names() -> Vec<String> {
    vec!["site".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualenvSettings {
    /// Environment directory, relative to the project root
    #[serde(default = "default_env_dir")]
    pub dir: String,
    #[serde(default = "default_python")]
    pub python: String,
    /// Arguments for `<env>/bin/pip install`; empty skips the install step
    #[serde(default)]
    pub pip_install: Vec<String>,
}

impl Default for VirtualenvSettings {
    fn default() -> Self {
        Self {
            dir: default_env_dir(),
            python: default_python(),
            pip_install: vec![],
        }
    }
}

fn default_env_dir() -> String {
    "env".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSettings {
    #[serde(default = "default_style_checker")]
    pub style_checker: String,
    /// Paths handed to the style checker; rendered with the Parameter Set
    #[serde(default = "default_style_targets")]
    pub style_targets: Vec<String>,
    #[serde(default = "default_test_runner")]
    pub test_runner: String,
    #[serde(default)]
    pub test_args: Vec<String>,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self {
            style_checker: default_style_checker(),
            style_targets: default_style_targets(),
            test_runner: default_test_runner(),
            test_args: vec![],
        }
    }
}

fn default_style_checker() -> String {
    "flake8".to_string()
}

fn default_style_targets() -> Vec<String> {
    vec![
        "setup.py".to_string(),
        "{{ cookiecutter.namespace }}".to_string(),
    ]
}

fn default_test_runner() -> String {
    "pytest".to_string()
}

impl TemplateSettings {
    /// Load bakecheck.toml from the template root, or defaults if absent
    pub fn load(template_root: &Path) -> Result<Self> {
        let path = template_root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| BakecheckError::TemplateConfigInvalid {
            file: SETTINGS_FILE.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Parsed cookiecutter.json
#[derive(Debug, Clone, Default)]
pub struct TemplateManifest {
    /// Default Parameter Set
    pub defaults: ParameterSet,
    /// Globs (relative to the project template dir) copied verbatim
    pub copy_without_render: Vec<String>,
}

impl TemplateManifest {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let invalid = |reason: String| BakecheckError::TemplateConfigInvalid {
            file: COOKIECUTTER_JSON.to_string(),
            reason,
        };

        let root: JsonValue = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let object = root
            .as_object()
            .ok_or_else(|| invalid("top-level value must be an object".to_string()))?;

        let mut manifest = TemplateManifest::default();

        for (key, value) in object {
            if key == "_copy_without_render" {
                manifest.copy_without_render = string_list(value)
                    .ok_or_else(|| invalid(format!("{} must be a list of strings", key)))?;
                continue;
            }
            if key.starts_with('_') {
                log::debug!("Ignoring template option '{}'", key);
                continue;
            }

            let default = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                // Choice variable: first entry is the default
                JsonValue::Array(choices) => choices
                    .first()
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| invalid(format!("choice '{}' must start with a string", key)))?,
                _ => return Err(invalid(format!("unsupported value for '{}'", key))),
            };
            manifest.defaults.insert(key.clone(), default);
        }

        Ok(manifest)
    }

    pub fn load(template_root: &Path) -> Result<Self> {
        let path = template_root.join(COOKIECUTTER_JSON);
        if !path.is_file() {
            return Err(BakecheckError::TemplateNotFound {
                path: template_root.to_path_buf(),
            });
        }
        Self::from_json_str(&fs::read_to_string(&path)?)
    }
}

fn string_list(value: &JsonValue) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// A loaded template directory
#[derive(Debug, Clone)]
pub struct Template {
    pub root: PathBuf,
    /// Unrendered name of the project template directory
    pub project_dir: String,
    pub manifest: TemplateManifest,
    pub settings: TemplateSettings,
}

impl Template {
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let manifest = TemplateManifest::load(&root)?;
        let settings = TemplateSettings::load(&root)?;
        let project_dir = discover_project_dir(&root)?;

        log::debug!(
            "Loaded template {} (project dir '{}', {} defaults)",
            root.display(),
            project_dir,
            manifest.defaults.len()
        );

        Ok(Self {
            root,
            project_dir,
            manifest,
            settings,
        })
    }

    /// Absolute path of the project template directory
    pub fn project_template_dir(&self) -> PathBuf {
        self.root.join(&self.project_dir)
    }
}

/// Find the single top-level directory named like `{{ cookiecutter.repo_name }}`
fn discover_project_dir(root: &Path) -> Result<String> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains("{{") && name.contains(CONTEXT_NAME) {
            candidates.push(name);
        }
    }
    candidates.sort();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(BakecheckError::TemplateInvalid(format!(
            "no project directory (e.g. '{{{{ {}.repo_name }}}}') in {}",
            CONTEXT_NAME,
            root.display()
        ))),
        _ => Err(BakecheckError::TemplateInvalid(format!(
            "multiple project directories in {}: {}",
            root.display(),
            candidates.join(", ")
        ))),
    }
}
