//! Parameter Set - the named values a caller supplies to customize a project

use crate::error::{BakecheckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use toml::Value;

/// Name of the context object templates reference (`{{ cookiecutter.field }}`)
pub const CONTEXT_NAME: &str = "cookiecutter";

/// Keys every generation request must provide
pub const REQUIRED_KEYS: &[&str] = &[
    "full_name",
    "email",
    "company",
    "github_username",
    "project_name",
    "project_short_description",
    "tags",
    "repo_name",
    "namespace",
    "package_name",
    "release_date",
    "year",
    "version",
    "create_virtualenv",
];

/// Whether generation creates the environment artifact subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateVirtualenv {
    Yes,
    No,
}

impl FromStr for CreateVirtualenv {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Case-sensitive: "yes" is rejected
        match s {
            "Yes" => Ok(CreateVirtualenv::Yes),
            "No" => Ok(CreateVirtualenv::No),
            other => Err(format!("expected \"Yes\" or \"No\", got \"{}\"", other)),
        }
    }
}

impl fmt::Display for CreateVirtualenv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateVirtualenv::Yes => write!(f, "Yes"),
            CreateVirtualenv::No => write!(f, "No"),
        }
    }
}

/// String-keyed parameter map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of `self`; keys in `other` win
    pub fn merged(&self, other: &ParameterSet) -> ParameterSet {
        let mut values = self.values.clone();
        values.extend(other.values.clone());
        ParameterSet { values }
    }

    /// Get a required parameter
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| BakecheckError::ParameterMissing(key.to_string()))
    }

    /// Required keys absent from this set, in declaration order
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.values.contains_key(*key))
            .collect()
    }

    /// Fail on the first missing required key
    pub fn ensure_required(&self) -> Result<()> {
        match self.missing_keys().first() {
            Some(key) => Err(BakecheckError::ParameterMissing(key.to_string())),
            None => Ok(()),
        }
    }

    pub fn repo_name(&self) -> Result<&str> {
        self.require("repo_name")
    }

    pub fn namespace(&self) -> Result<&str> {
        self.require("namespace")
    }

    pub fn package_name(&self) -> Result<&str> {
        self.require("package_name")
    }

    pub fn create_virtualenv(&self) -> Result<CreateVirtualenv> {
        let raw = self.require("create_virtualenv")?;
        raw.parse().map_err(|reason| {
            BakecheckError::ParameterInvalid(format!("create_virtualenv: {}", reason))
        })
    }

    /// Parse a `key=value` override as given on the command line
    pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
        let (key, value) = raw.split_once('=').ok_or_else(|| {
            BakecheckError::ParameterInvalid(format!("expected KEY=VALUE, got '{}'", raw))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(BakecheckError::ParameterInvalid(format!(
                "empty key in '{}'",
                raw
            )));
        }
        Ok((key.to_string(), value.to_string()))
    }

    /// Load a flat string map from a `.json` or `.toml` context file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            toml::from_str::<ParameterSet>(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<ParameterSet>(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| BakecheckError::TemplateConfigInvalid {
            file: path.display().to_string(),
            reason,
        })
    }

    /// Template context: `{ cookiecutter = { key = "value", ... } }`
    pub fn to_context_value(&self) -> Value {
        let inner: toml::map::Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let mut root = toml::map::Map::new();
        root.insert(CONTEXT_NAME.to_string(), Value::Table(inner));
        Value::Table(root)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ParameterSet {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
