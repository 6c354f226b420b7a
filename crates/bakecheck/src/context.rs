//! Template and parameter overrides loaded from command line arguments

use crate::cli::TemplateArgs;
use anyhow::{Context as _, Result};
use bakecheck_core::{Baker, ParameterSet, Template};

pub struct Context {
    pub template: Template,
    /// Caller overrides, without template defaults
    pub extra: ParameterSet,
}

impl Context {
    /// Load the template, then the context file, then `--set` overrides
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template has no cookiecutter.json or project directory
    /// - The context file cannot be read or parsed
    /// - A `--set` value is not `KEY=VALUE`
    pub fn new(args: &TemplateArgs) -> Result<Self> {
        let template = Template::load(&args.template)?;

        let mut extra = match &args.context {
            Some(path) => ParameterSet::from_file(path)
                .with_context(|| format!("Failed to load context file {}", path.display()))?,
            None => ParameterSet::new(),
        };
        for raw in &args.set {
            let (key, value) = ParameterSet::parse_assignment(raw)?;
            extra.insert(key, value);
        }

        log::debug!("{} parameter override(s)", extra.len());

        Ok(Self { template, extra })
    }

    pub fn into_baker(self) -> (Baker, ParameterSet) {
        (Baker::new(self.template), self.extra)
    }
}
