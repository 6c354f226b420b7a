//! Template module - loading and rendering project templates
//!
//! A template directory looks like a cookiecutter template:
//!
//! ```text
//! my-template/
//! ├── cookiecutter.json          parameter defaults and `_` options
//! ├── bakecheck.toml             optional hook/virtualenv/qa settings
//! └── {{ cookiecutter.repo_name }}/
//!     └── ...                    files and directories to render
//! ```
//!
//! ## Syntax
//!
//! - Placeholders: `{{cookiecutter.key}}` or `{{ cookiecutter.key }}` (spaces optional)
//! - Escape sequences: `\{{literal}}` emits `{{literal}}`
//!
//! Files matching a `_copy_without_render` glob and binary files are copied
//! verbatim.

pub mod engine;
pub mod error;
pub mod manifest;
pub mod renderer;

pub use engine::{render, TemplateContext, TemplateEngine};
pub use error::TemplateError;
pub use manifest::{
    HookSettings, QaSettings, Template, TemplateManifest, TemplateSettings, VirtualenvSettings,
};
pub use renderer::{Renderer, TreeRenderer};
