//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bakecheck")]
#[command(version, about = "Validate cookiecutter-style project templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Template and Parameter Set overrides shared by template commands
#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Template directory (contains cookiecutter.json)
    pub template: PathBuf,

    /// Parameter overrides from a .json or .toml file
    #[arg(long, value_name = "FILE", env = "BAKECHECK_CONTEXT")]
    pub context: Option<PathBuf>,

    /// Override one parameter (repeatable, applied after --context)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pre-generation checks without writing anything
    Validate {
        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Generate a project from a template
    Bake {
        #[command(flatten)]
        template: TemplateArgs,

        /// Directory the project is created in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Replace an existing project directory
        #[arg(long)]
        overwrite: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan a generated project for unreplaced markers
    Audit {
        /// Generated project root
        dir: PathBuf,

        /// Environment directory exempt from scanning
        #[arg(long, default_value = "env")]
        env_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate, generate and audit; optionally run style checks and tests
    Verify {
        #[command(flatten)]
        template: TemplateArgs,

        /// Keep the generated project here (default: temporary directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Run the style checker and the project's test suite
        #[arg(long)]
        qa: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
