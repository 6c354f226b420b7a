//! Bake command - generate a project from a template

use crate::cli::TemplateArgs;
use crate::context::Context;
use crate::output;
use anyhow::Result;
use bakecheck_core::BakeOptions;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct BakeOutput {
    exit_code: i32,
    project: ProjectInfo,
}

#[derive(Debug, Serialize)]
struct ProjectInfo {
    name: String,
    root: String,
}

pub fn run(
    args: TemplateArgs,
    output_dir: PathBuf,
    overwrite: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let ctx = Context::new(&args)?;
    let (baker, extra) = ctx.into_baker();
    let baker = baker.options(BakeOptions { overwrite });

    if verbose && !json {
        output::step(&format!("Generating into {}", output_dir.display()));
    }

    let result = baker.bake(&extra, &output_dir);
    let exit_code = result.exit_code;
    let project = result.into_result()?;

    if json {
        return output::print_json(
            "bake",
            &BakeOutput {
                exit_code,
                project: ProjectInfo {
                    name: project.basename(),
                    root: project.path().display().to_string(),
                },
            },
        );
    }

    output::success(&format!(
        "Generated '{}' at {}",
        project.basename(),
        project.path().display()
    ));
    Ok(())
}
