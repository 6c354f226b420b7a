//! Verify command - validate, generate, audit and optionally run QA tools

use crate::cli::TemplateArgs;
use crate::context::Context;
use crate::output;
use anyhow::Result;
use bakecheck_core::pipeline::{verify_template, VerificationReport, VerifyOptions};
use bakecheck_core::qa::ToolOutput;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn run(
    args: TemplateArgs,
    output_dir: Option<PathBuf>,
    qa: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let ctx = Context::new(&args)?;

    // Without -o the project only lives as long as this command
    let (out, scratch) = match output_dir {
        Some(dir) => (dir, None),
        None => {
            let temp = TempDir::new()?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };

    if verbose && !json {
        output::step(&format!("Verifying {}", ctx.template.root.display()));
    }

    let options = VerifyOptions {
        run_qa: qa,
        ..VerifyOptions::default()
    };
    let report = verify_template(ctx.template, &ctx.extra, &out, &options)?;

    if json {
        return output::print_json("verify", &report);
    }

    print_human_readable(&report, scratch.is_some(), verbose);
    Ok(())
}

fn print_human_readable(report: &VerificationReport, temporary: bool, verbose: bool) {
    output::success(&format!(
        "Generated '{}'{}",
        report.project.basename(),
        if temporary {
            " (temporary)".to_string()
        } else {
            format!(" at {}", report.project.path().display())
        }
    ));
    output::success(&format!(
        "Audit passed: {} file(s) scanned, {} binary and {} artifact file(s) skipped",
        report.audit.scanned, report.audit.skipped_binary, report.audit.skipped_artifact
    ));

    if let Some(qa) = &report.qa {
        print_tool("Style check passed", &qa.style, verbose);
        print_tool("Tests passed", &qa.tests, verbose);
    }
}

fn print_tool(title: &str, tool: &ToolOutput, verbose: bool) {
    output::success(&format!("{} ({}, {} ms)", title, tool.program, tool.duration_ms));
    if verbose {
        output::captured("stdout", &tool.stdout);
        output::captured("stderr", &tool.stderr);
    }
}
