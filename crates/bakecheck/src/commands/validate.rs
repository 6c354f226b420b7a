//! Validate command - run the pre-generation checks only

use crate::cli::TemplateArgs;
use crate::context::Context;
use crate::output;
use anyhow::Result;

/// Validate the merged Parameter Set of a template
///
/// Nothing is written; a hook failure is returned as an error so the
/// process exits non-zero with the `Hook script failed` diagnostic.
pub fn run(args: TemplateArgs, verbose: bool) -> Result<()> {
    let ctx = Context::new(&args)?;
    let (baker, extra) = ctx.into_baker();

    if verbose {
        output::step(&format!(
            "Validating parameters for {}",
            baker.template().root.display()
        ));
    }

    let params = baker.validate(&extra)?;

    if verbose {
        for (key, value) in params.iter() {
            println!("    {} = {}", key, value);
        }
    }

    output::success(&format!(
        "Parameters valid for '{}'",
        params.repo_name()?
    ));
    Ok(())
}
