mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate { template } => commands::validate::run(template, cli.verbose),
        Commands::Bake {
            template,
            output_dir,
            overwrite,
            json,
        } => commands::bake::run(template, output_dir, overwrite, json, cli.verbose),
        Commands::Audit { dir, env_dir, json } => {
            commands::audit::run(dir, env_dir, json, cli.verbose)
        }
        Commands::Verify {
            template,
            output_dir,
            qa,
            json,
        } => commands::verify::run(template, output_dir, qa, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
