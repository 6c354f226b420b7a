//! Post-generation hook - runs inside the freshly rendered project

use crate::audit::{build_files_list, is_scannable, markers::SECRET, ScanPolicy};
use crate::error::Result;
use crate::params::{CreateVirtualenv, ParameterSet};
use crate::qa::tool::{env_executable, run_tool};
use crate::template::{TemplateSettings, VirtualenvSettings};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Length of generated secrets
pub const SECRET_LEN: usize = 48;

pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Replace every secret marker with a fresh secret
///
/// Each occurrence gets its own value. Returns the number of replaced markers.
pub fn fill_secrets(root: &Path, policy: &ScanPolicy) -> Result<usize> {
    let mut replaced = 0;

    for path in build_files_list(root)? {
        if !is_scannable(root, &path, policy)? {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let mut count = 0;
        let updated = SECRET.replace_all(&content, |_: &regex::Captures<'_>| {
            count += 1;
            generate_secret()
        });
        if count == 0 {
            continue;
        }

        fs::write(&path, updated.as_ref())?;
        log::debug!("Generated {} secret(s) in {}", count, path.display());
        replaced += count;
    }

    Ok(replaced)
}

/// `<python> -m venv <dir>` and the optional pip install
pub fn create_virtualenv(root: &Path, settings: &VirtualenvSettings) -> Result<PathBuf> {
    let args = vec!["-m".to_string(), "venv".to_string(), settings.dir.clone()];
    run_tool(Path::new(&settings.python), &args, root)?.into_result()?;

    if !settings.pip_install.is_empty() {
        let pip = env_executable(root, &settings.dir, "pip");
        let mut args = vec!["install".to_string()];
        args.extend(settings.pip_install.iter().cloned());
        run_tool(&pip, &args, root)?.into_result()?;
    }

    Ok(root.join(&settings.dir))
}

/// The post_gen_project hook
pub fn run_post_gen(root: &Path, params: &ParameterSet, settings: &TemplateSettings) -> Result<()> {
    let policy = ScanPolicy::with_env_dir(settings.virtualenv.dir.as_str());
    let secrets = fill_secrets(root, &policy)?;
    if secrets > 0 {
        log::info!("Generated {} secret(s)", secrets);
    }

    if params.create_virtualenv()? == CreateVirtualenv::Yes {
        let env = create_virtualenv(root, &settings.virtualenv)?;
        log::info!("Created virtualenv at {}", env.display());
    }

    Ok(())
}
