//! Fixture templates and parameter sets

use std::path::{Path, PathBuf};

use crate::{write_file, write_tree};

/// `repo_name` of [`default_context`] and of the sample template defaults
pub const SAMPLE_REPO_NAME: &str = "my.application";

/// A Parameter Set that passes every pre-generation check
pub fn default_context() -> Vec<(&'static str, &'static str)> {
    vec![
        ("full_name", "Websauna Team"),
        ("email", "developers@websauna.org"),
        ("company", "Websauna"),
        ("github_username", "websauna"),
        ("project_name", "Websauna: News portal"),
        ("project_short_description", "Websauna news portal application."),
        ("tags", "python package websauna pyramid"),
        ("repo_name", SAMPLE_REPO_NAME),
        ("namespace", "my"),
        ("package_name", "application"),
        ("release_date", "today"),
        ("year", "2017"),
        ("version", "1.0.0a1"),
        ("create_virtualenv", "No"),
    ]
}

const SAMPLE_MANIFEST: &str = r#"{
    "full_name": "Websauna Team",
    "email": "developers@websauna.org",
    "company": "Websauna",
    "github_username": "websauna",
    "project_name": "Websauna: News portal",
    "project_short_description": "Websauna news portal application.",
    "tags": "python package websauna pyramid",
    "repo_name": "my.application",
    "namespace": "my",
    "package_name": "application",
    "release_date": "today",
    "year": "2017",
    "version": "1.0.0a1",
    "create_virtualenv": ["No", "Yes"],
    "_copy_without_render": ["*.html"]
}
"#;

/// Write only the sample `cookiecutter.json` at `root`
pub fn write_sample_manifest(root: &Path) {
    write_tree(root, &[("cookiecutter.json", SAMPLE_MANIFEST)]);
}

/// Logo with a marker after a NUL byte; only content sniffing can tell it apart
pub const SAMPLE_LOGO: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR{{ cookiecutter.repo_name }}";

/// Write a small cookiecutter-style template at `root`
///
/// Every default in `cookiecutter.json` passes validation, the project tree
/// carries secret markers, a verbatim-copied HTML template and a binary logo.
pub fn write_sample_template(root: &Path) -> PathBuf {
    write_sample_manifest(root);
    write_tree(
        root,
        &[
            (
                "{{ cookiecutter.repo_name }}/setup.py",
                "from setuptools import setup\n\nsetup(\n    name='{{ cookiecutter.repo_name }}',\n    version='{{ cookiecutter.version }}',\n    author='{{ cookiecutter.full_name }}',\n    author_email='{{ cookiecutter.email }}',\n)\n",
            ),
            (
                "{{ cookiecutter.repo_name }}/README.rst",
                "{{ cookiecutter.project_name }}\n\n{{ cookiecutter.project_short_description }}\n",
            ),
            (
                "{{ cookiecutter.repo_name }}/development.ini",
                "[app:main]\nwebsauna.site_name = {{ cookiecutter.project_name }}\nwebsauna.authentication.secret = %cookiecutter.authentication_secret_random%\nwebsauna.session_secret = %cookiecutter.session_secret_random%\n",
            ),
            (
                "{{ cookiecutter.repo_name }}/{{ cookiecutter.namespace }}/__init__.py",
                "__import__('pkg_resources').declare_namespace(__name__)\n",
            ),
            (
                "{{ cookiecutter.repo_name }}/{{ cookiecutter.namespace }}/{{ cookiecutter.package_name }}/__init__.py",
                "\"\"\"{{ cookiecutter.project_name }}\"\"\"\n",
            ),
            (
                "{{ cookiecutter.repo_name }}/{{ cookiecutter.namespace }}/{{ cookiecutter.package_name }}/templates/home.html",
                "{% extends \"site/base.html\" %}\n<h1>{{ site_name }}</h1>\n",
            ),
            (
                "{{ cookiecutter.repo_name }}/tests/test_app.py",
                "def test_import():\n    import {{ cookiecutter.namespace }}.{{ cookiecutter.package_name }}\n",
            ),
        ],
    );
    write_file(
        root,
        "{{ cookiecutter.repo_name }}/{{ cookiecutter.namespace }}/{{ cookiecutter.package_name }}/static/logo.png",
        SAMPLE_LOGO,
    );
    root.to_path_buf()
}

/// Write an executable `/bin/sh` script named `name` into `dir`
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).expect("Failed to create tool directory");
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("Failed to write fake tool");

    let mut perms = std::fs::metadata(&path)
        .expect("Failed to get metadata")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to set permissions");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temp_dir_in_workspace;

    #[test]
    fn test_default_context_covers_sample_manifest_keys() {
        for (key, value) in default_context() {
            if key == "create_virtualenv" {
                continue;
            }
            let line = format!("\"{}\": \"{}\"", key, value);
            assert!(SAMPLE_MANIFEST.contains(&line), "missing {}", line);
        }
    }

    #[test]
    fn test_sample_template_layout() {
        let temp = temp_dir_in_workspace();
        let root = write_sample_template(temp.path());

        assert!(root.join("cookiecutter.json").is_file());
        assert!(root.join("{{ cookiecutter.repo_name }}/setup.py").is_file());
        assert!(root
            .join("{{ cookiecutter.repo_name }}/{{ cookiecutter.namespace }}/{{ cookiecutter.package_name }}/static/logo.png")
            .is_file());
    }
}
