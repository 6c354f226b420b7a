//! Shared output helpers

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "1.0";

/// Envelope for `--json` output
#[derive(Debug, Serialize)]
struct JsonOutput<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    timestamp: String,
    #[serde(flatten)]
    body: &'a T,
}

pub fn print_json<T: Serialize>(command: &str, body: &T) -> Result<()> {
    let output = JsonOutput {
        schema_version: SCHEMA_VERSION,
        command,
        timestamp: Utc::now().to_rfc3339(),
        body,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn step(message: &str) {
    println!("{} {}", "→".cyan(), message);
}

/// Indented tool output for verbose mode
pub fn captured(label: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    println!("    {}", label.dimmed());
    for line in text.lines() {
        println!("      {}", line);
    }
}
