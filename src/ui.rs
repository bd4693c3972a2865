//! Terminal output helpers and the single confirmation prompt.

use crate::error::Result;
use console::style;
use std::io::{self, Write};

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print one commit's identifier and message, as seen by the classifier
pub fn display_commit(sha: &str, message: &str) {
    println!("  {} {}", style(short_sha(sha)).dim(), message);
}

/// Abbreviate a commit identifier to seven characters. Identifiers are not
/// guaranteed to be hex, so fall back to the full string rather than slice
/// through a multi-byte character.
fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Ask a yes/no question, defaulting to no
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
