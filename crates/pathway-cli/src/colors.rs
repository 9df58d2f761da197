//! Terminal color constants and utilities for CLI output.

use std::io::{self, Write};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Flush stdout so a line printed without a newline shows up before slow work.
#[inline]
pub fn flush_stdout() {
    io::stdout().flush().ok();
}

/// Print a command banner followed by a rule.
pub fn print_header(title: &str, subject: &str) {
    println!("\n{}{}{} - {}", BOLD, title, RESET, subject);
    println!("{}", "─".repeat(50));
}
