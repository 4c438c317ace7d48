//! Terminal output helpers for human-readable command output

use colored::Colorize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}
