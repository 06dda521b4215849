//! ASCII banner for Sentinel.

use super::colors::SemanticStyle;

/// Prints a mini banner for use at the top of subcommand output.
pub fn print_mini_banner() {
    println!("{} {}", "◆".info(), "Sentinel".header());
}

/// Prints the version banner.
pub fn print_version_banner(version: &str) {
    println!();
    println!("  {} {} {}", "◆".info(), "Sentinel".header(), format!("v{version}").muted());
    println!("  {}", "In-process interception buffer".muted());
    println!();
}
