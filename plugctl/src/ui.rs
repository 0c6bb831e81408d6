// plugctl/src/ui.rs
//! Terminal output for user-facing status lines.

use colored::Colorize;
use plugctl_core::OutputSink;

/// Prints status lines to stdout with a green check mark.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalOutput;

impl OutputSink for TerminalOutput {
    fn info(&self, message: &str) {
        println!("{} {}", "✔".green(), message);
    }
}
