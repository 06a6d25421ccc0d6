//! User interface module - stdout reports and stderr messages.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing command results to stdout

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_error, error_json, TagReport};

/// Print a tag report as one JSON line on stdout.
///
/// Falls back to an error document and returns `false` if the report cannot
/// be encoded.
pub fn print_report(report: &TagReport) -> bool {
    match report.to_json() {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            print_error(&format!("Error encoding JSON: {}", e));
            false
        }
    }
}

/// Print `{"error": message}` as one JSON line on stdout.
pub fn print_error(message: &str) {
    println!("{}", error_json(message));
}
