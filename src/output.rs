//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ```text
//! projects (450x350)
//!     team.jpg → uploads/projects/team.jpg
//!     notes.txt: Invalid file
//! Stored 1 of 2 uploads
//! ```

use crate::config::IngestConfig;
use crate::ingest::IngestResponse;
use crate::types::{Category, TargetSize};

/// One line per upload, indented under its category header, plus a summary.
pub fn format_ingest_results(
    category: Category,
    target: TargetSize,
    results: &[(String, IngestResponse)],
) -> Vec<String> {
    let mut lines = vec![format!("{category} ({target})")];
    for (source, response) in results {
        match &response.path {
            Some(path) if response.success => lines.push(format!("    {source} → {path}")),
            _ => lines.push(format!("    {source}: {}", response.message)),
        }
    }
    let stored = results.iter().filter(|(_, r)| r.success).count();
    lines.push(format!("Stored {stored} of {} uploads", results.len()));
    lines
}

pub fn print_ingest_results(
    category: Category,
    target: TargetSize,
    results: &[(String, IngestResponse)],
) {
    for line in format_ingest_results(category, target, results) {
        println!("{line}");
    }
}

/// Effective settings after merging the config file over stock defaults.
pub fn format_config(config: &IngestConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Upload root: {}", config.upload_root.display()),
        format!("Public prefix: {}", config.public_prefix),
        format!("Max upload: {} bytes", config.max_upload_bytes),
    ];
    for category in Category::ALL {
        lines.push(format!("    {category}: {}", config.target_size(category)));
    }
    lines.push(format!(
        "Output: quality {}, naming {:?}",
        config.output.quality, config.output.naming
    ));
    lines
}

pub fn print_config(config: &IngestConfig) {
    for line in format_config(config) {
        println!("{line}");
    }
}
