//! CLI output formatting for batch runs.
//!
//! # Output Format
//!
//! ## Per image
//!
//! ```text
//! 001-dawn.jpg
//!     1600x1200 → 300x225
//!     Output: resized/001-dawn-fit.jpg (18.4 KB)
//! broken.png
//!     Error: Failed to decode broken.png: ...
//! ```
//!
//! ## Summary
//!
//! ```text
//! Resized 2 images to image/jpeg, 1 failed
//! Manifest: resized/manifest.json
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::process::{Job, Manifest, ProcessEvent};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display name for a source: its file name, or the whole string if it has none.
fn display_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

fn format_dimensions((width, height): (u32, u32)) -> String {
    format!("{width}x{height}")
}

/// Human-readable byte count.
///
/// ```text
/// 512      → 512 B
/// 18841    → 18.4 KB
/// 3145728  → 3.0 MB
/// ```
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format one progress event.
///
/// Data URI payloads are not included; they are printed once the batch ends.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Finished(done) => {
            let mut lines = vec![display_name(&done.source)];
            lines.push(format!(
                "{}{} → {}",
                indent(1),
                format_dimensions(done.source_dimensions),
                format_dimensions(done.dimensions)
            ));
            match &done.output {
                Some(path) => lines.push(format!(
                    "{}Output: {} ({})",
                    indent(1),
                    path,
                    format_size(done.bytes)
                )),
                None => lines.push(format!(
                    "{}Encoded: {} ({})",
                    indent(1),
                    done.mime,
                    format_size(done.bytes)
                )),
            }
            lines
        }
        ProcessEvent::Failed(failed) => vec![
            display_name(&failed.source),
            format!("{}Error: {}", indent(1), failed.error),
        ],
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the end-of-run summary.
pub fn format_summary(manifest: &Manifest, manifest_path: Option<&Path>) -> Vec<String> {
    let verb = match manifest.job {
        Job::Fit => "Resized",
        Job::Thumbnail => "Thumbnailed",
    };
    let mut headline = format!(
        "{} {} to {}",
        verb,
        plural(manifest.outputs.len(), "image"),
        manifest.mime
    );
    if !manifest.failures.is_empty() {
        headline.push_str(&format!(", {} failed", manifest.failures.len()));
    }

    let mut lines = vec![headline];
    if let Some(path) = manifest_path {
        lines.push(format!("Manifest: {}", path.display()));
    }
    lines
}

pub fn print_summary(manifest: &Manifest, manifest_path: Option<&Path>) {
    for line in format_summary(manifest, manifest_path) {
        println!("{}", line);
    }
}

/// One data URI per line, in input order.
pub fn format_data_uris(manifest: &Manifest) -> Vec<String> {
    manifest
        .outputs
        .iter()
        .filter_map(|done| done.data_uri.clone())
        .collect()
}

pub fn print_data_uris(manifest: &Manifest) {
    for line in format_data_uris(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
