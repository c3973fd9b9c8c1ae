//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (media item, page) is its semantic identity: a positional
//! index and title. Filesystem paths follow as indented context lines, so the
//! output reads as a content inventory while still pointing back to files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Images (2)
//!     001 Charlie Sunset
//!         Source: assets/images/by_charlie_sunset.webp
//!         Category: abstract
//! Videos (1)
//!     001 Couch 2
//!         Source: assets/videos/couch2.mp4
//!         Thumbnail: assets/images/by_charlie_sunset.webp
//!
//! Skipped
//!     assets/images/sunset - Copy.webp (copy)
//! Missing
//!     assets/memes/
//!
//! Wrote 3 items to media-manifest.json
//! ```
//!
//! ## Build
//!
//! ```text
//! Manifest: 3 items
//! Home → index.html
//!     Grid: 8 columns × 8 rows, 64 cells per section
//!     Stickers: 16 slots
//! 001 Images → images.html (2 items)
//!     001 Images · Abstract → images-abstract.html (2 items)
//! 002 Videos → videos.html (1 item)
//!
//! Generated 4 gallery pages, 3 viewer pages, copied 5 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{BuildReport, ManifestStatus, PageSummary, SiteSummary};
use crate::scan::{ScanResult, SkipReason};
use crate::types::MediaItem;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a media line: titled items show the title, untitled show the
/// filename in parens.
///
/// ```text
/// 001 The Sunset        // titled
/// 001 (clip.mp4)        // untitled, filename IS the identity
/// ```
fn item_line(index: usize, title: Option<&str>, src: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => {
            let filename = src.rsplit('/').next().unwrap_or(src);
            format!("{} ({})", format_index(index), filename)
        }
    }
}

fn manifest_line(status: &ManifestStatus) -> String {
    match status {
        ManifestStatus::Loaded { items, skipped: 0 } => {
            format!("Manifest: {}", plural(*items, "item"))
        }
        ManifestStatus::Loaded { items, skipped } => format!(
            "Manifest: {} ({} skipped)",
            plural(*items, "item"),
            skipped
        ),
        ManifestStatus::Failed(reason) => format!("Manifest: error: {reason}"),
    }
}

/// Main pages numbered in order, category pages nested under their parent.
fn page_lines(pages: &[PageSummary]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut main_pos = 0;
    let mut sub_pos = 0;
    for page in pages {
        let detail = format!(
            "{} → {} ({})",
            page.title,
            page.file,
            plural(page.entries, "item")
        );
        if page.category.is_none() {
            main_pos += 1;
            sub_pos = 0;
            lines.push(format!("{} {}", format_index(main_pos), detail));
        } else {
            sub_pos += 1;
            lines.push(format!("{}{} {}", indent(1), format_index(sub_pos), detail));
        }
    }
    lines
}

fn broken_asset_lines(broken: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if !broken.is_empty() {
        lines.push(String::new());
        lines.push("Broken assets".to_string());
        for src in broken {
            lines.push(format!("{}{}", indent(1), src));
        }
    }
    lines
}

// ============================================================================
// Scan
// ============================================================================

/// Format scan output: items grouped by section, then skips and missing dirs.
pub fn format_scan_output(
    result: &ScanResult,
    meme_category: &str,
    manifest_path: &Path,
) -> Vec<String> {
    let items = &result.items;
    let sections: [(&str, Vec<&MediaItem>); 3] = [
        (
            "Images",
            items
                .iter()
                .filter(|i| !i.is_video() && !i.category_is(meme_category))
                .collect(),
        ),
        (
            "Memes",
            items
                .iter()
                .filter(|i| !i.is_video() && i.category_is(meme_category))
                .collect(),
        ),
        ("Videos", items.iter().filter(|i| i.is_video()).collect()),
    ];

    let mut lines = Vec::new();
    for (label, section) in &sections {
        if section.is_empty() {
            continue;
        }
        lines.push(format!("{} ({})", label, section.len()));
        for (i, item) in section.iter().enumerate() {
            let src = item.source().unwrap_or_default();
            lines.push(format!(
                "{}{}",
                indent(1),
                item_line(i + 1, item.title.as_deref(), src)
            ));
            lines.push(format!("{}Source: {}", indent(2), src));
            if let Some(thumb) = &item.thumbnail {
                lines.push(format!("{}Thumbnail: {}", indent(2), thumb));
            } else if let Some(cat) = &item.category
                && *label == "Images"
            {
                lines.push(format!("{}Category: {}", indent(2), cat));
            }
        }
    }

    let report = &result.report;
    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skip in &report.skipped {
            let reason = match skip.reason {
                SkipReason::Copy => "copy",
                SkipReason::Placeholder => "placeholder",
            };
            lines.push(format!("{}{} ({})", indent(1), skip.path, reason));
        }
    }
    if !report.missing_dirs.is_empty() {
        lines.push(String::new());
        lines.push("Missing".to_string());
        for dir in &report.missing_dirs {
            lines.push(format!("{}{}/", indent(1), dir.trim_end_matches('/')));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Wrote {} to {}",
        plural(items.len(), "item"),
        manifest_path.display()
    ));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(result: &ScanResult, meme_category: &str, manifest_path: &Path) {
    for line in format_scan_output(result, meme_category, manifest_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport, output_dir: &Path) -> Vec<String> {
    let summary = &report.summary;
    let mut lines = vec![manifest_line(&summary.manifest)];

    lines.push("Home → index.html".to_string());
    if let Some(grid) = &report.grid {
        lines.push(format!(
            "{}Grid: {} columns × {} rows, {} cells per section",
            indent(1),
            grid.columns,
            grid.rows,
            grid.per_section
        ));
    }
    if report.sticker_slots > 0 {
        lines.push(format!(
            "{}Stickers: {}",
            indent(1),
            plural(report.sticker_slots, "slot")
        ));
    }
    lines.extend(page_lines(&summary.pages));
    lines.extend(broken_asset_lines(&summary.broken_assets));

    let viewer_pages: usize = summary.pages.iter().map(|p| p.entries).sum();
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, copied {}",
        plural(summary.pages.len(), "gallery page"),
        plural(viewer_pages, "viewer page"),
        plural(report.copied_files, "file")
    ));
    lines.push(format!("Site generated at {}", output_dir.display()));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport, output_dir: &Path) {
    for line in format_build_output(report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(summary: &SiteSummary) -> Vec<String> {
    let mut lines = vec![manifest_line(&summary.manifest)];
    lines.extend(page_lines(&summary.pages));
    lines.extend(broken_asset_lines(&summary.broken_assets));
    lines.push(String::new());
    let problems = match &summary.manifest {
        ManifestStatus::Failed(_) => 1,
        ManifestStatus::Loaded { skipped, .. } => *skipped,
    } + summary.broken_assets.len();
    if problems == 0 {
        lines.push("No problems found".to_string());
    } else {
        lines.push(format!("Found {}", plural(problems, "problem")));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(summary: &SiteSummary) {
    for line in format_check_output(summary) {
        println!("{}", line);
    }
}
