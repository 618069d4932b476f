//! CLI output formatting.
//!
//! Output is one line per image, keyed by its batch id and name, followed by
//! a batch summary. Sizes are human readable (1024-based units) and savings
//! are whole percentages, negative when the result grew.
//!
//! # Output Format
//!
//! ## Compress
//!
//! ```text
//! #1 beach.png: 2.4 MB → 312.5 KB (87% saved) 1920x960
//! #2 broken.jpg: failed: could not decode image: unsupported format
//! #3 icon.png: 4.1 KB → 5.38 KB (-31% saved) 64x64
//!
//! Compressed 2 of 3 images, 1 failed
//! 2.4 MB → 317.88 KB (87% saved)
//!
//! compressed/compressed_beach.jpeg
//! compressed/compressed_icon.jpeg
//! ```
//!
//! ## Dry run
//!
//! ```text
//! beach.png: 4000x2000 → 1920x960
//! broken.jpg: could not decode image: unsupported format
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{Batch, BatchEvent, BatchSummary, ImageId, ItemStatus};
use crate::imaging::{Dimensions, OutputFormat, TransformError};
use crate::inputs::UnreadableInput;
use serde::Serialize;
use std::path::PathBuf;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable byte count: `0 Bytes`, `500 Bytes`, `1.5 KB`, `2.25 MB`.
///
/// Uses 1024-based units with at most two decimals, trailing zeros dropped.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let number = format!("{value:.2}");
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{number} {}", UNITS[unit])
}

fn size_change(original: u64, compressed: u64, savings: i64) -> String {
    format!(
        "{} → {} ({savings}% saved)",
        format_bytes(original),
        format_bytes(compressed)
    )
}

/// Format a single progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Compressed {
            id,
            name,
            original_size,
            compressed_size,
            dimensions,
        } => {
            let savings = crate::imaging::calculate_savings(*original_size, Some(*compressed_size));
            vec![format!(
                "{id} {name}: {} {dimensions}",
                size_change(*original_size, *compressed_size, savings)
            )]
        }
        BatchEvent::Failed { id, name, error } => vec![format!("{id} {name}: failed: {error}")],
    }
}

/// Format a path that could not be read.
pub fn format_unreadable(input: &UnreadableInput) -> String {
    format!("{}: failed: {}", input.path.display(), input.error)
}

/// Format the dry-run line for one image.
pub fn format_plan_line(
    name: &str,
    plan: &Result<(Dimensions, Dimensions), TransformError>,
) -> String {
    match plan {
        Ok((native, target)) if native == target => format!("{name}: {native} (unchanged)"),
        Ok((native, target)) => format!("{name}: {native} → {target}"),
        Err(err) => format!("{name}: {err}"),
    }
}

/// Format the batch totals.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let mut head = format!(
        "Compressed {} of {} images",
        summary.compressed, summary.total
    );
    if summary.failed > 0 {
        head.push_str(&format!(", {} failed", summary.failed));
    }
    lines.push(head);
    if summary.compressed > 0 {
        lines.push(size_change(
            summary.original_bytes,
            summary.compressed_bytes,
            summary.savings(),
        ));
    }
    lines
}

/// Format the list of written files.
pub fn format_export(written: &[(ImageId, PathBuf)]) -> Vec<String> {
    written
        .iter()
        .map(|(_, path)| path.display().to_string())
        .collect()
}

#[derive(Serialize)]
struct ReportItem<'a> {
    id: ImageId,
    name: &'a str,
    original_size: u64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
    savings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    items: Vec<ReportItem<'a>>,
    unreadable: &'a [UnreadableInput],
    summary: BatchSummary,
    savings: i64,
}

/// Machine-readable report of every item, every unreadable input and the
/// batch summary, as pretty JSON.
///
/// The summary covers the batch only; unreadable inputs are listed apart.
pub fn format_json_report(
    batch: &Batch,
    unreadable: &[UnreadableInput],
) -> serde_json::Result<String> {
    let items = batch
        .items()
        .map(|item| {
            let result = item.result();
            ReportItem {
                id: item.id,
                name: item.source.name(),
                original_size: item.source.original_size(),
                status: match item.status {
                    ItemStatus::Pending => "pending",
                    ItemStatus::Compressed(_) => "compressed",
                    ItemStatus::Failed(_) => "failed",
                },
                compressed_size: result.map(|r| r.byte_length),
                dimensions: result.map(|r| r.dimensions),
                format: result.map(|r| r.format),
                savings: item.savings(),
                error: item.error().map(|e| e.to_string()),
            }
        })
        .collect();
    let summary = batch.summary();
    serde_json::to_string_pretty(&Report {
        items,
        unreadable,
        summary,
        savings: summary.savings(),
    })
}

#[derive(Serialize)]
struct PlanItem<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    native: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct PlanReport<'a> {
    items: Vec<PlanItem<'a>>,
    unreadable: &'a [UnreadableInput],
}

/// Dry-run plans as pretty JSON.
pub fn format_json_plan(
    plans: &[(String, Result<(Dimensions, Dimensions), TransformError>)],
    unreadable: &[UnreadableInput],
) -> serde_json::Result<String> {
    let items = plans
        .iter()
        .map(|(name, plan)| match plan {
            Ok((native, target)) => PlanItem {
                name,
                native: Some(*native),
                target: Some(*target),
                error: None,
            },
            Err(err) => PlanItem {
                name,
                native: None,
                target: None,
                error: Some(err.to_string()),
            },
        })
        .collect();
    serde_json::to_string_pretty(&PlanReport { items, unreadable })
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_batch_event(event: &BatchEvent) {
    print_lines(&format_batch_event(event));
}

pub fn print_unreadable(input: &UnreadableInput) {
    println!("{}", format_unreadable(input));
}

pub fn print_plan_line(name: &str, plan: &Result<(Dimensions, Dimensions), TransformError>) {
    println!("{}", format_plan_line(name, plan));
}

pub fn print_summary(summary: &BatchSummary, written: &[(ImageId, PathBuf)]) {
    println!();
    print_lines(&format_summary(summary));
    if !written.is_empty() {
        println!();
        print_lines(&format_export(written));
    }
}
