//! CLI output formatting
//!
//! Results go to stdout; progress and warnings go to stderr so the listing
//! can be piped.

use crate::archive::ScanEvent;
use crate::core::size::format_size;
use crate::core::{MissingAsset, Summary};
use console::Emoji;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt::Display;
use std::io::{self, Write};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");
pub static MAGNIFIER: Emoji<'_, '_> = Emoji("🔎 ", "");
pub static SCROLL: Emoji<'_, '_> = Emoji("📜 ", "");
pub static BUCKET: Emoji<'_, '_> = Emoji("🪣  ", "");

/// Create the progress bar for the sizing pass. It draws on stderr and is
/// hidden when stderr isn't a terminal.
pub fn create_progress_bar() -> ProgressBar {
    let progress = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Update `progress` for a scan event and print any status line above it
pub fn report_progress(progress: &ProgressBar, event: &ScanEvent) {
    match event {
        ScanEvent::AttachmentsFound { count } => progress.set_length(*count as u64),
        ScanEvent::Processing { index, total, .. } => {
            progress.set_message(format!("{}Processing attachment {}/{}", SCROLL, index, total));
            progress.inc(1);
        }
        _ => {}
    }

    if let Some(line) = format_scan_event(event) {
        progress.suspend(|| eprintln!("{}", line));
    }
}

/// Format a scan event as a status line, if it warrants one
pub fn format_scan_event(event: &ScanEvent) -> Option<String> {
    match event {
        ScanEvent::ReadingMetadata { .. } => Some(format!(
            "{}Reading attachments metadata files to find attachments...",
            BOOK
        )),
        ScanEvent::AttachmentsFound { count } => {
            Some(format!("{}Found {} attachment(s)", MAGNIFIER, style(count).cyan()))
        }
        ScanEvent::OrphanSkipped { asset_name } => Some(format!(
            "{}Could not find issue, pull request or issue comment for attachment {}. Skipping...",
            WARN,
            style(asset_name).yellow()
        )),
        ScanEvent::AssetMissing { path, .. } => Some(format!(
            "{}Missing attachment file `{}`",
            WARN,
            style(path.display()).yellow()
        )),
        ScanEvent::Sorting => Some(format!("{}Sorting attachments by size...", BUCKET)),
        ScanEvent::Processing { .. } | ScanEvent::Finished { .. } => None,
    }
}

/// Format a summary for display
pub fn format_summary(summary: &Summary) -> String {
    let mut lines = vec![format!(
        "{}Attachments: {} ({})",
        INFO,
        style(summary.listed).cyan(),
        style(format_size(summary.total_bytes)).bold()
    )];

    for total in &summary.by_kind {
        lines.push(format!(
            "  {}: {} ({})",
            total.kind.label(),
            total.count,
            format_size(total.bytes)
        ));
    }

    if !summary.by_repository.is_empty() {
        lines.push(format!("  {}", style("Repositories:").bold()));
        for repo in &summary.by_repository {
            lines.push(format!(
                "    {}: {} ({})",
                repo.repository,
                repo.count,
                format_size(repo.bytes)
            ));
        }
    }

    if summary.orphans > 0 {
        lines.push(format!(
            "{}{} attachment(s) without a parent",
            WARN,
            style(summary.orphans).yellow()
        ));
    }
    if summary.missing > 0 {
        lines.push(format!(
            "{}{} attachment file(s) missing",
            WARN,
            style(summary.missing).yellow()
        ));
    }

    lines.join("\n")
}

/// Format the list of missing attachment files
pub fn format_missing(missing: &[MissingAsset]) -> String {
    let mut lines = vec![format!(
        "{}{} missing attachment file(s):",
        CROSS,
        style(missing.len()).red()
    )];
    for asset in missing {
        lines.push(format!(
            "  {} ({})",
            style(asset.path.display()).red(),
            asset.asset_name
        ));
    }
    lines.join("\n")
}

/// Write result lines to `out`.
///
/// A reader that goes away early (`gh-attachments | head`) is not an error.
pub fn write_lines<W, I>(mut out: W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    let written = lines
        .into_iter()
        .try_for_each(|line| writeln!(out, "{}", line))
        .and_then(|()| out.flush());

    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Write result lines to stdout
pub fn print_lines<I>(lines: I) -> io::Result<()>
where
    I: IntoIterator,
    I::Item: Display,
{
    write_lines(io::stdout().lock(), lines)
}
