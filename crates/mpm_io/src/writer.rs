//! CSV summary output.
//!
//! Writes the per-tag statistics as one header row followed by one row per
//! tag, in the order tags first appeared in the log.

use anyhow::{Context, Result};
use mpm_core::stats::{MATCHED_BUCKETS, TagStats};
use mpm_core::table::StatsTable;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Leading summary columns; `matched0`..`matched16` follow.
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "MPM",
    "scans",
    "bytes_total",
    "bytes_average",
    "bytes_median",
    "bytes_min",
    "bytes_max",
    "matched",
];

/// Full header row of the summary.
pub fn summary_header() -> Vec<String> {
    SUMMARY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain((0..MATCHED_BUCKETS).map(|i| format!("matched{}", i)))
        .collect()
}

/// Formats a mean rounded to two decimals.
///
/// The value is rounded half-to-even on its exact binary value and then
/// printed in shortest round-trip form, so `697.333..` becomes `697.33`,
/// `264.0` stays `264.0` and `697.30` prints as `697.3`. Means of 1e16 and
/// above switch to exponent form with an explicit sign, `1e+16`.
pub fn format_average(mean: f64) -> String {
    let rounded = format!("{:.2}", mean).parse::<f64>().unwrap_or(mean);
    let text = format!("{:?}", rounded);
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => text,
    }
}

/// Builds the CSV fields for one tag.
///
/// Unset values (a median that was never finalized, or extrema of an
/// empty accumulator) are written as empty fields.
pub fn summary_row(tag: &str, stats: &TagStats) -> Vec<String> {
    let opt = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_default();

    let mut row = Vec::with_capacity(SUMMARY_COLUMNS.len() + MATCHED_BUCKETS);
    row.push(tag.to_string());
    row.push(stats.scans.to_string());
    row.push(stats.buffer_sum.to_string());
    row.push(format_average(stats.buffer_average()));
    row.push(opt(stats.buffer_median));
    row.push(opt(stats.buffer_min));
    row.push(opt(stats.buffer_max));
    row.push(stats.matched_sum.to_string());
    row.extend(stats.matched_counts.iter().map(|c| c.to_string()));
    row
}

/// Writes the summary of `table` to any writer.
pub fn write_summary<W: Write>(out: W, table: &StatsTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(summary_header())?;
    for (tag, stats) in table.iter() {
        writer.write_record(summary_row(tag, stats))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the summary of `table` to the file at `path`, replacing it.
pub fn write_summary_file<P: AsRef<Path>>(path: P, table: &StatsTable) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_summary(file, table)
        .with_context(|| format!("Failed to write output file {}", path.display()))
}
