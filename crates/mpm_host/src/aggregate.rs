//! Log aggregation pipeline.
//!
//! Scans the input log, computes medians once every record has been seen,
//! and writes the CSV summary. The scan is sequential with progress output
//! by default, or sharded across threads when more than one job is
//! requested.

use crate::parallel;
use anyhow::{Context, Result};
use log::{debug, info};
use mpm_core::table::StatsTable;
use mpm_io::{scanner, writer};
use std::path::Path;
use std::time::Instant;

/// Builds the finalized statistics table for `input`.
///
/// # Arguments
///
/// * `input` - Log file to scan
/// * `jobs` - Number of shards; 1 (or 0) scans sequentially
pub fn build_table(input: &Path, jobs: usize) -> Result<StatsTable> {
    let mut table = if jobs > 1 {
        parallel::scan_sharded(input, jobs)?
    } else {
        scanner::scan_log_file(input, |percent| info!("Processing [{}%]", percent))?
    };

    table
        .finalize()
        .context("Failed to compute buffer length medians")?;
    for (tag, stats) in table.iter() {
        debug!(
            "{}: {} scans over {} distinct buffer lengths",
            tag,
            stats.scans,
            stats.buffer_hist.distinct()
        );
    }
    Ok(table)
}

/// Processes `input` and writes the summary CSV to `output`.
pub fn process_log_file(input: &Path, output: &Path, jobs: usize) -> Result<()> {
    let start = Instant::now();
    let table = build_table(input, jobs)?;
    writer::write_summary_file(output, &table)?;
    info!(
        "Processing complete. {} MPMs in {:.2?}",
        table.len(),
        start.elapsed()
    );
    Ok(())
}
