use crate::scanner;
use anyhow::{Context, Result};
use log::debug;
use mpm_core::table::StatsTable;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::Path;

/// Splits `total` bytes of `reader` into at most `shards` line-aligned ranges.
///
/// Cut points start evenly spaced and are then pushed forward to just past
/// the next newline, so every line lies in exactly one range. Empty ranges
/// are dropped; the ranges are contiguous and cover `0..total`.
pub fn line_aligned_ranges<R: BufRead + Seek>(
    reader: &mut R,
    total: u64,
    shards: usize,
) -> Result<Vec<Range<u64>>> {
    let shards = shards.max(1) as u64;
    let mut ranges = Vec::with_capacity(shards as usize);
    let mut start = 0u64;
    let mut skipped = Vec::new();

    for i in 1..shards {
        let cut = total * i / shards;
        if cut <= start {
            continue;
        }
        // A cut that lands right after a newline is already aligned, so the
        // scan begins one byte early to see that newline.
        reader.seek(SeekFrom::Start(cut - 1))?;
        skipped.clear();
        let read = reader.read_until(b'\n', &mut skipped)? as u64;
        let end = if read == 0 { total } else { (cut - 1 + read).min(total) };

        if end > start {
            ranges.push(start..end);
            start = end;
        }
    }
    if start < total {
        ranges.push(start..total);
    }

    Ok(ranges)
}

/// Plans line-aligned shards for the file at `path`.
pub fn plan_shards<P: AsRef<Path>>(path: P, shards: usize) -> Result<Vec<Range<u64>>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let total = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let ranges = line_aligned_ranges(&mut reader, total, shards)
        .with_context(|| format!("Failed to split log file {}", path.display()))?;
    debug!(
        "Split {} ({} bytes) into {} shards",
        path.display(),
        total,
        ranges.len()
    );
    Ok(ranges)
}

/// Scans one byte range of a log file.
///
/// The range must come from [`plan_shards`] so that it starts and ends on
/// line boundaries. Progress is not reported for shards.
pub fn scan_range<P: AsRef<Path>>(path: P, range: Range<u64>) -> Result<StatsTable> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    file.seek(SeekFrom::Start(range.start))?;

    let len = range.end.saturating_sub(range.start);
    scanner::scan_reader(BufReader::new(file.take(len)), 0, |_| {}).with_context(|| {
        format!(
            "Failed to read bytes {}..{} of {}",
            range.start,
            range.end,
            path.display()
        )
    })
}
