use crate::parser;
use anyhow::{Context, Result};
use mpm_core::table::StatsTable;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Tracks the share of input consumed in whole percent.
///
/// Reports a percentage at most once, and only when it is higher than the
/// last one reported.
#[derive(Debug)]
pub struct Progress {
    total: u64,
    consumed: u64,
    reported: Option<u8>,
}

impl Progress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            consumed: 0,
            reported: None,
        }
    }

    /// Initial report of 0%, or `None` for empty input.
    pub fn start(&mut self) -> Option<u8> {
        if self.total == 0 || self.reported.is_some() {
            return None;
        }
        self.reported = Some(0);
        Some(0)
    }

    /// Accounts for `bytes` more input, returning a new percentage if one
    /// was crossed.
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        self.consumed += bytes;
        let percent = (self.consumed as u128 * 100 / self.total as u128).min(100) as u8;
        match self.reported {
            Some(last) if percent <= last => None,
            _ => {
                self.reported = Some(percent);
                Some(percent)
            }
        }
    }
}

/// Scans a line-oriented source and accumulates per-tag statistics.
///
/// Lines are read as raw bytes and decoded lossily, so invalid UTF-8 never
/// aborts the pass. `total_size` is only used for progress reporting; pass
/// 0 to disable it. Medians are left unset.
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    total_size: u64,
    mut on_progress: impl FnMut(u8),
) -> Result<StatsTable> {
    let mut table = StatsTable::new();
    let mut progress = Progress::new(total_size);
    if let Some(percent) = progress.start() {
        on_progress(percent);
    }

    let mut buf = Vec::with_capacity(256);
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        if let Some(percent) = progress.advance(read as u64) {
            on_progress(percent);
        }

        let line = String::from_utf8_lossy(&buf);
        if let Some(record) = parser::parse_line(&line) {
            table.record(&record);
        }
    }

    Ok(table)
}

/// Scans a log file from start to end.
///
/// # Arguments
///
/// * `path` - Log file to read
/// * `on_progress` - Called with each newly reached percentage of the file
///
/// # Returns
///
/// The per-tag statistics with medians unset, or an error if the file
/// cannot be opened or read.
pub fn scan_log_file<P: AsRef<Path>>(path: P, on_progress: impl FnMut(u8)) -> Result<StatsTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let total_size = file
        .metadata()
        .with_context(|| format!("Failed to stat log file {}", path.display()))?
        .len();

    scan_reader(BufReader::new(file), total_size, on_progress)
        .with_context(|| format!("Failed to read log file {}", path.display()))
}
