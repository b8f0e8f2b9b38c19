//! Built-in self test run by `--unittests`.
//!
//! Aggregates a small embedded log, writes the summary to memory, reads it
//! back as CSV, and checks the reference values.

use crate::aggregate;
use anyhow::{Context, Result, ensure};
use mpm_io::{scanner, writer};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

pub const FIXTURE: &str = "\
Notice: detect: StreamMpmFunc: matched 3 bufferlength 179 [info]
Notice: detect: StreamMpmFunc: matched 0 bufferlength 945 [info]
Notice: detect: StreamMpmFunc: matched 0 bufferlength 594 [info]
Notice: detect: StreamMpmFunc: matched 0 bufferlength 75 [info]
Notice: detect: StreamMpmFunc: matched 1 bufferlength 279 [info]
Notice: detect: StreamMpmFunc: matched 0 bufferlength 705 [info]
Notice: detect: StreamMpmFunc: matched 2 bufferlength 2718 [info]
Notice: detect: StreamMpmFunc: matched 4 bufferlength 517 [info]
Notice: detect: StreamMpmFunc: matched 0 bufferlength 264 [info]
Notice: detect: PayloadMpmFunc: matched 0 bufferlength 264 [info]
";

const EXPECTED_STREAM: [(&str, &str); 7] = [
    ("scans", "9"),
    ("bytes_total", "6276"),
    ("bytes_average", "697.33"),
    ("bytes_median", "517"),
    ("bytes_min", "75"),
    ("bytes_max", "2718"),
    ("matched", "10"),
];

type Row = HashMap<String, String>;

fn summarize(log: &str) -> Result<Vec<Row>> {
    let mut table = scanner::scan_reader(Cursor::new(log), 0, |_| {})?;
    table.finalize()?;

    let mut csv_bytes = Vec::new();
    writer::write_summary(&mut csv_bytes, &table)?;

    let mut reader = csv::Reader::from_reader(csv_bytes.as_slice());
    reader
        .deserialize()
        .collect::<Result<Vec<Row>, _>>()
        .context("Summary is not valid CSV")
}

fn find<'a>(rows: &'a [Row], tag: &str) -> Result<&'a Row> {
    rows.iter()
        .find(|r| r.get("MPM").map(String::as_str) == Some(tag))
        .with_context(|| format!("No row for {}", tag))
}

/// Runs the self test, returning an error describing the first mismatch.
pub fn run_self_test() -> Result<()> {
    let rows = summarize(FIXTURE)?;
    ensure!(rows.len() == 2, "expected 2 rows, got {}", rows.len());

    let stream = find(&rows, "StreamMpmFunc")?;
    for (column, expected) in EXPECTED_STREAM {
        let actual = stream.get(column).map(String::as_str).unwrap_or("");
        ensure!(
            actual == expected,
            "StreamMpmFunc {}: expected {}, got {}",
            column,
            expected,
            actual
        );
    }
    find(&rows, "PayloadMpmFunc")?;

    let clamped = summarize("Notice: detect: X: matched 20 bufferlength 5\n")?;
    let row = find(&clamped, "X")?;
    ensure!(
        row.get("matched16").map(String::as_str) == Some("1"),
        "matched values >= 16 must land in matched16"
    );

    ensure!(
        summarize(FIXTURE)? == rows,
        "repeated aggregation produced different rows"
    );

    verify_sharded()
}

// Exercises the file-based pipeline, including sharding, on a scratch copy
// of the fixture.
fn verify_sharded() -> Result<()> {
    let path = std::env::temp_dir().join(format!("mpm-stats-selftest-{}.log", std::process::id()));
    std::fs::write(&path, FIXTURE).context("Failed to write self test log")?;

    let result = compare_scans(&path);
    let _ = std::fs::remove_file(&path);
    result
}

fn compare_scans(path: &Path) -> Result<()> {
    let sequential = aggregate::build_table(path, 1)?;
    let sharded = aggregate::build_table(path, 3)?;
    ensure!(
        sequential == sharded,
        "sharded scan differs from sequential scan"
    );
    Ok(())
}
