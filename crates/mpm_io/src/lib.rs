//! I/O for MPM scan logs and benchmark results.
//!
//! Provides the detection-line parser, the streaming log scanner that folds
//! records into a [`mpm_core::table::StatsTable`], byte-range sharding for
//! parallel scans, the CSV summary writer, and the benchmark CSV loader.

/// Benchmark CSV loading and boxplot statistics.
///
/// Reads per-variant elapsed times from a benchmark result file and
/// summarizes each variant with the quantities a boxplot with error bars
/// is drawn from.
pub mod bench;

/// Parser for detection log lines.
///
/// Recognizes the `Notice: detect: <tag>: matched <n> bufferlength <n>`
/// grammar anywhere in a line and yields a borrowed record.
pub mod parser;

/// Streaming log scanner.
///
/// Reads a log line by line, parses each line, and accumulates per-tag
/// statistics while reporting progress as a percentage of bytes consumed.
pub mod scanner;

/// Byte-range sharding of log files.
///
/// Splits a file into line-aligned ranges that can be scanned
/// independently and merged afterwards.
pub mod shard;

/// CSV summary writer.
///
/// Emits one header row and one row per tag with totals, average, median,
/// extrema, and the matched-count histogram.
pub mod writer;
