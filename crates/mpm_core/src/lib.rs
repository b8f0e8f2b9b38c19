//! Core accumulators for MPM scan statistics.
//!
//! This crate provides the bounded-memory building blocks used to summarize
//! pattern-matching (MPM) scan logs: an exact value histogram, the per-tag
//! statistics accumulator, and an insertion-ordered table keyed by tag. All
//! modules are `no_std` and only require an allocator, so the same code can
//! back a sequential scan, a sharded scan, or an embedded consumer.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

/// Exact frequency table over distinct integer values.
///
/// Stores each distinct value once together with its occurrence count, so
/// memory grows with the number of distinct values rather than with the
/// number of samples. Provides rank lookups used for the median.
pub mod histogram;

/// A single parsed detection record.
///
/// Borrowed view of one log line that matched the detection grammar. Records
/// are transient: they are folded into a [`stats::TagStats`] and dropped.
pub mod record;

/// Per-tag running statistics.
///
/// Accumulates scan count, buffer-length sum, extrema and histogram, and a
/// clamped histogram of matched counts for one MPM tag.
pub mod stats;

/// Insertion-ordered table of per-tag statistics.
///
/// Creates an entry lazily on the first record for a tag and keeps tags in
/// order of first appearance so the emitted summary is stable across runs
/// and across sharded scans.
pub mod table;

/// Error types returned by the statistics accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpmError {
    /// A median was requested from a histogram that holds no samples.
    ///
    /// A tag entry is only created when its first record arrives, so this
    /// indicates a caller finalizing a manually constructed, empty
    /// accumulator.
    EmptyHistogram,
}

impl core::fmt::Display for MpmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MpmError::EmptyHistogram => f.write_str("median requested from an empty histogram"),
        }
    }
}

impl core::error::Error for MpmError {}
