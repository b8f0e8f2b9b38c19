//! Running statistics for a single MPM tag.
//!
//! Tracks scan counts, buffer-length totals and extrema, an exact buffer
//! length histogram, and a clamped histogram of matched counts. The median
//! is derived from the histogram once the input has been fully consumed.

use crate::MpmError;
use crate::histogram::ValueHistogram;

/// Number of matched-count buckets, `matched0` through `matched16`.
pub const MATCHED_BUCKETS: usize = 17;

/// Matched counts at or above this value share the last bucket.
pub const MATCHED_CLAMP: u64 = (MATCHED_BUCKETS - 1) as u64;

/// Accumulates statistics for one tag with memory bounded by the number
/// of distinct buffer lengths.
///
/// Updated once per record during the scan. Two accumulators built from
/// disjoint parts of the same input can be combined with
/// [`merge`](Self::merge); the median must only be computed after all
/// parts have been merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagStats {
    /// Number of records seen.
    pub scans: u64,

    /// Sum of all buffer lengths. Wider than the samples so that any run of
    /// `u64` lengths sums without overflow.
    pub buffer_sum: u128,

    /// Smallest buffer length, unset before the first record.
    pub buffer_min: Option<u64>,

    /// Largest buffer length, unset before the first record.
    pub buffer_max: Option<u64>,

    /// Exact multiset of buffer lengths.
    pub buffer_hist: ValueHistogram,

    /// Sum of unclamped matched counts.
    pub matched_sum: u128,

    /// Histogram of matched counts; index 16 collects every value >= 16.
    pub matched_counts: [u64; MATCHED_BUCKETS],

    /// Median buffer length, set by [`finalize_median`](Self::finalize_median).
    pub buffer_median: Option<u64>,
}

impl TagStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one scan with its matched count and buffer length.
    pub fn update(&mut self, matched: u64, buffer_len: u64) {
        self.scans += 1;
        self.buffer_sum += u128::from(buffer_len);
        self.buffer_min = Some(self.buffer_min.map_or(buffer_len, |m| m.min(buffer_len)));
        self.buffer_max = Some(self.buffer_max.map_or(buffer_len, |m| m.max(buffer_len)));
        self.buffer_hist.record(buffer_len);

        self.matched_sum += u128::from(matched);
        self.matched_counts[matched_bucket(matched)] += 1;
    }

    /// Combines statistics gathered from another part of the input.
    ///
    /// Any previously computed median is cleared since it no longer
    /// reflects the combined histogram.
    pub fn merge(&mut self, other: &TagStats) {
        self.scans += other.scans;
        self.buffer_sum += other.buffer_sum;
        self.buffer_min = min_opt(self.buffer_min, other.buffer_min);
        self.buffer_max = max_opt(self.buffer_max, other.buffer_max);
        self.buffer_hist.merge(&other.buffer_hist);

        self.matched_sum += other.matched_sum;
        for (acc, n) in self.matched_counts.iter_mut().zip(other.matched_counts) {
            *acc += n;
        }
        self.buffer_median = None;
    }

    /// Computes and stores the median buffer length.
    ///
    /// Returns [`MpmError::EmptyHistogram`] if no record has been seen.
    pub fn finalize_median(&mut self) -> Result<u64, MpmError> {
        let median = self.buffer_hist.median()?;
        self.buffer_median = Some(median);
        Ok(median)
    }

    /// Mean buffer length, or 0.0 when nothing was recorded.
    pub fn buffer_average(&self) -> f64 {
        if self.scans == 0 {
            0.0
        } else {
            self.buffer_sum as f64 / self.scans as f64
        }
    }
}

#[inline(always)]
fn matched_bucket(matched: u64) -> usize {
    matched.min(MATCHED_CLAMP) as usize
}

fn min_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

fn max_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const STREAM_LENGTHS: [u64; 9] = [179, 945, 594, 75, 279, 705, 2718, 517, 264];
    const STREAM_MATCHED: [u64; 9] = [3, 0, 0, 0, 1, 0, 2, 4, 0];

    fn stream_stats() -> TagStats {
        let mut stats = TagStats::new();
        for (m, len) in STREAM_MATCHED.iter().zip(STREAM_LENGTHS) {
            stats.update(*m, len);
        }
        stats
    }

    #[test]
    fn accumulates_fixture() {
        let mut stats = stream_stats();
        assert_eq!(stats.scans, 9);
        assert_eq!(stats.buffer_sum, 6276);
        assert_eq!(stats.buffer_min, Some(75));
        assert_eq!(stats.buffer_max, Some(2718));
        assert_eq!(stats.matched_sum, 10);
        assert_eq!(stats.buffer_median, None);
        assert_eq!(stats.finalize_median(), Ok(517));
        assert_eq!(stats.buffer_median, Some(517));
        assert!((stats.buffer_average() - 697.333).abs() < 0.001);
    }

    #[test]
    fn counts_are_consistent() {
        let stats = stream_stats();
        assert_eq!(stats.buffer_hist.total(), stats.scans);
        assert_eq!(stats.matched_counts.iter().sum::<u64>(), stats.scans);
        assert_eq!(stats.matched_counts[0], 5);
        assert_eq!(stats.matched_counts[1], 1);
        assert_eq!(stats.matched_counts[4], 1);
    }

    #[test]
    fn large_matched_value_lands_in_last_bucket() {
        let mut stats = TagStats::new();
        stats.update(20, 5);
        stats.update(16, 5);
        assert_eq!(stats.matched_counts[16], 2);
        assert_eq!(stats.matched_counts[..16].iter().sum::<u64>(), 0);
        assert_eq!(stats.matched_sum, 36);
    }

    #[test]
    fn sums_do_not_overflow_at_u64_max() {
        let mut stats = TagStats::new();
        stats.update(u64::MAX, u64::MAX);
        stats.update(1, 1);
        assert_eq!(stats.buffer_sum, u128::from(u64::MAX) + 1);
        assert_eq!(stats.matched_sum, u128::from(u64::MAX) + 1);
        assert_eq!(stats.buffer_max, Some(u64::MAX));
        assert_eq!(stats.matched_counts[16], 1);

        let mut merged = stats.clone();
        merged.merge(&stats);
        assert_eq!(merged.buffer_sum, 2 * (u128::from(u64::MAX) + 1));
    }

    #[test]
    fn single_record_median() {
        let mut stats = TagStats::new();
        stats.update(0, 264);
        assert_eq!(stats.finalize_median(), Ok(264));
        assert_eq!(stats.buffer_min, stats.buffer_max);
    }

    #[test]
    fn empty_stats_cannot_finalize() {
        let mut stats = TagStats::new();
        assert_eq!(stats.finalize_median(), Err(MpmError::EmptyHistogram));
        assert_eq!(stats.buffer_average(), 0.0);
    }

    #[test]
    fn merge_equals_single_pass() {
        let mut whole = stream_stats();
        let pairs: Vec<_> = STREAM_MATCHED.iter().copied().zip(STREAM_LENGTHS).collect();
        let (head, tail) = pairs.split_at(4);

        let mut left = TagStats::new();
        let mut right = TagStats::new();
        for &(m, len) in head {
            left.update(m, len);
        }
        for &(m, len) in tail {
            right.update(m, len);
        }
        left.merge(&right);

        assert_eq!(left, whole);
        assert_eq!(left.finalize_median(), whole.finalize_median());
    }

    #[test]
    fn merge_with_empty_keeps_extrema() {
        let mut stats = stream_stats();
        stats.merge(&TagStats::new());
        assert_eq!(stats.buffer_min, Some(75));
        assert_eq!(stats.buffer_max, Some(2718));

        let mut empty = TagStats::new();
        empty.merge(&stream_stats());
        assert_eq!(empty, stream_stats());
    }

    #[test]
    fn merge_clears_stale_median() {
        let mut stats = stream_stats();
        stats.finalize_median().unwrap();
        stats.merge(&stream_stats());
        assert_eq!(stats.buffer_median, None);
    }
}
