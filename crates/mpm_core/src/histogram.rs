use crate::MpmError;
use alloc::collections::BTreeMap;

/// Frequency table over distinct `u64` values.
///
/// Keys are kept in ascending order, which lets rank queries walk the
/// table once without sorting. The total sample count is tracked alongside
/// the map so it never has to be recomputed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueHistogram {
    counts: BTreeMap<u64, u64>,
    total: u64,
}

impl ValueHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, value: u64) {
        self.record_n(value, 1);
    }

    /// Adds `n` occurrences of `value`.
    pub fn record_n(&mut self, value: u64, n: u64) {
        if n == 0 {
            return;
        }
        *self.counts.entry(value).or_insert(0) += n;
        self.total += n;
    }

    /// Total number of samples recorded.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct values recorded.
    #[inline]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[cfg(test)]
    pub fn count_of(&self, value: u64) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Iterates `(value, occurrences)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&value, &count)| (value, count))
    }

    /// Folds another histogram into this one.
    pub fn merge(&mut self, other: &ValueHistogram) {
        for (value, count) in other.iter() {
            self.record_n(value, count);
        }
    }

    /// Returns the value at zero-based `rank` of the ascending sample order.
    ///
    /// Walks the buckets accumulating occurrence counts and returns the first
    /// value whose running count exceeds `rank`. Returns `None` when `rank`
    /// is not below [`total`](Self::total).
    pub fn value_at_rank(&self, rank: u64) -> Option<u64> {
        let mut cumulative = 0u64;
        for (value, count) in self.iter() {
            cumulative += count;
            if cumulative > rank {
                return Some(value);
            }
        }
        None
    }

    /// Median taken at rank `total / 2`.
    ///
    /// For an even sample count this is the upper of the two middle values.
    pub fn median(&self) -> Result<u64, MpmError> {
        if self.total == 0 {
            return Err(MpmError::EmptyHistogram);
        }
        self.value_at_rank(self.total / 2)
            .ok_or(MpmError::EmptyHistogram)
    }
}
