use crate::MpmError;
use crate::record::LogRecord;
use crate::stats::TagStats;
use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Per-tag statistics in order of first appearance.
///
/// Entries live in a vector so iteration follows the input order; a
/// side index maps each tag to its slot for get-or-insert lookups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsTable {
    entries: Vec<(String, TagStats)>,
    index: BTreeMap<String, usize>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `tag`, creating an empty one if needed.
    pub fn entry_mut(&mut self, tag: &str) -> &mut TagStats {
        if let Some(&slot) = self.index.get(tag) {
            return &mut self.entries[slot].1;
        }
        let slot = self.entries.len();
        self.index.insert(tag.to_owned(), slot);
        self.entries.push((tag.to_owned(), TagStats::new()));
        &mut self.entries[slot].1
    }

    /// Folds one record into the statistics of its tag.
    #[inline]
    pub fn record(&mut self, record: &LogRecord<'_>) {
        self.entry_mut(record.tag)
            .update(record.matched, record.buffer_len);
    }

    pub fn get(&self, tag: &str) -> Option<&TagStats> {
        self.index.get(tag).map(|&slot| &self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(tag, stats)` in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagStats)> + '_ {
        self.entries.iter().map(|(tag, stats)| (tag.as_str(), stats))
    }

    /// Appends the statistics of a table built from a later part of the
    /// input.
    ///
    /// Existing tags are merged in place; tags seen only in `other` are
    /// appended in `other`'s order, so merging shard tables front to back
    /// reproduces the order of a single sequential pass.
    pub fn merge(&mut self, other: StatsTable) {
        for (tag, stats) in other.entries {
            match self.index.get(&tag) {
                Some(&slot) => self.entries[slot].1.merge(&stats),
                None => {
                    self.index.insert(tag.clone(), self.entries.len());
                    self.entries.push((tag, stats));
                }
            }
        }
    }

    /// Computes the median of every entry. Must run after all merges.
    pub fn finalize(&mut self) -> Result<(), MpmError> {
        for (_, stats) in self.entries.iter_mut() {
            stats.finalize_median()?;
        }
        Ok(())
    }
}
