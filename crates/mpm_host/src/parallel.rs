use anyhow::Result;
use log::debug;
use mpm_core::table::StatsTable;
use mpm_io::shard;
use rayon::prelude::*;
use std::path::Path;

/// Scans `path` in line-aligned shards on the rayon pool.
///
/// Shard tables are merged in file order, which yields the same table as a
/// sequential scan. Medians are left unset; finalize after this returns.
pub fn scan_sharded(path: &Path, jobs: usize) -> Result<StatsTable> {
    let ranges = shard::plan_shards(path, jobs)?;

    let tables = ranges
        .par_iter()
        .map(|range| shard::scan_range(path, range.clone()))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = StatsTable::new();
    for table in tables {
        merged.merge(table);
    }
    debug!(
        "Merged {} shards into {} MPM entries",
        ranges.len(),
        merged.len()
    );
    Ok(merged)
}
