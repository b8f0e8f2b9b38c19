use mpm_core::table::StatsTable;
use mpm_io::{scanner, shard, writer};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const FIXTURE: &str = "\
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

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn summarize(path: &Path) -> Vec<HashMap<String, String>> {
    let mut table = scanner::scan_log_file(path, |_| {}).unwrap();
    table.finalize().unwrap();
    rows_of(&table)
}

fn rows_of(table: &StatsTable) -> Vec<HashMap<String, String>> {
    let out = NamedTempFile::new().unwrap();
    writer::write_summary_file(out.path(), table).unwrap();
    let mut reader = csv::Reader::from_path(out.path()).unwrap();
    reader.deserialize().map(|r| r.unwrap()).collect()
}

fn sharded(path: &Path, shards: usize) -> StatsTable {
    let mut merged = StatsTable::new();
    for range in shard::plan_shards(path, shards).unwrap() {
        merged.merge(shard::scan_range(path, range).unwrap());
    }
    merged
}

#[test]
fn fixture_summary_matches_reference() {
    let log = write_temp(FIXTURE);
    let rows = summarize(log.path());
    assert_eq!(rows.len(), 2);

    let stream = rows.iter().find(|r| r["MPM"] == "StreamMpmFunc").unwrap();
    assert_eq!(stream["scans"], "9");
    assert_eq!(stream["bytes_total"], "6276");
    assert_eq!(stream["bytes_average"], "697.33");
    assert_eq!(stream["bytes_median"], "517");
    assert_eq!(stream["bytes_min"], "75");
    assert_eq!(stream["bytes_max"], "2718");
    assert_eq!(stream["matched"], "10");
    assert_eq!(stream["matched0"], "5");
    assert_eq!(stream["matched16"], "0");

    let payload = rows.iter().find(|r| r["MPM"] == "PayloadMpmFunc").unwrap();
    assert_eq!(payload["scans"], "1");
    assert_eq!(payload["bytes_median"], "264");
    assert_eq!(payload["bytes_average"], "264.0");
}

#[test]
fn header_is_exact() {
    let log = write_temp(FIXTURE);
    let out = NamedTempFile::new().unwrap();
    let mut table = scanner::scan_log_file(log.path(), |_| {}).unwrap();
    table.finalize().unwrap();
    writer::write_summary_file(out.path(), &table).unwrap();

    let text = std::fs::read_to_string(out.path()).unwrap();
    let header = text.lines().next().unwrap();
    let expected = format!(
        "MPM,scans,bytes_total,bytes_average,bytes_median,bytes_min,bytes_max,matched,{}",
        (0..17).map(|i| format!("matched{i}")).collect::<Vec<_>>().join(",")
    );
    assert_eq!(header, expected);
}

#[test]
fn clamps_large_match_counts() {
    let log = write_temp("Notice: detect: X: matched 20 bufferlength 5\n");
    let rows = summarize(log.path());
    assert_eq!(rows[0]["matched16"], "1");
    assert_eq!(rows[0]["matched"], "20");
    assert_eq!(rows[0]["bytes_median"], "5");
}

#[test]
fn repeated_runs_are_identical() {
    let log = write_temp(FIXTURE);
    let first = std::fs::read(log.path()).unwrap();
    let a = summarize(log.path());
    let b = summarize(log.path());
    assert_eq!(a, b);
    assert_eq!(std::fs::read(log.path()).unwrap(), first);
}

#[test]
fn empty_log_yields_header_only() {
    let log = write_temp("");
    assert!(summarize(log.path()).is_empty());
}

#[test]
fn sharded_scan_equals_sequential_scan() {
    let tags = ["StreamMpmFunc", "PayloadMpmFunc", "PktMpmFunc", "AppLayerMpm"];
    let mut rng = StdRng::seed_from_u64(42);
    let mut text = String::new();
    let mut lengths: HashMap<&str, Vec<u64>> = HashMap::new();
    for i in 0..2_000 {
        if i % 5 == 0 {
            text.push_str("Info: flow manager: timeout sweep complete\n");
            continue;
        }
        let tag = tags[rng.gen_range(0..tags.len())];
        let len: u64 = rng.gen_range(0..5_000);
        let matched: u64 = rng.gen_range(0..30);
        text.push_str(&format!(
            "[{i}] Notice: detect: {tag}: matched {matched} bufferlength {len} [info]\n"
        ));
        lengths.entry(tag).or_default().push(len);
    }
    let log = write_temp(&text);

    let sequential = scanner::scan_log_file(log.path(), |_| {}).unwrap();
    for shards in [1, 2, 3, 8, 64] {
        assert_eq!(sharded(log.path(), shards), sequential, "{shards} shards");
    }

    let mut table = sequential;
    table.finalize().unwrap();
    for (tag, stats) in table.iter() {
        let mut sorted = lengths[tag].clone();
        sorted.sort_unstable();
        assert_eq!(stats.scans, sorted.len() as u64);
        assert_eq!(stats.buffer_median, Some(sorted[sorted.len() / 2]));
        assert_eq!(stats.buffer_min, sorted.first().copied());
        assert_eq!(stats.buffer_max, sorted.last().copied());
    }
}
