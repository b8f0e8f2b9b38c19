//! Per-variant elapsed-time statistics for benchmark result files.
//!
//! Reads a CSV with `Variant` and `Elapsed_Time` columns and prints, for
//! each variant, the values a boxplot with standard-deviation error bars is
//! drawn from.

use anyhow::Result;
use clap::Parser;
use mpm_io::bench::{self, BoxStats};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bench-boxstats")]
struct Cli {
    /// Benchmark CSV file.
    csv_file: PathBuf,
}

fn run(cli: &Cli) -> Result<()> {
    let groups = bench::load_bench_csv(&cli.csv_file)?;
    println!("Elapsed Time Distribution for {}", cli.csv_file.display());
    println!(
        "{:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "variant", "n", "mean", "std", "min", "q1", "median", "q3", "max"
    );

    for group in &groups {
        match BoxStats::from_samples(&group.samples) {
            Some(s) => println!(
                "{:<16} {:>6} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                group.variant, s.count, s.mean, s.std, s.min, s.q1, s.median, s.q3, s.max
            ),
            None => println!("{:<16} {:>6} (no numeric samples)", group.variant, 0),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
