mod aggregate;
mod logging;
mod parallel;
mod selftest;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_INPUT_FILE: &str = "/var/log/suricata/suri.out";

/// Summarize per-MPM scan statistics from a detection log into a CSV file.
#[derive(Parser)]
#[command(name = "mpm-stats")]
struct Cli {
    /// Input log file.
    #[arg(default_value = DEFAULT_INPUT_FILE)]
    input_file: PathBuf,

    /// Output CSV file. Defaults to the input path with a `.csv` extension.
    #[arg(long = "output_file", visible_alias = "output-file")]
    output_file: Option<PathBuf>,

    /// Run the built-in self test instead of processing a file.
    #[arg(long)]
    unittests: bool,

    /// Number of shards to scan in parallel.
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

fn run(cli: Cli) -> Result<()> {
    if cli.unittests {
        selftest::run_self_test()?;
        println!("Self test passed.");
        return Ok(());
    }

    let output = cli
        .output_file
        .unwrap_or_else(|| default_output_path(&cli.input_file));
    aggregate::process_log_file(&cli.input_file, &output, cli.jobs)?;
    println!("CSV file generated: {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    let unittests = cli.unittests;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if unittests {
                eprintln!("Self test failed: {:#}", e);
            } else {
                eprintln!("Error processing file: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
