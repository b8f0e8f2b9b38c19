use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct BenchRow {
    #[serde(rename = "Variant")]
    variant: String,
    #[serde(rename = "Elapsed_Time", default)]
    elapsed: String,
}

/// Elapsed-time samples of one benchmark variant.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantSamples {
    pub variant: String,
    pub samples: Vec<f64>,
}

/// Summary statistics of one sample, as drawn in a boxplot with a
/// standard-deviation error bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN for a single sample.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Summarizes `samples`, or returns `None` when there are none.
    ///
    /// Quartiles interpolate linearly between the closest ranks.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = sorted.iter().map(|x| (x - mean) * (x - mean)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Reads benchmark samples grouped by variant.
///
/// Uses the `Variant` and `Elapsed_Time` columns; other columns are
/// ignored. Elapsed times that are empty or not numeric are dropped, but
/// their variant is still listed. Variants keep their first-seen order.
pub fn read_bench<R: Read>(input: R) -> Result<Vec<VariantSamples>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut groups: Vec<VariantSamples> = Vec::new();

    for row in reader.deserialize() {
        let row: BenchRow = row?;
        let slot = match groups.iter().position(|g| g.variant == row.variant) {
            Some(slot) => slot,
            None => {
                groups.push(VariantSamples {
                    variant: row.variant,
                    samples: Vec::new(),
                });
                groups.len() - 1
            }
        };
        if let Ok(value) = row.elapsed.trim().parse::<f64>() {
            if value.is_finite() {
                groups[slot].samples.push(value);
            }
        }
    }

    Ok(groups)
}

/// Reads the benchmark CSV at `path`; see [`read_bench`].
pub fn load_bench_csv<P: AsRef<Path>>(path: P) -> Result<Vec<VariantSamples>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open benchmark file {}", path.display()))?;
    read_bench(file).with_context(|| format!("Failed to parse benchmark file {}", path.display()))
}
