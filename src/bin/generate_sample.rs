//! Writes a small customer table for trying the app:
//! 100 rows, 5 columns, categorical `segment` target with 3 blanks.
//!
//! Usage: `generate_sample [output.csv]` (default `sample_data.csv`).

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ROWS: usize = 100;
const MISSING_TARGETS: [usize; 3] = [7, 42, 77];
const REGIONS: [&str; 4] = ["north", "south", "east", "west"];

/// Box-Muller transform for a normal sample.
fn gauss(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn segment_for(income: f64, score: f64) -> &'static str {
    match income / 1000.0 + score {
        v if v >= 130.0 => "premium",
        v if v >= 95.0 => "standard",
        _ => "basic",
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut writer =
        csv::Writer::from_path(&output).with_context(|| format!("creating {output}"))?;
    writer.write_record(["age", "income", "score", "region", "segment"])?;

    for row in 0..ROWS {
        let age = rng.gen_range(18..=75);
        let income = gauss(&mut rng, 55_000.0, 18_000.0).max(8_000.0).round();
        let score = gauss(&mut rng, 50.0, 15.0).clamp(0.0, 100.0);
        let region = REGIONS[rng.gen_range(0..REGIONS.len())];
        let segment = if MISSING_TARGETS.contains(&row) {
            ""
        } else {
            segment_for(income, score)
        };

        writer.write_record([
            age.to_string(),
            format!("{income:.0}"),
            format!("{score:.1}"),
            region.to_string(),
            segment.to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("Wrote {ROWS} rows to {output}");
    println!("Wrote {ROWS} rows ({} without a segment) to {output}", MISSING_TARGETS.len());
    Ok(())
}
