//! Writes a synthetic directory of parameter-set files for trying the
//! pipeline end to end. Names are deliberately messy (mixed case, legacy
//! aliases, numbered class columns, a `default` column, blanks).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "generate-sample", about = "Write synthetic parameter-set CSV files")]
struct Args {
    /// Output directory (created if missing)
    #[arg(short, long, default_value = "sample_sets")]
    output: PathBuf,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Contributed sets per class type
    #[arg(long, default_value_t = 4)]
    sets: usize,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (spelling variants seen in contributed files, plausible range)
const LAND_PARAMETERS: &[(&[&str], (f64, f64))] = &[
    (&["ds", "DS"], (0.0, 10.0)),
    (&["re", "REC"], (0.01, 0.5)),
    (&["ak", "AK"], (1.0, 100.0)),
    (&["retn", "RETN"], (50.0, 400.0)),
    (&["r3", "R3"], (1.0, 50.0)),
    (&["fpet", "FPET"], (0.5, 1.5)),
    (&["ftall", "FTALL"], (0.5, 1.2)),
    (&["mf", "MF"], (0.05, 0.3)),
    (&["nmf", "NFM"], (0.0, 0.1)),
    (&["albedo", "Alb"], (0.1, 0.9)),
    (&["sublime", "SUBLIM_RATE"], (0.0, 0.01)),
    (&["whcl", "WHCL"], (0.01, 0.1)),
];

const RIVER_PARAMETERS: &[(&[&str], (f64, f64))] = &[
    (&["lzf", "FLZ"], (1e-6, 1e-4)),
    (&["pwr", "PWR"], (0.5, 4.0)),
    (&["r2n", "R2"], (0.01, 0.2)),
    (&["r1n", "R1"], (0.01, 0.4)),
    (&["theta", "THETA"], (0.1, 0.6)),
];

const LAND_CLASSES: &[&str] = &["forest1", "forest2", "wetland", "grass", "crops", "default"];
const RIVER_CLASSES: &[&str] = &["channel1", "channel2"];
const SOURCES: &[&str] = &["Kouwen", "Davison", "Mekonnen", "Haghnegahdar", "Bingeman"];
const BASINS: &[&str] = &["Grand", "Saugeen", "Bow", "Basin"];

fn write_set(
    dir: &Path,
    name: &str,
    classes: &[&str],
    parameters: &[(&[&str], (f64, f64))],
    rng: &mut SimpleRng,
) -> Result<()> {
    let path = dir.join(name);
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Parameter"];
    header.extend_from_slice(classes);
    writer.write_record(&header)?;

    for (spellings, (lo, hi)) in parameters {
        let mut row = vec![rng.pick(spellings).to_string()];
        for _ in classes {
            // roughly one blank cell in twenty
            if rng.next_f64() < 0.05 {
                row.push(String::new());
            } else {
                row.push(format!("{:.6}", rng.uniform(*lo, *hi)));
            }
        }
        writer.write_record(&row)?;
    }
    // a parameter no family knows about
    let mut row = vec!["iwf".to_string()];
    row.extend(classes.iter().map(|_| "1".to_string()));
    writer.write_record(&row)?;

    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut rng = SimpleRng::new(args.seed);
    let mut written = 0;
    for set in 1..=args.sets {
        let source = SOURCES[(set - 1) % SOURCES.len()];
        let basin = rng.pick(BASINS);

        let land = format!("Land_{source}_{set}_{basin}.csv");
        write_set(&args.output, &land, LAND_CLASSES, LAND_PARAMETERS, &mut rng)?;

        let river = format!("River_{source}_{set}_{basin}.csv");
        write_set(&args.output, &river, RIVER_CLASSES, RIVER_PARAMETERS, &mut rng)?;
        written += 2;
    }

    println!(
        "Wrote {written} parameter-set files to {}",
        args.output.display()
    );
    Ok(())
}
