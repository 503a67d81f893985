use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use paramset_stats::{run, RunConfig};

#[derive(Parser)]
#[command(
    name = "paramset-stats",
    about = "Summarize and plot hydrological model parameter sets"
)]
struct Cli {
    /// Directory holding {Land|River}_{Source}_{SetNumber}_{Basin}.csv files
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the summary CSV, charts/ and run_report.json
    #[arg(short, long)]
    output: PathBuf,

    /// JSON normalization policy replacing the built-in one
    #[arg(long)]
    policy: Option<PathBuf>,

    /// TTF font used for chart titles and axis labels (bundled DejaVu Sans by default)
    #[arg(long)]
    font: Option<PathBuf>,

    /// File name of the summary CSV
    #[arg(long, default_value = "summary.csv")]
    summary_name: String,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = RunConfig {
        policy_path: cli.policy,
        font_path: cli.font,
        summary_name: cli.summary_name,
        render_charts: !cli.no_charts,
        ..RunConfig::new(cli.input, cli.output)
    };

    let report = run(&config)
        .with_context(|| format!("processing {}", config.input_dir.display()))?;

    info!(
        "{} files, {} records, {} summary rows, {} charts",
        report.files.len(),
        report.records,
        report.summary_rows,
        report.charts.written.len()
    );
    if !report.charts.failed.is_empty() {
        warn!(
            "{} charts failed, see {}",
            report.charts.failed.len(),
            config.report_path().display()
        );
    }
    Ok(())
}
