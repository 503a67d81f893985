use std::path::{Path, PathBuf};

use log::info;

use crate::chart::{self, ChartOptions};
use crate::data::policy::Policy;
use crate::data::{catalog, loader, normalize};
use crate::error::{PipelineError, Result};
use crate::report::{self, RunReport};
use crate::summary;

/// Where to read, where to write, and which policy to apply.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Normalization policy override; the built-in policy when `None`.
    pub policy_path: Option<PathBuf>,
    /// TTF font for chart text; the bundled DejaVu Sans when `None`.
    pub font_path: Option<PathBuf>,
    pub summary_name: String,
    pub render_charts: bool,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl RunConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        RunConfig {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            policy_path: None,
            font_path: None,
            summary_name: "summary.csv".to_string(),
            render_charts: true,
            chart_width: 1200,
            chart_height: 800,
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_name)
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.output_dir.join("charts")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("run_report.json")
    }
}

/// Catalog → load → normalize → summarize → chart, then write the run report.
///
/// Only input problems (bad file names, unreadable files) and output I/O
/// abort the run; chart failures are collected in the report.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let policy = match &config.policy_path {
        Some(path) => Policy::from_file(path)?,
        None => Policy::builtin()?,
    };

    let files = catalog::discover(&config.input_dir)?;
    info!(
        "found {} parameter-set files in {}",
        files.len(),
        config.input_dir.display()
    );

    let raw = loader::assemble(&files)?;
    let normalized = normalize::normalize(&raw, &policy);
    info!(
        "{} of {} cells kept after normalization",
        normalized.corpus.len(),
        raw.len()
    );

    create_dir(&config.output_dir)?;
    let summary = summary::summarize(&normalized.corpus, &policy);
    let summary_path = config.summary_path();
    report::write_summary(&summary_path, &summary.rows)?;
    info!(
        "wrote {} summary rows to {}",
        summary.rows.len(),
        summary_path.display()
    );

    let charts = if config.render_charts {
        let chart_dir = config.chart_dir();
        create_dir(&chart_dir)?;
        let opts = ChartOptions {
            width: config.chart_width,
            height: config.chart_height,
            draw_text: chart::font::install(config.font_path.as_deref()),
            ..ChartOptions::default()
        };
        chart::render_all(&normalized.corpus, &chart_dir, &opts)
    } else {
        chart::ChartReport::default()
    };

    let run_report = RunReport {
        files: files.into_iter().map(|f| f.path).collect(),
        raw_cells: raw.len(),
        records: normalized.corpus.len(),
        dropped: normalized.dropped,
        unclassified: normalized.unclassified.into_iter().collect(),
        summary_path,
        summary_rows: summary.rows.len(),
        summary_excluded: summary.excluded,
        summary_empty: summary.empty,
        charts,
    };
    report::write_run_report(&config.report_path(), &run_report)?;
    Ok(run_report)
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
