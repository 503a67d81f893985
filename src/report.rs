use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::chart::ChartReport;
use crate::data::model::SummaryRow;
use crate::data::normalize::DropCounts;
use crate::error::{PipelineError, Result};

/// Everything a run did, written next to the summary as JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<PathBuf>,
    pub raw_cells: usize,
    pub records: usize,
    pub dropped: DropCounts,
    pub unclassified: Vec<String>,
    pub summary_path: PathBuf,
    pub summary_rows: usize,
    pub summary_excluded: Vec<String>,
    pub summary_empty: Vec<String>,
    pub charts: ChartReport,
}

/// Write the summary CSV: `Parameter,min,max,fifth,ninetyfifth,median`.
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let csv_err = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if rows.is_empty() {
        // serde only emits the header alongside the first record
        writer
            .write_record(["Parameter", "min", "max", "fifth", "ninetyfifth", "median"])
            .map_err(csv_err)?;
    }
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_run_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let rows = vec![SummaryRow {
            parameter: "ak".into(),
            min: 1.0,
            max: 3.0,
            fifth: 1.1,
            ninetyfifth: 2.9,
            median: 2.0,
        }];
        write_summary(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Parameter,min,max,fifth,ninetyfifth,median"));
        assert_eq!(lines.next(), Some("ak,1.0,3.0,1.1,2.9,2.0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_summary_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), "Parameter,min,max,fifth,ninetyfifth,median");
    }

    #[test]
    fn run_report_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_report.json");
        let report = RunReport {
            records: 4,
            unclassified: vec!["foo".into()],
            ..RunReport::default()
        };
        write_run_report(&path, &report).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["records"], 4);
        assert_eq!(value["unclassified"][0], "foo");
        assert_eq!(value["dropped"]["default_class"], 0);
    }
}
