use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Per-record problems (blank cells, unknown parameters) are not errors: the
/// normalizer drops and counts them. Per-chart problems live in
/// [`crate::chart::ChartError`] and never abort the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "{}: file name must look like {{Land|River}}_{{Source}}_{{SetNumber}}_{{Basin}}.csv ({reason})",
        path.display()
    )]
    MalformedFileName { path: PathBuf, reason: String },

    #[error("{}: unknown class type '{token}', expected Land or River", path.display())]
    UnknownClassType { path: PathBuf, token: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: missing header row", path.display())]
    MissingHeader { path: PathBuf },

    #[error("invalid normalization policy: {0}")]
    Policy(#[from] PolicyError),
}

/// Problems with a normalization policy document.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("cannot parse policy JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rewrite rule '{pattern}' is not a valid whole-word pattern: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rewrite rule has an empty pattern")]
    EmptyPattern,

    #[error("parameter '{parameter}' is listed in both {first} and {second}")]
    OverlappingFamilies {
        parameter: String,
        first: &'static str,
        second: &'static str,
    },
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
