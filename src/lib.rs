//! Summary statistics and boxplots for hand-curated hydrological model
//! parameter sets.
//!
//! Input is a directory of wide CSV files named
//! `{Land|River}_{Source}_{SetNumber}_{Basin}.csv`. The pipeline reshapes
//! them to long records, normalizes parameter and class names, and writes a
//! per-parameter summary CSV plus one boxplot per landclass / riverclass
//! parameter. See [`pipeline::run`].

pub mod chart;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod summary;

pub use error::{PipelineError, PolicyError};
pub use pipeline::{run, RunConfig};
