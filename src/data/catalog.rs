use std::path::{Path, PathBuf};

use log::debug;

use super::model::ClassType;
use crate::error::{PipelineError, Result};

/// Basin token used by contributors who did not tie a set to a basin.
pub const UNKNOWN_BASIN: &str = "Basin";

// ---------------------------------------------------------------------------
// ParameterSetFile – metadata encoded in a file name
// ---------------------------------------------------------------------------

/// One parameter-set file: `{ClassType}_{Source}_{SetNumber}_{Basin}.csv`.
///
/// Tokens keep the case they have on disk; normalization happens later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSetFile {
    pub path: PathBuf,
    pub class_type: ClassType,
    pub class_type_token: String,
    pub source: String,
    pub set_number: String,
    pub basin: String,
}

impl ParameterSetFile {
    /// Split a file name into its four metadata tokens.
    pub fn from_path(path: &Path) -> Result<Self> {
        let malformed = |reason: &str| PipelineError::MalformedFileName {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| malformed("name is not valid UTF-8"))?;
        let stem = match name.len().checked_sub(4).filter(|&i| name.is_char_boundary(i)) {
            Some(i) if name[i..].eq_ignore_ascii_case(".csv") => &name[..i],
            _ => return Err(malformed("missing .csv suffix")),
        };

        let tokens: Vec<&str> = stem.split('_').collect();
        if tokens.len() != 4 {
            return Err(malformed(&format!(
                "expected 4 underscore-separated tokens, found {}",
                tokens.len()
            )));
        }

        let class_type =
            ClassType::from_token(tokens[0]).ok_or_else(|| PipelineError::UnknownClassType {
                path: path.to_path_buf(),
                token: tokens[0].to_string(),
            })?;
        if tokens[1].is_empty() || tokens[2].is_empty() {
            return Err(malformed("source and set number must not be empty"));
        }
        let basin = if tokens[3].is_empty() {
            UNKNOWN_BASIN
        } else {
            tokens[3]
        };

        Ok(ParameterSetFile {
            path: path.to_path_buf(),
            class_type,
            class_type_token: tokens[0].to_string(),
            source: tokens[1].to_string(),
            set_number: tokens[2].to_string(),
            basin: basin.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// List the parameter-set files directly inside `dir`, sorted by path.
///
/// Subdirectories and hidden files are skipped. Any other file with a
/// non-conforming name fails the whole scan.
pub fn discover(dir: &Path) -> Result<Vec<ParameterSetFile>> {
    let io_err = |source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !entry.file_type().map_err(io_err)?.is_file() {
            debug!("skipping non-file entry {}", path.display());
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            debug!("skipping hidden file {}", path.display());
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    paths.iter().map(|p| ParameterSetFile::from_path(p)).collect()
}
