use log::{debug, info};

use super::catalog::ParameterSetFile;
use super::model::RawRecord;
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read every file in catalog order and concatenate their long records.
///
/// Within-file row and column order is preserved so that charts list their
/// boxes in a reproducible order.
pub fn assemble(files: &[ParameterSetFile]) -> Result<Vec<RawRecord>> {
    let mut corpus = Vec::new();
    for file in files {
        let records = load_file(file)?;
        info!(
            "loaded {} cells from {}",
            records.len(),
            file.path.display()
        );
        corpus.extend(records);
    }
    Ok(corpus)
}

/// Parse one wide parameter-set file and reshape it to long form.
///
/// CSV layout:
/// ```text
/// Parameter,forest1,forest2,wetland
/// MF,2.0,4.0,
/// ak,0.1,0.2,0.3
/// ```
/// The first header cell names the key column and is otherwise ignored;
/// every further header cell is a class label. Blank cells and rows shorter
/// than the header are kept as missing values for the normalizer to drop.
pub fn load_file(file: &ParameterSetFile) -> Result<Vec<RawRecord>> {
    let csv_err = |source| PipelineError::Csv {
        path: file.path.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(&file.path)
        .map_err(csv_err)?;

    // Hand-edited files carry stray Latin-1 bytes; decode lossily so a bad
    // cell becomes a non-numeric value instead of a parse error.
    let headers = reader.byte_headers().map_err(csv_err)?;
    if headers.is_empty() {
        return Err(PipelineError::MissingHeader {
            path: file.path.clone(),
        });
    }
    let class_labels: Vec<String> = headers.iter().skip(1).map(lossy).collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let row = result.map_err(csv_err)?;
        let parameter = row.get(0).map(lossy).unwrap_or_default();

        if row.len() > class_labels.len() + 1 {
            debug!(
                "{} row {row_no}: ignoring {} cells beyond the header",
                file.path.display(),
                row.len() - class_labels.len() - 1
            );
        }

        for (col_idx, label) in class_labels.iter().enumerate() {
            records.push(RawRecord {
                parameter: parameter.clone(),
                class_type: file.class_type_token.clone(),
                source: file.source.clone(),
                set_number: file.set_number.clone(),
                basin: file.basin.clone(),
                class_label: label.clone(),
                value: row.get(col_idx + 1).map(lossy),
            });
        }
    }

    Ok(records)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
