use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// ClassType – first filename token
// ---------------------------------------------------------------------------

/// Which classification scheme a parameter-set file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ClassType {
    Land,
    River,
}

impl ClassType {
    /// Parse a filename token, ignoring case.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("land") {
            Some(ClassType::Land)
        } else if token.eq_ignore_ascii_case("river") {
            Some(ClassType::River)
        } else {
            None
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassType::Land => write!(f, "Land"),
            ClassType::River => write!(f, "River"),
        }
    }
}

// ---------------------------------------------------------------------------
// Family – the three parameter partitions
// ---------------------------------------------------------------------------

/// The partition a normalized parameter name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Landclass,
    Riverclass,
    Global,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Landclass, Family::Riverclass, Family::Global];

    pub fn name(self) -> &'static str {
        match self {
            Family::Landclass => "landclass",
            Family::Riverclass => "riverclass",
            Family::Global => "global",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One (parameter, class) cell straight out of a wide file, before any
/// normalization. Textual fields keep the case they had on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub parameter: String,
    pub class_type: String,
    pub source: String,
    pub set_number: String,
    pub basin: String,
    pub class_label: String,
    /// Cell text; `None` when the row was shorter than the header.
    pub value: Option<String>,
}

/// A normalized, classified observation with a numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub parameter: String,
    pub class_type: String,
    pub source: String,
    pub set_number: String,
    pub basin: String,
    pub class_label: String,
    pub value: f64,
    pub family: Family,
}

// ---------------------------------------------------------------------------
// Corpus – every record that survived normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<ObservationRecord>,
}

impl Corpus {
    pub fn new(records: Vec<ObservationRecord>) -> Self {
        Corpus { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct parameter names of one family.
    pub fn parameters(&self, family: Family) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter(|r| r.family == family)
            .map(|r| r.parameter.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SummaryRow – one line of the summary CSV
// ---------------------------------------------------------------------------

/// Descriptive statistics of one parameter, already rounded.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Parameter")]
    pub parameter: String,
    pub min: f64,
    pub max: f64,
    pub fifth: f64,
    pub ninetyfifth: f64,
    pub median: f64,
}
