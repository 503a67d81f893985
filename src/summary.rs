use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

use crate::data::model::{Corpus, Family, SummaryRow};
use crate::data::policy::Policy;
use crate::stats::{percentile_of_sorted, round4, sorted};

/// Aggregator output: the rows plus what was left out and why.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryOutcome {
    pub rows: Vec<SummaryRow>,
    /// Present in the data but reported with fixed textbook values.
    pub excluded: Vec<String>,
    /// Known to the policy but without a single usable observation.
    pub empty: Vec<String>,
}

/// Per-parameter min / max / p05 / p50 / p95 across every class, source and
/// basin, rounded to 4 decimals and ordered by parameter name.
pub fn summarize(corpus: &Corpus, policy: &Policy) -> SummaryOutcome {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for family in Family::ALL {
        for name in policy.members(family) {
            groups.entry(name).or_default();
        }
    }
    for r in &corpus.records {
        groups.entry(r.parameter.as_str()).or_default().push(r.value);
    }

    let mut out = SummaryOutcome::default();
    for (parameter, values) in groups {
        if policy.excluded_from_summary(parameter) {
            if !values.is_empty() {
                info!("{parameter}: left out of the summary in favour of fixed values");
                out.excluded.push(parameter.to_string());
            }
            continue;
        }
        match summary_row(parameter, &values) {
            Some(row) => out.rows.push(row),
            None => {
                warn!("{parameter}: no numeric observations, skipping summary row");
                out.empty.push(parameter.to_string());
            }
        }
    }
    out
}

/// One summary row, or `None` when `values` is empty.
pub fn summary_row(parameter: &str, values: &[f64]) -> Option<SummaryRow> {
    let s = sorted(values);
    let min = *s.first()?;
    let max = *s.last()?;
    Some(SummaryRow {
        parameter: parameter.to_string(),
        min: round4(min),
        max: round4(max),
        fifth: round4(percentile_of_sorted(&s, 5.0)?),
        ninetyfifth: round4(percentile_of_sorted(&s, 95.0)?),
        median: round4(percentile_of_sorted(&s, 50.0)?),
    })
}
