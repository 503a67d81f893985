use std::collections::BTreeSet;

use log::{debug, warn};
use serde::Serialize;

use super::model::{Corpus, ObservationRecord, RawRecord};
use super::policy::Policy;

/// Why records left the corpus, by step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub default_class: usize,
    pub unclassified: usize,
    pub missing_key: usize,
    pub missing_value: usize,
    pub non_numeric: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.default_class + self.unclassified + self.missing_key + self.missing_value + self.non_numeric
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub corpus: Corpus,
    pub dropped: DropCounts,
    /// Normalized parameter names that matched no family.
    pub unclassified: BTreeSet<String>,
}

/// Turn raw wide-file cells into the classified, numeric corpus.
///
/// Steps, in order: lower-case every text field, strip class-label suffixes,
/// rewrite parameter aliases, merge class synonyms, drop dropped classes,
/// classify, keep complete numeric cases only. The result does not depend on
/// the order of `raw` beyond preserving it.
pub fn normalize(raw: &[RawRecord], policy: &Policy) -> NormalizeOutcome {
    let mut out = NormalizeOutcome::default();
    let mut records = Vec::with_capacity(raw.len());

    for r in raw {
        let parameter = policy.rewrite_parameter(&r.parameter.to_lowercase());
        let class_label = policy.canonical_class_label(&r.class_label.to_lowercase());

        if policy.is_dropped_class(&class_label) {
            out.dropped.default_class += 1;
            continue;
        }

        let Some(family) = policy.family_of(&parameter) else {
            out.dropped.unclassified += 1;
            if !parameter.is_empty() {
                out.unclassified.insert(parameter);
            }
            continue;
        };

        if class_label.is_empty() {
            out.dropped.missing_key += 1;
            continue;
        }

        let Some(text) = r.value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
            out.dropped.missing_value += 1;
            continue;
        };
        let value = match text.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                debug!("dropping non-numeric value '{text}' for {parameter}/{class_label}");
                out.dropped.non_numeric += 1;
                continue;
            }
        };

        records.push(ObservationRecord {
            parameter,
            class_type: r.class_type.to_lowercase(),
            source: r.source.to_lowercase(),
            set_number: r.set_number.to_lowercase(),
            basin: r.basin.to_lowercase(),
            class_label,
            value,
            family,
        });
    }

    for name in &out.unclassified {
        warn!("parameter '{name}' is not in any family; its values are ignored");
    }

    out.corpus = Corpus::new(records);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Family;

    fn raw(parameter: &str, class_label: &str, value: Option<&str>) -> RawRecord {
        RawRecord {
            parameter: parameter.to_string(),
            class_type: "Land".into(),
            source: "Smith".into(),
            set_number: "1".into(),
            basin: "Bow".into(),
            class_label: class_label.to_string(),
            value: value.map(str::to_string),
        }
    }

    fn run(raw: &[RawRecord]) -> NormalizeOutcome {
        normalize(raw, &Policy::builtin().unwrap())
    }

    #[test]
    fn mf_row_becomes_two_fm_forest_records() {
        let out = run(&[
            raw("MF", "forest1", Some("2.0")),
            raw("MF", "forest2", Some("4.0")),
        ]);
        let recs = &out.corpus.records;
        assert_eq!(recs.len(), 2);
        for r in recs {
            assert_eq!(r.parameter, "fm");
            assert_eq!(r.class_label, "forest");
            assert_eq!(r.family, Family::Landclass);
            assert_eq!(r.class_type, "land");
            assert_eq!(r.source, "smith");
            assert_eq!(r.basin, "bow");
        }
        assert_eq!(recs[0].value, 2.0);
        assert_eq!(recs[1].value, 4.0);
    }

    #[test]
    fn default_class_is_always_dropped() {
        let out = run(&[
            raw("ak", "Default", Some("1.0")),
            raw("flz", "default_3", Some("2.0")),
            raw("unknown", "DEFAULT.1", Some("x")),
        ]);
        assert!(out.corpus.is_empty());
        assert_eq!(out.dropped.default_class, 3);
    }

    #[test]
    fn unclassified_parameters_are_dropped_and_listed() {
        let out = run(&[raw("Foo", "forest", Some("1")), raw("ak", "forest", Some("1"))]);
        assert_eq!(out.corpus.len(), 1);
        assert_eq!(out.dropped.unclassified, 1);
        assert_eq!(out.unclassified.iter().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[test]
    fn only_complete_numeric_cases_survive() {
        let out = run(&[
            raw("ak", "forest", Some("")),
            raw("ak", "forest", None),
            raw("ak", "forest", Some("n/a")),
            raw("ak", "forest", Some("NaN")),
            raw("ak", "123", Some("1.0")),
            raw("ak", "forest", Some(" 0.5 ")),
        ]);
        assert_eq!(out.corpus.len(), 1);
        assert_eq!(out.corpus.records[0].value, 0.5);
        assert_eq!(out.dropped.missing_value, 2);
        assert_eq!(out.dropped.non_numeric, 2);
        assert_eq!(out.dropped.missing_key, 1);
        assert_eq!(out.dropped.total(), 5);
    }

    #[test]
    fn every_record_belongs_to_exactly_one_family() {
        let policy = Policy::builtin().unwrap();
        let names = [
            "ds", "RE", "Albedo", "sublime", "MF", "nfm", "LZF", "r2n", "r1n", "theta", "a5",
            "pwr", "bogus",
        ];
        let raw: Vec<_> = names.iter().map(|n| raw(n, "forest", Some("1"))).collect();
        let out = normalize(&raw, &policy);
        for r in &out.corpus.records {
            let hits = Family::ALL
                .iter()
                .filter(|f| policy.members(**f).any(|m| m == r.parameter))
                .count();
            assert_eq!(hits, 1, "{} classified {hits} times", r.parameter);
            assert_eq!(policy.family_of(&r.parameter), Some(r.family));
        }
        assert_eq!(out.corpus.len(), names.len() - 1);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let policy = Policy::builtin().unwrap();
        let first = normalize(
            &[raw("NMF", "Grass2", Some("1")), raw("Re", "crops", Some("2"))],
            &policy,
        );
        let again: Vec<RawRecord> = first
            .corpus
            .records
            .iter()
            .map(|r| RawRecord {
                parameter: r.parameter.clone(),
                class_type: r.class_type.clone(),
                source: r.source.clone(),
                set_number: r.set_number.clone(),
                basin: r.basin.clone(),
                class_label: r.class_label.clone(),
                value: Some(r.value.to_string()),
            })
            .collect();
        let second = normalize(&again, &policy);
        assert_eq!(first.corpus.records, second.corpus.records);
        assert_eq!(first.corpus.records[0].parameter, "fmn");
        assert_eq!(first.corpus.records[0].class_label, "agricultural");
        assert_eq!(first.corpus.records[1].parameter, "rec");
    }
}
