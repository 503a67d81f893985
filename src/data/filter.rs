use super::model::{Corpus, Family, ObservationRecord};

// ---------------------------------------------------------------------------
// Subsetting and grouping for per-parameter views
// ---------------------------------------------------------------------------

/// Which record field splits a parameter's values into boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAxis {
    ClassLabel,
    Basin,
}

impl GroupAxis {
    /// Landclass parameters compare classes; riverclass parameters compare basins.
    pub fn for_family(family: Family) -> Option<Self> {
        match family {
            Family::Landclass => Some(GroupAxis::ClassLabel),
            Family::Riverclass => Some(GroupAxis::Basin),
            Family::Global => None,
        }
    }

    pub fn key(self, record: &ObservationRecord) -> &str {
        match self {
            GroupAxis::ClassLabel => &record.class_label,
            GroupAxis::Basin => &record.basin,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupAxis::ClassLabel => "Class",
            GroupAxis::Basin => "Basin",
        }
    }
}

/// Records of one parameter within one family, in corpus order.
pub fn parameter_subset<'a>(
    corpus: &'a Corpus,
    family: Family,
    parameter: &str,
) -> Vec<&'a ObservationRecord> {
    corpus
        .records
        .iter()
        .filter(|r| r.family == family && r.parameter == parameter)
        .collect()
}

/// Split values by `axis`, groups ordered by first appearance.
pub fn grouped_values(records: &[&ObservationRecord], axis: GroupAxis) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for r in records {
        let key = axis.key(r);
        match groups.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, values)) => values.push(r.value),
            None => groups.push((key.to_string(), vec![r.value])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(parameter: &str, family: Family, class: &str, basin: &str, value: f64) -> ObservationRecord {
        ObservationRecord {
            parameter: parameter.into(),
            class_type: "land".into(),
            source: "s".into(),
            set_number: "1".into(),
            basin: basin.into(),
            class_label: class.into(),
            value,
            family,
        }
    }

    #[test]
    fn groups_follow_first_appearance() {
        let corpus = Corpus::new(vec![
            rec("ak", Family::Landclass, "wetland", "bow", 1.0),
            rec("ak", Family::Landclass, "forest", "bow", 2.0),
            rec("ds", Family::Landclass, "forest", "bow", 9.0),
            rec("ak", Family::Landclass, "wetland", "elbow", 3.0),
        ]);
        let subset = parameter_subset(&corpus, Family::Landclass, "ak");
        assert_eq!(subset.len(), 3);

        let by_class = grouped_values(&subset, GroupAxis::ClassLabel);
        assert_eq!(
            by_class,
            vec![
                ("wetland".to_string(), vec![1.0, 3.0]),
                ("forest".to_string(), vec![2.0]),
            ]
        );

        let by_basin = grouped_values(&subset, GroupAxis::Basin);
        assert_eq!(by_basin[0], ("bow".to_string(), vec![1.0, 2.0]));
        assert_eq!(by_basin[1], ("elbow".to_string(), vec![3.0]));
    }

    #[test]
    fn global_family_has_no_chart_axis() {
        assert_eq!(GroupAxis::for_family(Family::Global), None);
        assert_eq!(
            GroupAxis::for_family(Family::Riverclass),
            Some(GroupAxis::Basin)
        );
    }
}
