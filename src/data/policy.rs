use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::model::Family;
use crate::error::{PipelineError, PolicyError};

/// The policy shipped with the crate.
const BUILTIN_POLICY: &str = include_str!("default_policy.json");

// ---------------------------------------------------------------------------
// On-disk policy document
// ---------------------------------------------------------------------------

/// How a rewrite rule finds its pattern inside a parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every occurrence anywhere in the name.
    #[default]
    Substring,
    /// Only occurrences bounded by non-word characters (regex `\b`).
    WholeWord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
    #[serde(default)]
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Deserialize)]
struct Synonym {
    from: String,
    to: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FamilyLists {
    landclass: Vec<String>,
    riverclass: Vec<String>,
    global: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PolicyDocument {
    rewrite_rules: Vec<RewriteRule>,
    #[serde(default)]
    class_synonyms: Vec<Synonym>,
    #[serde(default)]
    dropped_class_labels: Vec<String>,
    families: FamilyLists,
    #[serde(default)]
    summary_excluded: Vec<String>,
}

// ---------------------------------------------------------------------------
// Compiled policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Matcher {
    Substring(String),
    WholeWord(Regex),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    matcher: Matcher,
    replacement: String,
}

impl CompiledRule {
    fn compile(rule: &RewriteRule) -> Result<Self, PolicyError> {
        if rule.pattern.is_empty() {
            return Err(PolicyError::EmptyPattern);
        }
        let matcher = match rule.mode {
            MatchMode::Substring => Matcher::Substring(rule.pattern.clone()),
            MatchMode::WholeWord => {
                let re = Regex::new(&format!(r"\b{}\b", regex::escape(&rule.pattern))).map_err(
                    |source| PolicyError::Pattern {
                        pattern: rule.pattern.clone(),
                        source,
                    },
                )?;
                Matcher::WholeWord(re)
            }
        };
        Ok(CompiledRule {
            matcher,
            replacement: rule.replacement.clone(),
        })
    }

    fn apply(&self, input: &str) -> String {
        match &self.matcher {
            Matcher::Substring(pattern) => input.replace(pattern.as_str(), &self.replacement),
            Matcher::WholeWord(re) => re
                .replace_all(input, regex::NoExpand(&self.replacement))
                .into_owned(),
        }
    }
}

/// Immutable naming policy: parameter rewrites, class-label merges and the
/// family membership lists. Built once per run.
#[derive(Debug, Clone)]
pub struct Policy {
    rules: Vec<CompiledRule>,
    synonyms: BTreeMap<String, String>,
    dropped_class_labels: BTreeSet<String>,
    membership: BTreeMap<String, Family>,
    summary_excluded: BTreeSet<String>,
}

impl Policy {
    /// The embedded default policy.
    pub fn builtin() -> Result<Self, PolicyError> {
        Self::from_json(BUILTIN_POLICY)
    }

    /// Load a policy override from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, PolicyError> {
        let doc: PolicyDocument = serde_json::from_str(text)?;

        let rules = doc
            .rewrite_rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let mut membership = BTreeMap::new();
        let lists = [
            (Family::Landclass, &doc.families.landclass),
            (Family::Riverclass, &doc.families.riverclass),
            (Family::Global, &doc.families.global),
        ];
        for (family, names) in lists {
            for name in names {
                if let Some(previous) = membership.insert(name.clone(), family) {
                    if previous != family {
                        return Err(PolicyError::OverlappingFamilies {
                            parameter: name.clone(),
                            first: previous.name(),
                            second: family.name(),
                        });
                    }
                }
            }
        }

        Ok(Policy {
            rules,
            synonyms: doc
                .class_synonyms
                .into_iter()
                .map(|s| (s.from, s.to))
                .collect(),
            dropped_class_labels: doc.dropped_class_labels.into_iter().collect(),
            membership,
            summary_excluded: doc.summary_excluded.into_iter().collect(),
        })
    }

    /// Run the rewrite chain over an already lower-cased parameter name.
    /// Rules apply strictly in order, each on the previous rule's output.
    pub fn rewrite_parameter(&self, parameter: &str) -> String {
        self.rules
            .iter()
            .fold(parameter.to_string(), |name, rule| rule.apply(&name))
    }

    /// Strip enumeration suffixes (digits, `_`, `.`) and merge synonyms.
    pub fn canonical_class_label(&self, label: &str) -> String {
        let stripped: String = label
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != '_' && *c != '.')
            .collect();
        match self.synonyms.get(&stripped) {
            Some(merged) => merged.clone(),
            None => stripped,
        }
    }

    pub fn is_dropped_class(&self, label: &str) -> bool {
        self.dropped_class_labels.contains(label)
    }

    pub fn family_of(&self, parameter: &str) -> Option<Family> {
        self.membership.get(parameter).copied()
    }

    /// Parameters reported with textbook values instead of empirical limits.
    pub fn excluded_from_summary(&self, parameter: &str) -> bool {
        self.summary_excluded.contains(parameter)
    }

    pub fn members(&self, family: Family) -> impl Iterator<Item = &str> {
        self.membership
            .iter()
            .filter(move |(_, f)| **f == family)
            .map(|(name, _)| name.as_str())
    }
}
