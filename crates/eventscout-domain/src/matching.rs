//! Matching module - deciding whether a document was already recorded
//!
//! The default policy is substring containment: a document counts as recorded
//! when any stored document name *contains* the queried name. This means
//! `a.pdf` is reported as recorded once `report_a.pdf` is stored. Existing
//! master files were built under that rule, so it stays the default;
//! [`ExactMatch`] is available as an explicit opt-in.

use crate::record::AnalysisRecord;
use serde::{Deserialize, Serialize};

/// Policy comparing a stored document name with a candidate name
pub trait NameMatcher {
    /// Returns true if `candidate` is considered the same document as `recorded`
    fn matches(&self, recorded: &str, candidate: &str) -> bool;
}

/// `recorded` contains `candidate` as a substring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstringMatch;

impl NameMatcher for SubstringMatch {
    fn matches(&self, recorded: &str, candidate: &str) -> bool {
        recorded.contains(candidate)
    }
}

/// `recorded` equals `candidate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl NameMatcher for ExactMatch {
    fn matches(&self, recorded: &str, candidate: &str) -> bool {
        recorded == candidate
    }
}

/// Configurable choice between the two built-in matchers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// See [`SubstringMatch`]
    #[default]
    Substring,
    /// See [`ExactMatch`]
    Exact,
}

impl NameMatcher for MatchPolicy {
    fn matches(&self, recorded: &str, candidate: &str) -> bool {
        match self {
            MatchPolicy::Substring => SubstringMatch.matches(recorded, candidate),
            MatchPolicy::Exact => ExactMatch.matches(recorded, candidate),
        }
    }
}

/// Returns true if any record's document name matches `document_name`
///
/// # Examples
///
/// ```
/// use eventscout_domain::{name_already_recorded, AnalysisRecord, ExactMatch, SubstringMatch};
///
/// let records = vec![AnalysisRecord::new("report_a.pdf", Vec::new())];
/// assert!(name_already_recorded(&records, "a.pdf", &SubstringMatch));
/// assert!(!name_already_recorded(&records, "a.pdf", &ExactMatch));
/// ```
pub fn name_already_recorded<M>(records: &[AnalysisRecord], document_name: &str, matcher: &M) -> bool
where
    M: NameMatcher + ?Sized,
{
    records
        .iter()
        .any(|record| matcher.matches(&record.document_name, document_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn records(names: &[&str]) -> Vec<AnalysisRecord> {
        names
            .iter()
            .map(|name| AnalysisRecord::with_timestamp("t", *name, Vec::new()))
            .collect()
    }

    #[test]
    fn test_exact_name_is_recorded() {
        let stored = records(&["a.pdf", "b.pdf"]);
        assert!(name_already_recorded(&stored, "a.pdf", &SubstringMatch));
        assert!(name_already_recorded(&stored, "b.pdf", &ExactMatch));
    }

    #[test]
    fn test_substring_false_positive_is_kept() {
        let stored = records(&["report_a.pdf"]);
        assert!(name_already_recorded(&stored, "a.pdf", &SubstringMatch));
        assert!(name_already_recorded(&stored, "a.pdf", &MatchPolicy::Substring));
        assert!(!name_already_recorded(&stored, "a.pdf", &MatchPolicy::Exact));
    }

    #[test]
    fn test_containment_is_one_directional() {
        let stored = records(&["a.pdf"]);
        assert!(!name_already_recorded(&stored, "report_a.pdf", &SubstringMatch));
    }

    #[test]
    fn test_empty_store_records_nothing() {
        assert!(!name_already_recorded(&[], "a.pdf", &SubstringMatch));
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(serde_json::to_string(&MatchPolicy::Exact).unwrap(), "\"exact\"");
        let policy: MatchPolicy = serde_json::from_str("\"substring\"").unwrap();
        assert_eq!(policy, MatchPolicy::Substring);
        assert_eq!(MatchPolicy::default(), MatchPolicy::Substring);
    }

    proptest! {
        #[test]
        fn prop_exact_match_implies_substring_match(recorded in ".{0,16}", candidate in ".{0,16}") {
            if ExactMatch.matches(&recorded, &candidate) {
                prop_assert!(SubstringMatch.matches(&recorded, &candidate));
            }
        }

        #[test]
        fn prop_name_matches_itself(name in "[a-zA-Z0-9_]{1,12}\\.pdf") {
            let stored = records(&[name.as_str()]);
            prop_assert!(name_already_recorded(&stored, &name, &SubstringMatch));
            prop_assert!(name_already_recorded(&stored, &name, &ExactMatch));
        }
    }
}
