//! Answer keys - the externally supplied correct-answer maps.
//!
//! A key is provided by page content, consumed read-only, and immutable
//! for the session. Its schema depends on the activity kind.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{ActivityKind, ItemId, ZoneId};

/// The correct-answer map for one activity, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerKey {
    /// Item -> expected zone.
    Matching(BTreeMap<ItemId, ZoneId>),
    /// Item -> expected slot; same shape as matching, ordered zones.
    Sorting(BTreeMap<ItemId, ZoneId>),
    /// Choice area -> expected choice id.
    MultipleChoice(BTreeMap<String, String>),
    /// Statement -> expected boolean.
    TrueFalse(BTreeMap<String, bool>),
    /// Text input -> expected text.
    FillInBlank(BTreeMap<String, String>),
    /// Table cell input -> expected text.
    FillInTable(BTreeMap<String, String>),
    /// No right answer; lists the inputs that must be filled in.
    OpenEnded { inputs: Vec<String> },
}

impl AnswerKey {
    /// The activity kind this key validates.
    pub fn kind(&self) -> ActivityKind {
        match self {
            AnswerKey::Matching(_) => ActivityKind::Matching,
            AnswerKey::Sorting(_) => ActivityKind::Sorting,
            AnswerKey::MultipleChoice(_) => ActivityKind::MultipleChoice,
            AnswerKey::TrueFalse(_) => ActivityKind::TrueFalse,
            AnswerKey::FillInBlank(_) => ActivityKind::FillInBlank,
            AnswerKey::FillInTable(_) => ActivityKind::FillInTable,
            AnswerKey::OpenEnded { .. } => ActivityKind::OpenEnded,
        }
    }

    /// Number of answers the key expects.
    pub fn total_expected(&self) -> usize {
        match self {
            AnswerKey::Matching(map) | AnswerKey::Sorting(map) => map.len(),
            AnswerKey::MultipleChoice(map) => map.len(),
            AnswerKey::TrueFalse(map) => map.len(),
            AnswerKey::FillInBlank(map) | AnswerKey::FillInTable(map) => map.len(),
            AnswerKey::OpenEnded { inputs } => inputs.len(),
        }
    }

    /// Expected item placements, for the board kinds.
    pub fn expected_placements(&self) -> Option<&BTreeMap<ItemId, ZoneId>> {
        match self {
            AnswerKey::Matching(map) | AnswerKey::Sorting(map) => Some(map),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let key = AnswerKey::Matching(BTreeMap::new());
        assert_eq!(key.kind(), ActivityKind::Matching);

        let key = AnswerKey::OpenEnded {
            inputs: vec!["essay".into()],
        };
        assert_eq!(key.kind(), ActivityKind::OpenEnded);
        assert_eq!(key.total_expected(), 1);
    }

    #[test]
    fn test_expected_placements() {
        let mut map = BTreeMap::new();
        map.insert(ItemId::new("w1"), ZoneId::new("z1"));
        let key = AnswerKey::Matching(map);
        assert_eq!(key.expected_placements().unwrap().len(), 1);
        assert_eq!(key.total_expected(), 1);

        let key = AnswerKey::TrueFalse(BTreeMap::new());
        assert!(key.expected_placements().is_none());
    }
}
