//! The closed set of activity kinds.

use serde::{Deserialize, Serialize};

/// Activity kinds recognized by the engine.
///
/// A page section declares its kind with a markup tag; unknown tags do
/// not map to a kind and the declaration is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "fill-in-blank")]
    FillInBlank,
    #[serde(rename = "fill-in-table")]
    FillInTable,
    #[serde(rename = "true-false")]
    TrueFalse,
    #[serde(rename = "open-ended")]
    OpenEnded,
    #[serde(rename = "sorting")]
    Sorting,
    #[serde(rename = "matching")]
    Matching,
}

impl ActivityKind {
    /// Resolve a markup type tag to a kind. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "multiple-choice" => Some(ActivityKind::MultipleChoice),
            "fill-in-blank" => Some(ActivityKind::FillInBlank),
            "fill-in-table" => Some(ActivityKind::FillInTable),
            "true-false" => Some(ActivityKind::TrueFalse),
            "open-ended" => Some(ActivityKind::OpenEnded),
            "sorting" => Some(ActivityKind::Sorting),
            "matching" => Some(ActivityKind::Matching),
            _ => None,
        }
    }

    /// The markup tag for this kind.
    pub fn as_tag(&self) -> &'static str {
        match self {
            ActivityKind::MultipleChoice => "multiple-choice",
            ActivityKind::FillInBlank => "fill-in-blank",
            ActivityKind::FillInTable => "fill-in-table",
            ActivityKind::TrueFalse => "true-false",
            ActivityKind::OpenEnded => "open-ended",
            ActivityKind::Sorting => "sorting",
            ActivityKind::Matching => "matching",
        }
    }

    /// Kinds whose interaction model is item placement on a board.
    pub fn uses_board(&self) -> bool {
        matches!(self, ActivityKind::Matching | ActivityKind::Sorting)
    }

    /// Kinds answered through free text inputs.
    pub fn uses_text_inputs(&self) -> bool {
        matches!(
            self,
            ActivityKind::FillInBlank | ActivityKind::FillInTable | ActivityKind::OpenEnded
        )
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}
