//! Declarative activity definitions.
//!
//! A definition is the markup analog consumed at setup time: it declares
//! the activity id, its kind tag, the interactive content ids, and
//! optionally the answer key. Definitions are authored as TOML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::answers::AnswerKey;
use crate::board::MatchBoard;
use crate::entities::{ActivityId, ActivityKind, ItemId, ZoneId};

/// Errors raised while loading or checking a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid activity definition: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("activity `{activity}` is a {kind} activity but declares no items or zones")]
    MissingBoardContent {
        activity: ActivityId,
        kind: ActivityKind,
    },
    #[error("activity `{activity}` declares duplicate id `{id}`")]
    DuplicateId { activity: ActivityId, id: String },
    #[error("activity `{activity}` carries a {found} answer key but is declared {declared}")]
    AnswerKeyMismatch {
        activity: ActivityId,
        declared: ActivityKind,
        found: ActivityKind,
    },
}

/// One activity section as declared by page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub id: ActivityId,
    pub kind: ActivityKind,
    /// Draggable item ids (board kinds).
    #[serde(default)]
    pub items: Vec<ItemId>,
    /// Drop zone ids (board kinds).
    #[serde(default)]
    pub zones: Vec<ZoneId>,
    /// Free input ids (text and open-ended kinds).
    #[serde(default)]
    pub inputs: Vec<String>,
    /// The correct-answer map, when the page supplies one.
    #[serde(default)]
    pub answer_key: Option<AnswerKey>,
}

impl ActivityDefinition {
    /// Parse a definition from its TOML source and check it.
    pub fn from_toml_str(source: &str) -> Result<Self, DefinitionError> {
        let definition: ActivityDefinition = toml::from_str(source)?;
        definition.check()?;
        Ok(definition)
    }

    /// Check internal consistency of the definition.
    pub fn check(&self) -> Result<(), DefinitionError> {
        if self.kind.uses_board() && (self.items.is_empty() || self.zones.is_empty()) {
            return Err(DefinitionError::MissingBoardContent {
                activity: self.id.clone(),
                kind: self.kind,
            });
        }

        let mut seen = BTreeSet::new();
        for id in self
            .items
            .iter()
            .map(|i| i.as_str())
            .chain(self.zones.iter().map(|z| z.as_str()))
            .chain(self.inputs.iter().map(String::as_str))
        {
            if !seen.insert(id) {
                return Err(DefinitionError::DuplicateId {
                    activity: self.id.clone(),
                    id: id.to_string(),
                });
            }
        }

        if let Some(key) = &self.answer_key {
            if key.kind() != self.kind {
                return Err(DefinitionError::AnswerKeyMismatch {
                    activity: self.id.clone(),
                    declared: self.kind,
                    found: key.kind(),
                });
            }
        }

        Ok(())
    }

    /// Materialize the board for a board-kind definition.
    pub fn board(&self) -> MatchBoard {
        MatchBoard::new(self.items.iter().cloned(), self.zones.iter().cloned())
    }
}
