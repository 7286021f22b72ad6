//! Engine error taxonomy.
//!
//! None of these errors is fatal to a page: the lifecycle controller
//! converts every one of them into a logged warning and a no-op.

use thiserror::Error;

use activity_rules::{ActivityKind, BoardError};

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("activity declares no answer key")]
    MissingAnswerKey,
    #[error("answer key validates {found} but the section is {declared}")]
    AnswerKeyMismatch {
        declared: ActivityKind,
        found: ActivityKind,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}
