//! # Activity Rules
//!
//! The "Activity Bible" crate - contains the data model for interactive
//! learning activities: items, zones, the matching board, free-input
//! responses, and answer keys. This crate is the single source of truth
//! for activity state and does not contain any persistence or rendering
//! logic.

pub mod answers;
pub mod board;
pub mod definition;
pub mod entities;
pub mod responses;

pub use answers::*;
pub use board::*;
pub use definition::*;
pub use entities::*;
pub use responses::*;
