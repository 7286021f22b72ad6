//! Entity definitions for activity content.

mod kind;

pub use kind::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an interactive item (a draggable word or card).
///
/// Item ids originate in page markup and are opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an item id from a markup identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw markup identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a drop zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub String);

impl ZoneId {
    /// Create a zone id from a markup identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw markup identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an activity, derived from the page's file name.
///
/// Every persisted key for the activity is namespaced by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId(pub String);

impl ActivityId {
    /// Create an activity id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-instance session id, used only for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil session id (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an item currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ItemLocation {
    /// The unplaced word-list pool.
    #[default]
    Pool,
    /// Placed inside a drop zone.
    Zone(ZoneId),
}

impl ItemLocation {
    /// Check whether the item is in the unplaced pool.
    pub fn is_pool(&self) -> bool {
        matches!(self, ItemLocation::Pool)
    }

    /// The occupied zone, if any.
    pub fn zone(&self) -> Option<&ZoneId> {
        match self {
            ItemLocation::Pool => None,
            ItemLocation::Zone(id) => Some(id),
        }
    }
}

/// An interactive answer unit a user can select or place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub location: ItemLocation,
    /// Visual selection flag, mirrored by the view.
    pub selected: bool,
}

impl Item {
    /// Create a new unplaced, unselected item.
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            location: ItemLocation::Pool,
            selected: false,
        }
    }
}

/// A drop target with capacity for exactly one occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
}

impl Zone {
    /// Create a new zone.
    pub fn new(id: ZoneId) -> Self {
        Self { id }
    }
}
