//! The matching board - selection state machine and exchange algorithm.
//!
//! The board is the authoritative in-memory model of placement. Every
//! mutation returns the list of [`BoardChange`]s it produced so callers
//! can project them onto a rendering layer and keep persisted snapshots
//! in lock-step. Invariants held at all times:
//!
//! - a zone holds at most one item;
//! - an item occupies at most one zone;
//! - at most one item is selected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::entities::{Item, ItemId, ItemLocation, Zone, ZoneId};

/// Serialized form of the live assignment: `{ zoneId: [itemId] }`.
///
/// Each zone maps to a single-element list; the list shape is the wire
/// format the persisted snapshot has always used.
pub type Snapshot = BTreeMap<ZoneId, Vec<ItemId>>;

/// Errors from board transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("item `{0}` does not exist on this board")]
    UnknownItem(ItemId),
    #[error("zone `{0}` does not exist on this board")]
    UnknownZone(ZoneId),
    #[error("drop requested with no item selected")]
    NoSelection,
}

/// A single observable effect of a board transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    /// An item moved between the pool and a zone (or between zones).
    Moved {
        item: ItemId,
        from: ItemLocation,
        to: ItemLocation,
    },
    /// The current selection changed.
    SelectionChanged { selected: Option<ItemId> },
}

/// The matching board: items, zones, and the assignment between them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchBoard {
    items: BTreeMap<ItemId, Item>,
    zones: BTreeMap<ZoneId, Zone>,
    /// Live assignment, partial and injective.
    assignment: BTreeMap<ZoneId, ItemId>,
    /// At most one selected item at any time.
    selection: Option<ItemId>,
}

impl MatchBoard {
    /// Create a board from the item and zone ids declared in markup.
    pub fn new(
        items: impl IntoIterator<Item = ItemId>,
        zones: impl IntoIterator<Item = ZoneId>,
    ) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|id| (id.clone(), Item::new(id)))
                .collect(),
            zones: zones
                .into_iter()
                .map(|id| (id.clone(), Zone::new(id)))
                .collect(),
            assignment: BTreeMap::new(),
            selection: None,
        }
    }

    /// Get an item by id.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Check whether a zone exists on this board.
    pub fn has_zone(&self, id: &ZoneId) -> bool {
        self.zones.contains_key(id)
    }

    /// The item currently occupying a zone, if any.
    pub fn occupant(&self, zone: &ZoneId) -> Option<&ItemId> {
        self.assignment.get(zone)
    }

    /// The zone an item currently occupies, if any.
    pub fn zone_of(&self, item: &ItemId) -> Option<&ZoneId> {
        self.items.get(item).and_then(|i| i.location.zone())
    }

    /// The currently selected item, if any.
    pub fn selection(&self) -> Option<&ItemId> {
        self.selection.as_ref()
    }

    /// The live zone-to-item assignment.
    pub fn assignment(&self) -> &BTreeMap<ZoneId, ItemId> {
        &self.assignment
    }

    /// Number of items currently placed in zones.
    pub fn placed_count(&self) -> usize {
        self.assignment.len()
    }

    /// Check whether any item is placed.
    pub fn has_placements(&self) -> bool {
        !self.assignment.is_empty()
    }

    /// Iterate over all items.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Iterate over all zone ids.
    pub fn all_zones(&self) -> impl Iterator<Item = &ZoneId> {
        self.zones.keys()
    }

    /// Select an item, deselecting any previous selection.
    ///
    /// Reselecting the already-selected item is a no-op.
    pub fn select_item(&mut self, id: &ItemId) -> Result<Vec<BoardChange>, BoardError> {
        if !self.items.contains_key(id) {
            return Err(BoardError::UnknownItem(id.clone()));
        }
        if self.selection.as_ref() == Some(id) {
            return Ok(Vec::new());
        }

        let mut changes = Vec::new();
        self.clear_selection_flag();
        self.selection = Some(id.clone());
        if let Some(item) = self.items.get_mut(id) {
            item.selected = true;
        }
        changes.push(BoardChange::SelectionChanged {
            selected: Some(id.clone()),
        });
        Ok(changes)
    }

    /// Drop the selected item into a zone.
    ///
    /// This is the exchange algorithm. The effect depends on the zone's
    /// occupancy and on where the selected item comes from:
    ///
    /// - empty zone, item from the pool: plain placement;
    /// - empty zone, item from another zone: relocation, vacating the
    ///   origin zone;
    /// - occupied zone, item from the pool: the occupant returns to the
    ///   pool and the selected item takes its place;
    /// - occupied zone, item from another zone: the two items swap.
    ///
    /// The selection is cleared in every case.
    pub fn drop_into(&mut self, zone: &ZoneId) -> Result<Vec<BoardChange>, BoardError> {
        if !self.zones.contains_key(zone) {
            return Err(BoardError::UnknownZone(zone.clone()));
        }
        let selected = self.selection.clone().ok_or(BoardError::NoSelection)?;

        let mut changes = Vec::new();

        // Dropping an item onto its own zone only clears the selection.
        if self.assignment.get(zone) == Some(&selected) {
            self.clear_selection(&mut changes);
            return Ok(changes);
        }

        let occupant = self.assignment.get(zone).cloned();
        let origin = self
            .items
            .get(&selected)
            .map(|i| i.location.clone())
            .unwrap_or_default();

        match (occupant, origin) {
            // Zone empty: plain placement, vacating the origin zone if
            // the item came from one.
            (None, _) => {
                changes.push(self.relocate(&selected, ItemLocation::Zone(zone.clone())));
            }
            // Occupied, selected item from the pool: occupant returns to
            // the word list.
            (Some(occupant), ItemLocation::Pool) => {
                changes.push(self.relocate(&occupant, ItemLocation::Pool));
                changes.push(self.relocate(&selected, ItemLocation::Zone(zone.clone())));
            }
            // Occupied, selected item from another zone: swap.
            (Some(occupant), ItemLocation::Zone(origin_zone)) => {
                changes.push(self.relocate(&selected, ItemLocation::Zone(zone.clone())));
                changes.push(self.relocate(&occupant, ItemLocation::Zone(origin_zone)));
            }
        }

        self.clear_selection(&mut changes);
        Ok(changes)
    }

    /// Click on an item.
    ///
    /// A placed item returns to the pool (vacating its zone and clearing
    /// the selection if it pointed at this item); an unplaced item is
    /// selected instead.
    pub fn click_item(&mut self, id: &ItemId) -> Result<Vec<BoardChange>, BoardError> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| BoardError::UnknownItem(id.clone()))?;

        if item.location.is_pool() {
            return self.select_item(id);
        }

        let mut changes = Vec::new();
        if self.selection.as_ref() == Some(id) {
            self.clear_selection(&mut changes);
        }
        changes.push(self.relocate(id, ItemLocation::Pool));
        Ok(changes)
    }

    /// Return a zone's occupant to the pool.
    ///
    /// An empty zone is a no-op. Clears the selection if it pointed at
    /// the removed item.
    pub fn remove_from_zone(&mut self, zone: &ZoneId) -> Result<Vec<BoardChange>, BoardError> {
        if !self.zones.contains_key(zone) {
            return Err(BoardError::UnknownZone(zone.clone()));
        }
        let Some(occupant) = self.assignment.get(zone).cloned() else {
            return Ok(Vec::new());
        };

        let mut changes = Vec::new();
        if self.selection.as_ref() == Some(&occupant) {
            self.clear_selection(&mut changes);
        }
        changes.push(self.relocate(&occupant, ItemLocation::Pool));
        Ok(changes)
    }

    /// Return every placed item to the pool and clear the selection.
    pub fn reset(&mut self) -> Vec<BoardChange> {
        let mut changes = Vec::new();
        let placed: Vec<ItemId> = self.assignment.values().cloned().collect();
        for item in placed {
            changes.push(self.relocate(&item, ItemLocation::Pool));
        }
        self.clear_selection(&mut changes);
        changes
    }

    /// Serialize the live assignment into its persisted shape.
    pub fn snapshot(&self) -> Snapshot {
        self.assignment
            .iter()
            .map(|(zone, item)| (zone.clone(), vec![item.clone()]))
            .collect()
    }

    /// Apply a persisted snapshot to the board.
    ///
    /// Entries whose zone or item no longer exists on the board are
    /// skipped silently. Applying the same snapshot twice yields the same
    /// assignment as applying it once.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Vec<BoardChange> {
        let mut changes = Vec::new();
        for (zone, items) in snapshot {
            if !self.zones.contains_key(zone) {
                continue;
            }
            let Some(item) = items.first() else {
                continue;
            };
            if !self.items.contains_key(item) {
                continue;
            }
            if self.assignment.get(zone) == Some(item) {
                continue;
            }
            changes.push(self.relocate(item, ItemLocation::Zone(zone.clone())));
        }
        changes
    }

    /// Move an item to a new location, keeping `assignment` and the
    /// item's recorded location consistent.
    fn relocate(&mut self, id: &ItemId, to: ItemLocation) -> BoardChange {
        let from = self
            .items
            .get(id)
            .map(|i| i.location.clone())
            .unwrap_or_default();

        // Vacate the origin zone, but only if the entry still points at
        // this item (a swap may already have overwritten it).
        if let ItemLocation::Zone(origin) = &from {
            if self.assignment.get(origin) == Some(id) {
                self.assignment.remove(origin);
            }
        }
        if let ItemLocation::Zone(target) = &to {
            self.assignment.insert(target.clone(), id.clone());
        }
        if let Some(item) = self.items.get_mut(id) {
            item.location = to.clone();
        }

        BoardChange::Moved {
            item: id.clone(),
            from,
            to,
        }
    }

    /// Clear the selection, recording the change.
    fn clear_selection(&mut self, changes: &mut Vec<BoardChange>) {
        if self.selection.is_some() {
            self.clear_selection_flag();
            changes.push(BoardChange::SelectionChanged { selected: None });
        }
    }

    fn clear_selection_flag(&mut self) {
        if let Some(previous) = self.selection.take() {
            if let Some(item) = self.items.get_mut(&previous) {
                item.selected = false;
            }
        }
    }
}
