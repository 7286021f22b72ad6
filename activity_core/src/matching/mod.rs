//! The matching engine.
//!
//! Couples the pure [`MatchBoard`] to persistence and the view: every
//! completed placement mutation writes the snapshot in the same call, so
//! the persisted state always mirrors the live assignment. Click and
//! drag-and-drop are two front-ends onto the same exchange logic and
//! produce identical assignments and snapshots.

use activity_rules::{ActivityId, BoardChange, ItemId, MatchBoard, SessionId, Snapshot, ZoneId};

use crate::error::EngineError;
use crate::persistence::ActivityStore;
use crate::view::ActivityView;

/// Drives one board-kind activity section.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    activity_id: ActivityId,
    session: SessionId,
    board: MatchBoard,
}

impl MatchingEngine {
    /// Create an engine over a freshly materialized board.
    pub fn new(activity_id: ActivityId, board: MatchBoard) -> Self {
        Self {
            activity_id,
            session: SessionId::new(),
            board,
        }
    }

    /// The activity this engine drives.
    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    /// Read access to the live board.
    pub fn board(&self) -> &MatchBoard {
        &self.board
    }

    /// Select an item (click or keyboard focus on an unplaced card).
    pub fn select_item(
        &mut self,
        item: &ItemId,
        view: &mut dyn ActivityView,
    ) -> Result<(), EngineError> {
        let changes = self.board.select_item(item)?;
        self.project(&changes, view);
        Ok(())
    }

    /// Drop the current selection into a zone.
    pub fn drop_into(
        &mut self,
        zone: &ZoneId,
        store: &mut ActivityStore,
        view: &mut dyn ActivityView,
    ) -> Result<(), EngineError> {
        let changes = self.board.drop_into(zone)?;
        self.project(&changes, view);
        self.persist_if_moved(&changes, store);
        Ok(())
    }

    /// Click on an item: placed items return to the pool, unplaced items
    /// become the selection.
    pub fn click_item(
        &mut self,
        item: &ItemId,
        store: &mut ActivityStore,
        view: &mut dyn ActivityView,
    ) -> Result<(), EngineError> {
        let changes = self.board.click_item(item)?;
        self.project(&changes, view);
        self.persist_if_moved(&changes, store);
        Ok(())
    }

    /// Drag-and-drop front-end: one gesture selecting `item` and
    /// dropping it into `zone`. Produces the same assignment and
    /// snapshot as clicking the item and then the zone.
    pub fn drag_drop(
        &mut self,
        item: &ItemId,
        zone: &ZoneId,
        store: &mut ActivityStore,
        view: &mut dyn ActivityView,
    ) -> Result<(), EngineError> {
        self.select_item(item, view)?;
        self.drop_into(zone, store, view)
    }

    /// Restore placements from the persisted snapshot.
    ///
    /// Entries whose zone or item no longer exists in the document are
    /// skipped silently; restoring twice from the same snapshot yields
    /// the same assignment as restoring once.
    pub fn restore(&mut self, store: &ActivityStore, view: &mut dyn ActivityView) {
        let snapshot = store.load_snapshot(&self.activity_id);
        if snapshot.is_empty() {
            return;
        }
        let skipped = stale_entry_count(&self.board, &snapshot);
        let changes = self.board.apply_snapshot(&snapshot);
        if skipped > 0 {
            tracing::debug!(
                activity = %self.activity_id,
                session = %self.session,
                skipped,
                "snapshot entries without a live zone or item were skipped"
            );
        }
        self.project(&changes, view);
    }

    /// Return every item to the pool, clear the selection and feedback
    /// marks, and delete the persisted snapshot.
    pub fn reset(&mut self, store: &mut ActivityStore, view: &mut dyn ActivityView) {
        let changes = self.board.reset();
        self.project(&changes, view);
        store.remove_snapshot(&self.activity_id);
        view.marks_cleared();
        tracing::debug!(activity = %self.activity_id, session = %self.session, "board reset");
    }

    /// Project board changes onto the view.
    fn project(&self, changes: &[BoardChange], view: &mut dyn ActivityView) {
        for change in changes {
            match change {
                BoardChange::Moved { item, to, .. } => view.item_moved(item, to),
                BoardChange::SelectionChanged { selected } => {
                    view.selection_changed(selected.as_ref())
                }
            }
        }
    }

    /// Overwrite the snapshot whenever a placement actually changed.
    fn persist_if_moved(&self, changes: &[BoardChange], store: &mut ActivityStore) {
        let moved = changes
            .iter()
            .any(|c| matches!(c, BoardChange::Moved { .. }));
        if moved {
            store.save_snapshot(&self.activity_id, &self.board.snapshot());
        }
    }
}

/// Snapshot entries that cannot be restored because their zone or item
/// no longer exists on the board. Entries the board already satisfies
/// are not stale.
fn stale_entry_count(board: &MatchBoard, snapshot: &Snapshot) -> usize {
    snapshot
        .iter()
        .filter(|(zone, items)| {
            !board.has_zone(zone)
                || items
                    .first()
                    .map_or(true, |item| board.item(item).is_none())
        })
        .count()
}
