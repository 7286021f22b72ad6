//! View projection seam.
//!
//! The rendering layer subscribes to model changes through
//! [`ActivityView`]; the engine never reads anything back from it. All
//! methods default to no-ops so hosts implement only what they render.

use activity_rules::{ItemId, ItemLocation};

/// Pass/fail decoration applied to an item or input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Correct,
    Incorrect,
}

/// What the single submit control currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// Submit runs validation.
    #[default]
    Check,
    /// The activity is completed; submit advances to the next page.
    Next,
}

/// Rendering-layer subscription to engine events.
pub trait ActivityView {
    /// An item moved between the pool and a zone.
    fn item_moved(&mut self, item: &ItemId, to: &ItemLocation) {
        let _ = (item, to);
    }

    /// The selection changed (possibly to nothing).
    fn selection_changed(&mut self, selected: Option<&ItemId>) {
        let _ = selected;
    }

    /// A pass/fail mark was applied to a target id.
    fn mark_applied(&mut self, target: &str, mark: Mark) {
        let _ = (target, mark);
    }

    /// All feedback decorations were cleared.
    fn marks_cleared(&mut self) {}

    /// A feedback message should be shown to the user.
    fn feedback_shown(&mut self, message: &str) {
        let _ = message;
    }

    /// The submit control changed role.
    fn submit_mode_changed(&mut self, mode: SubmitMode) {
        let _ = mode;
    }

    /// Submit/reset affordance visibility changed.
    fn controls_shown(&mut self, submit: bool, reset: bool) {
        let _ = (submit, reset);
    }
}

/// View that renders nothing.
#[derive(Debug, Default)]
pub struct NullView;

impl ActivityView for NullView {}

/// Every event a [`RecordingView`] can capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Moved(ItemId, ItemLocation),
    Selection(Option<ItemId>),
    Mark(String, Mark),
    MarksCleared,
    Feedback(String),
    SubmitMode(SubmitMode),
    Controls { submit: bool, reset: bool },
}

/// View that records every projection event, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    /// Create an empty recording view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks applied since creation, in order.
    pub fn marks(&self) -> Vec<(&str, Mark)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Mark(target, mark) => Some((target.as_str(), *mark)),
                _ => None,
            })
            .collect()
    }

    /// The last submit mode pushed to the view, if any.
    pub fn last_submit_mode(&self) -> Option<SubmitMode> {
        self.events
            .iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::SubmitMode(mode) => Some(*mode),
                _ => None,
            })
    }

    /// The last controls visibility pushed to the view, if any.
    pub fn last_controls(&self) -> Option<(bool, bool)> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Controls { submit, reset } => Some((*submit, *reset)),
            _ => None,
        })
    }
}

impl ActivityView for RecordingView {
    fn item_moved(&mut self, item: &ItemId, to: &ItemLocation) {
        self.events.push(ViewEvent::Moved(item.clone(), to.clone()));
    }

    fn selection_changed(&mut self, selected: Option<&ItemId>) {
        self.events.push(ViewEvent::Selection(selected.cloned()));
    }

    fn mark_applied(&mut self, target: &str, mark: Mark) {
        self.events.push(ViewEvent::Mark(target.to_string(), mark));
    }

    fn marks_cleared(&mut self) {
        self.events.push(ViewEvent::MarksCleared);
    }

    fn feedback_shown(&mut self, message: &str) {
        self.events.push(ViewEvent::Feedback(message.to_string()));
    }

    fn submit_mode_changed(&mut self, mode: SubmitMode) {
        self.events.push(ViewEvent::SubmitMode(mode));
    }

    fn controls_shown(&mut self, submit: bool, reset: bool) {
        self.events.push(ViewEvent::Controls { submit, reset });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_view_captures_events() {
        let mut view = RecordingView::new();
        view.mark_applied("w1", Mark::Correct);
        view.submit_mode_changed(SubmitMode::Next);
        view.controls_shown(true, false);

        assert_eq!(view.marks(), vec![("w1", Mark::Correct)]);
        assert_eq!(view.last_submit_mode(), Some(SubmitMode::Next));
        assert_eq!(view.last_controls(), Some((true, false)));
    }

    #[test]
    fn test_null_view_ignores_everything() {
        let mut view = NullView;
        view.mark_applied("w1", Mark::Incorrect);
        view.marks_cleared();
    }
}
