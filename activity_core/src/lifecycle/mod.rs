//! The activity lifecycle controller.
//!
//! Orchestrates page-load setup (materialized sections, restored state,
//! submit binding), user interaction passthroughs, submit, and reset.
//! Exactly one validator is active at a time: the last prepared
//! section's. Every failure path here logs and no-ops; nothing is fatal
//! to the page.

use activity_rules::{ActivityDefinition, ItemId, ZoneId};

use crate::collaborators::Collaborators;
use crate::persistence::ActivityStore;
use crate::section::Section;
use crate::validation::{ValidationEngine, ValidationOutcome};
use crate::view::{ActivityView, SubmitMode};

/// Translation key of the score feedback message.
const FEEDBACK_KEY: &str = "activity.score";

/// Everything the controller found on the page.
pub struct Page {
    pub sections: Vec<Section>,
    /// Whether the page declares the single submit control.
    pub has_submit_control: bool,
}

impl Page {
    /// Build a page from materialized sections.
    pub fn new(sections: Vec<Section>, has_submit_control: bool) -> Self {
        Self {
            sections,
            has_submit_control,
        }
    }

    /// Materialize a page from activity declarations.
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a ActivityDefinition>,
        has_submit_control: bool,
    ) -> Self {
        Self::new(
            definitions.into_iter().map(Section::from_definition).collect(),
            has_submit_control,
        )
    }
}

/// Drives the page through setup, interaction, submit, and reset.
pub struct LifecycleController {
    page: Page,
    store: ActivityStore,
    collaborators: Collaborators,
    validator: ValidationEngine,
    /// Index of the section the submit control validates.
    active: Option<usize>,
    submit_mode: SubmitMode,
}

impl LifecycleController {
    /// Create a controller over a page, a store, and collaborators.
    pub fn new(page: Page, store: ActivityStore, collaborators: Collaborators) -> Self {
        Self {
            page,
            store,
            collaborators,
            validator: ValidationEngine::with_defaults(),
            active: None,
            submit_mode: SubmitMode::Check,
        }
    }

    /// What the submit control currently does.
    pub fn submit_mode(&self) -> SubmitMode {
        self.submit_mode
    }

    /// The section currently bound to the submit control.
    pub fn active_section(&self) -> Option<&Section> {
        self.active.and_then(|idx| self.page.sections.get(idx))
    }

    /// Read access to the store, for host bookkeeping.
    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    /// Page-load setup: restore persisted state into every section and
    /// bind the submit control to the last one.
    ///
    /// Safe to call again: restore is idempotent and rebinding replaces
    /// the previous validator instead of stacking another.
    pub fn prepare(&mut self, view: &mut dyn ActivityView) {
        if self.page.sections.is_empty() {
            tracing::debug!("no activity sections on this page");
            view.controls_shown(false, false);
            return;
        }
        if !self.page.has_submit_control {
            tracing::warn!("submit control not found, activity setup aborted");
            return;
        }

        for section in &mut self.page.sections {
            section.restore(&self.store, view);
        }
        self.active = Some(self.page.sections.len() - 1);
        self.submit_mode = SubmitMode::Check;
        view.submit_mode_changed(self.submit_mode);
        self.refresh_controls(view);
    }

    /// Press of the submit control: validates in [`SubmitMode::Check`],
    /// advances to the next page in [`SubmitMode::Next`].
    pub fn submit(&mut self, view: &mut dyn ActivityView) -> Option<ValidationOutcome> {
        match self.submit_mode {
            SubmitMode::Next => {
                self.collaborators.navigator.go_next();
                None
            }
            SubmitMode::Check => self.run_validation(view),
        }
    }

    fn run_validation(&mut self, view: &mut dyn ActivityView) -> Option<ValidationOutcome> {
        let Some(idx) = self.active else {
            tracing::warn!("submit pressed with no active section");
            return None;
        };
        let section = &self.page.sections[idx];
        match self
            .validator
            .validate(section, &mut self.store, view, &mut self.collaborators)
        {
            Ok(outcome) => {
                let message = self.collaborators.translator.translate(
                    FEEDBACK_KEY,
                    &[
                        ("correct", outcome.correct.to_string()),
                        ("total", outcome.total.to_string()),
                    ],
                );
                view.feedback_shown(&message);

                if outcome.is_complete() {
                    self.submit_mode = SubmitMode::Next;
                    view.submit_mode_changed(self.submit_mode);
                }
                self.refresh_controls(view);
                Some(outcome)
            }
            Err(err) => {
                tracing::warn!(activity = %section.id, %err, "validation skipped");
                None
            }
        }
    }

    /// Reset the active section: clear its persisted keys, restore the
    /// virgin visual state, and rebind submit to validation.
    pub fn reset(&mut self, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            tracing::warn!("reset requested with no active section");
            return;
        };
        let activity = self.page.sections[idx].id.clone();
        self.store.clear_activity(&activity);
        self.page.sections[idx].reset(&mut self.store, view);

        self.submit_mode = SubmitMode::Check;
        view.submit_mode_changed(self.submit_mode);
        self.refresh_controls(view);
        tracing::debug!(activity = %activity, "activity reset");
    }

    /// Select an item on the active board section.
    pub fn select_item(&mut self, item: &ItemId, view: &mut dyn ActivityView) {
        let Some(engine) = self.active_engine() else {
            return;
        };
        if let Err(err) = engine.select_item(item, view) {
            tracing::warn!(%err, "selection ignored");
        }
    }

    /// Drop the current selection into a zone on the active board.
    pub fn drop_into(&mut self, zone: &ZoneId, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            return;
        };
        let Some(engine) = self.page.sections[idx].engine_mut() else {
            tracing::warn!("drop on a non-board activity ignored");
            return;
        };
        if let Err(err) = engine.drop_into(zone, &mut self.store, view) {
            tracing::warn!(%err, "drop ignored");
        }
        self.refresh_controls(view);
    }

    /// Click an item on the active board.
    pub fn click_item(&mut self, item: &ItemId, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            return;
        };
        let Some(engine) = self.page.sections[idx].engine_mut() else {
            tracing::warn!("click on a non-board activity ignored");
            return;
        };
        if let Err(err) = engine.click_item(item, &mut self.store, view) {
            tracing::warn!(%err, "click ignored");
        }
        self.refresh_controls(view);
    }

    /// Drag-and-drop gesture on the active board.
    pub fn drag_drop(
        &mut self,
        item: &ItemId,
        zone: &ZoneId,
        view: &mut dyn ActivityView,
    ) {
        let Some(idx) = self.active else {
            return;
        };
        let Some(engine) = self.page.sections[idx].engine_mut() else {
            tracing::warn!("drag on a non-board activity ignored");
            return;
        };
        if let Err(err) = engine.drag_drop(item, zone, &mut self.store, view) {
            tracing::warn!(%err, "drag ignored");
        }
        self.refresh_controls(view);
    }

    /// Text typed into an input: live state and store move together.
    pub fn input_text(&mut self, input: &str, value: &str, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            return;
        };
        let activity = self.page.sections[idx].id.clone();
        let Some(responses) = self.page.sections[idx].responses_mut() else {
            tracing::warn!("text input on a board activity ignored");
            return;
        };
        responses.set_text(input, value);
        if value.is_empty() {
            self.store.remove_text(&activity, input);
        } else {
            self.store.save_text(&activity, input, value);
        }
        self.refresh_controls(view);
    }

    /// Choice picked in a single-choice area.
    pub fn choose(&mut self, area: &str, choice: &str, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            return;
        };
        let activity = self.page.sections[idx].id.clone();
        let Some(responses) = self.page.sections[idx].responses_mut() else {
            tracing::warn!("choice on a board activity ignored");
            return;
        };
        responses.set_choice(area, choice);
        self.store.save_choice(&activity, area, choice);
        self.refresh_controls(view);
    }

    /// True/false mark set on a statement.
    pub fn mark_statement(&mut self, statement: &str, value: bool, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            return;
        };
        let activity = self.page.sections[idx].id.clone();
        let Some(responses) = self.page.sections[idx].responses_mut() else {
            tracing::warn!("mark on a board activity ignored");
            return;
        };
        responses.set_mark(statement, value);
        self.store.save_text(&activity, statement, &value.to_string());
        self.refresh_controls(view);
    }

    fn active_engine(&mut self) -> Option<&mut crate::matching::MatchingEngine> {
        let idx = self.active?;
        self.page.sections[idx].engine_mut()
    }

    /// Recompute submit/reset visibility from the active section.
    fn refresh_controls(&mut self, view: &mut dyn ActivityView) {
        let Some(idx) = self.active else {
            view.controls_shown(false, false);
            return;
        };
        let reset = self.page.sections[idx].has_user_data(&self.store);
        view.controls_shown(true, reset);
    }
}
