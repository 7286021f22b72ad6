//! Live free-input state for the non-board activity kinds.
//!
//! Mirrors what the user has typed, chosen, or marked on screen. Keys
//! are the raw markup ids of the inputs, choice areas, and statements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response state for text, choice, and true/false activities.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ResponseState {
    /// Text input id -> entered text.
    texts: BTreeMap<String, String>,
    /// Choice area id -> selected choice id.
    choices: BTreeMap<String, String>,
    /// Statement id -> true/false mark.
    marks: BTreeMap<String, bool>,
}

impl ResponseState {
    /// Create an empty response state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the text of an input. Empty text clears the entry.
    pub fn set_text(&mut self, input: impl Into<String>, value: impl Into<String>) {
        let input = input.into();
        let value = value.into();
        if value.is_empty() {
            self.texts.remove(&input);
        } else {
            self.texts.insert(input, value);
        }
    }

    /// The entered text of an input, if any.
    pub fn text(&self, input: &str) -> Option<&str> {
        self.texts.get(input).map(String::as_str)
    }

    /// Record the selected choice of an area, replacing any previous one.
    pub fn set_choice(&mut self, area: impl Into<String>, choice: impl Into<String>) {
        self.choices.insert(area.into(), choice.into());
    }

    /// The selected choice of an area, if any.
    pub fn choice(&self, area: &str) -> Option<&str> {
        self.choices.get(area).map(String::as_str)
    }

    /// Record a true/false mark for a statement.
    pub fn set_mark(&mut self, statement: impl Into<String>, value: bool) {
        self.marks.insert(statement.into(), value);
    }

    /// The mark of a statement, if any.
    pub fn mark(&self, statement: &str) -> Option<bool> {
        self.marks.get(statement).copied()
    }

    /// Check whether any response has been recorded.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.choices.is_empty() && self.marks.is_empty()
    }

    /// Check whether any text input holds non-whitespace content.
    pub fn has_text(&self) -> bool {
        self.texts.values().any(|v| !v.trim().is_empty())
    }

    /// Forget every recorded response.
    pub fn clear(&mut self) {
        self.texts.clear();
        self.choices.clear();
        self.marks.clear();
    }
}
