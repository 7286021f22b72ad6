//! Collaborator seams.
//!
//! The engine calls these but does not implement them: translation,
//! sound effects, completion tracking, page navigation, and dictionary
//! lookup all belong to the host page. Null implementations are provided
//! so the engine runs headless.

use activity_rules::{ActivityId, ActivityKind};

/// Sound cues the engine can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    /// Validation passed completely.
    Success,
    /// Validation left something incorrect.
    Failure,
}

/// Translation lookup, `t(key, args)`.
pub trait Translator {
    fn translate(&self, key: &str, args: &[(&str, String)]) -> String;
}

/// Sound-effect trigger.
pub trait SoundEffects {
    fn play(&self, event: SoundEvent);
}

/// Records completed activities (id, kind, attempt count).
pub trait CompletionTracker {
    fn record(&mut self, activity: &ActivityId, kind: ActivityKind, attempts: u32);
}

/// Page advancement once an activity is completed.
pub trait Navigator {
    fn go_next(&mut self);
}

/// Word lookup for free-text validation.
pub trait Dictionary {
    fn contains(&self, word: &str) -> bool;
}

/// Translator that echoes the key, ignoring arguments.
#[derive(Debug, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn translate(&self, key: &str, _args: &[(&str, String)]) -> String {
        key.to_string()
    }
}

/// Silent sound effects.
#[derive(Debug, Default)]
pub struct NullSounds;

impl SoundEffects for NullSounds {
    fn play(&self, _event: SoundEvent) {}
}

/// Tracker that discards completions.
#[derive(Debug, Default)]
pub struct NullTracker;

impl CompletionTracker for NullTracker {
    fn record(&mut self, _activity: &ActivityId, _kind: ActivityKind, _attempts: u32) {}
}

/// Navigator that goes nowhere.
#[derive(Debug, Default)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn go_next(&mut self) {}
}

/// Dictionary that accepts every word.
#[derive(Debug, Default)]
pub struct AcceptAllDictionary;

impl Dictionary for AcceptAllDictionary {
    fn contains(&self, _word: &str) -> bool {
        true
    }
}

/// The full set of collaborator seams handed to the engine.
pub struct Collaborators {
    pub translator: Box<dyn Translator>,
    pub sounds: Box<dyn SoundEffects>,
    pub tracker: Box<dyn CompletionTracker>,
    pub navigator: Box<dyn Navigator>,
    pub dictionary: Box<dyn Dictionary>,
}

impl Collaborators {
    /// Collaborators that do nothing, for headless use and tests.
    pub fn null() -> Self {
        Self {
            translator: Box::new(NullTranslator),
            sounds: Box::new(NullSounds),
            tracker: Box::new(NullTracker),
            navigator: Box::new(NullNavigator),
            dictionary: Box::new(AcceptAllDictionary),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::null()
    }
}
