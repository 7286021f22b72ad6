//! The validation engine.
//!
//! Compares a section's live state against the externally supplied
//! answer key, producing a per-target verdict and an aggregate outcome.
//! Every invocation increments the attempt counter by exactly one,
//! regardless of outcome, and re-derives everything else from scratch.

use activity_rules::{ActivityKind, AnswerKey};
use serde::{Deserialize, Serialize};

use crate::collaborators::{Collaborators, SoundEvent};
use crate::error::EngineError;
use crate::persistence::ActivityStore;
use crate::section::{Section, SectionState};
use crate::view::{ActivityView, Mark};

/// Text comparison behavior for the fill-in kinds.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Trim surrounding whitespace before comparing.
    pub trim_text: bool,
    /// Compare text case-insensitively.
    pub ignore_case: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            trim_text: true,
            ignore_case: true,
        }
    }
}

/// Verdict for one expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetVerdict {
    /// The item, input, area, or statement id the verdict is about.
    pub target: String,
    pub correct: bool,
}

/// Aggregate result of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub correct: usize,
    pub total: usize,
    /// Attempt count after this invocation.
    pub attempts: u32,
    pub verdicts: Vec<TargetVerdict>,
}

impl ValidationOutcome {
    /// Full completion: every expected answer is correct.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

/// Validates sections against their answer keys.
#[derive(Debug, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create a validation engine with the given text comparison config.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a validation engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Validate a section.
    ///
    /// Side effects: the attempt counter advances by one, previous marks
    /// are cleared and fresh pass/fail marks applied, and on full
    /// completion the success flag is stored, the completion tracker
    /// notified, and the success sound played (the failure sound
    /// otherwise).
    pub fn validate(
        &self,
        section: &Section,
        store: &mut ActivityStore,
        view: &mut dyn ActivityView,
        collaborators: &mut Collaborators,
    ) -> Result<ValidationOutcome, EngineError> {
        let key = section.answer_key.as_ref().ok_or(EngineError::MissingAnswerKey)?;
        if key.kind() != section.kind {
            return Err(EngineError::AnswerKeyMismatch {
                declared: section.kind,
                found: key.kind(),
            });
        }

        let attempts = store.increment_attempts(&section.id);
        let verdicts = self.judge(section, key, collaborators);

        view.marks_cleared();
        for verdict in &verdicts {
            let mark = if verdict.correct {
                Mark::Correct
            } else {
                Mark::Incorrect
            };
            view.mark_applied(&verdict.target, mark);
        }

        let outcome = ValidationOutcome {
            correct: verdicts.iter().filter(|v| v.correct).count(),
            total: key.total_expected(),
            attempts,
            verdicts,
        };

        if outcome.is_complete() {
            store.mark_success(&section.id);
            collaborators.tracker.record(&section.id, section.kind, attempts);
            collaborators.sounds.play(SoundEvent::Success);
            tracing::debug!(activity = %section.id, attempts, "activity completed");
        } else {
            collaborators.sounds.play(SoundEvent::Failure);
        }

        Ok(outcome)
    }

    /// Compare live state against the key, one verdict per expected
    /// answer. Pure with respect to the section.
    fn judge(
        &self,
        section: &Section,
        key: &AnswerKey,
        collaborators: &Collaborators,
    ) -> Vec<TargetVerdict> {
        match (key, &section.state) {
            (AnswerKey::Matching(expected), SectionState::Board(engine))
            | (AnswerKey::Sorting(expected), SectionState::Board(engine)) => expected
                .iter()
                .map(|(item, zone)| TargetVerdict {
                    target: item.as_str().to_string(),
                    correct: engine.board().zone_of(item) == Some(zone),
                })
                .collect(),
            (AnswerKey::MultipleChoice(expected), SectionState::Inputs(responses)) => expected
                .iter()
                .map(|(area, choice)| TargetVerdict {
                    target: area.clone(),
                    correct: responses.choice(area) == Some(choice.as_str()),
                })
                .collect(),
            (AnswerKey::TrueFalse(expected), SectionState::Inputs(responses)) => expected
                .iter()
                .map(|(statement, value)| TargetVerdict {
                    target: statement.clone(),
                    correct: responses.mark(statement) == Some(*value),
                })
                .collect(),
            (AnswerKey::FillInBlank(expected), SectionState::Inputs(responses))
            | (AnswerKey::FillInTable(expected), SectionState::Inputs(responses)) => expected
                .iter()
                .map(|(input, answer)| TargetVerdict {
                    target: input.clone(),
                    correct: responses
                        .text(input)
                        .is_some_and(|entered| self.text_matches(entered, answer)),
                })
                .collect(),
            (AnswerKey::OpenEnded { inputs }, SectionState::Inputs(responses)) => inputs
                .iter()
                .map(|input| TargetVerdict {
                    target: input.clone(),
                    correct: responses.text(input).is_some_and(|entered| {
                        let entered = entered.trim();
                        !entered.is_empty()
                            && entered
                                .split_whitespace()
                                .all(|word| collaborators.dictionary.contains(word))
                    }),
                })
                .collect(),
            // Key/state shape mismatch is caught before judging; nothing
            // to compare here.
            _ => Vec::new(),
        }
    }

    fn text_matches(&self, entered: &str, expected: &str) -> bool {
        let (mut entered, mut expected) = (entered.to_string(), expected.to_string());
        if self.config.trim_text {
            entered = entered.trim().to_string();
            expected = expected.trim().to_string();
        }
        if self.config.ignore_case {
            entered = entered.to_lowercase();
            expected = expected.to_lowercase();
        }
        entered == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CompletionTracker, Dictionary};
    use crate::view::{NullView, RecordingView};
    use activity_rules::{ActivityDefinition, ActivityId, ItemId, ZoneId};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn matching_section() -> Section {
        Section::from_definition(
            &ActivityDefinition::from_toml_str(
                r#"
                    id = "unit3-page7"
                    kind = "matching"
                    items = ["w1", "w2", "w3"]
                    zones = ["z1", "z2"]

                    [answer_key.matching]
                    w1 = "z1"
                    w2 = "z2"
                "#,
            )
            .unwrap(),
        )
    }

    fn place(section: &mut Section, store: &mut ActivityStore, item: &str, zone: &str) {
        section
            .engine_mut()
            .unwrap()
            .drag_drop(&ItemId::new(item), &ZoneId::new(zone), store, &mut NullView)
            .unwrap();
    }

    #[test]
    fn test_partial_placement_full_completion() {
        // Expected w1->z1, w2->z2; w3 unreferenced by the key.
        let mut section = matching_section();
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let engine = ValidationEngine::with_defaults();

        place(&mut section, &mut store, "w1", "z1");
        place(&mut section, &mut store, "w2", "z2");

        let outcome = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();

        assert_eq!(outcome.correct, 2);
        assert_eq!(outcome.total, 2);
        assert!(outcome.is_complete());
        assert!(!outcome.verdicts.iter().any(|v| v.target == "w3"));
        assert!(store.has_success(&ActivityId::new("unit3-page7")));
    }

    #[test]
    fn test_misplaced_and_unplaced_items_are_incorrect() {
        let mut section = matching_section();
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let engine = ValidationEngine::with_defaults();

        place(&mut section, &mut store, "w1", "z2");

        let outcome = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();

        assert_eq!(outcome.correct, 0);
        assert!(!outcome.is_complete());
        assert!(!store.has_success(&ActivityId::new("unit3-page7")));
    }

    #[test]
    fn test_attempts_increment_once_per_call() {
        let mut section = matching_section();
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let engine = ValidationEngine::with_defaults();
        let id = ActivityId::new("unit3-page7");

        let first = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert_eq!(first.attempts, 1);

        place(&mut section, &mut store, "w1", "z1");
        place(&mut section, &mut store, "w2", "z2");
        let second = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert_eq!(second.attempts, 2);
        assert_eq!(store.attempts(&id), 2);
    }

    #[test]
    fn test_validation_is_repeatable_from_scratch() {
        let mut section = matching_section();
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let engine = ValidationEngine::with_defaults();

        place(&mut section, &mut store, "w1", "z2");
        let wrong = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert_eq!(wrong.correct, 0);

        // Fix the placement and validate again: fresh verdicts.
        place(&mut section, &mut store, "w1", "z1");
        place(&mut section, &mut store, "w2", "z2");
        let right = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert_eq!(right.correct, 2);
        assert!(right.is_complete());
    }

    #[test]
    fn test_marks_cleared_then_applied_per_item() {
        let mut section = matching_section();
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let mut view = RecordingView::new();
        let engine = ValidationEngine::with_defaults();

        place(&mut section, &mut store, "w1", "z1");
        engine
            .validate(&section, &mut store, &mut view, &mut collaborators)
            .unwrap();

        let marks = view.marks();
        assert!(marks.contains(&("w1", Mark::Correct)));
        assert!(marks.contains(&("w2", Mark::Incorrect)));
    }

    #[test]
    fn test_text_comparison_trims_and_ignores_case() {
        let section = {
            let mut section = Section::from_definition(
                &ActivityDefinition::from_toml_str(
                    r#"
                        id = "blanks"
                        kind = "fill-in-blank"
                        inputs = ["blank1", "blank2"]

                        [answer_key.fill-in-blank]
                        blank1 = "Cat"
                        blank2 = "dog"
                    "#,
                )
                .unwrap(),
            );
            let responses = section.responses_mut().unwrap();
            responses.set_text("blank1", "  cat ");
            responses.set_text("blank2", "DOG");
            section
        };

        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let outcome = ValidationEngine::with_defaults()
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();

        assert_eq!(outcome.correct, 2);
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_true_false_and_choice_validation() {
        let mut section = Section::from_definition(
            &ActivityDefinition::from_toml_str(
                r#"
                    id = "quiz"
                    kind = "true-false"
                    inputs = ["s1", "s2"]

                    [answer_key.true-false]
                    s1 = true
                    s2 = false
                "#,
            )
            .unwrap(),
        );
        section.responses_mut().unwrap().set_mark("s1", true);
        section.responses_mut().unwrap().set_mark("s2", true);

        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let outcome = ValidationEngine::with_defaults()
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert_eq!(outcome.correct, 1);

        let mut section = Section::from_definition(
            &ActivityDefinition::from_toml_str(
                r#"
                    id = "choices"
                    kind = "multiple-choice"
                    inputs = ["area1"]

                    [answer_key.multiple-choice]
                    area1 = "b"
                "#,
            )
            .unwrap(),
        );
        section.responses_mut().unwrap().set_choice("area1", "b");
        let outcome = ValidationEngine::with_defaults()
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_open_ended_uses_dictionary() {
        struct NoSlang;
        impl Dictionary for NoSlang {
            fn contains(&self, word: &str) -> bool {
                word != "zzz"
            }
        }

        let mut section = Section::from_definition(
            &ActivityDefinition::from_toml_str(
                r#"
                    id = "essay"
                    kind = "open-ended"
                    inputs = ["answer1", "answer2"]

                    [answer_key.open-ended]
                    inputs = ["answer1", "answer2"]
                "#,
            )
            .unwrap(),
        );
        section
            .responses_mut()
            .unwrap()
            .set_text("answer1", "a fine sentence");
        section.responses_mut().unwrap().set_text("answer2", "zzz");

        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        collaborators.dictionary = Box::new(NoSlang);

        let outcome = ValidationEngine::with_defaults()
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();

        assert_eq!(outcome.correct, 1);
        assert!(outcome
            .verdicts
            .iter()
            .any(|v| v.target == "answer2" && !v.correct));
    }

    #[test]
    fn test_completion_notifies_tracker_once() {
        struct CountingTracker(Rc<RefCell<Vec<(ActivityId, ActivityKind, u32)>>>);
        impl CompletionTracker for CountingTracker {
            fn record(&mut self, activity: &ActivityId, kind: ActivityKind, attempts: u32) {
                self.0.borrow_mut().push((activity.clone(), kind, attempts));
            }
        }

        let records = Rc::new(RefCell::new(Vec::new()));
        let mut section = matching_section();
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        collaborators.tracker = Box::new(CountingTracker(records.clone()));
        let engine = ValidationEngine::with_defaults();

        place(&mut section, &mut store, "w1", "z1");
        engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();
        assert!(records.borrow().is_empty());

        place(&mut section, &mut store, "w2", "z2");
        engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap();

        assert_eq!(
            records.borrow().as_slice(),
            &[(ActivityId::new("unit3-page7"), ActivityKind::Matching, 2)]
        );
        assert!(store.has_success(&ActivityId::new("unit3-page7")));
    }

    #[test]
    fn test_missing_or_mismatched_key_errors() {
        let mut section = matching_section();
        section.answer_key = None;
        let mut store = ActivityStore::in_memory();
        let mut collaborators = Collaborators::null();
        let engine = ValidationEngine::with_defaults();

        let err = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingAnswerKey));
        // An aborted invocation does not consume an attempt.
        assert_eq!(store.attempts(&ActivityId::new("unit3-page7")), 0);

        section.answer_key = Some(AnswerKey::TrueFalse(Default::default()));
        let err = engine
            .validate(&section, &mut store, &mut NullView, &mut collaborators)
            .unwrap_err();
        assert!(matches!(err, EngineError::AnswerKeyMismatch { .. }));
    }
}
