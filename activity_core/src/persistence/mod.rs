//! Per-activity local persistence.
//!
//! A single namespaced key-value store holds everything a user has done
//! on a page: text inputs, choice selections, board snapshots, attempt
//! counters, and success flags. Reads are tolerant: malformed JSON and
//! non-numeric counters decode as empty state and are overwritten by the
//! next save. Last write wins; concurrent tabs are out of scope.
//!
//! Key shapes, all derived from the activity id:
//!
//! - `"<activityId>_<inputId>"` - scalar text input
//! - `"<activityId>_<areaId>_multipleChoice"` - single-choice selection
//! - `"<activityId>_dropzones"` - JSON blob `{ zoneId: [itemId] }`
//! - `"<activityId>_success"` - completion flag
//! - `"<activityId>-intentos"` - attempt counter; the dash keeps it out
//!   of the `"<activityId>_"` prefix so it survives an activity reset

use std::collections::BTreeMap;

use activity_rules::{ActivityId, Snapshot};

/// Suffix of the single-choice keys.
pub const CHOICE_SUFFIX: &str = "_multipleChoice";
/// Input-id slot of the board snapshot key.
pub const DROPZONES_SLOT: &str = "dropzones";
/// Input-id slot of the success flag key.
pub const SUCCESS_SLOT: &str = "success";

/// A localStorage-shaped string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-process store for tests and native hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Activity-scoped persistence over a [`KeyValueStore`] backend.
///
/// Owns key derivation, JSON encoding of board snapshots, the attempt
/// counter, the success flag, and prefix clearing.
pub struct ActivityStore {
    backend: Box<dyn KeyValueStore>,
}

impl ActivityStore {
    /// Wrap a backend store.
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    fn scalar_key(activity: &ActivityId, input: &str) -> String {
        format!("{}_{}", activity.as_str(), input)
    }

    fn choice_key(activity: &ActivityId, area: &str) -> String {
        format!("{}_{}{}", activity.as_str(), area, CHOICE_SUFFIX)
    }

    fn attempts_key(activity: &ActivityId) -> String {
        format!("{}-intentos", activity.as_str())
    }

    /// Save a scalar text value for an input.
    pub fn save_text(&mut self, activity: &ActivityId, input: &str, value: &str) {
        self.backend.set(&Self::scalar_key(activity, input), value);
    }

    /// Load the scalar text value of an input.
    pub fn load_text(&self, activity: &ActivityId, input: &str) -> Option<String> {
        self.backend.get(&Self::scalar_key(activity, input))
    }

    /// Remove the scalar text value of an input.
    pub fn remove_text(&mut self, activity: &ActivityId, input: &str) {
        self.backend.remove(&Self::scalar_key(activity, input));
    }

    /// Save the selected choice of an area.
    pub fn save_choice(&mut self, activity: &ActivityId, area: &str, choice: &str) {
        self.backend.set(&Self::choice_key(activity, area), choice);
    }

    /// Load the selected choice of an area.
    pub fn load_choice(&self, activity: &ActivityId, area: &str) -> Option<String> {
        self.backend.get(&Self::choice_key(activity, area))
    }

    /// Save the board snapshot as one JSON blob.
    pub fn save_snapshot(&mut self, activity: &ActivityId, snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => self
                .backend
                .set(&Self::scalar_key(activity, DROPZONES_SLOT), &json),
            Err(err) => {
                tracing::warn!(activity = %activity, %err, "failed to encode snapshot");
            }
        }
    }

    /// Load the board snapshot.
    ///
    /// A missing key or malformed JSON decodes as an empty snapshot.
    pub fn load_snapshot(&self, activity: &ActivityId) -> Snapshot {
        let Some(json) = self.backend.get(&Self::scalar_key(activity, DROPZONES_SLOT)) else {
            return Snapshot::new();
        };
        match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::debug!(activity = %activity, %err, "corrupt snapshot treated as empty");
                Snapshot::new()
            }
        }
    }

    /// Check whether a snapshot blob is stored, even an empty one.
    pub fn has_snapshot(&self, activity: &ActivityId) -> bool {
        self.backend
            .get(&Self::scalar_key(activity, DROPZONES_SLOT))
            .is_some()
    }

    /// Remove the stored snapshot blob.
    pub fn remove_snapshot(&mut self, activity: &ActivityId) {
        self.backend
            .remove(&Self::scalar_key(activity, DROPZONES_SLOT));
    }

    /// The number of validation attempts made on an activity.
    ///
    /// Non-numeric stored values count as zero.
    pub fn attempts(&self, activity: &ActivityId) -> u32 {
        self.backend
            .get(&Self::attempts_key(activity))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Increment the attempt counter by one, returning the new count.
    ///
    /// Saturates at `u32::MAX`; a stored value that large can only come
    /// from outside the engine.
    pub fn increment_attempts(&mut self, activity: &ActivityId) -> u32 {
        let next = self.attempts(activity).saturating_add(1);
        self.backend
            .set(&Self::attempts_key(activity), &next.to_string());
        next
    }

    /// Record full completion of an activity.
    pub fn mark_success(&mut self, activity: &ActivityId) {
        self.backend
            .set(&Self::scalar_key(activity, SUCCESS_SLOT), "true");
    }

    /// Check whether the activity was ever fully completed.
    pub fn has_success(&self, activity: &ActivityId) -> bool {
        self.backend
            .get(&Self::scalar_key(activity, SUCCESS_SLOT))
            .as_deref()
            == Some("true")
    }

    /// Remove every key prefixed by `"<activityId>_"`.
    ///
    /// The attempt counter key uses a dash and deliberately survives.
    pub fn clear_activity(&mut self, activity: &ActivityId) {
        let prefix = format!("{}_", activity.as_str());
        for key in self.backend.keys() {
            if key.starts_with(&prefix) {
                self.backend.remove(&key);
            }
        }
    }

    /// Keys stored for an activity, with the `"<activityId>_"` prefix
    /// stripped. Used by the per-kind has-user-data probes.
    pub fn activity_slots(&self, activity: &ActivityId) -> Vec<String> {
        let prefix = format!("{}_", activity.as_str());
        self.backend
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Check whether any user-data key is stored for an activity.
    ///
    /// The success flag is bookkeeping, not user data.
    pub fn has_user_entries(&self, activity: &ActivityId) -> bool {
        self.activity_slots(activity)
            .iter()
            .any(|slot| slot != SUCCESS_SLOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_rules::{ItemId, ZoneId};

    fn activity() -> ActivityId {
        ActivityId::new("unit3-page7")
    }

    #[test]
    fn test_text_round_trip() {
        let mut store = ActivityStore::in_memory();
        store.save_text(&activity(), "blank1", "cat");
        assert_eq!(store.load_text(&activity(), "blank1"), Some("cat".into()));

        store.remove_text(&activity(), "blank1");
        assert_eq!(store.load_text(&activity(), "blank1"), None);
    }

    #[test]
    fn test_choice_key_shape() {
        let mut store = ActivityStore::in_memory();
        store.save_choice(&activity(), "area1", "b");
        assert_eq!(store.load_choice(&activity(), "area1"), Some("b".into()));
        assert!(store
            .activity_slots(&activity())
            .contains(&"area1_multipleChoice".to_string()));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut store = ActivityStore::in_memory();
        let mut snapshot = Snapshot::new();
        snapshot.insert(ZoneId::new("z1"), vec![ItemId::new("w1")]);

        store.save_snapshot(&activity(), &snapshot);
        assert!(store.has_snapshot(&activity()));
        assert_eq!(store.load_snapshot(&activity()), snapshot);

        store.remove_snapshot(&activity());
        assert!(!store.has_snapshot(&activity()));
    }

    #[test]
    fn test_corrupt_snapshot_reads_as_empty() {
        let mut backend = MemoryStore::new();
        backend.set("unit3-page7_dropzones", "{not json");
        let store = ActivityStore::new(Box::new(backend));

        assert!(store.load_snapshot(&activity()).is_empty());
        // The blob is still there; only its content is unreadable.
        assert!(store.has_snapshot(&activity()));
    }

    #[test]
    fn test_attempts_increment_and_tolerance() {
        let mut store = ActivityStore::in_memory();
        assert_eq!(store.attempts(&activity()), 0);
        assert_eq!(store.increment_attempts(&activity()), 1);
        assert_eq!(store.increment_attempts(&activity()), 2);
        assert_eq!(store.attempts(&activity()), 2);

        let mut backend = MemoryStore::new();
        backend.set("unit3-page7-intentos", "many");
        let mut store = ActivityStore::new(Box::new(backend));
        assert_eq!(store.attempts(&activity()), 0);
        assert_eq!(store.increment_attempts(&activity()), 1);
    }

    #[test]
    fn test_attempts_saturate_at_max() {
        let mut backend = MemoryStore::new();
        backend.set("unit3-page7-intentos", &u32::MAX.to_string());
        let mut store = ActivityStore::new(Box::new(backend));

        assert_eq!(store.increment_attempts(&activity()), u32::MAX);
        assert_eq!(store.attempts(&activity()), u32::MAX);
    }

    #[test]
    fn test_clear_removes_only_prefixed_keys() {
        let mut store = ActivityStore::in_memory();
        store.save_text(&activity(), "blank1", "cat");
        store.save_choice(&activity(), "area1", "b");
        store.mark_success(&activity());
        store.increment_attempts(&activity());

        let other = ActivityId::new("unit4-page1");
        store.save_text(&other, "blank1", "dog");

        store.clear_activity(&activity());

        assert_eq!(store.load_text(&activity(), "blank1"), None);
        assert_eq!(store.load_choice(&activity(), "area1"), None);
        assert!(!store.has_success(&activity()));
        // The attempt counter and other activities survive.
        assert_eq!(store.attempts(&activity()), 1);
        assert_eq!(store.load_text(&other, "blank1"), Some("dog".into()));
    }

    #[test]
    fn test_has_user_entries_ignores_success_flag() {
        let mut store = ActivityStore::in_memory();
        store.mark_success(&activity());
        assert!(!store.has_user_entries(&activity()));

        store.save_text(&activity(), "blank1", "cat");
        assert!(store.has_user_entries(&activity()));
    }
}
