//! Canonical task list and its persistence round-trip.

use std::collections::HashSet;

use crate::error::Result;
use crate::firing::FiredSet;
use crate::storage::StorageSlot;

use super::{Task, TaskId};

/// Storage key holding the serialized task array.
pub const STORAGE_KEY: &str = "alarmroom.tasks";

/// Owns the scheduled tasks and the set of ids already fired.
///
/// The fired-set is kept here so that removing a task can never leave a
/// stale id behind. It is never persisted.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    fired: FiredSet,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from tasks, keeping the first occurrence of each id.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            store.add(task);
        }
        store
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// All tasks in ascending target order. Ties keep insertion order.
    pub fn list(&self) -> Vec<&Task> {
        let mut ordered: Vec<&Task> = self.tasks.iter().collect();
        ordered.sort_by_key(|t| t.target_time());
        ordered
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == *id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn fired(&self) -> &FiredSet {
        &self.fired
    }

    /// Split borrow used by the firing engine: the ordered list together
    /// with mutable access to the fired-set.
    pub fn list_with_fired(&mut self) -> (Vec<&Task>, &mut FiredSet) {
        let mut ordered: Vec<&Task> = self.tasks.iter().collect();
        ordered.sort_by_key(|t| t.target_time());
        (ordered, &mut self.fired)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a task. Returns `false` and leaves the store untouched if a
    /// task with the same id already exists.
    pub fn add(&mut self, task: Task) -> bool {
        if self.contains(&task.id()) {
            tracing::debug!(id = %task.id(), "ignoring task with duplicate id");
            return false;
        }
        self.tasks.push(task);
        true
    }

    /// Remove a task and forget that it fired. No-op for unknown ids.
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        self.fired.remove(id);
        let index = self.tasks.iter().position(|t| t.id() == *id)?;
        Some(self.tasks.remove(index))
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Write the full task list to `slot`.
    ///
    /// # Errors
    /// Returns an error if serialization fails or the slot rejects the
    /// write.
    pub fn persist(&self, slot: &mut dyn StorageSlot) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        slot.write(STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Load the task list from `slot`.
    ///
    /// Absent, unreadable or malformed data yields an empty store. The
    /// fired-set always starts empty.
    pub fn restore(slot: &dyn StorageSlot) -> Self {
        let raw = match slot.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored tasks; starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                let total = tasks.len();
                let store = Self::from_tasks(tasks);
                if store.len() != total {
                    tracing::warn!(
                        dropped = total - store.len(),
                        "stored tasks contained duplicate ids"
                    );
                }
                store
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored tasks are malformed; starting empty");
                Self::new()
            }
        }
    }

    /// Ids currently stored, for set comparisons.
    pub fn ids(&self) -> HashSet<TaskId> {
        self.tasks.iter().map(|t| t.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firing::evaluate;
    use crate::storage::MemorySlot;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn list_orders_by_target() {
        let mut store = TaskStore::new();
        store.add(Task::alarm(at(9, 0), Some("c".into())));
        store.add(Task::alarm(at(7, 0), Some("a".into())));
        store.add(Task::alarm(at(8, 0), Some("b".into())));

        let labels: Vec<_> = store.list().iter().map(|t| t.display_label()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut store = TaskStore::new();
        store.add(Task::alarm(at(8, 0), Some("first".into())));
        store.add(Task::alarm(at(8, 0), Some("second".into())));

        let labels: Vec<_> = store.list().iter().map(|t| t.display_label()).collect();
        assert_eq!(labels, vec!["first", "second"]);
    }

    #[test]
    fn duplicate_id_is_ignored() {
        let task = Task::alarm(at(8, 0), Some("original".into()));
        let clash = Task::new(task.id(), task.kind(), at(10, 0), Some("clash".into()), None);

        let mut store = TaskStore::new();
        assert!(store.add(task.clone()));
        assert!(!store.add(clash));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&task.id()), Some(&task));
    }

    #[test]
    fn remove_evicts_fired_id() {
        let task = Task::alarm(at(8, 0), None);
        let id = task.id();
        let mut store = TaskStore::from_tasks([task]);

        let (tasks, fired) = store.list_with_fired();
        assert_eq!(evaluate(at(8, 0), tasks, fired).len(), 1);
        assert!(store.fired().contains(&id));

        assert!(store.remove(&id).is_some());
        assert!(!store.fired().contains(&id));
        assert!(store.is_empty());
        assert!(store.remove(&id).is_none());
    }

    #[test]
    fn restore_of_absent_slot_is_empty() {
        let slot = MemorySlot::new();
        assert!(TaskStore::restore(&slot).is_empty());
    }

    #[test]
    fn restore_of_malformed_slot_is_empty() {
        let mut slot = MemorySlot::new();
        slot.write(STORAGE_KEY, "{not json").unwrap();
        assert!(TaskStore::restore(&slot).is_empty());

        slot.write(STORAGE_KEY, r#"[{"id": "nope"}]"#).unwrap();
        assert!(TaskStore::restore(&slot).is_empty());
    }

    #[test]
    fn restore_keeps_first_of_duplicate_ids() {
        let raw = r#"[
            {"id": "3f2c8a5e-7d1b-4c9a-9f0e-2b6d4a8c1e37", "kind": "alarm",
             "targetTime": "2026-03-14T08:00:00Z", "label": "first"},
            {"id": "9a41c7d2-5e8b-4f03-b6a1-0c2e7d9f3b58", "kind": "timer",
             "targetTime": "2026-03-14T09:00:00Z", "originMinutes": 5},
            {"id": "3f2c8a5e-7d1b-4c9a-9f0e-2b6d4a8c1e37", "kind": "alarm",
             "targetTime": "2026-03-14T07:00:00Z", "label": "second"}
        ]"#;
        let mut slot = MemorySlot::new();
        slot.write(STORAGE_KEY, raw).unwrap();

        let store = TaskStore::restore(&slot);
        assert_eq!(store.len(), 2);
        let labels: Vec<_> = store.list().iter().map(|t| t.display_label()).collect();
        assert_eq!(labels, vec!["first", "(empty)"]);
        let kept = store.list()[0];
        assert_eq!(kept.target_time(), at(8, 0));
    }

    #[test]
    fn persist_restore_roundtrip() {
        let mut store = TaskStore::new();
        store.add(Task::timer(at(9, 0), 5, Some("coffee".into())));
        store.add(Task::alarm(at(8, 0), None));

        let mut slot = MemorySlot::new();
        store.persist(&mut slot).unwrap();
        let restored = TaskStore::restore(&slot);

        assert_eq!(restored.ids(), store.ids());
        for task in store.list() {
            assert_eq!(restored.get(&task.id()), Some(task));
        }
        assert!(restored.fired().is_empty());
    }
}
