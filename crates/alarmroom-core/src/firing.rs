//! Firing engine.
//!
//! Decides which tasks have newly crossed their target instant. The
//! fired-set lives in memory only, so after a restart every task whose
//! target is already in the past fires once more on the first tick.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::task::{Task, TaskId};

/// Ids of tasks already reported as due.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiredSet {
    ids: HashSet<TaskId>,
}

impl FiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.ids.contains(id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: TaskId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskId> {
        self.ids.iter()
    }
}

/// Return the tasks that became due at `now`, marking each one fired.
///
/// `tasks` is expected in ascending target order (as produced by
/// `TaskStore::list`); the result preserves that order. A task whose id is
/// already in `fired` is never returned again.
pub fn evaluate<'a, I>(now: DateTime<Utc>, tasks: I, fired: &mut FiredSet) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut due = Vec::new();
    for task in tasks {
        if task.is_due(now) && fired.insert(task.id()) {
            due.push(task.clone());
        }
    }
    if !due.is_empty() {
        tracing::debug!(count = due.len(), %now, "tasks became due");
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn fires_once_at_target() {
        let task_a = Task::alarm(at(8, 0), Some("a".into()));
        let mut fired = FiredSet::new();

        let due = evaluate(task_a.target_time(), [&task_a], &mut fired);
        assert_eq!(due, vec![task_a.clone()]);
        assert!(fired.contains(&task_a.id()));

        let again = evaluate(task_a.target_time(), [&task_a], &mut fired);
        assert!(again.is_empty());
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn does_not_fire_early() {
        let task = Task::alarm(at(8, 0), None);
        let mut fired = FiredSet::new();
        let due = evaluate(at(8, 0) - Duration::milliseconds(1), [&task], &mut fired);
        assert!(due.is_empty());
        assert!(fired.is_empty());
    }

    #[test]
    fn reports_simultaneous_tasks_in_target_order() {
        let early = Task::alarm(at(7, 50), Some("early".into()));
        let late = Task::alarm(at(8, 0), Some("late".into()));
        let future = Task::alarm(at(9, 0), Some("future".into()));
        let mut fired = FiredSet::new();

        let due = evaluate(at(8, 5), [&early, &late, &future], &mut fired);
        let labels: Vec<_> = due.iter().map(|t| t.display_label()).collect();
        assert_eq!(labels, vec!["early", "late"]);
        assert!(!fired.contains(&future.id()));
    }

    #[test]
    fn fires_past_due_task_with_fresh_set() {
        // Models a restart: the fired-set is not persisted.
        let task = Task::alarm(at(6, 0), None);
        let mut first_run = FiredSet::new();
        assert_eq!(evaluate(at(7, 0), [&task], &mut first_run).len(), 1);

        let mut after_restart = FiredSet::new();
        assert_eq!(evaluate(at(7, 0), [&task], &mut after_restart).len(), 1);
    }
}
