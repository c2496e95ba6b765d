//! Rendering hook for the host's task list view.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::task::{Task, TaskId, TaskKind};

/// Called by the controller on every tick with the tasks in target order.
pub trait Presenter {
    fn render(&mut self, tasks: &[&Task], now: DateTime<Utc>);
}

/// Presenter for hosts without a live view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _tasks: &[&Task], _now: DateTime<Utc>) {}
}

/// `HH:MM:SS` until `target`, `00:00:00` once it has passed.
pub fn format_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (target - now).num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// One display line of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Local `HH:MM` of the target.
    pub time: String,
    pub remaining: String,
    pub label: String,
    pub fired: bool,
}

impl TaskRow {
    pub fn new(
        task: &Task,
        now: DateTime<Utc>,
        offset: &FixedOffset,
        empty_label: &str,
        fired: bool,
    ) -> Self {
        let label = match task.label() {
            Some(l) if !l.trim().is_empty() => l.to_string(),
            _ => empty_label.to_string(),
        };
        Self {
            id: task.id(),
            kind: task.kind(),
            time: task
                .target_time()
                .with_timezone(offset)
                .format("%H:%M")
                .to_string(),
            remaining: format_remaining(task.target_time(), now),
            label,
            fired,
        }
    }
}
