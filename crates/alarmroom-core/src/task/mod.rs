//! Scheduled task model.
//!
//! A task is either a relative countdown (`Timer`) or a wall-clock
//! `Alarm`. Its target instant is computed once when the task is built and
//! never changes afterwards, which is why the fields are only reachable
//! through accessors.

mod store;
mod submit;

pub use store::{TaskStore, STORAGE_KEY};
pub use submit::{next_occurrence, plan, SubmitRequest};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier.
pub type TaskId = Uuid;

/// Label shown for tasks created without a note.
pub const EMPTY_LABEL: &str = "(empty)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Relative countdown from creation.
    Timer,
    /// Absolute wall-clock target.
    Alarm,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Timer => "timer",
            TaskKind::Alarm => "alarm",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled reminder.
///
/// Persisted as `{ id, kind, targetTime, label, originMinutes }`. The
/// legacy field names `type` and `task` are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    #[serde(alias = "type")]
    kind: TaskKind,
    target_time: DateTime<Utc>,
    #[serde(default, alias = "task")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin_minutes: Option<u32>,
}

impl Task {
    /// Build a task from already-computed parts.
    ///
    /// Blank labels are stored as `None`.
    pub fn new(
        id: TaskId,
        kind: TaskKind,
        target_time: DateTime<Utc>,
        label: Option<String>,
        origin_minutes: Option<u32>,
    ) -> Self {
        let label = label.filter(|l| !l.trim().is_empty());
        Self {
            id,
            kind,
            target_time,
            label,
            origin_minutes,
        }
    }

    /// Countdown task due `minutes` after `now`.
    pub fn timer(now: DateTime<Utc>, minutes: u32, label: Option<String>) -> Self {
        Self::new(
            Uuid::new_v4(),
            TaskKind::Timer,
            now + Duration::minutes(i64::from(minutes)),
            label,
            Some(minutes),
        )
    }

    /// Wall-clock task due at `target`.
    pub fn alarm(target: DateTime<Utc>, label: Option<String>) -> Self {
        Self::new(Uuid::new_v4(), TaskKind::Alarm, target, label, None)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn target_time(&self) -> DateTime<Utc> {
        self.target_time
    }

    /// The stored note, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The note, or `(empty)` when none was given.
    pub fn display_label(&self) -> &str {
        self.label()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(EMPTY_LABEL)
    }

    pub fn origin_minutes(&self) -> Option<u32> {
        self.origin_minutes
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.target_time
    }

    /// Time left until the target, clamped at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.target_time - now).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn timer_keeps_origin_minutes() {
        let task = Task::timer(at(9, 0), 5, Some("coffee".into()));
        assert_eq!(task.kind(), TaskKind::Timer);
        assert_eq!(task.target_time(), at(9, 5));
        assert_eq!(task.origin_minutes(), Some(5));
        assert_eq!(task.label(), Some("coffee"));
    }

    #[test]
    fn blank_label_displays_sentinel() {
        let task = Task::alarm(at(8, 0), Some("   ".into()));
        assert_eq!(task.label(), None);
        assert_eq!(task.display_label(), EMPTY_LABEL);
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let task = Task::alarm(at(8, 0), None);
        assert_eq!(task.remaining(at(7, 30)), Duration::minutes(30));
        assert_eq!(task.remaining(at(8, 30)), Duration::zero());
        assert!(task.is_due(at(8, 0)));
        assert!(!task.is_due(at(7, 59)));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let task = Task::timer(at(9, 0), 5, Some("tea".into()));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["kind"], "timer");
        assert_eq!(json["originMinutes"], 5);
        assert!(json["targetTime"].is_string());
        assert_eq!(json["label"], "tea");
    }

    #[test]
    fn accepts_legacy_field_names() {
        let raw = r#"{
            "id": "3f2c8a5e-7d1b-4c9a-9f0e-2b6d4a8c1e37",
            "type": "alarm",
            "targetTime": "2026-03-14T08:00:00.000Z",
            "task": "stretch"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.kind(), TaskKind::Alarm);
        assert_eq!(task.label(), Some("stretch"));
        assert_eq!(task.target_time(), at(8, 0));
        assert_eq!(task.origin_minutes(), None);
    }
}
