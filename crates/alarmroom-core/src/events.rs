use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskKind};

/// Why an alarm session returned to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Acknowledged,
    Timeout,
    TaskDeleted,
}

/// Every state change in the engine produces an Event.
/// Hosts print or forward them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: TaskId,
        kind: TaskKind,
        target_time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        task_id: TaskId,
        at: DateTime<Utc>,
    },
    /// The firing engine reported the task as newly due.
    TaskFired {
        task_id: TaskId,
        target_time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Session went from idle to firing.
    AlarmStarted {
        task_id: TaskId,
        label: String,
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A new due task took over an already firing session.
    AlarmReplaced {
        previous: TaskId,
        task_id: TaskId,
        label: String,
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A due task is waiting behind the current alarm (queue mode).
    AlarmQueued {
        task_id: TaskId,
        position: usize,
        at: DateTime<Utc>,
    },
    AlarmStopped {
        task_id: TaskId,
        reason: StopReason,
        at: DateTime<Utc>,
    },
}
