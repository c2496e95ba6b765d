//! Alarm session state machine.
//!
//! ```text
//! Idle -> Firing -> Idle
//! ```
//!
//! There is one session for the whole engine. Entering `Firing` sends a
//! notification, starts the sound and shows the overlay; leaving it undoes
//! the sound and overlay. The automatic timeout is a deadline checked on
//! every tick, so arming a new one simply overwrites the old one.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::feedback::{best_effort, AlarmFeedback, NotificationPermission};
use crate::events::{Event, StopReason};
use crate::storage::Config;
use crate::task::{Task, TaskId};

/// What to do when a task becomes due while another alarm is firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimultaneousMode {
    /// The newest due task takes over the session.
    #[default]
    Replace,
    /// Due tasks wait their turn and fire one after another.
    Queue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Firing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub timeout: Duration,
    pub mode: SimultaneousMode,
    pub sound_loop: bool,
    pub notifications_enabled: bool,
    pub notification_title: String,
    /// Overlay and notification text for tasks without a label.
    pub empty_label: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::seconds(60),
            mode: SimultaneousMode::Replace,
            sound_loop: true,
            notifications_enabled: true,
            notification_title: "Reminder".to_string(),
            empty_label: crate::task::EMPTY_LABEL.to_string(),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::seconds(i64::from(config.alarm.timeout_secs)),
            mode: config.alarm.simultaneous,
            sound_loop: config.alarm.sound_loop,
            notifications_enabled: config.notifications.enabled,
            notification_title: config.notifications.title.clone(),
            empty_label: config.display.empty_label.clone(),
        }
    }
}

/// The alarm currently surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveAlarm {
    pub task_id: TaskId,
    pub label: String,
    pub started_at: DateTime<Utc>,
    /// When the automatic stop kicks in.
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    task_id: TaskId,
    label: String,
}

#[derive(Debug, Clone)]
pub struct AlarmSession {
    settings: SessionSettings,
    permission: NotificationPermission,
    current: Option<ActiveAlarm>,
    queue: VecDeque<Pending>,
}

impl AlarmSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            permission: NotificationPermission::Default,
            current: None,
            queue: VecDeque::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::Firing
        } else {
            SessionState::Idle
        }
    }

    pub fn current(&self) -> Option<&ActiveAlarm> {
        self.current.as_ref()
    }

    /// Ids waiting behind the current alarm, oldest first.
    pub fn queued(&self) -> Vec<TaskId> {
        self.queue.iter().map(|p| p.task_id).collect()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    pub fn set_permission(&mut self, permission: NotificationPermission) {
        self.permission = permission;
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Surface a newly due task.
    pub fn activate(
        &mut self,
        task: &Task,
        now: DateTime<Utc>,
        feedback: &mut dyn AlarmFeedback,
    ) -> Event {
        let pending = Pending {
            task_id: task.id(),
            label: task
                .label()
                .unwrap_or(&self.settings.empty_label)
                .to_string(),
        };

        match (self.current.as_ref().map(|c| c.task_id), self.settings.mode) {
            (None, _) => self.enter(pending, now, feedback),
            (Some(previous), SimultaneousMode::Replace) => {
                let started = self.enter(pending, now, feedback);
                match started {
                    Event::AlarmStarted {
                        task_id,
                        label,
                        deadline,
                        at,
                    } => Event::AlarmReplaced {
                        previous,
                        task_id,
                        label,
                        deadline,
                        at,
                    },
                    other => other,
                }
            }
            (Some(_), SimultaneousMode::Queue) => {
                let task_id = pending.task_id;
                self.queue.push_back(pending);
                tracing::info!(%task_id, position = self.queue.len(), "alarm queued");
                Event::AlarmQueued {
                    task_id,
                    position: self.queue.len(),
                    at: now,
                }
            }
        }
    }

    /// User pressed stop. No-op while idle.
    pub fn acknowledge(
        &mut self,
        now: DateTime<Utc>,
        feedback: &mut dyn AlarmFeedback,
    ) -> Vec<Event> {
        self.stop_and_advance(StopReason::Acknowledged, now, feedback)
    }

    /// Stop the alarm if its deadline has passed.
    pub fn check_timeout(
        &mut self,
        now: DateTime<Utc>,
        feedback: &mut dyn AlarmFeedback,
    ) -> Vec<Event> {
        match &self.current {
            Some(active) if now >= active.deadline => {
                self.stop_and_advance(StopReason::Timeout, now, feedback)
            }
            _ => Vec::new(),
        }
    }

    /// A task was deleted from the store. Drops it from the queue and, if it
    /// is the one firing, stops the alarm.
    pub fn task_removed(
        &mut self,
        id: &TaskId,
        now: DateTime<Utc>,
        feedback: &mut dyn AlarmFeedback,
    ) -> Vec<Event> {
        self.queue.retain(|p| p.task_id != *id);
        match &self.current {
            Some(active) if active.task_id == *id => {
                self.stop_and_advance(StopReason::TaskDeleted, now, feedback)
            }
            _ => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(
        &mut self,
        pending: Pending,
        now: DateTime<Utc>,
        feedback: &mut dyn AlarmFeedback,
    ) -> Event {
        if self.settings.notifications_enabled
            && self.permission == NotificationPermission::Granted
        {
            best_effort(
                "notify",
                feedback.notify(&self.settings.notification_title, &pending.label),
            );
        }
        best_effort("play_sound", feedback.play_sound(self.settings.sound_loop));
        best_effort("show_overlay", feedback.show_overlay(&pending.label));

        let deadline = now + self.settings.timeout;
        tracing::info!(task_id = %pending.task_id, %deadline, "alarm firing");
        self.current = Some(ActiveAlarm {
            task_id: pending.task_id,
            label: pending.label.clone(),
            started_at: now,
            deadline,
        });
        Event::AlarmStarted {
            task_id: pending.task_id,
            label: pending.label,
            deadline,
            at: now,
        }
    }

    fn stop_and_advance(
        &mut self,
        reason: StopReason,
        now: DateTime<Utc>,
        feedback: &mut dyn AlarmFeedback,
    ) -> Vec<Event> {
        let Some(active) = self.current.take() else {
            return Vec::new();
        };
        best_effort("stop_sound", feedback.stop_sound());
        best_effort("hide_overlay", feedback.hide_overlay());
        tracing::info!(task_id = %active.task_id, ?reason, "alarm stopped");

        let mut events = vec![Event::AlarmStopped {
            task_id: active.task_id,
            reason,
            at: now,
        }];
        if let Some(next) = self.queue.pop_front() {
            events.push(self.enter(next, now, feedback));
        }
        events
    }
}
