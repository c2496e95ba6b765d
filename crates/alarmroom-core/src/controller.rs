//! The single owner of engine state.
//!
//! Hosts call the command methods (`submit`, `delete`,
//! `acknowledge_alarm`, `voice_submit`) and drive `tick` on a fixed
//! interval. Every state change is also recorded as an [`Event`] that can
//! be drained with [`ReminderController::take_events`].

use chrono::{DateTime, Utc};

use crate::alarm::{AlarmFeedback, AlarmSession, SessionSettings, SessionState};
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::Event;
use crate::firing::evaluate;
use crate::presenter::{Presenter, TaskRow};
use crate::storage::{Config, StorageSlot};
use crate::task::{plan, SubmitRequest, Task, TaskId, TaskStore};
use crate::voice::{HeuristicParser, UtteranceParser, VoiceCommand};

/// Result of a voice command.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOutcome {
    pub command: VoiceCommand,
    /// Tasks created when the utterance asked for immediate registration.
    pub created: Vec<Task>,
}

pub struct ReminderController {
    store: TaskStore,
    session: AlarmSession,
    empty_label: String,
    clock: Box<dyn Clock>,
    slot: Box<dyn StorageSlot>,
    feedback: Box<dyn AlarmFeedback>,
    presenter: Box<dyn Presenter>,
    parser: Box<dyn UtteranceParser>,
    events: Vec<Event>,
}

impl ReminderController {
    /// Restore tasks from `slot` and ask for notification permission.
    pub fn new(
        config: &Config,
        clock: Box<dyn Clock>,
        slot: Box<dyn StorageSlot>,
        mut feedback: Box<dyn AlarmFeedback>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let store = TaskStore::restore(slot.as_ref());
        tracing::debug!(tasks = store.len(), "restored task store");

        let mut session = AlarmSession::new(SessionSettings::from_config(config));
        match feedback.request_permission() {
            Ok(permission) => session.set_permission(permission),
            Err(e) => tracing::warn!(error = %e, "notification permission request failed"),
        }

        Self {
            store,
            session,
            empty_label: config.display.empty_label.clone(),
            clock,
            slot,
            feedback,
            presenter,
            parser: Box::new(HeuristicParser),
            events: Vec::new(),
        }
    }

    /// Swap the utterance heuristics.
    pub fn with_parser(mut self, parser: Box<dyn UtteranceParser>) -> Self {
        self.parser = parser;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Tasks in target order.
    pub fn tasks(&self) -> Vec<&Task> {
        self.store.list()
    }

    pub fn session(&self) -> &AlarmSession {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Display rows in target order, in the clock's local offset.
    pub fn rows(&self) -> Vec<TaskRow> {
        let local = self.clock.now_local();
        let now = local.with_timezone(&Utc);
        self.store
            .list()
            .into_iter()
            .map(|task| {
                TaskRow::new(
                    task,
                    now,
                    local.offset(),
                    &self.empty_label,
                    self.store.fired().contains(&task.id()),
                )
            })
            .collect()
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create the tasks described by `request` and persist them.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] and leaves all state untouched when
    /// the scheduling input is missing or malformed.
    pub fn submit(&mut self, request: &SubmitRequest) -> Result<Vec<Task>, ValidationError> {
        let local = self.clock.now_local();
        let tasks = plan(request, &local)?;
        let now = local.with_timezone(&Utc);

        for task in &tasks {
            if self.store.add(task.clone()) {
                tracing::info!(id = %task.id(), kind = %task.kind(), target = %task.target_time(), "task added");
                self.events.push(Event::TaskAdded {
                    task_id: task.id(),
                    kind: task.kind(),
                    target_time: task.target_time(),
                    at: now,
                });
            }
        }
        self.persist();
        Ok(tasks)
    }

    /// Remove a task. Stops the alarm if this task is driving it.
    pub fn delete(&mut self, id: &TaskId) -> Option<Task> {
        let now = self.clock.now();
        let removed = self.store.remove(id)?;
        tracing::info!(%id, "task removed");
        self.events.push(Event::TaskRemoved {
            task_id: *id,
            at: now,
        });

        let stopped = self.session.task_removed(id, now, self.feedback.as_mut());
        self.events.extend(stopped);
        self.persist();
        Some(removed)
    }

    /// Stop the firing alarm. Returns `false` if nothing was firing.
    pub fn acknowledge_alarm(&mut self) -> bool {
        let now = self.clock.now();
        let events = self.session.acknowledge(now, self.feedback.as_mut());
        let stopped = !events.is_empty();
        self.events.extend(events);
        stopped
    }

    /// Parse an utterance and, if it carried a trigger phrase, submit it.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when auto-submission was requested but
    /// the extracted fields do not describe a schedule.
    pub fn voice_submit(&mut self, text: &str) -> Result<VoiceOutcome, ValidationError> {
        let command = self.parser.parse(text);
        let created = if command.auto_submit {
            self.submit(&command.request)?
        } else {
            Vec::new()
        };
        Ok(VoiceOutcome { command, created })
    }

    /// One scheduler step: expire the running alarm, fire newly due tasks,
    /// then render. Returns the tasks that fired.
    pub fn tick(&mut self) -> Vec<Task> {
        let now = self.clock.now();

        let expired = self.session.check_timeout(now, self.feedback.as_mut());
        self.events.extend(expired);

        let (tasks, fired) = self.store.list_with_fired();
        let due = evaluate(now, tasks, fired);
        for task in &due {
            self.events.push(Event::TaskFired {
                task_id: task.id(),
                target_time: task.target_time(),
                at: now,
            });
            let event = self.session.activate(task, now, self.feedback.as_mut());
            self.events.push(event);
        }

        self.presenter.render(&self.store.list(), now);
        due
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist(&mut self) {
        if let Err(e) = self.store.persist(self.slot.as_mut()) {
            tracing::warn!(error = %e, "failed to persist tasks");
        }
    }
}
