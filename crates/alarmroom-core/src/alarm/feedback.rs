//! Outbound side effects of a firing alarm.
//!
//! Hosts implement [`AlarmFeedback`] for their notification, audio and
//! overlay surfaces. All calls are best-effort: the session logs failures
//! and carries on.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not asked yet, or the user dismissed the prompt.
    #[default]
    Default,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("audio playback failed: {0}")]
    Audio(String),

    #[error("notification dispatch failed: {0}")]
    Notification(String),

    #[error("overlay update failed: {0}")]
    Overlay(String),
}

pub trait AlarmFeedback {
    /// Ask for OS notification permission. Called once at startup.
    fn request_permission(&mut self) -> Result<NotificationPermission, FeedbackError>;

    fn notify(&mut self, title: &str, body: &str) -> Result<(), FeedbackError>;

    /// Start the alarm sound from the beginning.
    fn play_sound(&mut self, looping: bool) -> Result<(), FeedbackError>;

    /// Pause, rewind and disable looping.
    fn stop_sound(&mut self) -> Result<(), FeedbackError>;

    fn show_overlay(&mut self, label: &str) -> Result<(), FeedbackError>;

    fn hide_overlay(&mut self) -> Result<(), FeedbackError>;
}

/// Log a failed side effect and drop it.
pub(crate) fn best_effort<T>(action: &str, result: Result<T, FeedbackError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(action, error = %e, "alarm feedback failed");
            None
        }
    }
}

/// Feedback that does nothing. Permission is reported as denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl AlarmFeedback for SilentFeedback {
    fn request_permission(&mut self) -> Result<NotificationPermission, FeedbackError> {
        Ok(NotificationPermission::Denied)
    }

    fn notify(&mut self, _title: &str, _body: &str) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn play_sound(&mut self, _looping: bool) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn stop_sound(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn show_overlay(&mut self, _label: &str) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// One observed feedback call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackCall {
    RequestPermission,
    Notify { title: String, body: String },
    PlaySound { looping: bool },
    StopSound,
    ShowOverlay { label: String },
    HideOverlay,
}

/// Feedback that records every call, for tests and dry runs.
///
/// Clones share the same log. Individual surfaces can be made to fail to
/// exercise the best-effort paths.
#[derive(Debug, Clone)]
pub struct RecordingFeedback {
    calls: Rc<RefCell<Vec<FeedbackCall>>>,
    permission: NotificationPermission,
    fail_audio: bool,
    fail_notify: bool,
}

impl Default for RecordingFeedback {
    fn default() -> Self {
        Self::new(NotificationPermission::Granted)
    }
}

impl RecordingFeedback {
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            permission,
            fail_audio: false,
            fail_notify: false,
        }
    }

    pub fn failing_audio(mut self) -> Self {
        self.fail_audio = true;
        self
    }

    pub fn failing_notifications(mut self) -> Self {
        self.fail_notify = true;
        self
    }

    pub fn calls(&self) -> Vec<FeedbackCall> {
        self.calls.borrow().clone()
    }

    /// Number of notifications actually dispatched.
    pub fn notifications(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, FeedbackCall::Notify { .. }))
            .count()
    }

    /// Label of the most recent overlay still showing, if any.
    pub fn visible_overlay(&self) -> Option<String> {
        let mut visible = None;
        for call in self.calls.borrow().iter() {
            match call {
                FeedbackCall::ShowOverlay { label } => visible = Some(label.clone()),
                FeedbackCall::HideOverlay => visible = None,
                _ => {}
            }
        }
        visible
    }

    /// Whether the last sound call left audio playing.
    pub fn sound_playing(&self) -> bool {
        let mut playing = false;
        for call in self.calls.borrow().iter() {
            match call {
                FeedbackCall::PlaySound { .. } => playing = !self.fail_audio,
                FeedbackCall::StopSound => playing = false,
                _ => {}
            }
        }
        playing
    }

    fn record(&self, call: FeedbackCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl AlarmFeedback for RecordingFeedback {
    fn request_permission(&mut self) -> Result<NotificationPermission, FeedbackError> {
        self.record(FeedbackCall::RequestPermission);
        Ok(self.permission)
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), FeedbackError> {
        if self.fail_notify {
            return Err(FeedbackError::Notification("injected failure".into()));
        }
        self.record(FeedbackCall::Notify {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn play_sound(&mut self, looping: bool) -> Result<(), FeedbackError> {
        self.record(FeedbackCall::PlaySound { looping });
        if self.fail_audio {
            return Err(FeedbackError::Audio("playback blocked".into()));
        }
        Ok(())
    }

    fn stop_sound(&mut self) -> Result<(), FeedbackError> {
        self.record(FeedbackCall::StopSound);
        Ok(())
    }

    fn show_overlay(&mut self, label: &str) -> Result<(), FeedbackError> {
        self.record(FeedbackCall::ShowOverlay {
            label: label.to_string(),
        });
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<(), FeedbackError> {
        self.record(FeedbackCall::HideOverlay);
        Ok(())
    }
}
