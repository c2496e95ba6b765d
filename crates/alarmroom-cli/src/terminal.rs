//! Terminal rendition of the alarm surfaces.
//!
//! Notifications are printed to stderr so stdout stays machine-readable.
//! The overlay is printed once to stderr and then redrawn below the task
//! list on every render until the alarm stops. The "sound" is the terminal
//! bell, repeated on every render while a looping alarm is active.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use alarmroom_core::alarm::{AlarmFeedback, FeedbackError, NotificationPermission};
use alarmroom_core::{Presenter, Task, TaskRow};
use chrono::{DateTime, FixedOffset, Local, Utc};

const BELL: &str = "\x07";
const CLEAR: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Sound {
    #[default]
    Silent,
    Once,
    Looping,
}

#[derive(Debug, Default)]
struct SurfaceState {
    sound: Sound,
    overlay: Option<String>,
}

/// Alarm state shared between feedback and presenter.
#[derive(Debug, Clone, Default)]
pub struct AlarmSurface(Rc<RefCell<SurfaceState>>);

impl AlarmSurface {
    fn ring_on_render(&self) -> bool {
        self.0.borrow().sound == Sound::Looping
    }

    fn overlay(&self) -> Option<String> {
        self.0.borrow().overlay.clone()
    }
}

fn banner(label: &str) -> String {
    format!("\n==== ALARM: {label} ====\n(type 's' + Enter to stop)\n")
}

pub struct TerminalFeedback {
    surface: AlarmSurface,
}

impl TerminalFeedback {
    pub fn new(surface: AlarmSurface) -> Self {
        Self { surface }
    }
}

fn emit(text: &str) -> Result<(), std::io::Error> {
    let mut err = std::io::stderr().lock();
    err.write_all(text.as_bytes())?;
    err.flush()
}

impl AlarmFeedback for TerminalFeedback {
    fn request_permission(&mut self) -> Result<NotificationPermission, FeedbackError> {
        Ok(NotificationPermission::Granted)
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), FeedbackError> {
        emit(&format!("[{title}] {body}\n"))
            .map_err(|e| FeedbackError::Notification(e.to_string()))
    }

    fn play_sound(&mut self, looping: bool) -> Result<(), FeedbackError> {
        self.surface.0.borrow_mut().sound = if looping { Sound::Looping } else { Sound::Once };
        emit(BELL).map_err(|e| FeedbackError::Audio(e.to_string()))
    }

    fn stop_sound(&mut self) -> Result<(), FeedbackError> {
        self.surface.0.borrow_mut().sound = Sound::Silent;
        Ok(())
    }

    fn show_overlay(&mut self, label: &str) -> Result<(), FeedbackError> {
        self.surface.0.borrow_mut().overlay = Some(label.to_string());
        emit(&banner(label)).map_err(|e| FeedbackError::Overlay(e.to_string()))
    }

    fn hide_overlay(&mut self) -> Result<(), FeedbackError> {
        self.surface.0.borrow_mut().overlay = None;
        emit("==== alarm stopped ====\n").map_err(|e| FeedbackError::Overlay(e.to_string()))
    }
}

/// Redraws the task list on every tick.
pub struct TerminalPresenter {
    surface: AlarmSurface,
    empty_label: String,
}

impl TerminalPresenter {
    pub fn new(surface: AlarmSurface, empty_label: String) -> Self {
        Self {
            surface,
            empty_label,
        }
    }

    /// One full screen: header, rows, and the alarm banner while firing.
    fn frame(&self, tasks: &[&Task], now: DateTime<Utc>, offset: &FixedOffset) -> String {
        let mut out = String::from(CLEAR);
        out.push_str(&format!(
            "{}  (s = stop alarm, q = quit)\n\n",
            now.with_timezone(offset).format("%H:%M:%S")
        ));
        if tasks.is_empty() {
            out.push_str("No reminders.\n");
        }
        for task in tasks {
            let row = TaskRow::new(task, now, offset, &self.empty_label, false);
            out.push_str(&format_row(&row));
            out.push('\n');
        }
        if let Some(label) = self.surface.overlay() {
            out.push_str(&banner(&label));
        }
        if self.surface.ring_on_render() {
            out.push_str(BELL);
        }
        out
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, tasks: &[&Task], now: DateTime<Utc>) {
        let offset = *Local::now().offset();
        let mut stdout = std::io::stdout().lock();
        let written = stdout
            .write_all(self.frame(tasks, now, &offset).as_bytes())
            .and_then(|()| stdout.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to redraw task list");
        }
    }
}

/// One human-readable list line.
pub fn format_row(row: &TaskRow) -> String {
    format!(
        "{}  {}  remaining {}  {}  [{}]",
        &row.id.to_string()[..8],
        row.time,
        row.remaining,
        row.label,
        row.kind
    )
}
