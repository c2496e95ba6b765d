//! # Alarmroom Core Library
//!
//! This library provides the scheduling-and-firing engine behind Alarmroom,
//! a reminder tool for countdown timers and wall-clock alarms. It follows a
//! CLI-first philosophy: the engine knows nothing about any UI, and hosts
//! (the bundled CLI or anything else) plug in through traits.
//!
//! ## Architecture
//!
//! - **Task Store**: canonical task list plus the fired-set, persisted as a
//!   JSON array in a key-value slot
//! - **Firing Engine**: reports each task exactly once when it becomes due
//! - **Alarm Session**: `Idle -> Firing -> Idle` state machine driving
//!   sound, overlay and notification feedback
//! - **Scheduler**: a polling loop that calls `tick()` once per interval
//!
//! ## Key Components
//!
//! - [`ReminderController`]: owns all state and exposes the commands
//! - [`TaskStore`]: ordered task list and persistence round-trip
//! - [`AlarmSession`]: alarm lifecycle
//! - [`Config`]: application configuration

pub mod alarm;
pub mod clock;
pub mod controller;
pub mod error;
pub mod events;
pub mod firing;
pub mod presenter;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod voice;

pub use alarm::{AlarmFeedback, AlarmSession, NotificationPermission, SessionState, SimultaneousMode};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{ReminderController, VoiceOutcome};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Event, StopReason};
pub use firing::{evaluate, FiredSet};
pub use presenter::{format_remaining, Presenter, TaskRow};
pub use scheduler::{run_loop, Command};
pub use storage::{Config, Database, MemorySlot, StorageSlot};
pub use task::{SubmitRequest, Task, TaskId, TaskKind, TaskStore};
pub use voice::{HeuristicParser, UtteranceParser, VoiceCommand};
