//! Scheduler loop.
//!
//! Drives [`ReminderController::tick`] on a fixed interval and applies
//! host commands between ticks. Everything runs on the caller's task, so
//! ticks never overlap with each other or with a command.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::controller::ReminderController;
use crate::events::Event;
use crate::task::{SubmitRequest, TaskId};

/// Commands a host can send to a running loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(SubmitRequest),
    Voice(String),
    Delete(TaskId),
    Acknowledge,
    Shutdown,
}

/// Run until `Shutdown` arrives or every sender is dropped.
///
/// `on_events` receives the events produced by each tick or command.
pub async fn run_loop<F>(
    controller: &mut ReminderController,
    period: Duration,
    mut commands: mpsc::Receiver<Command>,
    mut on_events: F,
) where
    F: FnMut(&ReminderController, Vec<Event>),
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = ticker.tick() => {
                controller.tick();
            }
            command = commands.recv() => {
                match command {
                    None | Some(Command::Shutdown) => {
                        tracing::debug!("scheduler loop shutting down");
                        break;
                    }
                    Some(command) => apply(controller, command),
                }
            }
        }

        let events = controller.take_events();
        if !events.is_empty() {
            on_events(controller, events);
        }
    }
}

fn apply(controller: &mut ReminderController, command: Command) {
    match command {
        Command::Submit(request) => {
            if let Err(e) = controller.submit(&request) {
                tracing::warn!(error = %e, "submit rejected");
            }
        }
        Command::Voice(text) => {
            if let Err(e) = controller.voice_submit(&text) {
                tracing::warn!(error = %e, "voice submit rejected");
            }
        }
        Command::Delete(id) => {
            controller.delete(&id);
        }
        Command::Acknowledge => {
            controller.acknowledge_alarm();
        }
        Command::Shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::{RecordingFeedback, SessionState};
    use crate::clock::ManualClock;
    use crate::presenter::NullPresenter;
    use crate::storage::{Config, MemorySlot};
    use chrono::{FixedOffset, TimeZone};

    fn controller(clock: &ManualClock) -> ReminderController {
        ReminderController::new(
            &Config::default(),
            Box::new(clock.clone()),
            Box::new(MemorySlot::new()),
            Box::new(RecordingFeedback::default()),
            Box::new(NullPresenter),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_fires_due_task_then_commands_apply() {
        let clock = ManualClock::new(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 3, 14, 7, 0, 0)
                .unwrap(),
        );
        let mut ctl = controller(&clock);
        ctl.submit(&SubmitRequest::timer(1, "tea")).unwrap();
        ctl.take_events();
        clock.advance(chrono::Duration::minutes(1));

        let (tx, rx) = mpsc::channel(4);
        tx.send(Command::Acknowledge).await.unwrap();
        tx.send(Command::Shutdown).await.unwrap();

        let mut seen = Vec::new();
        run_loop(&mut ctl, Duration::from_secs(1), rx, |_, events| {
            seen.extend(events)
        })
        .await;

        assert!(matches!(seen[0], Event::TaskFired { .. }));
        assert!(matches!(seen[1], Event::AlarmStarted { .. }));
        assert!(matches!(seen[2], Event::AlarmStopped { .. }));
        assert_eq!(ctl.session_state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_ends_loop() {
        let clock = ManualClock::new(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 3, 14, 7, 0, 0)
                .unwrap(),
        );
        let mut ctl = controller(&clock);
        let (tx, rx) = mpsc::channel::<Command>(1);
        drop(tx);
        run_loop(&mut ctl, Duration::from_secs(1), rx, |_, _| {}).await;
        assert!(ctl.tasks().is_empty());
    }
}
