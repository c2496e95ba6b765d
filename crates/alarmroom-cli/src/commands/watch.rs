//! Live scheduler commands.

use alarmroom_core::presenter::NullPresenter;
use alarmroom_core::{run_loop, Command, Config};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{open_controller, CliResult};
use crate::terminal::{AlarmSurface, TerminalFeedback, TerminalPresenter};

/// Run the scheduler loop in the foreground until `q` or Ctrl-C.
///
/// Lines typed on stdin are commands: `s` stops the alarm, `q` quits and
/// anything else is treated as a voice transcript.
pub fn run_watch() -> CliResult {
    let config = Config::load_or_default();
    let surface = AlarmSurface::default();
    let mut controller = open_controller(
        &config,
        Box::new(TerminalFeedback::new(surface.clone())),
        Box::new(TerminalPresenter::new(surface, config.display.empty_label.clone())),
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(read_commands(tx));
        run_loop(&mut controller, config.tick_interval(), rx, |_, events| {
            for event in events {
                tracing::debug!(?event, "scheduler event");
            }
        })
        .await;
    });
    // The stdin reader may be parked in a blocking read; don't wait for it.
    runtime.shutdown_background();
    Ok(())
}

/// Run a single scheduler step and print what fired.
///
/// Alarms raised here are stopped again before exiting, since nothing
/// would be around to acknowledge them.
pub fn run_tick(json: bool) -> CliResult {
    let config = Config::load_or_default();
    let surface = AlarmSurface::default();
    let mut controller = open_controller(
        &config,
        Box::new(TerminalFeedback::new(surface)),
        Box::new(NullPresenter),
    )?;

    let fired = controller.tick();
    controller.acknowledge_alarm();

    if json {
        println!("{}", serde_json::to_string_pretty(&fired)?);
    } else if fired.is_empty() {
        println!("Nothing due.");
    } else {
        for task in &fired {
            println!("Fired: {} {}", task.id(), task.display_label());
        }
    }
    Ok(())
}

async fn read_commands(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin closed");
                break;
            }
        };
        let command = match line.trim() {
            "s" | "stop" => Command::Acknowledge,
            "q" | "quit" => Command::Shutdown,
            "" => continue,
            other => Command::Voice(other.to_string()),
        };
        if tx.send(command).await.is_err() {
            return;
        }
    }
    // Keep the loop alive without input, e.g. when stdin is /dev/null.
    std::future::pending::<()>().await;
}
