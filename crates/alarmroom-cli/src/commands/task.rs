//! Task management commands for CLI.

use alarmroom_core::{Config, SubmitRequest};
use clap::Subcommand;

use super::{open_quiet, resolve_id, CliResult};
use crate::terminal::format_row;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Schedule a timer (--minutes) or an alarm (--at)
    Add {
        /// Minutes from now
        #[arg(long, short)]
        minutes: Option<String>,
        /// Clock time, HH:MM (rolls to tomorrow if already past)
        #[arg(long)]
        at: Option<String>,
        /// Free-text note
        #[arg(long, short)]
        label: Option<String>,
        /// Extra alarm this many minutes before the main one
        #[arg(long)]
        pre: Option<String>,
        /// Print created tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks in due order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete tasks by id or unique id prefix
    Delete {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let config = Config::load_or_default();
    let mut controller = open_quiet(&config)?;

    match action {
        TaskAction::Add {
            minutes,
            at,
            label,
            pre,
            json,
        } => {
            let request = SubmitRequest {
                minutes,
                clock_time: at,
                label,
                pre_alarm_minutes: pre,
            };
            let created = controller.submit(&request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&created)?);
            } else {
                for task in &created {
                    println!("Task created: {}", task.id());
                }
            }
        }
        TaskAction::List { json } => {
            let rows = controller.rows();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No reminders.");
            } else {
                for row in &rows {
                    println!("{}", format_row(row));
                }
            }
        }
        TaskAction::Delete { ids } => {
            for needle in ids {
                let id = resolve_id(&controller, &needle)?;
                controller.delete(&id);
                println!("Task deleted: {id}");
            }
        }
    }
    Ok(())
}
