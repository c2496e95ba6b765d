pub mod config;
pub mod task;
pub mod voice;
pub mod watch;

use alarmroom_core::alarm::SilentFeedback;
use alarmroom_core::presenter::NullPresenter;
use alarmroom_core::{AlarmFeedback, Config, Database, Presenter, ReminderController, SystemClock, TaskId};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Controller over the on-disk store with the given surfaces.
pub fn open_controller(
    config: &Config,
    feedback: Box<dyn AlarmFeedback>,
    presenter: Box<dyn Presenter>,
) -> Result<ReminderController, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(ReminderController::new(
        config,
        Box::new(SystemClock),
        Box::new(db),
        feedback,
        presenter,
    ))
}

/// Controller for one-shot commands that never surface an alarm.
pub fn open_quiet(config: &Config) -> Result<ReminderController, Box<dyn std::error::Error>> {
    open_controller(config, Box::new(SilentFeedback), Box::new(NullPresenter))
}

/// Resolve a full id or a unique prefix of one.
pub fn resolve_id(
    controller: &ReminderController,
    needle: &str,
) -> Result<TaskId, Box<dyn std::error::Error>> {
    let matches: Vec<TaskId> = controller
        .tasks()
        .iter()
        .map(|t| t.id())
        .filter(|id| id.to_string().starts_with(needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("no task matches '{needle}'").into()),
        _ => Err(format!("'{needle}' matches {} tasks; use more characters", matches.len()).into()),
    }
}
