//! Voice transcript entry point.

use alarmroom_core::Config;

use super::{open_quiet, CliResult};

pub fn run(text: &str, json: bool) -> CliResult {
    let config = Config::load_or_default();
    let mut controller = open_quiet(&config)?;
    let outcome = controller.voice_submit(text)?;

    if json {
        let value = serde_json::json!({
            "request": outcome.command.request,
            "auto_submit": outcome.command.auto_submit,
            "created": outcome.created,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let request = &outcome.command.request;
    println!("minutes:    {}", request.minutes.as_deref().unwrap_or("-"));
    println!("clock time: {}", request.clock_time.as_deref().unwrap_or("-"));
    println!("label:      {}", request.label.as_deref().unwrap_or("-"));
    println!("pre-alarm:  {}", request.pre_alarm_minutes.as_deref().unwrap_or("-"));
    if outcome.created.is_empty() {
        println!("Not registered (say \"set\" or \"登録\" to register).");
    }
    for task in &outcome.created {
        println!("Task created: {}", task.id());
    }
    Ok(())
}
