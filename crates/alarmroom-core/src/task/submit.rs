//! Turning form input into tasks.
//!
//! Manual entry and the voice path both produce a [`SubmitRequest`]; this
//! module validates it and computes the fixed target instants.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::Task;

/// Raw scheduling input, as typed into the form.
///
/// Exactly one of `minutes` and `clock_time` must be non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Relative countdown in whole minutes.
    #[serde(default)]
    pub minutes: Option<String>,
    /// Absolute time of day, `HH:MM`.
    #[serde(default)]
    pub clock_time: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// Lead time for an extra alarm before the main one.
    #[serde(default)]
    pub pre_alarm_minutes: Option<String>,
}

impl SubmitRequest {
    pub fn timer(minutes: u32, label: impl Into<String>) -> Self {
        Self {
            minutes: Some(minutes.to_string()),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn alarm(clock_time: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            clock_time: Some(clock_time.into()),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_pre_alarm(mut self, minutes: u32) -> Self {
        self.pre_alarm_minutes = Some(minutes.to_string());
        self
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_minutes(raw: &str) -> Result<u32, ValidationError> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidMinutes(raw.to_string())),
    }
}

fn parse_clock_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ValidationError::InvalidClockTime(raw.to_string()))
}

fn parse_pre_alarm(raw: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(_) => Err(ValidationError::InvalidPreAlarm(raw.to_string())),
        },
    }
}

/// The next instant strictly after `now` whose local time of day is `at`.
///
/// Seconds are zero. If `at` has already passed today (or is exactly now)
/// the result rolls to the same time tomorrow.
pub fn next_occurrence(now: &DateTime<FixedOffset>, at: NaiveTime) -> DateTime<Utc> {
    let offset = Duration::seconds(i64::from(now.offset().local_minus_utc()));
    let local = now.date_naive().and_time(at);
    let mut target = Utc.from_utc_datetime(&(local - offset));
    if target <= now.with_timezone(&Utc) {
        target += Duration::days(1);
    }
    target
}

fn pre_alarm_label(label: Option<&str>, lead: u32) -> String {
    match label {
        Some(label) => format!("{label} (pre-alarm, {lead} min before)"),
        None => format!("Pre-alarm ({lead} min before)"),
    }
}

/// Validate `request` and build the tasks it describes, main task first.
///
/// A timer yields one task. An alarm yields the main task plus a pre-alarm
/// when a lead time is given and the pre-alarm would still be in the
/// future. Pre-alarm lead times on timers are ignored.
///
/// # Errors
/// Returns a [`ValidationError`] when the scheduling input is missing,
/// ambiguous or unparsable.
pub fn plan(
    request: &SubmitRequest,
    now: &DateTime<FixedOffset>,
) -> Result<Vec<Task>, ValidationError> {
    let label = non_blank(&request.label).map(str::to_string);
    let pre_alarm = parse_pre_alarm(non_blank(&request.pre_alarm_minutes))?;
    let now_utc = now.with_timezone(&Utc);

    match (non_blank(&request.minutes), non_blank(&request.clock_time)) {
        (Some(minutes), None) => {
            let minutes = parse_minutes(minutes)?;
            if pre_alarm.is_some() {
                tracing::debug!("pre-alarm lead time ignored for timer");
            }
            Ok(vec![Task::timer(now_utc, minutes, label)])
        }
        (None, Some(clock_time)) => {
            let at = parse_clock_time(clock_time)?;
            let target = next_occurrence(now, at);
            let mut tasks = vec![Task::alarm(target, label)];

            if let Some(lead) = pre_alarm {
                let pre_target = target - Duration::minutes(i64::from(lead));
                if pre_target > now_utc {
                    let pre_label = pre_alarm_label(tasks[0].label(), lead);
                    tasks.push(Task::alarm(pre_target, Some(pre_label)));
                } else {
                    tracing::debug!(lead, "pre-alarm would already be due; skipped");
                }
            }
            Ok(tasks)
        }
        _ => Err(ValidationError::MissingSchedule),
    }
}
