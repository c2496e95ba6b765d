//! Voice input.
//!
//! A transcribed utterance is turned into the same [`SubmitRequest`] the
//! manual form produces. The heuristics recognise:
//!
//! - relative time: `5分後`, `in 5 minutes`
//! - clock time: `7時`, `7時30分`, `7時半`, `午後3時`, `07:30`, `at 7:30`
//! - pre-alarm lead: `10分前`, `10 minutes before`
//! - trigger phrase: `セット`, `登録`, `set`, `register`
//!
//! Whatever is left over becomes the label.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::task::SubmitRequest;

static PRE_ALARM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:分前|min(?:ute)?s?\s+before)").unwrap()
});

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(\d+)\s*分後|in\s+(\d+)\s*min(?:ute)?s?)").unwrap()
});

static KANJI_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(午前|午後)?\s*(\d{1,2})\s*時\s*(?:(\d{1,2})\s*分|(半))?").unwrap()
});

static COLON_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\bat\s+)?\b(\d{1,2}):(\d{2})\b").unwrap());

static TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:セット|登録|\bset\b|\bregister\b)(?:して|する|お願い(?:します)?)?").unwrap()
});

const LEADING_PARTICLES: [&str; 2] = ["に", "で"];
const TRAILING_PARTICLES: [&str; 1] = ["を"];

/// Form fields extracted from an utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCommand {
    pub request: SubmitRequest,
    /// The utterance asked for the reminder to be registered right away.
    pub auto_submit: bool,
}

/// Turns free text into form input.
pub trait UtteranceParser {
    fn parse(&self, text: &str) -> VoiceCommand;
}

/// Regex-based parser for Japanese and English phrasing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicParser;

impl UtteranceParser for HeuristicParser {
    fn parse(&self, text: &str) -> VoiceCommand {
        let mut rest = normalize(text);
        let mut request = SubmitRequest::default();

        if let Some(caps) = PRE_ALARM_RE.captures(&rest) {
            request.pre_alarm_minutes = caps.get(1).map(|m| m.as_str().to_string());
            let range = caps.get(0).map(|m| m.range());
            blank_out(&mut rest, range);
        }

        if let Some(caps) = RELATIVE_RE.captures(&rest) {
            request.minutes = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string());
            let range = caps.get(0).map(|m| m.range());
            blank_out(&mut rest, range);
        }

        if let Some(caps) = KANJI_TIME_RE.captures(&rest) {
            let hour = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            let minute = if caps.get(4).is_some() {
                Some(30)
            } else {
                caps.get(3)
                    .map_or(Some(0), |m| m.as_str().parse::<u32>().ok())
            };
            let meridiem = caps.get(1).map(|m| m.as_str());
            request.clock_time = hour
                .zip(minute)
                .and_then(|(h, m)| clock_string(apply_meridiem(h, meridiem), m));
            let range = caps.get(0).map(|m| m.range());
            blank_out(&mut rest, range);
        } else if let Some(caps) = COLON_TIME_RE.captures(&rest) {
            let hour = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            request.clock_time = hour.zip(minute).and_then(|(h, m)| clock_string(h, m));
            let range = caps.get(0).map(|m| m.range());
            blank_out(&mut rest, range);
        }

        let auto_submit = TRIGGER_RE.is_match(&rest);
        let rest = TRIGGER_RE.replace_all(&rest, " ");

        let label = clean_label(&rest);
        if !label.is_empty() {
            request.label = Some(label);
        }

        VoiceCommand {
            request,
            auto_submit,
        }
    }
}

/// Fold full-width digits and colons into ASCII.
fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '：' => ':',
            '　' => ' ',
            other => other,
        })
        .collect()
}

fn blank_out(text: &mut String, range: Option<std::ops::Range<usize>>) {
    if let Some(range) = range {
        text.replace_range(range, " ");
    }
}

fn apply_meridiem(hour: u32, meridiem: Option<&str>) -> u32 {
    match meridiem {
        Some("午後") if hour < 12 => hour + 12,
        Some("午前") if hour == 12 => 0,
        _ => hour,
    }
}

fn clock_string(hour: u32, minute: u32) -> Option<String> {
    (hour < 24 && minute < 60).then(|| format!("{hour:02}:{minute:02}"))
}

fn clean_label(raw: &str) -> String {
    let is_noise = |c: char| c.is_whitespace() || "、。,.!！?？".contains(c);
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut label = collapsed.trim_matches(is_noise);

    for particle in LEADING_PARTICLES {
        if let Some(stripped) = label.strip_prefix(particle) {
            label = stripped.trim_matches(is_noise);
            break;
        }
    }
    for particle in TRAILING_PARTICLES {
        if let Some(stripped) = label.strip_suffix(particle) {
            label = stripped.trim_matches(is_noise);
            break;
        }
    }
    label.to_string()
}
