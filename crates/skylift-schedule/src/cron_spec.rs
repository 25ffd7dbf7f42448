//! Cron specification building and display strings.

#[cfg(test)]
#[path = "cron_spec_tests.rs"]
mod tests;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::request::{Frequency, ScheduleRequest};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const DAY_ABBREVS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A five-field cron schedule: minute, hour, day-of-month, month,
/// day-of-week, with `*` for "every value".
///
/// Minute is always `0` and hour is the requested time of day; the three
/// remaining fields depend on the frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronSpec {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
}

impl CronSpec {
    /// Build the spec for a frequency and time of day.
    ///
    /// The validator guarantees the day argument matching the frequency is
    /// present; an absent day falls back to a wildcard.
    pub fn build(
        frequency: Frequency,
        time_of_day: u32,
        day_of_week: Option<u32>,
        day_of_month: Option<u32>,
    ) -> Self {
        let (dom, dow) = match frequency {
            Frequency::Daily => ("*".to_string(), "*".to_string()),
            Frequency::Weekly => (
                "*".to_string(),
                day_of_week.map_or_else(|| "*".to_string(), |d| d.to_string()),
            ),
            Frequency::Monthly => (
                day_of_month.map_or_else(|| "*".to_string(), |d| d.to_string()),
                "*".to_string(),
            ),
        };

        Self {
            minute: "0".to_string(),
            hour: time_of_day.to_string(),
            day_of_month: dom,
            month: "*".to_string(),
            day_of_week: dow,
        }
    }

    /// Build the spec for a validated request.
    pub fn for_request(request: &ScheduleRequest) -> Self {
        Self::build(
            request.frequency,
            request.time_of_day,
            request.day_of_week,
            request.day_of_month,
        )
    }

    /// The five space-joined fields, e.g. `0 17 * * 3`.
    pub fn fields_string(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }

    /// The full crontab line: five fields followed by the runner path.
    pub fn cron_line(&self, runner_path: &str) -> String {
        format!("{} {}", self.fields_string(), runner_path)
    }

    /// Next time this spec fires, UTC.
    ///
    /// The cron parser numbers weekdays 1-7 rather than 0-6, so the
    /// day-of-week field is translated to a day name before parsing.
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        let dow = match self.day_of_week.parse::<usize>() {
            Ok(n) => (*DAY_ABBREVS.get(n)?).to_string(),
            Err(_) => self.day_of_week.clone(),
        };
        let expr = format!(
            "0 {} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, dow
        );
        let schedule = cron::Schedule::from_str(&expr).ok()?;
        schedule.upcoming(Utc).next()
    }
}

/// Human-readable time of day, e.g. `17:00 UTC`.
pub fn hour_to_time(hour: u32) -> String {
    format!("{hour}:00 UTC")
}

/// Phrase for a weekly day, e.g. `" every Wednesday"`; empty when absent.
/// Day 0 is Sunday.
pub fn display_day_of_week(day_of_week: Option<u32>) -> String {
    let Some(dow) = day_of_week else {
        return String::new();
    };
    match DAY_NAMES.get(dow as usize) {
        Some(name) => format!(" every {name}"),
        None => String::new(),
    }
}

/// Phrase for a monthly day, e.g. `" on the 2nd day of each month"`; empty
/// when absent.
///
/// The ordinal suffix goes by last digit only, so 11/12/13 come out as
/// 11st/12nd/13rd. The legacy console behaved this way and downstream
/// copy matches it.
pub fn display_day_of_month(day_of_month: Option<u32>) -> String {
    let Some(dom) = day_of_month else {
        return String::new();
    };
    let suffix = match dom % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!(" on the {dom}{suffix} day of each month")
}
