//! Schedule request data model.

use serde::{Deserialize, Serialize};

/// Form field names, matching the schedule form template.
pub mod fields {
    pub const JOB_NAME: &str = "job-name";
    pub const COMMAND_LINE: &str = "commandline";
    pub const OUTPUT_DIR: &str = "output-dir";
    pub const FREQUENCY: &str = "schedule-frequency";
    pub const TIME_OF_DAY: &str = "schedule-time-of-day";
    pub const DAY_OF_WEEK: &str = "schedule-day-of-week";
    pub const DAY_OF_MONTH: &str = "schedule-day-of-month";
    pub const TIMEOUT: &str = "timeout";
    pub const CODE_ARCHIVE: &str = "code-tarball";
}

/// Recurrence class of a scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Parse the form value. Anything unrecognized is `None`; the caller
    /// turns that into a validation error rather than a silent default.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A fully validated schedule submission.
///
/// Lives for one request/response cycle. Exactly one of
/// `day_of_week`/`day_of_month` is populated for weekly/monthly frequencies;
/// neither is populated for daily.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest {
    pub job_name: String,
    pub command_line: String,
    pub output_dir: String,
    pub frequency: Frequency,
    /// Hour of day, 0-23 (UTC).
    pub time_of_day: u32,
    /// 0 = Sunday through 6 = Saturday; weekly jobs only.
    pub day_of_week: Option<u32>,
    /// 1-31; monthly jobs only.
    pub day_of_month: Option<u32>,
    /// 0-1440.
    pub timeout_minutes: u32,
    /// Uploaded archive file name, `.tar.gz` or `.tgz`.
    pub code_archive: String,
}
