//! Schedule form validation.

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::request::{Frequency, ScheduleRequest, fields};

/// A validation failure attached to one named form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Field-keyed validation failures.
///
/// Empty means the form is valid. Kept in first-seen field order so the
/// redisplayed form lists problems in the order the fields appear.
/// Serializes as a JSON object of field name to message.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Record an error for a field. A later, more specific message replaces
    /// an earlier generic one for the same field.
    pub fn insert(&mut self, error: FieldError) {
        if let Some(existing) = self.errors.iter_mut().find(|e| e.field == error.field) {
            existing.message = error.message;
        } else {
            self.errors.push(error);
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for error in &self.errors {
            map.serialize_entry(&error.field, &error.message)?;
        }
        map.end()
    }
}

/// Schedule form validator.
///
/// Every check runs regardless of earlier failures and the failures are
/// aggregated; a [`ScheduleRequest`] is only produced when no field has an
/// error.
pub struct ScheduleValidator;

impl ScheduleValidator {
    /// Validate a raw field-to-string form mapping plus the uploaded code
    /// archive file name.
    pub fn validate(
        form: &HashMap<String, String>,
        archive_name: Option<&str>,
    ) -> Result<ScheduleRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for field in [
            fields::JOB_NAME,
            fields::COMMAND_LINE,
            fields::OUTPUT_DIR,
            fields::FREQUENCY,
            fields::TIME_OF_DAY,
            fields::TIMEOUT,
        ] {
            if is_blank(form, field) {
                errors.insert(FieldError::new(field, "This field is required"));
            }
        }

        let time_of_day =
            record(required_int(form, fields::TIME_OF_DAY, "Time of Day", 0, 23), &mut errors);

        let raw_frequency = form
            .get(fields::FREQUENCY)
            .map(|v| v.trim())
            .unwrap_or_default();
        let frequency = Frequency::parse(raw_frequency);

        let mut day_of_week = None;
        let mut day_of_month = None;
        match frequency {
            Some(Frequency::Weekly) => {
                day_of_week =
                    record(required_int(form, fields::DAY_OF_WEEK, "Day of Week", 0, 6), &mut errors);
            }
            Some(Frequency::Monthly) => {
                day_of_month = record(
                    required_int(form, fields::DAY_OF_MONTH, "Day of Month", 1, 31),
                    &mut errors,
                );
            }
            Some(Frequency::Daily) => {}
            None => {
                errors.insert(FieldError::new(
                    fields::FREQUENCY,
                    "Pick one of the values in the list",
                ));
            }
        }

        let timeout_minutes =
            record(required_int(form, fields::TIMEOUT, "Job Timeout", 0, 1440), &mut errors);

        if let Some(error) = validate_archive_name(archive_name) {
            errors.insert(error);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let (Some(frequency), Some(time_of_day), Some(timeout_minutes)) =
            (frequency, time_of_day, timeout_minutes)
        else {
            // A missing value always records an error above.
            unreachable!("validated form missing a required value");
        };

        Ok(ScheduleRequest {
            job_name: form_value(form, fields::JOB_NAME),
            command_line: form_value(form, fields::COMMAND_LINE),
            output_dir: form_value(form, fields::OUTPUT_DIR),
            frequency,
            time_of_day,
            day_of_week,
            day_of_month,
            timeout_minutes,
            code_archive: archive_name.unwrap_or_default().to_string(),
        })
    }
}

/// Fetch and range-check a required integer field.
///
/// Missing or blank yields a "required" message; anything non-numeric or
/// outside `[min, max]` yields the "should be an int between" message. The
/// two messages are deliberately distinct so the user can tell an omission
/// from a bad value.
pub fn required_int(
    form: &HashMap<String, String>,
    field: &str,
    label: &str,
    min: i64,
    max: i64,
) -> Result<u32, FieldError> {
    let raw = form.get(field).map(|v| v.trim()).unwrap_or_default();
    if raw.is_empty() {
        return Err(FieldError::new(field, format!("{label} is required")));
    }

    match raw.parse::<i64>() {
        Ok(value) if value >= min && value <= max => Ok(value as u32),
        _ => Err(FieldError::new(
            field,
            format!("{label} should be an int between {min} and {max}"),
        )),
    }
}

/// Check the uploaded code archive file name.
pub fn validate_archive_name(name: Option<&str>) -> Option<FieldError> {
    match name {
        None => Some(FieldError::new(
            fields::CODE_ARCHIVE,
            "File is required (.tar.gz or .tgz)",
        )),
        Some(name) if name.trim().is_empty() => Some(FieldError::new(
            fields::CODE_ARCHIVE,
            "File is required (.tar.gz or .tgz)",
        )),
        Some(name) if name.ends_with(".tar.gz") || name.ends_with(".tgz") => None,
        Some(_) => Some(FieldError::new(
            fields::CODE_ARCHIVE,
            "Code file must be in .tar.gz or .tgz format",
        )),
    }
}

fn is_blank(form: &HashMap<String, String>, field: &str) -> bool {
    form.get(field).map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn form_value(form: &HashMap<String, String>, field: &str) -> String {
    form.get(field).cloned().unwrap_or_default()
}

fn record(result: Result<u32, FieldError>, errors: &mut ValidationErrors) -> Option<u32> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.insert(error);
            None
        }
    }
}
