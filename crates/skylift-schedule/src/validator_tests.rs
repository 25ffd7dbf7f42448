
use std::collections::HashMap;

use super::*;
use crate::request::{Frequency, fields};

fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn valid_daily_form() -> HashMap<String, String> {
    form(&[
        (fields::JOB_NAME, "churn-report"),
        (fields::COMMAND_LINE, "python churn.py"),
        (fields::OUTPUT_DIR, "output"),
        (fields::FREQUENCY, "daily"),
        (fields::TIME_OF_DAY, "17"),
        (fields::TIMEOUT, "120"),
    ])
}

#[test]
fn test_valid_daily_request() {
    let request =
        ScheduleValidator::validate(&valid_daily_form(), Some("code.tar.gz")).unwrap();

    assert_eq!(request.job_name, "churn-report");
    assert_eq!(request.frequency, Frequency::Daily);
    assert_eq!(request.time_of_day, 17);
    assert_eq!(request.day_of_week, None);
    assert_eq!(request.day_of_month, None);
    assert_eq!(request.timeout_minutes, 120);
    assert_eq!(request.code_archive, "code.tar.gz");
}

#[test]
fn test_valid_weekly_request() {
    let mut f = valid_daily_form();
    f.insert(fields::FREQUENCY.to_string(), "weekly".to_string());
    f.insert(fields::DAY_OF_WEEK.to_string(), "3".to_string());

    let request = ScheduleValidator::validate(&f, Some("code.tgz")).unwrap();
    assert_eq!(request.frequency, Frequency::Weekly);
    assert_eq!(request.day_of_week, Some(3));
    assert_eq!(request.day_of_month, None);
}

#[test]
fn test_valid_monthly_request() {
    let mut f = valid_daily_form();
    f.insert(fields::FREQUENCY.to_string(), "monthly".to_string());
    f.insert(fields::DAY_OF_MONTH.to_string(), "2".to_string());

    let request = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap();
    assert_eq!(request.frequency, Frequency::Monthly);
    assert_eq!(request.day_of_month, Some(2));
    assert_eq!(request.day_of_week, None);
}

#[test]
fn test_time_of_day_out_of_range() {
    let mut f = valid_daily_form();
    f.insert(fields::TIME_OF_DAY.to_string(), "24".to_string());

    let errors = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap_err();
    assert_eq!(
        errors.get(fields::TIME_OF_DAY),
        Some("Time of Day should be an int between 0 and 23")
    );
}

#[test]
fn test_time_of_day_not_numeric() {
    let mut f = valid_daily_form();
    f.insert(fields::TIME_OF_DAY.to_string(), "noon".to_string());

    let errors = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap_err();
    assert_eq!(
        errors.get(fields::TIME_OF_DAY),
        Some("Time of Day should be an int between 0 and 23")
    );
}

#[test]
fn test_missing_field_gets_required_message() {
    let mut f = valid_daily_form();
    f.remove(fields::TIME_OF_DAY);

    let errors = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap_err();
    assert_eq!(errors.get(fields::TIME_OF_DAY), Some("Time of Day is required"));
}

#[test]
fn test_weekly_without_day_of_week_flags_only_that_field() {
    let mut f = valid_daily_form();
    f.insert(fields::FREQUENCY.to_string(), "weekly".to_string());

    let errors = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(fields::DAY_OF_WEEK), Some("Day of Week is required"));
}

#[test]
fn test_bogus_frequency_is_rejected() {
    let mut f = valid_daily_form();
    f.insert(fields::FREQUENCY.to_string(), "hourly".to_string());

    let errors = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap_err();
    assert_eq!(
        errors.get(fields::FREQUENCY),
        Some("Pick one of the values in the list")
    );
}

#[test]
fn test_negative_timeout_rejected() {
    let mut f = valid_daily_form();
    f.insert(fields::TIMEOUT.to_string(), "-5".to_string());

    let errors = ScheduleValidator::validate(&f, Some("code.tar.gz")).unwrap_err();
    assert_eq!(
        errors.get(fields::TIMEOUT),
        Some("Job Timeout should be an int between 0 and 1440")
    );
}

#[test]
fn test_archive_name_suffixes() {
    assert!(validate_archive_name(Some("data.tar.gz")).is_none());
    assert!(validate_archive_name(Some("data.tgz")).is_none());

    let error = validate_archive_name(Some("data.zip")).unwrap();
    assert_eq!(error.message, "Code file must be in .tar.gz or .tgz format");

    let error = validate_archive_name(None).unwrap();
    assert_eq!(error.message, "File is required (.tar.gz or .tgz)");

    let error = validate_archive_name(Some("")).unwrap();
    assert_eq!(error.message, "File is required (.tar.gz or .tgz)");
}

#[test]
fn test_empty_form_aggregates_all_errors() {
    let errors = ScheduleValidator::validate(&HashMap::new(), None).unwrap_err();

    // Every required field is reported in one pass, not fail-fast.
    for field in [
        fields::JOB_NAME,
        fields::COMMAND_LINE,
        fields::OUTPUT_DIR,
        fields::FREQUENCY,
        fields::TIME_OF_DAY,
        fields::TIMEOUT,
        fields::CODE_ARCHIVE,
    ] {
        assert!(errors.get(field).is_some(), "missing error for {field}");
    }

    // Specific messages replace the generic one.
    assert_eq!(errors.get(fields::TIME_OF_DAY), Some("Time of Day is required"));
    assert_eq!(errors.get(fields::TIMEOUT), Some("Job Timeout is required"));
    assert_eq!(
        errors.get(fields::FREQUENCY),
        Some("Pick one of the values in the list")
    );
    assert_eq!(errors.get(fields::JOB_NAME), Some("This field is required"));
}

#[test]
fn test_required_int_blank_vs_bad_value() {
    let f = form(&[("n", "  ")]);
    let error = required_int(&f, "n", "N", 0, 10).unwrap_err();
    assert_eq!(error.message, "N is required");

    let f = form(&[("n", "11")]);
    let error = required_int(&f, "n", "N", 0, 10).unwrap_err();
    assert_eq!(error.message, "N should be an int between 0 and 10");

    let f = form(&[("n", "7")]);
    assert_eq!(required_int(&f, "n", "N", 0, 10).unwrap(), 7);
}

#[test]
fn test_errors_serialize_as_field_map() {
    let mut f = valid_daily_form();
    f.insert(fields::TIME_OF_DAY.to_string(), "99".to_string());

    let errors = ScheduleValidator::validate(&f, Some("data.zip")).unwrap_err();
    let value = serde_json::to_value(&errors).unwrap();

    assert_eq!(
        value[fields::TIME_OF_DAY],
        "Time of Day should be an int between 0 and 23"
    );
    assert_eq!(
        value[fields::CODE_ARCHIVE],
        "Code file must be in .tar.gz or .tgz format"
    );
}
