//! # Skylift Flatten
//!
//! Reshapes one device-ping JSON record plus its submission dimensions into
//! a flattened CSV row. Stateless, one record in, one row out; nothing is
//! carried across records.

use serde_json::Value;

/// Milliseconds per hour.
const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Placeholder for anything absent, null, or empty.
const UNKNOWN: &str = "unknown";

/// Submission dimensions attached to every ping by the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct Dimensions {
    pub reason: String,
    pub app_name: String,
    pub update_channel: String,
    pub app_version: String,
    pub app_build_id: String,
    pub submission_date: String,
}

impl Dimensions {
    /// Parse the six comma-separated dimension values:
    /// `reason,appName,updateChannel,appVersion,appBuildId,submissionDate`.
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(',').collect();
        let [reason, app_name, update_channel, app_version, app_build_id, submission_date] =
            parts.as_slice()
        else {
            return None;
        };
        Some(Self {
            reason: reason.to_string(),
            app_name: app_name.to_string(),
            update_channel: update_channel.to_string(),
            app_version: app_version.to_string(),
            app_build_id: app_build_id.to_string(),
            submission_date: submission_date.to_string(),
        })
    }
}

/// Flatten one ping into its row of column values.
///
/// Pings sometimes wrap the payload in an `info` envelope; that is peeled
/// off first. Every missing, null, or empty value renders as `unknown`.
pub fn flatten(dimensions: &Dimensions, record: &Value) -> Vec<String> {
    let data = match record.get("info") {
        Some(info) => info,
        None => record,
    };

    let mut row = Vec::with_capacity(19);
    row.push(dimensions.submission_date.clone());
    row.push(str_val(Some(data), "deviceinfo.os"));
    row.push(str_val(Some(data), "deviceinfo.software"));
    row.push(time_to_ping(data));
    row.push(data_val(data, "screenWidth"));
    row.push(data_val(data, "screenHeight"));
    row.push(data_val(data, "devicePixelRatio"));
    row.push(str_val(Some(data), "locale"));
    row.push(str_val(Some(data), "deviceinfo.hardware"));
    row.push(str_val(Some(data), "deviceinfo.product_model"));
    row.push(str_val(Some(data), "deviceinfo.firmware_revision"));
    row.push(dimensions.update_channel.clone());

    let icc = data.get("icc");
    row.push(str_val(icc, "mnc"));
    row.push(str_val(icc, "mcc"));
    row.push(str_val(icc, "spn"));

    let network = data.get("network");
    row.push(str_val(network, "mnc"));
    row.push(str_val(network, "mcc"));
    row.push(str_val(network, "operator"));

    row.push(str_val(Some(data), "geoCountry"));
    row
}

/// Render a row as one CSV line.
pub fn to_csv_line(row: &[String]) -> String {
    row.iter()
        .map(|field| csv_escape(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Hours from device activation to first ping, rounded to the nearest whole
/// hour; `unknown` when either timestamp is missing.
fn time_to_ping(data: &Value) -> String {
    let (Some(ping), Some(activation)) = (
        epoch_ms(data.get("pingTime")),
        epoch_ms(data.get("activationTime")),
    ) else {
        return UNKNOWN.to_string();
    };

    let hours = (ping - activation) as f64 / MS_PER_HOUR;
    format!("{}", hours.round() as i64)
}

/// Timestamps arrive as numbers or numeric strings.
fn epoch_ms(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String-ish lookup: empty strings and nulls count as unknown.
fn str_val(container: Option<&Value>, key: &str) -> String {
    let Some(value) = container.and_then(|c| c.get(key)) else {
        return UNKNOWN.to_string();
    };
    match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Raw lookup: any present non-null scalar is kept, including zero.
fn data_val(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
