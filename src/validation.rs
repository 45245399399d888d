use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::{MAX_ACTION_LEN, NewAction};

/// Field name -> human-readable error messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

static CANONICAL_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

static INTEGER_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?[0-9]+)(?:\.0*)?$").unwrap());

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const INVALID_INTEGER: &str = "A valid integer is required.";

/// Parse a date in the canonical `YYYY-MM-DD` form only.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if !CANONICAL_DATE_RE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Check an untyped action payload and produce the typed record or every field error found.
pub fn validate_action(input: &Value) -> Result<NewAction, FieldErrors> {
    let Some(obj) = input.as_object() else {
        let mut errors = FieldErrors::new();
        errors.insert(
            "non_field_errors".to_string(),
            vec![format!(
                "Invalid data. Expected a dictionary, but got {}.",
                type_name(input)
            )],
        );
        return Err(errors);
    };

    let mut errors = FieldErrors::new();
    let action = record(&mut errors, "action", validate_label(obj));
    let date = record(&mut errors, "date", validate_date(obj));
    let points = record(&mut errors, "points", validate_points(obj));

    match (action, date, points) {
        (Some(action), Some(date), Some(points)) => Ok(NewAction {
            action,
            date,
            points,
        }),
        _ => Err(errors),
    }
}

fn record<T>(errors: &mut FieldErrors, field: &str, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(msg) => {
            errors.entry(field.to_string()).or_default().push(msg);
            None
        }
    }
}

fn validate_label(obj: &Map<String, Value>) -> Result<String, String> {
    let raw = match obj.get("action") {
        None => return Err(REQUIRED.to_string()),
        Some(Value::Null) => return Err(NOT_NULL.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err("Not a valid string.".to_string()),
    };

    let label = raw.trim();
    if label.is_empty() {
        return Err("This field may not be blank.".to_string());
    }
    if label.chars().count() > MAX_ACTION_LEN {
        return Err(format!(
            "Ensure this field has no more than {MAX_ACTION_LEN} characters."
        ));
    }
    Ok(label.to_string())
}

fn validate_date(obj: &Map<String, Value>) -> Result<NaiveDate, String> {
    match obj.get("date") {
        None => Err(REQUIRED.to_string()),
        Some(Value::Null) => Err(NOT_NULL.to_string()),
        Some(Value::String(s)) => parse_calendar_date(s).ok_or_else(|| INVALID_DATE.to_string()),
        Some(_) => Err(INVALID_DATE.to_string()),
    }
}

fn validate_points(obj: &Map<String, Value>) -> Result<i32, String> {
    let wide: i64 = match obj.get("points") {
        None => return Ok(0),
        Some(Value::Null) => return Err(NOT_NULL.to_string()),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => v,
            None => integral_float(n.as_f64()).ok_or_else(|| INVALID_INTEGER.to_string())?,
        },
        Some(Value::String(s)) => INTEGER_STRING_RE
            .captures(s.trim())
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse::<i64>().ok())
            .ok_or_else(|| INVALID_INTEGER.to_string())?,
        Some(_) => return Err(INVALID_INTEGER.to_string()),
    };

    if wide > i64::from(i32::MAX) {
        return Err(format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        ));
    }
    if wide < i64::from(i32::MIN) {
        return Err(format!(
            "Ensure this value is greater than or equal to {}.",
            i32::MIN
        ));
    }
    i32::try_from(wide).map_err(|_| INVALID_INTEGER.to_string())
}

// Accepts floats such as 5.0 that carry no fractional part.
fn integral_float(value: Option<f64>) -> Option<i64> {
    let v = value?;
    if !v.is_finite() || v.fract() != 0.0 || v.abs() > 9.0e15 {
        return None;
    }
    Some(v as i64)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
