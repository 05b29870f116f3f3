use crate::errors::CounterError;
use serde_json::Value;

/// Locations probed for the count, highest priority first. Different
/// versions of the counting service answer with different shapes.
const COUNT_PATHS: [&[&str]; 4] = [
    &["data", "up_count"],
    &["data", "count"],
    &["count"],
    &["up_count"],
];

/// Pulls the count out of a service response. The first field that is
/// present and non-null decides; when it is not a usable number, or when no
/// field is present, the count is 0.
pub fn extract_count(body: &Value) -> u64 {
    COUNT_PATHS
        .iter()
        .find_map(|path| lookup(body, path))
        .map(to_count)
        .unwrap_or(0)
}

/// Like `extract_count`, but only a JSON object counts as an answer. A
/// `null`, scalar or array body is malformed.
pub fn count_from_body(body: &Value) -> Result<u64, CounterError> {
    if !body.is_object() {
        return Err(CounterError::MalformedResponse(format!(
            "expected a json object, got {body}"
        )));
    }
    Ok(extract_count(body))
}

fn lookup<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = body;
    for key in path {
        current = current.get(key)?;
    }
    (!current.is_null()).then_some(current)
}

fn to_count(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Formats `value` with a separator between each group of three digits.
pub fn format_grouped(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
