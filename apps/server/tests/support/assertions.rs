use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// Assert the `{error, message}` error envelope with the given kind.
pub fn assert_error_kind(body: &Value, kind: &str) {
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some(kind),
        "expected error kind {kind}, got {body}"
    );
    assert!(
        body.get("message").and_then(|v| v.as_str()).is_some(),
        "error body carries a message: {body}"
    );
}

pub fn data_array(body: &Value) -> anyhow::Result<&Vec<Value>> {
    body.get("data")
        .and_then(|v| v.as_array())
        .context("body.data is an array")
}

/// `equip_numero` of every row in `body.data`, in order.
pub fn registry_numbers(body: &Value) -> anyhow::Result<Vec<String>> {
    Ok(data_array(body)?
        .iter()
        .filter_map(|row| row.get("equip_numero").and_then(|v| v.as_str()))
        .map(str::to_string)
        .collect())
}
