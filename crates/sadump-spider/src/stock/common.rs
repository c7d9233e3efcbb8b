use crate::error::{DecodeError, Result};
use crate::nodes::{Record, SENTINEL};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize a decoded record into a typed section.
///
/// `null` and restricted values are removed first, so typed sections fall back to their
/// `#[serde(default)]` for anything the provider left blank.
pub(crate) fn from_record<T: DeserializeOwned>(mut record: Record) -> Result<T> {
    record.retain(|_, value| !value.is_null() && value.as_str() != Some(SENTINEL));
    serde_json::from_value(Value::Object(record))
        .map_err(|err| DecodeError::MalformedTable(err.to_string()))
}

pub(crate) fn from_records<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>> {
    records.into_iter().map(from_record).collect()
}

/// `"2024-10-27"` → `NaiveDate`; anything else (e.g. `"TTM"`) is `None`.
pub(crate) fn parse_date(date: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
