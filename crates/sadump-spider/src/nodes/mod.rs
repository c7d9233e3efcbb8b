//! Decoder for the `__data.json` payloads served alongside every page.
//!
//! A payload looks like
//!
//! ```text
//! { "nodes": [ {...}, {...}, { "data": [ {"financialData": 1, ...}, {"revenue": 2, ...}, [3, 4], 100.0, ... ] } ] }
//! ```
//!
//! where `data` is a deduplicated value array: every repeated value is stored once, and
//! all structure refers to it by slot index. Slot `0` is the root map, naming the
//! sections of the page.
//!
//! ## Example
//! ```rust
//! use sadump_spider::nodes::{zip_to_records, Payload, TableOptions};
//! use serde_json::json;
//!
//! let response = json!({"nodes": [null, null, {"data": [
//!     {"financialData": 1},
//!     {"revenue": 2, "ncf": 3},
//!     [4, 5], [6, 7],
//!     100.0, 200.0, 10.0, 20.0,
//! ]}]});
//!
//! let payload = Payload::from_value(response, 2).unwrap();
//! let table = payload.table();
//! let slot = table.follow_path(&["financialData"]).unwrap();
//! let fields = table.resolve_field_table(slot, &TableOptions::default()).unwrap();
//! let records = zip_to_records(&fields);
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1]["ncf"], json!(20.0));
//! ```
mod table;

pub use table::{
    zip_to_records, FieldTable, IndexedTable, Leaf, Record, SentinelPolicy, TableOptions,
    SENTINEL,
};

use crate::error::{DecodeError, Result};
use serde_json::Value;

/// The node holding the page data for nearly every page.
pub const DATA_NODE: usize = 2;

/// The value array taken from one HTTP response.
///
/// Built fresh per response and never mutated; slot indices are only meaningful for the
/// response they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    data: Vec<Value>,
}

impl Payload {
    /// Extract `nodes[node].data` from a parsed response body.
    pub fn from_value(mut response: Value, node: usize) -> Result<Self> {
        let nodes = response
            .get_mut("nodes")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| DecodeError::MalformedPayload("expected a `nodes` list".into()))?;

        if nodes.len() <= node {
            return Err(DecodeError::MalformedPayload(format!(
                "expected at least {} nodes, found {}",
                node + 1,
                nodes.len()
            )));
        }

        let data = match nodes[node].get_mut("data").map(Value::take) {
            Some(Value::Array(data)) => data,
            _ => {
                return Err(DecodeError::MalformedPayload(format!(
                    "`nodes[{node}].data` is not a list"
                )))
            }
        };

        if !matches!(data.first(), Some(Value::Object(_))) {
            return Err(DecodeError::MalformedPayload(
                "`data[0]` is not a root map".into(),
            ));
        }

        Ok(Self { data })
    }

    /// Parse a raw response body and extract `nodes[node].data`.
    pub fn from_slice(body: &[u8], node: usize) -> Result<Self> {
        let response: Value = serde_json::from_slice(body)
            .map_err(|err| DecodeError::MalformedPayload(err.to_string()))?;
        Self::from_value(response, node)
    }

    pub fn table(&self) -> IndexedTable<'_> {
        IndexedTable::new(&self.data)
    }

    pub fn values(&self) -> &[Value] {
        &self.data
    }
}

impl TryFrom<Value> for Payload {
    type Error = DecodeError;

    fn try_from(response: Value) -> Result<Self> {
        Self::from_value(response, DATA_NODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_the_third_node() {
        let payload = Payload::try_from(json!({
            "type": "data",
            "nodes": [{"type": "skip"}, {"type": "data", "data": [{}]}, {"data": [{"a": 1}, 5]}]
        }))
        .unwrap();
        assert_eq!(payload.values(), &[json!({"a": 1}), json!(5)]);
        assert_eq!(payload.table().follow(0, "a"), Ok(1));
    }

    #[test]
    fn rejects_short_node_lists() {
        let err = Payload::try_from(json!({"nodes": [null, {"data": [{}]}]})).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));

        // a page served at node 1 is fine when asked for
        assert!(Payload::from_value(json!({"nodes": [null, {"data": [{}]}]}), 1).is_ok());
    }

    #[test]
    fn rejects_unexpected_shapes() {
        for response in [
            json!({}),
            json!({"nodes": {}}),
            json!({"nodes": [null, null, null]}),
            json!({"nodes": [null, null, {"data": {}}]}),
            json!({"nodes": [null, null, {"data": []}]}),
            json!({"nodes": [null, null, {"data": [1, 2]}]}),
        ] {
            assert!(
                matches!(
                    Payload::try_from(response.clone()),
                    Err(DecodeError::MalformedPayload(_))
                ),
                "{response}"
            );
        }

        assert!(matches!(
            Payload::from_slice(b"<html>", DATA_NODE),
            Err(DecodeError::MalformedPayload(_))
        ));
    }
}
