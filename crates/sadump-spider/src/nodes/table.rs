use crate::error::{DecodeError, Result};
use serde_json::{Map, Value};
use tracing::{trace, warn};

/// Placeholder the provider serves in place of subscriber-only values.
pub const SENTINEL: &str = "[PRO]";

/// One decoded period (or one decoded object), keyed by field name.
pub type Record = Map<String, Value>;

/// What to do with [`SENTINEL`] entries found in a per-period sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// Omit the entry; the field's sequence becomes shorter than its index sequence.
    #[default]
    Drop,
    /// Replace the entry with `null`, keeping every field aligned by period.
    Null,
}

/// Options for [`IndexedTable::resolve_field_table`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions<'s> {
    /// Fields left out of the table entirely, e.g. `lastDate` metadata.
    pub skip: &'s [&'s str],
    pub sentinel: SentinelPolicy,
}

/// A named leaf expected directly under a mapping slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub name: &'static str,
    /// Absent optional leaves decode to `null` rather than failing.
    pub optional: bool,
}

impl Leaf {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            optional: true,
        }
    }
}

/// Per-field sequences of resolved values, in the order the payload lists the fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    fields: Vec<(String, Vec<Value>)>,
    misaligned: Vec<String>,
}

impl FieldTable {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            misaligned: Vec::new(),
        }
    }

    fn push(&mut self, field: String, values: Vec<Value>) {
        self.fields.push((field, values));
    }

    /// Fields whose periods no longer line up with the rest after restricted values were
    /// dropped. Always empty under [`SentinelPolicy::Null`].
    pub fn misaligned(&self) -> &[String] {
        &self.misaligned
    }

    pub fn get(&self, field: &str) -> Option<&[Value]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of complete periods: the length of the shortest field sequence.
    pub fn periods(&self) -> usize {
        self.fields
            .iter()
            .map(|(_, values)| values.len())
            .min()
            .unwrap_or(0)
    }
}

/// Zip a [`FieldTable`] into one record per period.
///
/// Record `i` holds the `i`-th value of every field. Ragged tables are truncated to the
/// shortest field; nothing is padded.
pub fn zip_to_records(table: &FieldTable) -> Vec<Record> {
    (0..table.periods())
        .map(|i| {
            table
                .iter()
                .map(|(field, values)| (field.to_string(), values[i].clone()))
                .collect()
        })
        .collect()
}

/// Read-only view over a deduplicated value array, addressed by slot index.
///
/// Slot `0` always holds the root map. Every other reference found while decoding is an
/// integer slot into the same array.
#[derive(Debug, Clone, Copy)]
pub struct IndexedTable<'a> {
    values: &'a [Value],
}

impl<'a> IndexedTable<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the value at `index` unchanged, one hop only.
    pub fn resolve_scalar(&self, index: usize) -> Result<&'a Value> {
        self.values.get(index).ok_or(DecodeError::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len: self.values.len(),
        })
    }

    /// Interpret `reference` as a slot index and check it against the array bounds.
    pub fn slot(&self, reference: &Value) -> Result<usize> {
        let len = self.values.len();
        let index = match reference {
            Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(index), _, _) => i64::try_from(index).unwrap_or(i64::MAX),
                (None, Some(index), _) => index,
                (None, None, Some(f)) if f.fract() == 0.0 => f as i64,
                _ => {
                    return Err(DecodeError::MalformedTable(format!(
                        "expected a slot index, found {reference}"
                    )))
                }
            },
            _ => {
                return Err(DecodeError::MalformedTable(format!(
                    "expected a slot index, found {reference}"
                )))
            }
        };

        match usize::try_from(index) {
            Ok(slot) if slot < len => Ok(slot),
            _ => Err(DecodeError::IndexOutOfRange { index, len }),
        }
    }

    /// Follow a single reference to the value it points at.
    pub fn resolve_ref(&self, reference: &Value) -> Result<&'a Value> {
        self.resolve_scalar(self.slot(reference)?)
    }

    /// The mapping stored at `slot`.
    pub fn object(&self, slot: usize) -> Result<&'a Map<String, Value>> {
        self.resolve_scalar(slot)?
            .as_object()
            .ok_or_else(|| DecodeError::MalformedTable(format!("slot {slot} is not a mapping")))
    }

    /// The root map at slot `0`.
    pub fn root(&self) -> Result<&'a Map<String, Value>> {
        self.object(0)
    }

    /// Slot index stored under `key` in the mapping at `slot`.
    pub fn follow(&self, slot: usize, key: &str) -> Result<usize> {
        let reference = self
            .object(slot)?
            .get(key)
            .ok_or_else(|| DecodeError::MissingField(key.to_string()))?;
        self.slot(reference)
    }

    /// Walk `path` from the root map, e.g. `["estimates", "table", "quarterly"]`.
    ///
    /// An empty path is the root map itself.
    pub fn follow_path(&self, path: &[&str]) -> Result<usize> {
        path.iter().try_fold(0, |slot, key| self.follow(slot, key))
    }

    /// Resolve the field-index map at `map_slot` into per-field value sequences.
    pub fn resolve_field_table(
        &self,
        map_slot: usize,
        options: &TableOptions<'_>,
    ) -> Result<FieldTable> {
        let map = self.object(map_slot)?;
        let mut table = FieldTable::with_capacity(map.len());
        // positions of the dropped sentinels, per field
        let mut dropped: Vec<(&str, Vec<usize>)> = Vec::with_capacity(map.len());

        for (field, reference) in map {
            if options.skip.contains(&field.as_str()) {
                trace!("skipping field `{field}` at slot {map_slot}");
                continue;
            }

            let field_slot = self.slot(reference)?;
            let indices = self.resolve_scalar(field_slot)?.as_array().ok_or_else(|| {
                DecodeError::MalformedTable(format!(
                    "field `{field}` at slot {field_slot} is not a sequence of indices"
                ))
            })?;

            let mut values = Vec::with_capacity(indices.len());
            let mut positions = Vec::new();
            for (position, index) in indices.iter().enumerate() {
                let value = self.resolve_ref(index)?;
                if is_sentinel(value) {
                    match options.sentinel {
                        SentinelPolicy::Drop => positions.push(position),
                        SentinelPolicy::Null => values.push(Value::Null),
                    }
                    continue;
                }
                values.push(value.clone());
            }

            dropped.push((field.as_str(), positions));
            table.push(field.clone(), values);
        }

        // dropping shifts periods unless every field lost exactly the same positions
        if dropped.iter().any(|(_, positions)| positions != &dropped[0].1) {
            let fields: Vec<String> = dropped
                .iter()
                .filter(|(_, positions)| !positions.is_empty())
                .map(|(field, positions)| format!("{field}{positions:?}"))
                .collect();
            warn!(
                "restricted values dropped at slot {map_slot}; periods may be misaligned for: {}",
                fields.join(", ")
            );
            table.misaligned = dropped
                .into_iter()
                .filter(|(_, positions)| !positions.is_empty())
                .map(|(field, _)| field.to_string())
                .collect();
        }

        Ok(table)
    }

    /// Resolve caller-named leaves under `map_slot` into one flat record.
    ///
    /// A leaf pointing at a wrapper map with a `value` key is dereferenced once more.
    pub fn resolve_named_leaves(&self, map_slot: usize, leaves: &[Leaf]) -> Result<Record> {
        let map = self.object(map_slot)?;
        let mut record = Record::new();
        for leaf in leaves {
            let value = match map.get(leaf.name) {
                Some(reference) => self.leaf_value(reference)?,
                None if leaf.optional => Value::Null,
                None => return Err(DecodeError::MissingField(leaf.name.to_string())),
            };
            record.insert(leaf.name.to_string(), value);
        }
        Ok(record)
    }

    /// Resolve a sequence of object slots at `list_slot`, one record per object.
    pub fn resolve_rows(&self, list_slot: usize, leaves: &[Leaf]) -> Result<Vec<Record>> {
        let items = self.resolve_scalar(list_slot)?.as_array().ok_or_else(|| {
            DecodeError::MalformedTable(format!(
                "slot {list_slot} is not a sequence of row indices"
            ))
        })?;

        items
            .iter()
            .map(|item| self.resolve_named_leaves(self.slot(item)?, leaves))
            .collect()
    }

    fn leaf_value(&self, reference: &Value) -> Result<Value> {
        let value = self.resolve_ref(reference)?;
        match value.as_object().and_then(|wrapper| wrapper.get("value")) {
            Some(inner) => Ok(self.resolve_ref(inner)?.clone()),
            None => Ok(value.clone()),
        }
    }
}

fn is_sentinel(value: &Value) -> bool {
    value.as_str() == Some(SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values() -> Vec<Value> {
        match json!([{"revenue": 1, "ncf": 2}, [3, 4], [5, 6], 100.0, 200.0, 10.0, 20.0]) {
            Value::Array(values) => values,
            _ => unreachable!(),
        }
    }

    fn array(value: Value) -> Vec<Value> {
        value.as_array().cloned().unwrap()
    }

    #[test]
    fn resolves_field_table_and_zips_records() {
        let values = values();
        let table = IndexedTable::new(&values);

        let fields = table
            .resolve_field_table(0, &TableOptions::default())
            .unwrap();
        assert_eq!(fields.fields().collect::<Vec<_>>(), vec!["revenue", "ncf"]);
        assert_eq!(fields.get("revenue").unwrap(), &[json!(100.0), json!(200.0)]);
        assert_eq!(fields.get("ncf").unwrap(), &[json!(10.0), json!(20.0)]);

        let records = zip_to_records(&fields);
        assert_eq!(
            Value::Array(records.into_iter().map(Value::Object).collect()),
            json!([
                {"revenue": 100.0, "ncf": 10.0},
                {"revenue": 200.0, "ncf": 20.0},
            ])
        );
    }

    #[test]
    fn index_past_the_end_is_out_of_range() {
        let values = values();
        let table = IndexedTable::new(&values);
        assert_eq!(
            table.resolve_scalar(7),
            Err(DecodeError::IndexOutOfRange { index: 7, len: 7 })
        );
        assert_eq!(
            table.slot(&json!(-1)),
            Err(DecodeError::IndexOutOfRange { index: -1, len: 7 })
        );
    }

    #[test]
    fn resolve_scalar_is_a_single_hop() {
        let values = values();
        let table = IndexedTable::new(&values);
        // slot 1 holds indices, not values; it comes back untouched
        assert_eq!(table.resolve_scalar(1).unwrap(), &json!([3, 4]));
    }

    #[test]
    fn out_of_range_value_index_aborts_the_table() {
        let values = array(json!([{"eps": 1}, [2, 9], 1.5]));
        let table = IndexedTable::new(&values);
        assert_eq!(
            table.resolve_field_table(0, &TableOptions::default()),
            Err(DecodeError::IndexOutOfRange { index: 9, len: 3 })
        );
    }

    #[test]
    fn sentinels_are_dropped_not_padded() {
        let values = array(json!([
            {"eps": 1, "revenue": 2},
            [3, 4, 5, 4],
            [6, 6, 6, 6],
            1.1,
            "[PRO]",
            1.3,
            42.0,
        ]));
        let table = IndexedTable::new(&values);
        let fields = table
            .resolve_field_table(0, &TableOptions::default())
            .unwrap();

        assert_eq!(fields.get("eps").unwrap(), &[json!(1.1), json!(1.3)]);
        assert_eq!(fields.get("revenue").unwrap().len(), 4);
        assert!(fields
            .iter()
            .all(|(_, values)| !values.contains(&json!(SENTINEL))));
        assert_eq!(zip_to_records(&fields).len(), 2);
        assert_eq!(fields.misaligned(), &["eps".to_string()]);
    }

    #[test]
    fn equal_drop_counts_at_different_periods_are_misaligned() {
        // eps loses its third period, revenue its first
        let values = array(json!([
            {"eps": 1, "revenue": 2},
            [3, 4, 5],
            [5, 6, 7],
            1.1,
            1.2,
            "[PRO]",
            300.0,
            400.0,
        ]));
        let table = IndexedTable::new(&values);
        let fields = table
            .resolve_field_table(0, &TableOptions::default())
            .unwrap();

        assert_eq!(fields.get("eps").unwrap().len(), 2);
        assert_eq!(fields.get("revenue").unwrap().len(), 2);
        assert_eq!(
            fields.misaligned(),
            &["eps".to_string(), "revenue".to_string()]
        );
    }

    #[test]
    fn identical_drops_stay_aligned() {
        let values = array(json!([
            {"eps": 1, "revenue": 2},
            [3, 4],
            [5, 4],
            1.1,
            "[PRO]",
            300.0,
        ]));
        let table = IndexedTable::new(&values);
        let fields = table
            .resolve_field_table(0, &TableOptions::default())
            .unwrap();

        assert!(fields.misaligned().is_empty());
        assert_eq!(
            Value::Array(zip_to_records(&fields).into_iter().map(Value::Object).collect()),
            json!([{"eps": 1.1, "revenue": 300.0}])
        );
    }

    #[test]
    fn misalignment_is_logged() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let values = array(json!([
            {"eps": 1, "revenue": 2},
            [3, 4, 5],
            [5, 6, 7],
            1.1,
            1.2,
            "[PRO]",
            300.0,
            400.0,
        ]));
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let table = IndexedTable::new(&values);
            table
                .resolve_field_table(0, &TableOptions::default())
                .unwrap();
            let options = TableOptions {
                sentinel: SentinelPolicy::Null,
                ..Default::default()
            };
            table.resolve_field_table(0, &options).unwrap();
        });

        let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("misaligned").count(), 1);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("eps[2]"));
        assert!(logs.contains("revenue[0]"));
    }

    #[test]
    fn null_policy_keeps_alignment() {
        let values = array(json!([{"eps": 1}, [2, 3, 2], 1.1, "[PRO]"]));
        let table = IndexedTable::new(&values);
        let options = TableOptions {
            sentinel: SentinelPolicy::Null,
            ..Default::default()
        };
        let fields = table.resolve_field_table(0, &options).unwrap();
        assert_eq!(
            fields.get("eps").unwrap(),
            &[json!(1.1), Value::Null, json!(1.1)]
        );
        assert!(fields.misaligned().is_empty());
    }

    #[test]
    fn skipped_fields_are_left_out() {
        let values = array(json!([{"lastDate": 1, "eps": 2}, "2024-01-01", [3], 0.5]));
        let table = IndexedTable::new(&values);
        let options = TableOptions {
            skip: &["lastDate"],
            ..Default::default()
        };
        let fields = table.resolve_field_table(0, &options).unwrap();
        assert_eq!(fields.fields().collect::<Vec<_>>(), vec!["eps"]);
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        let values = array(json!([{"eps": 1}, "not a sequence", [0]]));
        let table = IndexedTable::new(&values);
        assert!(matches!(
            table.resolve_field_table(0, &TableOptions::default()),
            Err(DecodeError::MalformedTable(_))
        ));
        assert!(matches!(
            table.resolve_field_table(2, &TableOptions::default()),
            Err(DecodeError::MalformedTable(_))
        ));

        let values = array(json!([{"eps": 1}, ["a"]]));
        let table = IndexedTable::new(&values);
        assert!(matches!(
            table.resolve_field_table(0, &TableOptions::default()),
            Err(DecodeError::MalformedTable(_))
        ));
    }

    #[test]
    fn ragged_tables_truncate_to_shortest_field() {
        let values = array(json!([{"a": 1, "b": 2}, [3, 3, 3], [4], "x", "y"]));
        let table = IndexedTable::new(&values);
        let fields = table
            .resolve_field_table(0, &TableOptions::default())
            .unwrap();
        let records = zip_to_records(&fields);
        assert_eq!(records.len(), 1);
        for (field, values) in fields.iter() {
            assert!(values.len() >= records.len());
            assert_eq!(records[0][field], values[0]);
        }
        assert!(zip_to_records(&FieldTable::default()).is_empty());
    }

    #[test]
    fn decoding_is_idempotent() {
        let values = values();
        let table = IndexedTable::new(&values);
        let first = table.resolve_field_table(0, &TableOptions::default());
        let second = table.resolve_field_table(0, &TableOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn named_leaves_unwrap_value_maps() {
        let values = array(json!([
            {"profile": 1, "description": 6},
            {"name": 2, "industry": 3, "founded": 5},
            "Super Micro Computer, Inc.",
            {"value": 4, "url": 7},
            "Computer Hardware",
            1993,
            "Makes servers.",
            "/stocks/industry/computer-hardware/",
        ]));
        let table = IndexedTable::new(&values);
        let profile = table.follow(0, "profile").unwrap();
        let record = table
            .resolve_named_leaves(
                profile,
                &[
                    Leaf::required("name"),
                    Leaf::required("industry"),
                    Leaf::required("founded"),
                    Leaf::optional("ceo"),
                ],
            )
            .unwrap();
        assert_eq!(
            Value::Object(record),
            json!({
                "name": "Super Micro Computer, Inc.",
                "industry": "Computer Hardware",
                "founded": 1993,
                "ceo": null,
            })
        );

        assert_eq!(
            table.resolve_named_leaves(profile, &[Leaf::required("ceo")]),
            Err(DecodeError::MissingField("ceo".to_string()))
        );
    }

    #[test]
    fn rows_resolve_each_object() {
        let values = array(json!([
            {"data": 1},
            [2, 5],
            {"s": 3, "n": 4},
            "NVDA",
            "NVIDIA Corporation",
            {"s": 6, "n": 7},
            "AMD",
            "Advanced Micro Devices, Inc.",
        ]));
        let table = IndexedTable::new(&values);
        let slot = table.follow_path(&["data"]).unwrap();
        let rows = table
            .resolve_rows(slot, &[Leaf::required("s"), Leaf::required("n")])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["s"], json!("AMD"));
    }

    #[test]
    fn follow_path_reports_missing_keys() {
        let values = array(json!([{"estimates": 1}, {"table": 2}, {"annual": 0}]));
        let table = IndexedTable::new(&values);
        assert_eq!(
            table.follow_path(&["estimates", "table", "quarterly"]),
            Err(DecodeError::MissingField("quarterly".to_string()))
        );
        assert_eq!(table.follow_path(&[]), Ok(0));
    }
}
