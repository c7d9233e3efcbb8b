//! Declarative descriptions of the sections found in each page's value array.
//!
//! Each [`Schema`] names the path from the root map to its section and how that section
//! is laid out; [`Schema::decode`] runs the shared decoder over it.

use crate::error::{DecodeError, Result};
use crate::nodes::{zip_to_records, IndexedTable, Leaf, Record, SentinelPolicy, TableOptions};
use serde_json::Value;
use tracing::{debug, trace};

/// How a section is stored.
#[derive(Debug, Clone, Copy)]
pub enum Layout {
    /// Field-index map of per-period sequences, zipped into one record per period.
    Series(TableOptions<'static>),
    /// Flat map of named scalar leaves.
    Leaves(&'static [Leaf]),
    /// Sequence of object slots, each holding the named leaves.
    Rows(&'static [Leaf]),
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    /// Keys followed from the root map; empty for leaves of the root map itself.
    pub path: &'static [&'static str],
    pub layout: Layout,
}

/// Decoded output of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Records(Vec<Record>),
    Leaves(Record),
}

impl Section {
    pub fn records(self) -> Result<Vec<Record>> {
        match self {
            Section::Records(records) => Ok(records),
            Section::Leaves(_) => Err(DecodeError::MalformedTable(
                "expected records, found a flat mapping".into(),
            )),
        }
    }

    pub fn leaves(self) -> Result<Record> {
        match self {
            Section::Leaves(record) => Ok(record),
            Section::Records(_) => Err(DecodeError::MalformedTable(
                "expected a flat mapping, found records".into(),
            )),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Section::Records(records) => {
                Value::Array(records.into_iter().map(Value::Object).collect())
            }
            Section::Leaves(record) => Value::Object(record),
        }
    }
}

impl Schema {
    pub fn decode(&self, table: &IndexedTable<'_>) -> Result<Section> {
        let slot = table.follow_path(self.path)?;
        trace!("decoding `{}` at slot {slot}", self.name);

        let section = match &self.layout {
            Layout::Series(options) => {
                let fields = table.resolve_field_table(slot, options)?;
                Section::Records(zip_to_records(&fields))
            }
            Layout::Leaves(leaves) => Section::Leaves(table.resolve_named_leaves(slot, leaves)?),
            Layout::Rows(leaves) => Section::Records(table.resolve_rows(slot, leaves)?),
        };

        match &section {
            Section::Records(records) => {
                debug!("`{}` decoded, {} records", self.name, records.len())
            }
            Section::Leaves(record) => debug!("`{}` decoded, {} leaves", self.name, record.len()),
        }
        Ok(section)
    }
}

// schemas
// -------------------------------------------------------------------------------------------------

/// Income statement, balance sheet, cash flow and ratio pages all share this layout.
///
/// Restricted metrics become `null` so every metric stays on its own `datekey`.
pub static FINANCIALS: Schema = Schema {
    name: "financials",
    path: &["financialData"],
    layout: Layout::Series(TableOptions {
        skip: &[],
        sentinel: SentinelPolicy::Null,
    }),
};

/// Quarterly analyst estimates on the forecast page.
pub static ESTIMATES: Schema = Schema {
    name: "estimates",
    path: &["estimates", "table", "quarterly"],
    layout: Layout::Series(TableOptions {
        skip: &["lastDate"],
        sentinel: SentinelPolicy::Drop,
    }),
};

/// Analyst price targets on the forecast page.
pub static TARGETS: Schema = Schema {
    name: "targets",
    path: &["targets"],
    layout: Layout::Leaves(&[
        Leaf::required("average"),
        Leaf::required("high"),
        Leaf::required("low"),
        Leaf::required("median"),
    ]),
};

/// Company profile on the company page.
pub static PROFILE: Schema = Schema {
    name: "profile",
    path: &["profile"],
    layout: Layout::Leaves(&[
        Leaf::required("name"),
        Leaf::required("country"),
        Leaf::required("founded"),
        Leaf::required("ipoDate"),
        Leaf::required("industry"),
        Leaf::required("sector"),
        Leaf::required("ceo"),
    ]),
};

/// Company description, kept in the root map of the company page.
pub static DESCRIPTION: Schema = Schema {
    name: "description",
    path: &[],
    layout: Layout::Leaves(&[Leaf::required("description")]),
};

pub static SECTORS: Schema = Schema {
    name: "sectors",
    path: &["sectors"],
    layout: Layout::Rows(&[
        Leaf::required("sector_name"),
        Leaf::required("url"),
        Leaf::required("stocks"),
        Leaf::required("marketCap"),
        Leaf::required("dividendYield"),
        Leaf::required("peRatio"),
        Leaf::required("profitMargin"),
        Leaf::required("ch1y"),
    ]),
};

/// Industries with no earnings or dividends omit `peRatio` / `dividendYield`.
pub static INDUSTRIES: Schema = Schema {
    name: "industries",
    path: &["industries"],
    layout: Layout::Rows(&[
        Leaf::required("industry_name"),
        Leaf::required("url"),
        Leaf::required("stocks"),
        Leaf::required("marketCap"),
        Leaf::optional("dividendYield"),
        Leaf::optional("peRatio"),
        Leaf::required("profitMargin"),
        Leaf::required("ch1y"),
    ]),
};

/// Stocks listed on a sector or industry page.
pub static STOCKS: Schema = Schema {
    name: "stocks",
    path: &["data"],
    layout: Layout::Rows(&[
        Leaf::required("s"),
        Leaf::required("n"),
        Leaf::required("marketCap"),
    ]),
};

/// Market news headlines.
pub static NEWS: Schema = Schema {
    name: "news",
    path: &["data"],
    layout: Layout::Rows(&[
        Leaf::required("url"),
        Leaf::required("img"),
        Leaf::required("title"),
        Leaf::required("text"),
        Leaf::required("source"),
        Leaf::required("time"),
    ]),
};

pub static ALL: [&Schema; 9] = [
    &FINANCIALS,
    &ESTIMATES,
    &TARGETS,
    &PROFILE,
    &DESCRIPTION,
    &SECTORS,
    &INDUSTRIES,
    &STOCKS,
    &NEWS,
];

/// Look a built-in schema up by its name.
pub fn by_name(name: &str) -> Option<&'static Schema> {
    ALL.iter().copied().find(|schema| schema.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Payload;
    use serde_json::json;

    fn forecast() -> Payload {
        Payload::try_from(json!({"nodes": [null, null, {"data": [
            {"estimates": 1, "targets": 4},
            {"table": 2},
            {"quarterly": 3},
            {"lastDate": 9, "fiscalQuarter": 10, "eps": 11},
            {"average": 12, "high": 13, "low": 14, "median": 12},
            "Q1", "Q2", 1.52, "[PRO]",
            "2025-03-31",
            [5, 6],
            [7, 8],
            250.5, 300.0, 180.0,
        ]}]}))
        .unwrap()
    }

    #[test]
    fn decodes_estimates_through_nested_path() {
        let payload = forecast();
        let records = ESTIMATES.decode(&payload.table()).unwrap().records().unwrap();
        // eps lost its restricted entry, so only one complete period remains
        assert_eq!(records.len(), 1);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({"fiscalQuarter": "Q1", "eps": 1.52})
        );
    }

    #[test]
    fn restricted_financials_keep_their_period() {
        let payload = Payload::try_from(json!({"nodes": [null, null, {"data": [
            {"financialData": 1},
            {"datekey": 2, "cashneq": 3},
            [4, 5, 6],
            [7, 8, 9],
            "2024-03-31", "2024-06-30", "2024-09-30",
            100.0, "[PRO]", 300.0,
        ]}]}))
        .unwrap();
        let records = FINANCIALS
            .decode(&payload.table())
            .unwrap()
            .records()
            .unwrap();

        assert_eq!(
            Value::Array(records.into_iter().map(Value::Object).collect()),
            json!([
                {"datekey": "2024-03-31", "cashneq": 100.0},
                {"datekey": "2024-06-30", "cashneq": null},
                {"datekey": "2024-09-30", "cashneq": 300.0},
            ])
        );
    }

    #[test]
    fn decodes_flat_targets() {
        let payload = forecast();
        let targets = TARGETS.decode(&payload.table()).unwrap().leaves().unwrap();
        assert_eq!(targets["median"], json!(250.5));
        assert_eq!(targets["low"], json!(180.0));
    }

    #[test]
    fn wrong_section_shape_is_an_error() {
        let payload = forecast();
        let section = TARGETS.decode(&payload.table()).unwrap();
        assert!(section.records().is_err());
        assert!(matches!(
            FINANCIALS.decode(&payload.table()),
            Err(DecodeError::MissingField(field)) if field == "financialData"
        ));
    }

    #[test]
    fn schemas_are_found_by_name() {
        assert_eq!(by_name("estimates").map(|s| s.path.len()), Some(3));
        assert!(matches!(
            by_name("news").map(|s| s.layout),
            Some(Layout::Rows(leaves)) if leaves.len() == 6
        ));
        assert!(by_name("nope").is_none());
    }
}
