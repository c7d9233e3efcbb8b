use super::common::{from_record, parse_date};
use crate::error::Result;
use crate::nodes::Payload;
use crate::schema;
use serde::{Deserialize, Serialize};

/// Company profile from the company page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockProfile {
    pub name: String,
    pub description: String,
    pub country: String,
    pub founded: Option<i32>,
    pub ipo_date: String,
    pub industry: String,
    pub sector: String,
    pub ceo: String,
}

impl StockProfile {
    pub fn ipo_dated(&self) -> Option<chrono::NaiveDate> {
        parse_date(&self.ipo_date)
    }
}

/// Decode the profile leaves, plus the description held in the root map.
pub fn decode(payload: &Payload) -> Result<StockProfile> {
    let table = payload.table();
    let mut record = schema::PROFILE.decode(&table)?.leaves()?;
    record.extend(schema::DESCRIPTION.decode(&table)?.leaves()?);
    from_record(record)
}
