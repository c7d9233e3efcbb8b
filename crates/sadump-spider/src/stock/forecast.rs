use super::common::{from_record, from_records, parse_date};
use crate::error::Result;
use crate::nodes::Payload;
use crate::schema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Analyst estimates and price targets, both from the forecast page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockForecast {
    pub estimations: Vec<Estimation>,
    pub target_price: PriceTarget,
}

/// One quarter of consensus estimates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Estimation {
    #[serde(rename = "dates")]
    pub date: String,
    pub fiscal_quarter: String,
    pub fiscal_year: String,
    pub eps: Option<f64>,
    pub eps_growth: Option<f64>,
    pub revenue: Option<f64>,
    pub revenue_growth: Option<f64>,
}

impl Estimation {
    pub fn dated(&self) -> Option<chrono::NaiveDate> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceTarget {
    pub average: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub median: Option<f64>,
}

/// Decode the quarterly estimates and the price target of a forecast page.
pub fn decode(payload: &Payload) -> Result<StockForecast> {
    let table = payload.table();
    let estimations = from_records(schema::ESTIMATES.decode(&table)?.records()?)?;
    let target_price = from_record(schema::TARGETS.decode(&table)?.leaves()?)?;

    let forecast = StockForecast {
        estimations,
        target_price,
    };
    debug!(
        "forecast decoded: {} estimations, median target {:?}",
        forecast.estimations.len(),
        forecast.target_price.median
    );
    Ok(forecast)
}
