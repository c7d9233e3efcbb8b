use super::common::from_records;
use crate::error::Result;
use crate::nodes::Payload;
use crate::schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sector {
    #[serde(rename = "sector_name")]
    pub name: String,
    /// Slug used in the sector's own page URL.
    #[serde(rename = "url")]
    pub url_name: String,
    #[serde(rename = "stocks")]
    pub number_of_stocks: Option<u32>,
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub profit_margin: Option<f64>,
    #[serde(rename = "ch1y")]
    pub one_year_change: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Industry {
    #[serde(rename = "industry_name")]
    pub name: String,
    #[serde(rename = "url")]
    pub url_name: String,
    #[serde(rename = "stocks")]
    pub number_of_stocks: Option<u32>,
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub profit_margin: Option<f64>,
    #[serde(rename = "ch1y")]
    pub one_year_change: Option<f64>,
}

/// A stock listed on a sector or industry page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListedStock {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "n")]
    pub company_name: String,
    pub market_cap: Option<f64>,
}

pub fn sectors(payload: &Payload) -> Result<Vec<Sector>> {
    from_records(schema::SECTORS.decode(&payload.table())?.records()?)
}

pub fn industries(payload: &Payload) -> Result<Vec<Industry>> {
    from_records(schema::INDUSTRIES.decode(&payload.table())?.records()?)
}

pub fn stocks(payload: &Payload) -> Result<Vec<ListedStock>> {
    from_records(schema::STOCKS.decode(&payload.table())?.records()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn industries_tolerate_missing_ratios() {
        let payload = Payload::try_from(json!({"nodes": [null, null, {"data": [
            {"industries": 1},
            [2],
            {"industry_name": 3, "url": 4, "stocks": 5, "marketCap": 6, "profitMargin": 7, "ch1y": 8},
            "Biotechnology", "biotechnology", 689, 1.2e12, -0.45, 0.031,
        ]}]}))
        .unwrap();

        let industries = industries(&payload).unwrap();
        assert_eq!(industries.len(), 1);
        assert_eq!(industries[0].name, "Biotechnology");
        assert_eq!(industries[0].number_of_stocks, Some(689));
        assert_eq!(industries[0].pe_ratio, None);
        assert_eq!(industries[0].one_year_change, Some(0.031));
    }

    #[test]
    fn sectors_require_every_column() {
        let payload = Payload::try_from(json!({"nodes": [null, null, {"data": [
            {"sectors": 1},
            [2],
            {"sector_name": 3, "url": 4},
            "Technology", "technology",
        ]}]}))
        .unwrap();

        assert!(matches!(
            sectors(&payload),
            Err(crate::DecodeError::MissingField(field)) if field == "stocks"
        ));
    }
}
