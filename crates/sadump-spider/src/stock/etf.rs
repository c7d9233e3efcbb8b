use crate::api::{fetch_json, Endpoint};
use crate::config::Config;
use crate::error::{DecodeError, Result};
use crate::http::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// fetch
// -------------------------------------------------------------------------------------------------

/// Every listed ETF, from the screener API.
pub async fn fetch_etfs(http_client: &HttpClient, config: &Config) -> anyhow::Result<Vec<Etf>> {
    let url = Endpoint::EtfScreener.url(&config.api_url);
    let response = fetch_json(http_client, &url).await?;
    Ok(etfs(response)?)
}

/// Overview of a single ETF, from the symbol API.
pub async fn fetch_overview(
    http_client: &HttpClient,
    config: &Config,
    symbol: &str,
) -> anyhow::Result<EtfOverview> {
    let url = Endpoint::EtfOverview(symbol.to_string()).url(&config.api_url);
    let response = fetch_json(http_client, &url).await?;
    Ok(overview(symbol, response)?)
}

// decode
// -------------------------------------------------------------------------------------------------

/// `{ "status": 200, "data": T }`, the envelope of every API response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

fn unwrap_envelope<T: DeserializeOwned>(response: Value) -> Result<T> {
    serde_json::from_value::<Envelope<T>>(response)
        .map(|envelope| envelope.data)
        .map_err(|err| DecodeError::MalformedPayload(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct Screener {
    data: Vec<Etf>,
    #[serde(rename = "resultsCount", default)]
    results_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Etf {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "n")]
    pub name: String,
    pub asset_class: String,
    /// Assets under management, in USD.
    pub aum: Option<f64>,
}

pub fn etfs(response: Value) -> Result<Vec<Etf>> {
    let screener: Screener = unwrap_envelope(response)?;
    debug!(
        "{} etfs decoded, {} reported",
        screener.data.len(),
        screener.results_count
    );
    Ok(screener.data)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EtfHolding {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "n")]
    pub name: String,
    /// Share of assets, formatted by the provider (e.g. `"7.12%"`).
    #[serde(rename = "as")]
    pub weight: String,
}

/// The overview figures are served preformatted (`"$512.30B"`, `"0.09%"`) and kept as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfOverview {
    pub symbol: String,
    pub description: String,
    pub asset_class: String,
    pub category: String,
    pub aum: String,
    pub nav: String,
    pub expense_ratio: String,
    pub pe_ratio: String,
    pub dps: String,
    pub dividend_yield: String,
    pub payout_ratio: String,
    pub one_year_return: String,
    pub beta: String,
    pub number_of_holdings: u32,
    pub website: String,
    pub top_holdings: Vec<EtfHolding>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOverview {
    aum: String,
    nav: String,
    expense_ratio: String,
    description: String,
    pe_ratio: String,
    dps: String,
    dividend_yield: String,
    payout_ratio: String,
    ch1y: String,
    beta: String,
    holdings: u32,
    #[serde(rename = "etf_website")]
    website: String,
    /// `[label, value]` rows, e.g. `["Asset Class", "Equity"]`.
    info_table: Vec<Vec<String>>,
    holdings_table: HoldingsTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HoldingsTable {
    holdings: Vec<EtfHolding>,
}

impl RawOverview {
    /// Value of the first info table row labelled `label`.
    fn info(&self, label: &str) -> String {
        self.info_table
            .iter()
            .find(|row| row.first().map(String::as_str) == Some(label))
            .and_then(|row| row.get(1))
            .cloned()
            .unwrap_or_default()
    }
}

pub fn overview(symbol: &str, response: Value) -> Result<EtfOverview> {
    let raw: RawOverview = unwrap_envelope(response)?;

    Ok(EtfOverview {
        symbol: symbol.to_string(),
        asset_class: raw.info("Asset Class"),
        category: raw.info("Category"),
        description: raw.description,
        aum: raw.aum,
        nav: raw.nav,
        expense_ratio: raw.expense_ratio,
        pe_ratio: raw.pe_ratio,
        dps: raw.dps,
        dividend_yield: raw.dividend_yield,
        payout_ratio: raw.payout_ratio,
        one_year_return: raw.ch1y,
        beta: raw.beta,
        number_of_holdings: raw.holdings,
        website: raw.website,
        top_holdings: raw.holdings_table.holdings,
    })
}
