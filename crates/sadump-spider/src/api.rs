//! Spider API calls are made up of the following components:
//! 1. HTTP
//!     a) client
//!     b) `__data.json` request for a [`Page`]
//!     c) payload extraction, `nodes[..].data`
//!
//! 2. Decoding
//!     a) [`crate::schema`] lookup
//!     b) indexed-table decode
//!     c) OPTIONAL: typed section, see [`crate::stock`]
//!
//! A few datasets (the ETF screener and overviews) come from a plain JSON [`Endpoint`]
//! instead, and are deserialized directly.

use crate::config::Config;
use crate::http::*;
use crate::nodes::{Payload, DATA_NODE};
use crate::stock::statements::Statement;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, trace};

/// Reporting period of the financial statement pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Annual,
    #[default]
    Quarterly,
}

/// Every page the spider knows how to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Statement {
        symbol: String,
        statement: Statement,
        period: Period,
    },
    Forecast(String),
    Company(String),
    Sectors,
    Industries,
    /// Stocks listed under a sector slug, e.g. `technology`.
    SectorStocks(String),
    /// Stocks listed under an industry slug, e.g. `biotechnology`.
    IndustryStocks(String),
    News,
}

impl Page {
    pub fn url(&self, base_url: &str) -> String {
        match self {
            Page::Statement {
                symbol,
                statement,
                period,
            } => {
                let query = match period {
                    Period::Annual => "",
                    Period::Quarterly => "?p=quarterly",
                };
                format!(
                    "{base_url}/stocks/{}/financials{}/__data.json{query}",
                    symbol.to_lowercase(),
                    statement.segment()
                )
            }
            Page::Forecast(symbol) => {
                format!("{base_url}/stocks/{}/forecast/__data.json", symbol.to_lowercase())
            }
            Page::Company(symbol) => {
                format!("{base_url}/stocks/{}/company/__data.json", symbol.to_lowercase())
            }
            Page::Sectors => format!("{base_url}/stocks/industry/sectors/__data.json"),
            Page::Industries => format!("{base_url}/stocks/industry/all/__data.json"),
            Page::SectorStocks(slug) => format!("{base_url}/stocks/sector/{slug}/__data.json"),
            Page::IndustryStocks(slug) => format!("{base_url}/stocks/industry/{slug}/__data.json"),
            Page::News => format!("{base_url}/news/__data.json"),
        }
    }

    /// Index into `nodes` holding the page data.
    pub fn data_node(&self) -> usize {
        match self {
            // sector and news pages carry one less layout node
            Page::SectorStocks(_) | Page::News => 1,
            _ => DATA_NODE,
        }
    }
}

/// Plain JSON API endpoints, under [`Config::api_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    EtfScreener,
    EtfOverview(String),
}

impl Endpoint {
    pub fn url(&self, api_url: &str) -> String {
        match self {
            Endpoint::EtfScreener => {
                format!("{api_url}/api/screener/e/f?m=s&s=asc&c=s,n,assetClass,aum&i=etf")
            }
            Endpoint::EtfOverview(symbol) => {
                format!("{api_url}/api/symbol/e/{}/overview", symbol.to_lowercase())
            }
        }
    }
}

pub fn build_client(config: &Config) -> anyhow::Result<HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(&config.user_agent)
        .build()
        .map_err(|err| {
            error!("failed to build reqwest client, error({err})");
            err
        })?;
    Ok(client)
}

/// GET `url` and deserialize its JSON body.
pub async fn fetch_json<T: DeserializeOwned>(
    http_client: &HttpClient,
    url: &str,
) -> anyhow::Result<T> {
    trace!("fetching {url}");
    let body = http_client
        .get(url)
        .send()
        .await
        .map_err(|err| {
            error!("failed to fetch {url}, error({err})");
            err
        })?
        .error_for_status()
        .map_err(|err| {
            error!("unsuccessful response from {url}, error({err})");
            err
        })?
        .json()
        .await
        .map_err(|err| {
            error!("failed to parse JSON from {url}, error({err})");
            err
        })?;
    Ok(body)
}

/// GET a page's `__data.json` and extract its value array.
pub async fn fetch_payload(
    http_client: &HttpClient,
    config: &Config,
    page: &Page,
) -> anyhow::Result<Payload> {
    let time = std::time::Instant::now();
    let url = page.url(&config.base_url);

    let body: Value = fetch_json(http_client, &url).await?;
    let payload = Payload::from_value(body, page.data_node()).map_err(|err| {
        error!("unexpected payload from {url}, error({err})");
        err
    })?;

    debug!(
        "{url} fetched, {} values. {}",
        payload.values().len(),
        crate::time_elapsed(time)
    );
    Ok(payload)
}
