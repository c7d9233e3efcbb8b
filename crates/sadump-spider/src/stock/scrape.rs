use super::{forecast, profile, statements};
use crate::api::{build_client, fetch_payload, Page, Period};
use crate::config::Config;
use crate::error::{DecodeError, Result};
use crate::nodes::Payload;
use crate::tui::Progress;
use futures::{stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace, warn};

/// The per-ticker sections the spider collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Income,
    Balance,
    CashFlow,
    Ratios,
    Forecast,
    Profile,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Income,
        SectionKind::Balance,
        SectionKind::CashFlow,
        SectionKind::Ratios,
        SectionKind::Forecast,
        SectionKind::Profile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Income => "income",
            SectionKind::Balance => "balance",
            SectionKind::CashFlow => "cash-flow",
            SectionKind::Ratios => "ratios",
            SectionKind::Forecast => "forecast",
            SectionKind::Profile => "profile",
        }
    }

    pub fn page(&self, symbol: &str, period: Period) -> Page {
        let statement = |statement| Page::Statement {
            symbol: symbol.to_string(),
            statement,
            period,
        };
        match self {
            SectionKind::Income => statement(statements::Statement::Income),
            SectionKind::Balance => statement(statements::Statement::Balance),
            SectionKind::CashFlow => statement(statements::Statement::CashFlow),
            SectionKind::Ratios => statement(statements::Statement::Ratios),
            SectionKind::Forecast => Page::Forecast(symbol.to_string()),
            SectionKind::Profile => Page::Company(symbol.to_string()),
        }
    }

    /// Decode the section into its typed form, re-serialized as JSON.
    pub fn decode(&self, payload: &Payload) -> Result<Value> {
        let value = match self {
            SectionKind::Income => {
                serde_json::to_value(statements::decode::<statements::IncomeStatement>(payload)?)
            }
            SectionKind::Balance => {
                serde_json::to_value(statements::decode::<statements::BalanceSheet>(payload)?)
            }
            SectionKind::CashFlow => {
                serde_json::to_value(statements::decode::<statements::CashFlow>(payload)?)
            }
            SectionKind::Ratios => {
                serde_json::to_value(statements::decode::<statements::FinancialRatios>(payload)?)
            }
            SectionKind::Forecast => serde_json::to_value(forecast::decode(payload)?),
            SectionKind::Profile => serde_json::to_value(profile::decode(payload)?),
        };
        value.map_err(|err| DecodeError::MalformedTable(err.to_string()))
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded section for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scraped {
    pub ticker: String,
    pub section: SectionKind,
    pub data: Value,
}

/// Fetch and decode `sections` for every ticker, `config.concurrency` pages at a time.
///
/// A page that fails to fetch or decode is logged and skipped; it does not stop the
/// other sections.
pub async fn scrape(
    config: &Config,
    tickers: &[String],
    sections: &[SectionKind],
    period: Period,
    tui: bool,
) -> anyhow::Result<Vec<Scraped>> {
    let time = std::time::Instant::now();
    let http_client = build_client(config)?;

    let jobs: Vec<(String, SectionKind)> = tickers
        .iter()
        .flat_map(|ticker| {
            sections
                .iter()
                .map(move |section| (ticker.to_uppercase(), *section))
        })
        .collect();
    let progress = Progress::new(jobs.len(), tui)?;
    let scraped = Mutex::new(Vec::with_capacity(jobs.len()));
    let failures = Mutex::new(0usize);

    info!(
        "fetching {} sections for {} tickers ...",
        sections.len(),
        tickers.len()
    );
    stream::iter(jobs)
        .for_each_concurrent(config.concurrency, |(ticker, section)| {
            let http_client = &http_client;
            let progress = &progress;
            let scraped = &scraped;
            let failures = &failures;
            async move {
                let page = section.page(&ticker, period);
                progress.fetching(&format!("{ticker} {section}"));
                let payload = match fetch_payload(http_client, config, &page).await {
                    Ok(payload) => payload,
                    Err(err) => {
                        error!("failed to fetch {section} for [{ticker}], error({err})");
                        *failures.lock().await += 1;
                        progress.failed();
                        return;
                    }
                };

                let data = match section.decode(&payload) {
                    Ok(data) => data,
                    Err(err) => {
                        error!("failed to decode {section} for [{ticker}], error({err})");
                        *failures.lock().await += 1;
                        progress.failed();
                        return;
                    }
                };

                trace!("{section} decoded for [{ticker}]");
                scraped.lock().await.push(Scraped {
                    ticker,
                    section,
                    data,
                });
                progress.succeeded();
            }
        })
        .await;
    progress.finish();

    let failures = failures.into_inner();
    if failures > 0 {
        warn!("{failures} sections could not be collected");
    }

    let mut scraped = scraped.into_inner();
    scraped.sort_by(|a, b| (&a.ticker, a.section).cmp(&(&b.ticker, b.section)));
    debug!(
        "{} sections collected. {}",
        scraped.len(),
        crate::time_elapsed(time)
    );

    Ok(scraped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sections_map_to_pages() {
        assert_eq!(
            SectionKind::Profile.page("smci", Period::Annual),
            Page::Company("smci".into())
        );
        assert!(matches!(
            SectionKind::Ratios.page("aapl", Period::Quarterly),
            Page::Statement {
                statement: statements::Statement::Ratios,
                period: Period::Quarterly,
                ..
            }
        ));
    }

    #[test]
    fn forecast_section_decodes_to_json() {
        let payload = Payload::try_from(json!({"nodes": [null, null, {"data": [
            {"estimates": 1, "targets": 4},
            {"table": 2},
            {"quarterly": 3},
            {"dates": 5, "fiscalQuarter": 6, "fiscalYear": 7, "eps": 8},
            {"average": 9, "high": 9, "low": 9, "median": 9},
            [10], [11], [12], [13],
            200.0,
            "2025-06-30", "Q3", "2025", 1.45,
        ]}]}))
        .unwrap();

        let data = SectionKind::Forecast.decode(&payload).unwrap();
        assert_eq!(data["estimations"][0]["fiscalQuarter"], json!("Q3"));
        assert_eq!(data["estimations"][0]["eps"], json!(1.45));
        assert_eq!(data["estimations"][0]["revenue"], Value::Null);
        assert_eq!(data["targetPrice"]["high"], json!(200.0));
        assert!(data.get("target_price").is_none());
    }
}
