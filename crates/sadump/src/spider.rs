use sadump_spider as spider;
use sadump_spider::api::{Page, Period};
use sadump_spider::schema::Schema;
use sadump_spider::stock::SectionKind;
use sadump_spider::Config;
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Scrape `sections` for every ticker, then print or write the results.
pub(crate) async fn run(
    tickers: Vec<String>,
    sections: Vec<SectionKind>,
    period: Period,
    out: Option<PathBuf>,
    tui: bool,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    trace!("spider config: {config:?}");

    let time = std::time::Instant::now();
    let scraped = spider::stock::scrape(&config, &tickers, &sections, period, tui).await?;

    match out {
        Some(dir) => {
            for section in &scraped {
                let path = dir
                    .join(&section.ticker)
                    .join(format!("{}.json", section.section));
                spider::fs::write_json(&path, &section.data).await?;
            }
            if tui {
                println!("{} sections written to {}", scraped.len(), dir.display());
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&scraped)?),
    }

    info!(
        "spider finished collecting data, time elapsed: {:?}",
        time.elapsed()
    );

    Ok(())
}

/// Decode one schema out of a saved `__data.json` file.
pub(crate) async fn decode(path: PathBuf, schema: &Schema, node: usize) -> anyhow::Result<()> {
    let payload = spider::fs::read_payload(&path, node).await?;
    debug!("{} loaded, {} values", path.display(), payload.values().len());

    let section = schema.decode(&payload.table())?;
    println!("{}", serde_json::to_string_pretty(&section.into_value())?);

    Ok(())
}

/// Fetch a sector / industry listing page and print it.
pub(crate) async fn market(page: Page) -> anyhow::Result<()> {
    use spider::stock::market;

    let config = Config::from_env()?;
    let http_client = spider::api::build_client(&config)?;
    let payload = spider::api::fetch_payload(&http_client, &config, &page).await?;

    let output = match page {
        Page::Sectors => serde_json::to_string_pretty(&market::sectors(&payload)?)?,
        Page::Industries => serde_json::to_string_pretty(&market::industries(&payload)?)?,
        Page::News => serde_json::to_string_pretty(&spider::stock::news::articles(&payload)?)?,
        _ => serde_json::to_string_pretty(&market::stocks(&payload)?)?,
    };
    println!("{output}");

    Ok(())
}

/// List every ETF, or show one fund's overview.
pub(crate) async fn etf(symbol: Option<String>) -> anyhow::Result<()> {
    use spider::stock::etf;

    let config = Config::from_env()?;
    let http_client = spider::api::build_client(&config)?;

    let output = match symbol {
        Some(symbol) => {
            let overview = etf::fetch_overview(&http_client, &config, &symbol).await?;
            serde_json::to_string_pretty(&overview)?
        }
        None => {
            let etfs = etf::fetch_etfs(&http_client, &config).await?;
            debug!("{} etfs listed", etfs.len());
            serde_json::to_string_pretty(&etfs)?
        }
    };
    println!("{output}");

    Ok(())
}
