mod cli;
mod spider;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use sadump_spider::api::Page;
use sadump_spider::stock::SectionKind;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// preproccess the trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    // read cli inputs
    use cli::Commands::*;
    match cli.command {
        // `sadump spider -k <Vec<String>> <Option<Vec<Section>>>`: scrape tickers
        Spider {
            tickers,
            sections,
            period,
            out,
        } => {
            // if no sections provided, scrape all
            let sections = match sections {
                Some(sections) => sections.into_iter().map(SectionKind::from).collect(),
                None => SectionKind::ALL.to_vec(),
            };
            spider::run(tickers, sections, period.into(), out, tui).await?
        }

        // `sadump decode <path> --schema <SchemaArg>`: decode a saved payload
        Decode { path, schema, node } => spider::decode(path, schema.schema(), node).await?,

        // `sadump market [--industries | --news | --sector <slug> | --industry <slug>]`
        Market {
            industries,
            news,
            sector,
            industry,
        } => {
            let page = match (industries, news, sector, industry) {
                (true, _, _, _) => Page::Industries,
                (_, true, _, _) => Page::News,
                (_, _, Some(sector), _) => Page::SectorStocks(sector),
                (_, _, _, Some(industry)) => Page::IndustryStocks(industry),
                _ => Page::Sectors,
            };
            spider::market(page).await?
        }

        // `sadump etf [symbol]`
        Etf { symbol } => spider::etf(symbol).await?,
    }

    Ok(())
}
