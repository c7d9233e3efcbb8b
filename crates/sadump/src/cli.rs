use clap::{Parser, Subcommand, ValueEnum};
use sadump_spider::api::Period;
use sadump_spider::stock::SectionKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Webscrape financial sections for a list of tickers.
    Spider {
        /// Tickers to collect, e.g. `-k AAPL,MSFT`.
        #[arg(short = 'k', long, value_delimiter = ',', required = true)]
        tickers: Vec<String>,

        /// Specify the sections to webscrape.
        ///
        /// If no sections are provided, spider will collect all.
        #[arg(short, long, value_delimiter = ',')]
        sections: Option<Vec<Section>>,

        /// Reporting period of the financial statements.
        #[arg(short, long, default_value = "quarterly")]
        period: PeriodArg,

        /// Write `<out>/<TICKER>/<section>.json` instead of printing to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decode a saved `__data.json` file.
    Decode {
        /// Path to the saved response.
        path: PathBuf,

        /// Which section of the payload to decode.
        #[arg(short, long)]
        schema: SchemaArg,

        /// Index of the `nodes` entry holding the page data.
        #[arg(short, long, default_value_t = sadump_spider::nodes::DATA_NODE)]
        node: usize,
    },

    /// Sector & industry listings.
    ///
    /// With no options, lists every sector.
    Market {
        /// List every industry instead of every sector.
        #[arg(long, conflicts_with_all = ["sector", "industry", "news"])]
        industries: bool,

        /// Latest market news headlines.
        #[arg(long, conflicts_with_all = ["sector", "industry"])]
        news: bool,

        /// List the stocks in a sector, by its slug (e.g. `technology`).
        #[arg(long, conflicts_with = "industry")]
        sector: Option<String>,

        /// List the stocks in an industry, by its slug (e.g. `biotechnology`).
        #[arg(long)]
        industry: Option<String>,
    },

    /// ETF listings.
    ///
    /// With no symbol, lists every ETF; with one, shows that fund's overview.
    Etf {
        /// ETF symbol, e.g. `SPY`.
        symbol: Option<String>,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Section {
    /// Income statement.
    Income,

    /// Balance sheet.
    Balance,

    /// Cash flow statement.
    CashFlow,

    /// Financial ratios.
    Ratios,

    /// Analyst estimates & price targets.
    Forecast,

    /// Company profile.
    Profile,
}

impl From<Section> for SectionKind {
    fn from(section: Section) -> Self {
        match section {
            Section::Income => SectionKind::Income,
            Section::Balance => SectionKind::Balance,
            Section::CashFlow => SectionKind::CashFlow,
            Section::Ratios => SectionKind::Ratios,
            Section::Forecast => SectionKind::Forecast,
            Section::Profile => SectionKind::Profile,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PeriodArg {
    Annual,
    Quarterly,
}

impl From<PeriodArg> for Period {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Annual => Period::Annual,
            PeriodArg::Quarterly => Period::Quarterly,
        }
    }
}

/// Built-in schemas, by name.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchemaArg {
    Financials,
    Estimates,
    Targets,
    Profile,
    Description,
    Sectors,
    Industries,
    Stocks,
    News,
}

impl SchemaArg {
    pub fn schema(&self) -> &'static sadump_spider::schema::Schema {
        use sadump_spider::schema::{
            DESCRIPTION, ESTIMATES, FINANCIALS, INDUSTRIES, NEWS, PROFILE, SECTORS, STOCKS,
            TARGETS,
        };
        match self {
            SchemaArg::Financials => &FINANCIALS,
            SchemaArg::Estimates => &ESTIMATES,
            SchemaArg::Targets => &TARGETS,
            SchemaArg::Profile => &PROFILE,
            SchemaArg::Description => &DESCRIPTION,
            SchemaArg::Sectors => &SECTORS,
            SchemaArg::Industries => &INDUSTRIES,
            SchemaArg::Stocks => &STOCKS,
            SchemaArg::News => &NEWS,
        }
    }
}
