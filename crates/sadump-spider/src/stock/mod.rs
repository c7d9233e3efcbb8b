pub(crate) mod common;

/// Balance sheet, income statement, cash flow and ratio pages; one record per reporting period.
pub mod statements;

/// Quarterly analyst estimates and price targets.
pub mod forecast;

/// Company profile: name, description, classification, leadership.
pub mod profile;

/// Sector and industry listings, and the stocks within each.
pub mod market;

pub mod news;

/// ETF screener and per-fund overviews, served by the plain JSON API.
pub mod etf;

mod scrape;
pub use scrape::{scrape, Scraped, SectionKind};
