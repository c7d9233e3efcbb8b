use dotenv::var;
use tracing::{error, trace};

const DEFAULT_BASE_URL: &str = "https://stockanalysis.com";
const DEFAULT_API_URL: &str = "https://api.stockanalysis.com";
const DEFAULT_CONCURRENCY: usize = 8;

/// Runtime settings, read from the environment (and `.env`).
///
/// | variable             | default                         |
/// |----------------------|---------------------------------|
/// | `SADUMP_BASE_URL`    | `https://stockanalysis.com`     |
/// | `SADUMP_API_URL`     | `https://api.stockanalysis.com` |
/// | `USER_AGENT`         | `sadump/<version>`              |
/// | `SADUMP_CONCURRENCY` | `8`                             |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Root of the plain JSON API (screeners, ETF overviews).
    pub api_url: String,
    pub user_agent: String,
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: format!("sadump/{}", env!("CARGO_PKG_VERSION")),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let base_url = var("SADUMP_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let api_url = var("SADUMP_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        let user_agent = var("USER_AGENT").unwrap_or(defaults.user_agent);
        let concurrency = match var("SADUMP_CONCURRENCY") {
            Ok(n) => n.parse::<usize>().map_err(|err| {
                error!("SADUMP_CONCURRENCY must be a positive integer, found \"{n}\", error({err})");
                err
            })?,
            Err(_) => defaults.concurrency,
        };
        if concurrency == 0 {
            anyhow::bail!("SADUMP_CONCURRENCY must be a positive integer");
        }

        let config = Self {
            base_url,
            api_url,
            user_agent,
            concurrency,
        };
        trace!("config loaded: {config:?}");
        Ok(config)
    }
}
