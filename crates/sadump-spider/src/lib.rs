pub mod api;
pub mod config;
pub mod error;
pub mod fs;
pub mod nodes;
pub mod schema;
pub mod stock;
mod tui;

pub use config::Config;
pub use error::{DecodeError, Result};
pub use nodes::Payload;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use reqwest::Client as HttpClient;
}

/// Human-readable elapsed time since `time`, for log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2}s", time.elapsed().as_secs_f64())
}
