use super::common::from_records;
use crate::error::Result;
use crate::nodes::Payload;
use crate::schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsArticle {
    pub url: String,
    #[serde(rename = "img")]
    pub image: String,
    pub title: String,
    pub text: String,
    pub source: String,
    /// Publication time as the provider formats it, e.g. `"Oct 18, 2026, 4:05 PM EDT"`.
    pub time: String,
}

pub fn articles(payload: &Payload) -> Result<Vec<NewsArticle>> {
    from_records(schema::NEWS.decode(&payload.table())?.records()?)
}
