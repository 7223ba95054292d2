//! Rate snapshot and provider abstraction

use crate::core::currency::CurrencyQuote;
use crate::core::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The full set of quotes from one successful refresh.
///
/// Serializes to the public result shape `{ updateTime, rates, sourceUrls? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(rename = "updateTime")]
    published_at: String,
    #[serde(rename = "rates")]
    quotes: Vec<CurrencyQuote>,
    #[serde(rename = "sourceUrls", default, skip_serializing_if = "Vec::is_empty")]
    source_urls: Vec<String>,
}

impl RateSnapshot {
    pub fn new(published_at: impl Into<String>, quotes: Vec<CurrencyQuote>) -> Self {
        Self {
            published_at: published_at.into(),
            quotes,
            source_urls: Vec::new(),
        }
    }

    /// Records the endpoints that produced the data.
    pub fn with_source_urls(self, source_urls: Vec<String>) -> Self {
        Self {
            source_urls,
            ..self
        }
    }

    /// Publish time reported by the page; empty when the page carried none.
    pub fn published_at(&self) -> &str {
        &self.published_at
    }

    pub fn quotes(&self) -> &[CurrencyQuote] {
        &self.quotes
    }

    pub fn source_urls(&self) -> &[String] {
        &self.source_urls
    }

    pub fn quote(&self, code: &str) -> Option<&CurrencyQuote> {
        self.quotes.iter().find(|q| q.code() == code)
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateSnapshot, FetchError>;
}
