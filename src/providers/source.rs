//! Transport strategy abstraction for fetching the rate page

use crate::core::FetchError;
use async_trait::async_trait;
use url::Url;

/// Raw page markup together with the endpoint that served it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    pub body: String,
    pub url: String,
}

/// One way of getting the page: a direct request or a particular relay.
#[async_trait]
pub trait SourceStrategy: Send + Sync {
    /// Short identifier used in logs and error reports.
    fn id(&self) -> &str;

    /// Fetches `target`, which already carries the cache-busting parameter.
    async fn fetch(&self, target: &Url) -> Result<SourcePage, FetchError>;
}
