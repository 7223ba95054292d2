use crate::core::config::AppConfig;
use crate::core::{FetchError, RateProvider, RateSnapshot, TargetCurrencySet};
use crate::extract::RateExtractor;
use crate::providers::acquirer::Acquirer;
use crate::providers::direct::DirectStrategy;
use crate::providers::relay::RelayStrategy;
use crate::providers::source::SourceStrategy;
use crate::providers::util::build_client;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

/// Bank of China rate page: acquire the markup, then extract the quotes.
pub struct BocRateProvider {
    acquirer: Acquirer,
    extractor: RateExtractor,
}

impl BocRateProvider {
    pub fn new(acquirer: Acquirer, extractor: RateExtractor) -> Self {
        BocRateProvider {
            acquirer,
            extractor,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source = &config.source;
        let target = Url::parse(&source.url)
            .with_context(|| format!("Invalid source url in config: {}", source.url))?;
        let client = build_client(source)?;

        let mut strategies: Vec<Box<dyn SourceStrategy>> = Vec::new();
        if source.direct {
            strategies.push(Box::new(DirectStrategy::new(client.clone())));
        }
        for (i, relay) in source.relays.iter().enumerate() {
            strategies.push(Box::new(RelayStrategy::new(
                format!("relay-{}", i + 1),
                relay.url.as_str(),
                client.clone(),
            )));
        }

        let acquirer = Acquirer::new(target, strategies);
        debug!(channels = ?acquirer.strategy_ids(), "Configured rate page channels");

        let extractor = RateExtractor::new(TargetCurrencySet::boc(), config.parser)
            .context("Failed to build currency row patterns")?;
        Ok(Self::new(acquirer, extractor))
    }
}

#[async_trait]
impl RateProvider for BocRateProvider {
    #[instrument(name = "BocRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateSnapshot, FetchError> {
        let page = self.acquirer.acquire().await?;
        let snapshot = self.extractor.extract(&page.body)?;
        debug!(
            quotes = snapshot.quotes().len(),
            published_at = snapshot.published_at(),
            "Extracted rates"
        );
        Ok(snapshot.with_source_urls(vec![page.url]))
    }
}
