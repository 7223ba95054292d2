use crate::core::FetchError;
use crate::providers::source::{SourcePage, SourceStrategy};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const CACHE_BUST_PARAM: &str = "timestamp";

/// Gets the rate page by trying each strategy in order until one succeeds.
pub struct Acquirer {
    target: Url,
    strategies: Vec<Box<dyn SourceStrategy>>,
    last_stamp: AtomicU64,
}

impl Acquirer {
    pub fn new(target: Url, strategies: Vec<Box<dyn SourceStrategy>>) -> Self {
        Acquirer {
            target,
            strategies,
            last_stamp: AtomicU64::new(0),
        }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn strategy_ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    /// Milliseconds since the epoch, bumped so that successive calls never
    /// repeat a value.
    fn next_stamp(&self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        let prev = self
            .last_stamp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev + 1)
    }

    /// The target URL with a fresh cache-busting parameter appended.
    pub fn cache_busted_target(&self) -> Url {
        let mut url = self.target.clone();
        url.query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &self.next_stamp().to_string());
        url
    }

    #[instrument(name = "AcquirePage", skip(self), fields(target = %self.target))]
    pub async fn acquire(&self) -> Result<SourcePage, FetchError> {
        let target = self.cache_busted_target();
        let mut attempts = Vec::with_capacity(self.strategies.len());
        let mut last_status = None;

        for strategy in &self.strategies {
            debug!(strategy = strategy.id(), "Trying channel");
            match strategy.fetch(&target).await {
                Ok(page) if !page.body.trim().is_empty() => {
                    info!(strategy = strategy.id(), url = %page.url, "Fetched rate page");
                    return Ok(page);
                }
                Ok(_) => {
                    warn!(strategy = strategy.id(), "Channel returned an empty body");
                    attempts.push(format!("{}: {}", strategy.id(), FetchError::EmptyBody));
                }
                Err(e) => {
                    warn!(strategy = strategy.id(), error = %e, "Channel failed");
                    if let Some(status) = e.status_code() {
                        last_status = Some(status);
                    }
                    attempts.push(format!("{}: {}", strategy.id(), e));
                }
            }
        }

        if attempts.is_empty() {
            attempts.push("no direct access or relays configured".to_string());
        }
        Err(FetchError::TransportExhausted {
            attempts,
            status: last_status,
        })
    }
}
