use crate::app::ports::PageFetcher;
use crate::common::constants::{ACCEPT_HTML, ACCEPT_LANGUAGE};
use crate::common::error::{CatalogError, Result};
use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER, CACHE_CONTROL, PRAGMA};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// reqwest-backed fetcher with bounded exponential-backoff retries.
///
/// Only transport failures (no response at all) and 5xx responses are
/// retried. Anything else, including 4xx, fails on the first attempt.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl ReqwestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        })
    }

    /// Delay before retry number `retry` (1-based): `base * 2^retry`.
    pub fn retry_delay(&self, retry: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(retry))
    }

    fn give_up(&self, message: String) -> CatalogError {
        crate::metrics::record_fetch_failure();
        error!("Fetch failed: {}", message);
        CatalogError::Fetch(message)
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut retries = 0u32;
        loop {
            crate::metrics::record_fetch_attempt();
            let outcome = self
                .client
                .get(url)
                .header(ACCEPT, ACCEPT_HTML)
                .header(ACCEPT_LANGUAGE_HEADER, ACCEPT_LANGUAGE)
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache")
                .send()
                .await;

            let failure = match outcome {
                Ok(response) if response.status().is_success() => {
                    let body = response
                        .text()
                        .await
                        .map_err(|e| self.give_up(format!("reading body of {url}: {e}")))?;
                    debug!("Fetched {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Ok(response) if response.status().is_server_error() => {
                    format!("{url} responded with {}", response.status())
                }
                Ok(response) => {
                    return Err(self.give_up(format!("{url} responded with {}", response.status())));
                }
                Err(e) if e.is_builder() || e.is_redirect() => {
                    return Err(self.give_up(format!("request to {url} failed: {e}")));
                }
                Err(e) => format!("request to {url} failed: {e}"),
            };

            if retries >= self.max_retries {
                return Err(self.give_up(format!("{failure} (gave up after {retries} retries)")));
            }
            retries += 1;
            let delay = self.retry_delay(retries);
            crate::metrics::record_fetch_retry();
            warn!("{}; retry {}/{} in {:?}", failure, retries, self.max_retries, delay);
            tokio::time::sleep(delay).await;
        }
    }
}
