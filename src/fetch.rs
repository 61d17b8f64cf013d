// src/fetch.rs
use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::CrawlConfig;
use crate::error::{ChartError, Result};

/// Anything that can hand back the HTML body behind a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Live HTTP fetcher. Every call hits the network and then pauses for
/// `delay` so sequential crawling stays polite.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(cfg: &CrawlConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(cfg.timeout());
        if let Some(ua) = cfg.user_agent.as_deref() {
            builder = builder.user_agent(ua);
        }
        let client = builder
            .build()
            .map_err(|e| ChartError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            client,
            delay: cfg.delay(),
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let rsp = match self.client.get(url).send().await {
            Ok(rsp) => rsp,
            Err(e) => {
                tracing::warn!(error = %e, url, "chart fetch failed");
                counter!("fetch_errors_total").increment(1);
                return Err(ChartError::Fetch {
                    url: url.to_string(),
                    source: e,
                });
            }
        };

        let status = rsp.status();
        if !status.is_success() {
            tracing::warn!(%status, url, "chart fetch returned non-success status");
            counter!("fetch_errors_total").increment(1);
            return Err(ChartError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = rsp.text().await.map_err(|e| ChartError::Fetch {
            url: url.to_string(),
            source: e,
        })?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        counter!("fetch_bytes_total").increment(body.len() as u64);

        tokio::time::sleep(self.delay).await;
        Ok(body)
    }
}

/// In-memory pages keyed by absolute URL. Unknown URLs behave like a 404.
#[derive(Debug, Default, Clone)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ChartError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}
