// src/error.rs
use thiserror::Error;

/// Everything that can abort a crawl run. None of these are retried.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("parsing {url} failed: {reason}")]
    Parse { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serializing report failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ChartError {
    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Transport and status failures, i.e. the page never arrived.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
