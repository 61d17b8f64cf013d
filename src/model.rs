// src/model.rs
//! Shapes produced by the parsers and consumed by the merge engine.

use serde::{Deserialize, Serialize};

/// One release block as it appears on a single chart page.
///
/// Text fields default to `""` when their markup is missing; the URL fields
/// stay `None` so "no link" and "empty link" remain distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReleaseEntry {
    /// 1-based position on the page, fixed at parse time.
    pub rank: u32,
    pub artist: String,
    pub title: String,
    pub label: String,
    pub genre: String,
    #[serde(rename = "url")]
    pub item_url: Option<String>,
    #[serde(rename = "img_url")]
    pub image_url: Option<String>,
}

/// A curator's chart: who made it and what they ranked, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartResult {
    #[serde(rename = "chart_by")]
    pub curator: String,
    #[serde(rename = "items")]
    pub entries: Vec<RawReleaseEntry>,
}

impl ChartResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A chart page link as found on the year's index page (site-relative href).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartLink {
    pub href: String,
}

impl ChartLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Absolute URL of the chart page under `origin`.
    pub fn absolute(&self, origin: &str) -> String {
        absolutize(origin, &self.href)
    }
}

/// Prefix a site-relative path with the origin. Already absolute URLs pass through.
pub fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}
