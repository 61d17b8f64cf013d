// src/crawl.rs
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

use crate::config::CrawlConfig;
use crate::error::{ChartError, Result};
use crate::fetch::PageSource;
use crate::model::{ChartLink, ChartResult};
use crate::parse::{self, IndexFilter};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("charts_scraped_total", "Chart pages fetched and parsed.");
        describe_counter!(
            "chart_entries_total",
            "Release entries extracted from chart pages."
        );
        describe_counter!("fetch_errors_total", "Page fetches that failed.");
        describe_counter!("fetch_bytes_total", "Bytes of HTML fetched.");
        describe_histogram!("chart_parse_ms", "Chart page parse time in milliseconds.");
        describe_gauge!("merged_releases", "Distinct releases after the last merge.");
    });
}

/// Walks the year's index page and every chart it links to, strictly one
/// page at a time. Pacing is left to the [`PageSource`].
pub struct ChartCrawler<'a, S: PageSource + ?Sized> {
    source: &'a S,
    cfg: &'a CrawlConfig,
    year: String,
}

impl<'a, S: PageSource + ?Sized> ChartCrawler<'a, S> {
    pub fn new(source: &'a S, cfg: &'a CrawlConfig, year: impl Into<String>) -> Self {
        ensure_metrics_described();
        Self {
            source,
            cfg,
            year: year.into(),
        }
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    /// Chart links in crawl order.
    pub async fn chart_links(&self) -> Result<Vec<ChartLink>> {
        let url = self.cfg.index_url(&self.year);
        let html = self.source.fetch(&url).await?;
        let filter = IndexFilter::from_config(self.cfg, &self.year)
            .map_err(|e| ChartError::Config(e.to_string()))?;
        let links = parse::parse_index(&html, &filter);
        tracing::info!(year = %self.year, charts = links.len(), "index parsed");
        Ok(links)
    }

    pub async fn chart(&self, link: &ChartLink) -> Result<ChartResult> {
        let url = link.absolute(&self.cfg.origin);
        let html = self.source.fetch(&url).await?;
        let chart = parse::parse_chart(&html, &self.year, &self.cfg.origin)
            .map_err(|e| ChartError::parse(&url, e.to_string()))?;
        counter!("charts_scraped_total").increment(1);
        tracing::info!(curator = %chart.curator, entries = chart.len(), "scraped a chart");
        Ok(chart)
    }

    /// Every chart of the year. The first failure aborts the whole crawl.
    pub async fn crawl(&self) -> Result<Vec<ChartResult>> {
        let links = self.chart_links().await?;
        let mut charts = Vec::with_capacity(links.len());
        for link in &links {
            charts.push(self.chart(link).await?);
        }
        Ok(charts)
    }
}
