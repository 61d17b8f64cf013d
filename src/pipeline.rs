// src/pipeline.rs
use std::io::Write;

use crate::config::CrawlConfig;
use crate::crawl::ChartCrawler;
use crate::error::Result;
use crate::fetch::PageSource;
use crate::merge::{merge_charts, MergedRelease};
use crate::model::ChartResult;
use crate::report::{merged_title, per_chart_title, Report};

/// What the run emits under `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// One record per chart, no cross-chart merge.
    PerChart,
    /// One scored record per release, best first.
    #[default]
    Merged,
}

#[derive(Debug, Clone)]
pub enum RunOutput {
    PerChart(Report<ChartResult>),
    Merged(Report<MergedRelease>),
}

impl RunOutput {
    pub fn title(&self) -> &str {
        match self {
            Self::PerChart(r) => &r.title,
            Self::Merged(r) => &r.title,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::PerChart(r) => r.data.len(),
            Self::Merged(r) => r.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        match self {
            Self::PerChart(r) => r.to_json(pretty),
            Self::Merged(r) => r.to_json(pretty),
        }
    }

    pub fn write_to<W: Write>(&self, w: W, pretty: bool) -> anyhow::Result<()> {
        match self {
            Self::PerChart(r) => r.write_to(w, pretty),
            Self::Merged(r) => r.write_to(w, pretty),
        }
    }
}

/// Shape crawled charts into the report for `mode`.
pub fn assemble(charts: Vec<ChartResult>, mode: Mode, cfg: &CrawlConfig, year: &str) -> RunOutput {
    match mode {
        Mode::PerChart => RunOutput::PerChart(Report::new(
            per_chart_title(&cfg.title_prefix, year),
            charts,
        )),
        Mode::Merged => RunOutput::Merged(Report::new(
            merged_title(&cfg.title_prefix, year),
            merge_charts(&charts),
        )),
    }
}

/// Full run: crawl every chart of `year`, then build the report.
/// Nothing is produced unless every page was fetched and parsed.
pub async fn run<S: PageSource + ?Sized>(
    source: &S,
    cfg: &CrawlConfig,
    year: &str,
    mode: Mode,
) -> Result<RunOutput> {
    let charts = ChartCrawler::new(source, cfg, year).crawl().await?;
    let out = assemble(charts, mode, cfg, year);
    tracing::info!(title = out.title(), records = out.len(), "run finished");
    Ok(out)
}
