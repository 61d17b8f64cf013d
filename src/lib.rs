// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::config::{resolve_year, CrawlConfig};
pub use crate::error::ChartError;
pub use crate::fetch::{HttpFetcher, PageSource, StaticPages};
pub use crate::merge::{merge_charts, MergedRelease};
pub use crate::model::{ChartLink, ChartResult, RawReleaseEntry};
pub use crate::pipeline::{run, Mode, RunOutput};
