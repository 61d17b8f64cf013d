pub mod crawl;

pub use crawl::{resolve_year, CrawlConfig, DEFAULT_YEAR};
