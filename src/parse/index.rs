// src/parse/index.rs
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::ParseIssue;
use crate::config::CrawlConfig;
use crate::model::ChartLink;

// Anchors either carry the listing class themselves or sit inside it.
static CHART_LINKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.charts-index-chart[href], .charts-index-chart a[href]").unwrap()
});

/// Drops index links that point at known non-chart entries of the year.
#[derive(Debug, Clone)]
pub struct IndexFilter {
    deny: Option<Regex>,
}

impl IndexFilter {
    /// Links containing `<index_path>/<id>` for any `id` in `denylist` are rejected.
    /// Like a plain prefix match, `/9401` is caught by id `940`.
    pub fn new(index_path: &str, denylist: &[u32]) -> Result<Self, ParseIssue> {
        if denylist.is_empty() {
            return Ok(Self { deny: None });
        }
        let ids = denylist
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("{}/(?:{})", regex::escape(index_path), ids);
        let deny = Regex::new(&pattern).map_err(|e| ParseIssue::BadDenylist(e.to_string()))?;
        Ok(Self { deny: Some(deny) })
    }

    pub fn from_config(cfg: &CrawlConfig, year: &str) -> Result<Self, ParseIssue> {
        Self::new(&cfg.index_path(year), &cfg.denylist)
    }

    pub fn allows(&self, href: &str) -> bool {
        self.deny.as_ref().map_or(true, |re| !re.is_match(href))
    }
}

/// Chart links on an index page, in document order, minus denied ones.
pub fn parse_index(html: &str, filter: &IndexFilter) -> Vec<ChartLink> {
    let doc = Html::parse_document(html);
    doc.select(&CHART_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| filter.allows(href))
        .map(ChartLink::new)
        .collect()
}

/// [`parse_index`] with the default site layout and denylist for `year`.
pub fn parse_index_for_year(html: &str, year: &str) -> Result<Vec<ChartLink>, ParseIssue> {
    let filter = IndexFilter::from_config(&CrawlConfig::default(), year)?;
    Ok(parse_index(html, &filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        <html><body>
          <div class="charts-index">
            <a class="charts-index-chart" href="/charts/boomkat-end-of-year-charts-2021/950-alice">Alice</a>
            <a class="charts-index-chart">no href</a>
            <a class="charts-index-chart" href="/charts/boomkat-end-of-year-charts-2021/941">Broken</a>
            <a class="charts-index-chart" href="/charts/boomkat-end-of-year-charts-2021/951-bob">Bob</a>
            <a href="/elsewhere">not in listing</a>
          </div>
        </body></html>"#;

    #[test]
    fn keeps_document_order_and_drops_denied() {
        let links = parse_index_for_year(INDEX, "2021").unwrap();
        let hrefs: Vec<&str> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/charts/boomkat-end-of-year-charts-2021/950-alice",
                "/charts/boomkat-end-of-year-charts-2021/951-bob",
            ]
        );
    }

    #[test]
    fn denylist_is_year_specific() {
        let f = IndexFilter::from_config(&CrawlConfig::default(), "2021").unwrap();
        assert!(!f.allows("/charts/boomkat-end-of-year-charts-2021/940"));
        assert!(!f.allows("/charts/boomkat-end-of-year-charts-2021/942-misc"));
        assert!(f.allows("/charts/boomkat-end-of-year-charts-2020/940"));
        assert!(f.allows("/charts/boomkat-end-of-year-charts-2021/943"));
    }

    #[test]
    fn empty_denylist_allows_everything() {
        let f = IndexFilter::new("/charts/x-2021", &[]).unwrap();
        assert!(f.allows("/charts/x-2021/940"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_index_for_year(INDEX, "2021").unwrap();
        let b = parse_index_for_year(INDEX, "2021").unwrap();
        assert_eq!(a, b);
    }
}
