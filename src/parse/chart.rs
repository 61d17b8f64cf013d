// src/parse/chart.rs
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{child_text, first_attr, ParseIssue};
use crate::model::{absolutize, ChartResult, RawReleaseEntry};

const BANNER: &str = ".chart-topbanner-title";

static BANNER_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(BANNER).unwrap());
static ITEM_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".chart-item").unwrap());
static LINK_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static IMG_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static ARTIST_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".release__artist").unwrap());
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".release__title").unwrap());
static LABEL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".release__label").unwrap());
static GENRE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".release__genre").unwrap());

/// Strip one trailing `" <year>"` so a curator keeps the same name across years.
pub fn curator_name(banner: &str, year: &str) -> String {
    let banner = banner.trim();
    banner
        .strip_suffix(&format!(" {year}"))
        .unwrap_or(banner)
        .to_string()
}

/// Extract the curator and the ranked entries of one chart page.
///
/// Entries keep document order and get their 1-based rank here. Item links
/// are made absolute against `origin`; image sources are kept verbatim.
pub fn parse_chart(html: &str, year: &str, origin: &str) -> Result<ChartResult, ParseIssue> {
    let t0 = std::time::Instant::now();
    let doc = Html::parse_document(html);

    let banner: String = doc.select(&BANNER_SEL).flat_map(|e| e.text()).collect();
    let curator = curator_name(&banner, year);
    if curator.is_empty() {
        return Err(ParseIssue::MissingCurator(BANNER));
    }

    let entries: Vec<RawReleaseEntry> = doc
        .select(&ITEM_SEL)
        .enumerate()
        .map(|(i, item)| RawReleaseEntry {
            rank: i as u32 + 1,
            artist: child_text(item, &ARTIST_SEL),
            title: child_text(item, &TITLE_SEL),
            label: child_text(item, &LABEL_SEL),
            genre: child_text(item, &GENRE_SEL),
            item_url: first_attr(item, &LINK_SEL, "href").map(|h| absolutize(origin, &h)),
            image_url: first_attr(item, &IMG_SEL, "src"),
        })
        .collect();

    if entries.is_empty() {
        tracing::warn!(curator = %curator, "chart page has no release blocks");
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("chart_parse_ms").record(ms);
    counter!("chart_entries_total").increment(entries.len() as u64);

    Ok(ChartResult { curator, entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_suffix_is_stripped_once() {
        assert_eq!(curator_name("  Alice 2021 ", "2021"), "Alice");
        assert_eq!(curator_name("Alice 2021 2021", "2021"), "Alice 2021");
        assert_eq!(curator_name("Alice2021", "2021"), "Alice2021");
        assert_eq!(curator_name("Alice 2020", "2021"), "Alice 2020");
    }

    #[test]
    fn missing_markup_defaults() {
        let html = r#"
            <h1 class="chart-topbanner-title">Bob 2021</h1>
            <div class="chart-item"><span class="release__artist"> X </span></div>"#;
        let chart = parse_chart(html, "2021", "https://boomkat.com").unwrap();
        assert_eq!(chart.curator, "Bob");
        let e = &chart.entries[0];
        assert_eq!(e.rank, 1);
        assert_eq!(e.artist, "X");
        assert_eq!(e.title, "");
        assert_eq!(e.label, "");
        assert_eq!(e.genre, "");
        assert_eq!(e.item_url, None);
        assert_eq!(e.image_url, None);
    }

    #[test]
    fn banner_missing_is_an_error() {
        let html = r#"<div class="chart-item"><span class="release__artist">X</span></div>"#;
        assert_eq!(
            parse_chart(html, "2021", "https://boomkat.com"),
            Err(ParseIssue::MissingCurator(BANNER))
        );
    }

    #[test]
    fn banner_that_is_only_whitespace_is_an_error() {
        let html = r#"<h1 class="chart-topbanner-title">   </h1>"#;
        assert!(parse_chart(html, "2021", "https://boomkat.com").is_err());
    }
}
