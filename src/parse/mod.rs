// src/parse/mod.rs
//! HTML extraction for the index page and the individual chart pages.
//! Both parsers are pure functions of their input.

pub mod chart;
pub mod index;

use scraper::{ElementRef, Selector};
use thiserror::Error;

pub use chart::parse_chart;
pub use index::{parse_index, parse_index_for_year, IndexFilter};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    #[error("chart page has no curator banner ({0})")]
    MissingCurator(&'static str),
    #[error("invalid index denylist pattern: {0}")]
    BadDenylist(String),
}

/// Text of every `sel` match under `el`, concatenated and trimmed; `""` if none.
pub(crate) fn child_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel)
        .flat_map(|m| m.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// `attr` of the first `sel` match under `el`.
pub(crate) fn first_attr(el: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    el.select(sel)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::to_string)
}
