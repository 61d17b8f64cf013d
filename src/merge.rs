// src/merge.rs
//! # Merge & Score
//!
//! Folds every curator's chart into one catalog keyed by `(artist, title)`.
//!
//! - Keys are compared exactly as the parser emitted them (already trimmed,
//!   never case-folded).
//! - The first chart in crawl order that lists a release fixes its label,
//!   genre and URLs; later charts only add to `chart_by`.
//! - `score = Σ (1 + 1 / (rank * 5))` over `chart_by`, so the number of
//!   charts dominates and a high placement only adds a small bonus.
//! - Output is sorted by score, highest first; ties stay in first-seen order.

use metrics::gauge;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::model::{ChartResult, RawReleaseEntry};

/// Identity of a release across charts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseKey {
    pub artist: String,
    pub title: String,
}

impl ReleaseKey {
    pub fn of(entry: &RawReleaseEntry) -> Self {
        Self {
            artist: entry.artist.clone(),
            title: entry.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRelease {
    pub artist: String,
    pub title: String,
    #[serde(rename = "url")]
    pub item_url: Option<String>,
    #[serde(rename = "img_url")]
    pub image_url: Option<String>,
    pub label: String,
    pub genre: String,
    /// Curator name → rank that curator gave this release.
    pub chart_by: BTreeMap<String, u32>,
    score: f64,
}

impl MergedRelease {
    /// Seed a release from its first appearance, with no chart ranks yet.
    pub fn seed(entry: &RawReleaseEntry) -> Self {
        Self {
            artist: entry.artist.clone(),
            title: entry.title.clone(),
            item_url: entry.item_url.clone(),
            image_url: entry.image_url.clone(),
            label: entry.label.clone(),
            genre: entry.genre.clone(),
            chart_by: BTreeMap::new(),
            score: 0.0,
        }
    }

    pub fn key(&self) -> ReleaseKey {
        ReleaseKey {
            artist: self.artist.clone(),
            title: self.title.clone(),
        }
    }

    /// Set `curator`'s rank (overwriting a previous one) and recompute the score.
    pub fn record(&mut self, curator: &str, rank: u32) {
        self.chart_by.insert(curator.to_string(), rank);
        self.score = score_of(&self.chart_by);
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Contribution of a single chart appearance. Ranks are 1-based; 0 is treated as 1.
pub fn rank_score(rank: u32) -> f64 {
    let rank = rank.max(1) as f64;
    1.0 + 1.0 / (rank * 5.0)
}

pub fn score_of(chart_by: &BTreeMap<String, u32>) -> f64 {
    chart_by.values().map(|&r| rank_score(r)).sum()
}

/// Run-scoped accumulator. Releases are kept in first-seen order.
#[derive(Debug, Default)]
pub struct Merger {
    index: HashMap<ReleaseKey, usize>,
    releases: Vec<MergedRelease>,
    charts: usize,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chart(&mut self, chart: &ChartResult) {
        for entry in &chart.entries {
            let key = ReleaseKey::of(entry);
            let idx = match self.index.get(&key) {
                Some(&i) => i,
                None => {
                    self.releases.push(MergedRelease::seed(entry));
                    let i = self.releases.len() - 1;
                    self.index.insert(key, i);
                    i
                }
            };
            self.releases[idx].record(&chart.curator, entry.rank);
        }
        self.charts += 1;
    }

    pub fn chart_count(&self) -> usize {
        self.charts
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Releases ordered by score, highest first.
    pub fn finish(self) -> Vec<MergedRelease> {
        let mut out = self.releases;
        out.sort_by(|a, b| b.score.total_cmp(&a.score));
        gauge!("merged_releases").set(out.len() as f64);
        tracing::debug!(charts = self.charts, releases = out.len(), "merge finished");
        out
    }
}

/// Merge charts given in crawl order.
pub fn merge_charts(charts: &[ChartResult]) -> Vec<MergedRelease> {
    let mut m = Merger::new();
    for c in charts {
        m.add_chart(c);
    }
    m.finish()
}
