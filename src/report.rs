// src/report.rs
use serde::Serialize;
use std::io::Write;

use crate::error::Result;

/// The single document a run emits: `{ "title": ..., "data": [...] }`.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T: Serialize> {
    pub title: String,
    pub data: Vec<T>,
}

impl<T: Serialize> Report<T> {
    pub fn new(title: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            title: title.into(),
            data,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let s = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(s)
    }

    /// Write the document plus a trailing newline in one go.
    pub fn write_to<W: Write>(&self, mut w: W, pretty: bool) -> anyhow::Result<()> {
        let mut s = self.to_json(pretty)?;
        s.push('\n');
        w.write_all(s.as_bytes())?;
        w.flush()?;
        Ok(())
    }
}

pub fn per_chart_title(prefix: &str, year: &str) -> String {
    format!("{prefix} {year}")
}

pub fn merged_title(prefix: &str, year: &str) -> String {
    format!("{prefix} {year}: Merged")
}
