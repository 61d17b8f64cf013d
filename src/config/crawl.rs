// src/config/crawl.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_YEAR: &str = "2021";
pub const DEFAULT_CONFIG_PATH: &str = "config/crawl.toml";
pub const ENV_CONFIG_PATH: &str = "EOY_CHARTS_CONFIG";
pub const ENV_DELAY_MS: &str = "EOY_CHARTS_DELAY_MS";
pub const ENV_ORIGIN: &str = "EOY_CHARTS_ORIGIN";

fn default_origin() -> String {
    "https://boomkat.com".to_string()
}
fn default_index_path_template() -> String {
    "/charts/boomkat-end-of-year-charts-{year}".to_string()
}
fn default_delay_ms() -> u64 {
    200
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_denylist() -> Vec<u32> {
    vec![940, 941, 942]
}
fn default_title_prefix() -> String {
    "Boomkat Charts".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Scheme + host every relative href is resolved against.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Path of the year's index page; `{year}` is substituted.
    #[serde(default = "default_index_path_template")]
    pub index_path_template: String,
    /// Pause after every fetch.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Index entries `<index path>/<id>` with these ids are not charts.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<u32>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            index_path_template: default_index_path_template(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            denylist: default_denylist(),
            user_agent: None,
            title_prefix: default_title_prefix(),
        }
    }
}

impl CrawlConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: CrawlConfig = toml::from_str(s).context("parsing crawl config toml")?;
        cfg.origin = cfg.origin.trim().trim_end_matches('/').to_string();
        if cfg.origin.is_empty() {
            return Err(anyhow!("crawl config: origin must not be empty"));
        }
        if !cfg.index_path_template.contains("{year}") {
            return Err(anyhow!(
                "crawl config: index_path_template must contain {{year}}"
            ));
        }
        if cfg.timeout_secs == 0 {
            cfg.timeout_secs = default_timeout_secs();
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading crawl config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve configuration:
    /// 1) explicit path (CLI flag)
    /// 2) $EOY_CHARTS_CONFIG
    /// 3) config/crawl.toml
    /// 4) built-in defaults
    ///
    /// Env overrides for delay and origin are applied on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = if let Some(p) = explicit {
            Self::load_from(p)?
        } else if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from(Path::new(DEFAULT_CONFIG_PATH))?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(ms) = env::var(ENV_DELAY_MS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.delay_ms = ms;
        }
        if let Ok(origin) = env::var(ENV_ORIGIN) {
            let origin = origin.trim().trim_end_matches('/');
            if !origin.is_empty() {
                self.origin = origin.to_string();
            }
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Site-relative path of the index page for `year`.
    pub fn index_path(&self, year: &str) -> String {
        self.index_path_template.replace("{year}", year)
    }

    pub fn index_url(&self, year: &str) -> String {
        format!("{}{}", self.origin, self.index_path(year))
    }
}

/// Accept exactly four ASCII digits; anything else falls back to [`DEFAULT_YEAR`].
pub fn resolve_year(arg: Option<&str>) -> String {
    match arg.map(str::trim) {
        Some(y) if y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()) => y.to_string(),
        Some(other) => {
            tracing::debug!(arg = other, fallback = DEFAULT_YEAR, "ignoring malformed year");
            DEFAULT_YEAR.to_string()
        }
        None => DEFAULT_YEAR.to_string(),
    }
}
