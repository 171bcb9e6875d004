//! Aggregation configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use akhbar_core::CategoryLabel;

/// Process-wide aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Timeout for each fetch step (in milliseconds)
    pub fetch_timeout_ms: u64,
    /// Timeout for one category of the per-category view (in milliseconds)
    pub category_timeout_ms: u64,
    /// Items needed before the supplementary and backup groups are skipped
    pub min_items: usize,
    /// Live sources needed before the backup group is skipped
    pub min_live_sources: usize,
    /// Exact titles that are never shown
    pub title_denylist: Vec<String>,
    /// Lowercase title fragments that mark a broken item
    pub problematic_fragments: Vec<String>,
    /// Borrow any donor once keyword-matching donors run out
    pub relaxed_backfill: bool,
    /// NewsAPI key; the API is skipped when unset
    pub news_api_key: Option<String>,
    /// Countries queried for NewsAPI headlines
    pub news_api_countries: Vec<String>,
    pub news_api_page_size: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 10_000,    // 10 seconds per step
            category_timeout_ms: 15_000, // 15 seconds per category
            min_items: 15,
            min_live_sources: 3,
            title_denylist: vec![
                "الأمم المتحدة تدعو إلى وقف إطلاق النار في الشرق الأوسط".to_string(),
            ],
            problematic_fragments: ["undefined", "null", "error", "404", "not found"]
                .into_iter()
                .map(String::from)
                .collect(),
            relaxed_backfill: false,
            news_api_key: None,
            news_api_countries: vec!["eg".to_string(), "ae".to_string()],
            news_api_page_size: 10,
        }
    }
}

impl AggregatorConfig {
    /// Defaults overlaid with environment variables
    ///
    /// Reads:
    /// - AKHBAR_FETCH_TIMEOUT_MS, AKHBAR_CATEGORY_TIMEOUT_MS
    /// - AKHBAR_MIN_ITEMS, AKHBAR_MIN_LIVE_SOURCES
    /// - AKHBAR_RELAXED_BACKFILL (true/false/1/0)
    /// - NEWS_API_KEY, NEWS_API_COUNTRIES (comma separated)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AggregatorConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parsed(&lookup, "AKHBAR_FETCH_TIMEOUT_MS")? {
            config.fetch_timeout_ms = v;
        }
        if let Some(v) = parsed(&lookup, "AKHBAR_CATEGORY_TIMEOUT_MS")? {
            config.category_timeout_ms = v;
        }
        if let Some(v) = parsed(&lookup, "AKHBAR_MIN_ITEMS")? {
            config.min_items = v;
        }
        if let Some(v) = parsed(&lookup, "AKHBAR_MIN_LIVE_SOURCES")? {
            config.min_live_sources = v;
        }
        if let Some(raw) = lookup("AKHBAR_RELAXED_BACKFILL") {
            config.relaxed_backfill = parse_flag("AKHBAR_RELAXED_BACKFILL", &raw)?;
        }
        if let Some(key) = lookup("NEWS_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.news_api_key = Some(key.trim().to_string());
        }
        if let Some(raw) = lookup("NEWS_API_COUNTRIES") {
            let countries: Vec<String> = raw
                .split(',')
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect();
            if countries.is_empty() {
                return Err(ConfigError::Empty("NEWS_API_COUNTRIES".to_string()));
            }
            config.news_api_countries = countries;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch_timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if self.category_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "category_timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn category_timeout(&self) -> Duration {
        Duration::from_millis(self.category_timeout_ms)
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("{0} cannot be empty")]
    Empty(String),
}

// ============================================================================
// Per-call options
// ============================================================================

/// Which categories a call returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryLabel),
}

impl CategoryFilter {
    pub fn admits(&self, category: Option<CategoryLabel>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(*wanted),
        }
    }

    pub fn label(&self) -> Option<CategoryLabel> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(label) => Some(*label),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = akhbar_core::AkhbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

/// Options for one aggregation call
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    pub category: CategoryFilter,
    /// Result cap
    pub limit: usize,
    /// Items older than this many days are dropped when their date is known
    pub freshness_days: i64,
    /// Per-category minimum the backfill tops up to
    pub min_per_category: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            limit: 20,
            freshness_days: 14,
            min_per_category: 5,
        }
    }
}

impl AggregateOptions {
    pub fn for_category(category: CategoryLabel) -> Self {
        Self {
            category: CategoryFilter::Only(category),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_freshness_days(mut self, days: i64) -> Self {
        self.freshness_days = days;
        self
    }

    pub fn with_min_per_category(mut self, min: usize) -> Self {
        self.min_per_category = min;
        self
    }
}
