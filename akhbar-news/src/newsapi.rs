//! NewsAPI-compatible JSON search client
//!
//! Top headlines by country and category, and free-text search by
//! language. Requests go through the same [`FeedRelay`] as the
//! feeds so they share timeouts and test doubles.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use akhbar_core::{CategoryLabel, FeedItem};

use crate::error::NewsError;
use crate::links::repair_link;
use crate::parser::parse_feed_date;
use crate::relay::{FeedRelay, RelayRequest, DEFAULT_RELAY_TIMEOUT};

/// Public NewsAPI endpoint
pub const NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";

/// Title NewsAPI substitutes for withdrawn articles
const REMOVED_TITLE: &str = "[Removed]";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
    /// Present when `status` is "error"
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    #[serde(default)]
    pub source: NewsApiSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsApiSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewsApiArticle {
    /// Convert to a feed item, dropping untitled and withdrawn articles
    fn into_item(self, category: Option<CategoryLabel>) -> Option<FeedItem> {
        let title = self.title?.trim().to_string();
        if title.is_empty() || title == REMOVED_TITLE {
            return None;
        }
        let source_name = self
            .source
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "NewsAPI".to_string());
        let link = repair_link(self.url.as_deref().unwrap_or_default(), &title, &source_name, None);

        let mut item = FeedItem::new(title, link, source_name)
            .with_description(self.description.unwrap_or_default())
            .with_image(self.url_to_image.filter(|u| u.starts_with("http")));
        if let Some(at) = self.published_at.as_deref().and_then(parse_feed_date) {
            item = item.with_published_at(at);
        }
        if let Some(category) = category {
            item = item.with_category(category);
        }
        Some(item)
    }
}

// ============================================================================
// Client
// ============================================================================

/// NewsAPI client
pub struct NewsApiClient<R: FeedRelay> {
    relay: Arc<R>,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl<R: FeedRelay> NewsApiClient<R> {
    pub fn new(relay: Arc<R>, api_key: String) -> Self {
        Self {
            relay,
            api_key,
            base_url: NEWS_API_BASE_URL.to_string(),
            timeout: DEFAULT_RELAY_TIMEOUT,
        }
    }

    /// Point at a compatible deployment
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Top headlines for one country and category
    #[instrument(skip(self))]
    pub async fn top_headlines(
        &self,
        country: &str,
        category: CategoryLabel,
        page_size: usize,
    ) -> Result<Vec<FeedItem>, NewsError> {
        let url = format!(
            "{}/top-headlines?country={}&category={}&pageSize={}&apiKey={}",
            self.base_url,
            urlencoding::encode(country),
            category.as_str(),
            page_size,
            urlencoding::encode(&self.api_key)
        );
        let response = self.get(&url).await?;
        let items: Vec<FeedItem> = response
            .articles
            .into_iter()
            .filter_map(|a| a.into_item(Some(category)))
            .collect();

        info!("NewsAPI: {} {} headlines for {}", items.len(), category, country);
        Ok(items)
    }

    /// Free-text search
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        language: &str,
        page_size: usize,
    ) -> Result<Vec<FeedItem>, NewsError> {
        let url = format!(
            "{}/everything?q={}&language={}&pageSize={}&apiKey={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(language),
            page_size,
            urlencoding::encode(&self.api_key)
        );
        let response = self.get(&url).await?;
        Ok(response
            .articles
            .into_iter()
            .filter_map(|a| a.into_item(None))
            .collect())
    }

    async fn get(&self, url: &str) -> Result<NewsApiResponse, NewsError> {
        if self.api_key.trim().is_empty() {
            return Err(NewsError::InvalidConfig("NewsAPI key is empty".to_string()));
        }

        let request = RelayRequest::new(url, self.timeout);
        let response = tokio::time::timeout(self.timeout, self.relay.relay(&request))
            .await
            .map_err(|_| NewsError::Timeout(request.timeout_ms()))??;

        if response.status == 429 {
            return Err(NewsError::RateLimited);
        }
        if !response.is_success() {
            return Err(NewsError::ApiError {
                status: response.status,
                message: response.body.chars().take(200).collect(),
            });
        }

        let parsed: NewsApiResponse =
            serde_json::from_str(&response.body).map_err(|e| NewsError::ParseError(e.to_string()))?;

        if parsed.status != "ok" {
            let code = parsed.code.unwrap_or_default();
            if code == "rateLimited" {
                return Err(NewsError::RateLimited);
            }
            return Err(NewsError::ApiError {
                status: response.status,
                message: parsed.message.unwrap_or(code),
            });
        }

        debug!("NewsAPI: {} total results", parsed.total_results);
        Ok(parsed)
    }
}
