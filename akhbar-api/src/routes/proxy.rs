//! Feed relay endpoint
//!
//! Lets the presentation layer read feeds that would otherwise be blocked
//! by the browser. Always answers with an XML document: the upstream body,
//! a Google News search scoped to the same host, or a one-item fallback feed.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use akhbar_news::google_news::{hostname_of, is_google_news_url, site_search_url};
use akhbar_news::placeholder::empty_feed_document;
use akhbar_news::relay::DEFAULT_RELAY_TIMEOUT;
use akhbar_news::{alternate_url, FeedRelay, RelayRequest};

use crate::AppState;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Where a relayed document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaySource {
    Upstream,
    SiteSearch,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct RelayedFeed {
    pub source: RelaySource,
    pub content_type: String,
    pub body: String,
}

/// Create proxy routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/rss-proxy", get(rss_proxy))
}

/// GET /api/rss-proxy?url=...
async fn rss_proxy(State(state): State<AppState>, Query(params): Query<ProxyQuery>) -> Response {
    let url = match params.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "URL parameter is required" })),
            )
                .into_response();
        }
    };

    let feed = relay_feed(state.relay.as_ref(), &url).await;
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, feed.content_type),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        feed.body,
    )
        .into_response()
}

/// Fetch a feed for a client, degrading step by step instead of failing
pub async fn relay_feed<R: FeedRelay + ?Sized>(relay: &R, url: &str) -> RelayedFeed {
    let target = alternate_url(url).unwrap_or(url);
    if target != url {
        debug!("Relaying {} via alternate {}", url, target);
    }

    if let Some(feed) = try_relay(relay, target, RelaySource::Upstream).await {
        return feed;
    }

    if !is_google_news_url(target) {
        if let Some(host) = hostname_of(target) {
            let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
            let search = site_search_url(&host);
            if let Some(feed) = try_relay(relay, &search, RelaySource::SiteSearch).await {
                return feed;
            }
        }
    }

    warn!("Relay exhausted for {}, serving fallback feed", url);
    RelayedFeed {
        source: RelaySource::Fallback,
        content_type: XML_CONTENT_TYPE.to_string(),
        body: empty_feed_document(url),
    }
}

async fn try_relay<R: FeedRelay + ?Sized>(relay: &R, url: &str, source: RelaySource) -> Option<RelayedFeed> {
    let request = RelayRequest::new(url, DEFAULT_RELAY_TIMEOUT);
    match relay.relay(&request).await {
        Ok(response) if response.has_content() => Some(RelayedFeed {
            source,
            content_type: response
                .content_type
                .unwrap_or_else(|| XML_CONTENT_TYPE.to_string()),
            body: response.body,
        }),
        Ok(response) => {
            debug!("Relay of {} returned status {}", url, response.status);
            None
        }
        Err(e) => {
            debug!("Relay of {} failed: {}", url, e);
            None
        }
    }
}
