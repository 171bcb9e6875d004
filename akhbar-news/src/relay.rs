//! Fetch-and-relay boundary
//!
//! Every upstream request goes through a [`FeedRelay`]. The production
//! implementation is a direct HTTPS GET with browser-like headers; tests
//! substitute scripted relays.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{header, Client};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::NewsError;
use crate::google_news::origin_of;

/// Browser user agent, several feeds reject unknown clients
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Default per-request timeout
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// A single relayed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub url: String,
    pub timeout: Duration,
}

impl RelayRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Timeout in whole milliseconds, for error reporting
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// What the relay got back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RelayResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/xml".to_string()),
            body: body.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Success with a non-blank body
    pub fn has_content(&self) -> bool {
        self.is_success() && !self.body.trim().is_empty()
    }
}

/// Request/response boundary used by the source fetcher
#[async_trait]
pub trait FeedRelay: Send + Sync {
    /// Perform one GET. Non-success statuses are returned, not raised.
    async fn relay(&self, request: &RelayRequest) -> Result<RelayResponse, NewsError>;
}

/// Direct outbound HTTP relay
#[derive(Clone)]
pub struct HttpRelay {
    client: Client,
}

impl HttpRelay {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_RELAY_TIMEOUT)
                .user_agent(BROWSER_USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Use an existing client (shared connection pool)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedRelay for HttpRelay {
    async fn relay(&self, request: &RelayRequest) -> Result<RelayResponse, NewsError> {
        debug!("Relaying GET {}", request.url);

        let mut builder = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .header(
                header::ACCEPT,
                "application/rss+xml,application/atom+xml,application/xml;q=0.9,text/xml;q=0.9,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "ar,en-US;q=0.7,en;q=0.5")
            .header(header::PRAGMA, "no-cache")
            .header(header::CACHE_CONTROL, "no-cache");

        if let Some(origin) = origin_of(&request.url) {
            builder = builder.header(header::REFERER, origin);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                NewsError::Timeout(request.timeout_ms())
            } else {
                NewsError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                NewsError::Timeout(request.timeout_ms())
            } else {
                NewsError::RequestFailed(e.to_string())
            }
        })?;

        Ok(RelayResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Scripted behaviour of one URL on a [`MemoryRelay`]
#[derive(Debug, Clone)]
pub enum MemoryRoute {
    Respond(RelayResponse),
    Fail(String),
    /// Never answers; the caller's timeout decides
    Stall,
}

/// In-memory relay serving scripted responses.
///
/// Unknown URLs answer 404. Every requested URL is recorded in order.
#[derive(Debug, Default)]
pub struct MemoryRelay {
    routes: HashMap<String, MemoryRoute>,
    calls: Mutex<Vec<String>>,
}

impl MemoryRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200
    pub fn respond(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), MemoryRoute::Respond(RelayResponse::ok(body)));
        self
    }

    /// Answer with an empty body and the given status
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(
            url.to_string(),
            MemoryRoute::Respond(RelayResponse::with_status(status)),
        );
        self
    }

    /// Fail with a connection error
    pub fn fail(mut self, url: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            MemoryRoute::Fail(format!("connection refused: {}", url)),
        );
        self
    }

    pub fn stall(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), MemoryRoute::Stall);
        self
    }

    /// URLs requested so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl FeedRelay for MemoryRelay {
    async fn relay(&self, request: &RelayRequest) -> Result<RelayResponse, NewsError> {
        self.calls.lock().push(request.url.clone());

        match self.routes.get(&request.url) {
            Some(MemoryRoute::Respond(response)) => Ok(response.clone()),
            Some(MemoryRoute::Fail(message)) => Err(NewsError::RequestFailed(message.clone())),
            Some(MemoryRoute::Stall) => {
                tokio::time::sleep(request.timeout + Duration::from_secs(60)).await;
                Err(NewsError::Timeout(request.timeout_ms()))
            }
            None => Ok(RelayResponse::with_status(404)),
        }
    }
}
