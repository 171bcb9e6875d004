//! Source Fetcher
//!
//! Fetches one upstream feed through a fallback chain:
//!
//! 1. the primary URL,
//! 2. an alternate URL (the source's own, else the static alternate table),
//! 3. a Google News `site:` search scoped to the primary host,
//! 4. the source's placeholder items.
//!
//! Each network step carries its own timeout. Nothing here returns an
//! error: the chain always resolves to a [`FetchOutcome`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use akhbar_core::{FeedItem, SourceSpec};

use crate::catalog::alternate_url;
use crate::error::NewsError;
use crate::google_news::{hostname_of, origin_of, site_search_url};
use crate::parser::{parse_feed, ParseOutcome};
use crate::placeholder::placeholder_items;
use crate::relay::{FeedRelay, RelayRequest, DEFAULT_RELAY_TIMEOUT};

/// Markers that qualify an item from a breaking-designated source
pub const BREAKING_MARKERS: &[&str] = &[
    "عاجل",
    "مباشر",
    "الآن",
    "تطورات",
    "خبر عاجل",
    "آخر الأخبار",
    "تحديث",
    "بث مباشر",
];

/// Which step of the chain produced the items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPath {
    Primary,
    Alternate,
    SiteSearch,
    /// Every network step failed; static items were substituted
    Placeholder,
    /// Every network step failed and no placeholder exists
    Exhausted,
}

impl FetchPath {
    /// Whether the items came from the network
    pub fn is_live(&self) -> bool {
        matches!(self, FetchPath::Primary | FetchPath::Alternate | FetchPath::SiteSearch)
    }
}

/// Items from one source and how they were obtained
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub items: Vec<FeedItem>,
    pub path: FetchPath,
}

impl FetchOutcome {
    fn new(items: Vec<FeedItem>, path: FetchPath) -> Self {
        Self { items, path }
    }

    /// Placeholder items if any exist, else an exhausted outcome
    fn fallback(source_name: &str) -> Self {
        let items = placeholder_items(source_name);
        if items.is_empty() {
            Self::new(items, FetchPath::Exhausted)
        } else {
            Self::new(items, FetchPath::Placeholder)
        }
    }

    pub fn is_live(&self) -> bool {
        self.path.is_live()
    }
}

/// Fetches sources through a [`FeedRelay`]
pub struct SourceFetcher<R: FeedRelay> {
    relay: Arc<R>,
    timeout: Duration,
}

impl<R: FeedRelay> Clone for SourceFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            timeout: self.timeout,
        }
    }
}

impl<R: FeedRelay> SourceFetcher<R> {
    pub fn new(relay: Arc<R>) -> Self {
        Self {
            relay,
            timeout: DEFAULT_RELAY_TIMEOUT,
        }
    }

    /// Per-step timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch a configured source.
    ///
    /// Breaking-designated sources keep only items carrying a breaking
    /// marker; those are flagged and attributed to the display name.
    #[instrument(skip(self, source), fields(source = %source.name))]
    pub async fn fetch(&self, source: &SourceSpec) -> FetchOutcome {
        let base_url = source
            .base_url
            .clone()
            .or_else(|| origin_of(&source.primary_url));

        let mut outcome = self
            .run_chain(
                &source.primary_url,
                source.fallback_url.as_deref(),
                &source.name,
                base_url.as_deref(),
                self.timeout,
            )
            .await;

        if source.breaking {
            let before = outcome.items.len();
            outcome.items = filter_breaking(outcome.items, source.display_name());
            debug!(
                "{}: kept {} of {} items as breaking",
                source.name,
                outcome.items.len(),
                before
            );
        }

        outcome
    }

    /// Fetch a bare URL with an explicit timeout
    pub async fn fetch_url(&self, url: &str, source_name: &str, timeout: Duration) -> FetchOutcome {
        let base_url = origin_of(url);
        self.run_chain(url, None, source_name, base_url.as_deref(), timeout)
            .await
    }

    async fn run_chain(
        &self,
        primary: &str,
        fallback: Option<&str>,
        source_name: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> FetchOutcome {
        let mut tried = vec![primary.to_string()];

        match self.attempt(primary, source_name, base_url, timeout).await {
            Ok(items) => {
                debug!("{}: {} items from primary", source_name, items.len());
                return FetchOutcome::new(items, FetchPath::Primary);
            }
            Err(e) => warn!("{}: primary {} failed: {}", source_name, primary, e),
        }

        let alternate = fallback.or_else(|| alternate_url(primary));
        if let Some(alternate) = alternate.filter(|a| !tried.iter().any(|t| t.as_str() == *a)) {
            tried.push(alternate.to_string());
            match self.attempt(alternate, source_name, base_url, timeout).await {
                Ok(items) => {
                    info!("{}: {} items from alternate {}", source_name, items.len(), alternate);
                    return FetchOutcome::new(items, FetchPath::Alternate);
                }
                Err(e) => warn!("{}: alternate {} failed: {}", source_name, alternate, e),
            }
        }

        if let Some(search) = site_search_for(primary).filter(|s| !tried.contains(s)) {
            match self.attempt(&search, source_name, base_url, timeout).await {
                Ok(items) => {
                    info!("{}: {} items from site search", source_name, items.len());
                    return FetchOutcome::new(items, FetchPath::SiteSearch);
                }
                Err(e) => warn!("{}: site search failed: {}", source_name, e),
            }
        }

        let outcome = FetchOutcome::fallback(source_name);
        info!(
            "{}: all fetch paths failed, {} placeholder items",
            source_name,
            outcome.items.len()
        );
        outcome
    }

    /// One relay call plus parse. Placeholder-only payloads count as failure.
    async fn attempt(
        &self,
        url: &str,
        source_name: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Vec<FeedItem>, NewsError> {
        let request = RelayRequest::new(url, timeout);
        let response = tokio::time::timeout(timeout, self.relay.relay(&request))
            .await
            .map_err(|_| NewsError::Timeout(request.timeout_ms()))??;

        if !response.is_success() {
            return Err(NewsError::ApiError {
                status: response.status,
                message: format!("Failed to fetch {}", url),
            });
        }
        if !response.has_content() {
            return Err(NewsError::ParseError(format!("Empty body from {}", url)));
        }

        match parse_feed(&response.body, source_name, base_url) {
            ParseOutcome::Parsed(items) => Ok(items),
            ParseOutcome::Placeholder(_) => Err(NewsError::ParseError(format!(
                "No usable items in payload from {}",
                url
            ))),
        }
    }
}

/// Google News `site:` search for the host of `url`, never for Google itself
fn site_search_for(url: &str) -> Option<String> {
    let host = hostname_of(url)?;
    if host == "news.google.com" {
        return None;
    }
    let host = host.strip_prefix("www.").unwrap_or(&host);
    Some(site_search_url(host))
}

/// Whether a title or description carries a breaking marker
pub fn has_breaking_marker(item: &FeedItem) -> bool {
    BREAKING_MARKERS
        .iter()
        .any(|marker| item.title.contains(marker) || item.description.contains(marker))
}

/// Keep breaking items only, flagging them under `display_name`
pub fn filter_breaking(items: Vec<FeedItem>, display_name: &str) -> Vec<FeedItem> {
    items
        .into_iter()
        .filter(has_breaking_marker)
        .map(|mut item| {
            item.mark_breaking(display_name);
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::MemoryRelay;
    use akhbar_core::CategoryLabel;

    const PRIMARY: &str = "https://www.skynewsarabia.com/web/rss/95.xml";
    const TABLE_ALTERNATE: &str =
        "https://news.google.com/rss/search?q=site:skynewsarabia.com&hl=ar&gl=EG&ceid=EG:ar";

    fn rss(titles: &[&str]) -> String {
        let items: String = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                format!(
                    "<item><title>{}</title><link>https://www.example.com/news/{}</link></item>",
                    t, i
                )
            })
            .collect();
        format!(
            "<rss version=\"2.0\"><channel><title>t</title><link>https://www.example.com</link><description>d</description>{}</channel></rss>",
            items
        )
    }

    fn fetcher(relay: MemoryRelay) -> (Arc<MemoryRelay>, SourceFetcher<MemoryRelay>) {
        let relay = Arc::new(relay);
        let fetcher = SourceFetcher::new(Arc::clone(&relay)).with_timeout(Duration::from_millis(100));
        (relay, fetcher)
    }

    fn sky() -> SourceSpec {
        SourceSpec::new("Sky News Arabia", PRIMARY, &[CategoryLabel::General])
    }

    #[tokio::test]
    async fn test_primary_success() {
        let (relay, fetcher) = fetcher(MemoryRelay::new().respond(PRIMARY, &rss(&["خبر أول", "خبر ثان"])));
        let outcome = fetcher.fetch(&sky()).await;
        assert_eq!(outcome.path, FetchPath::Primary);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(relay.calls(), vec![PRIMARY]);
    }

    #[tokio::test]
    async fn test_alternate_table_on_error_status() {
        let (relay, fetcher) = fetcher(
            MemoryRelay::new()
                .status(PRIMARY, 403)
                .respond(TABLE_ALTERNATE, &rss(&["خبر من البحث"])),
        );
        let outcome = fetcher.fetch(&sky()).await;
        assert_eq!(outcome.path, FetchPath::Alternate);
        assert_eq!(outcome.items[0].source_name, "Sky News Arabia");
        assert_eq!(relay.calls(), vec![PRIMARY, TABLE_ALTERNATE]);
    }

    #[tokio::test]
    async fn test_own_fallback_beats_table() {
        let own = "https://mirror.skynewsarabia.com/rss.xml";
        let (relay, fetcher) = fetcher(
            MemoryRelay::new()
                .fail(PRIMARY)
                .respond(own, &rss(&["خبر من المرآة"])),
        );
        let outcome = fetcher.fetch(&sky().with_fallback(own)).await;
        assert_eq!(outcome.path, FetchPath::Alternate);
        assert_eq!(relay.calls(), vec![PRIMARY, own]);
    }

    #[tokio::test]
    async fn test_site_search_after_timeout() {
        let primary = "https://www.alwatan.com.sa/rss";
        let search = site_search_url("alwatan.com.sa");
        let (relay, fetcher) = fetcher(
            MemoryRelay::new()
                .stall(primary)
                .respond(&search, &rss(&["خبر من جوجل"])),
        );
        let source = SourceSpec::new("Al Watan", primary, &[CategoryLabel::General]);
        let outcome = fetcher.fetch(&source).await;
        assert_eq!(outcome.path, FetchPath::SiteSearch);
        assert_eq!(relay.calls(), vec![primary.to_string(), search]);
    }

    #[tokio::test]
    async fn test_site_search_not_repeated_when_alternate_is_the_same() {
        // The table alternate for Sky is already its site search
        let (relay, fetcher) = fetcher(MemoryRelay::new().fail(PRIMARY).fail(TABLE_ALTERNATE));
        let outcome = fetcher.fetch(&sky()).await;
        assert_eq!(outcome.path, FetchPath::Exhausted);
        assert!(outcome.items.is_empty());
        assert_eq!(relay.calls(), vec![PRIMARY, TABLE_ALTERNATE]);
    }

    #[tokio::test]
    async fn test_google_source_skips_site_search() {
        let url = "https://news.google.com/rss?hl=ar&gl=EG&ceid=EG:ar";
        let (relay, fetcher) = fetcher(MemoryRelay::new().status(url, 503));
        let outcome = fetcher
            .fetch(&SourceSpec::new("Google News", url, &[]))
            .await;
        assert_eq!(outcome.path, FetchPath::Placeholder);
        assert!(!outcome.items.is_empty());
        assert_eq!(relay.calls(), vec![url]);
    }

    #[tokio::test]
    async fn test_unusable_payload_continues_the_chain() {
        let primary = "https://feeds.bbci.co.uk/arabic/rss.xml";
        let search = site_search_url("feeds.bbci.co.uk");
        let (_, fetcher) = fetcher(
            MemoryRelay::new()
                .respond(primary, "<html>blocked</html>")
                .respond(&search, &rss(&["خبر حقيقي"])),
        );
        let outcome = fetcher
            .fetch(&SourceSpec::new("BBC Arabic", primary, &[]))
            .await;
        assert_eq!(outcome.path, FetchPath::SiteSearch);
        assert_eq!(outcome.items[0].title, "خبر حقيقي");
    }

    #[tokio::test]
    async fn test_fetch_url_uses_given_timeout() {
        let url = "https://www.alkhaleej.ae/slow";
        let (_, fetcher) = fetcher(MemoryRelay::new().stall(url));
        let started = std::time::Instant::now();
        let outcome = fetcher
            .fetch_url(url, "Al Khaleej", Duration::from_millis(20))
            .await;
        assert_eq!(outcome.path, FetchPath::Exhausted);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_breaking_source_filters_and_flags() {
        let url = "https://news.google.com/rss/search?q=site:wam.ae";
        let (_, fetcher) = fetcher(
            MemoryRelay::new().respond(url, &rss(&["عاجل: وصول الوفد", "افتتاح معرض", "تطورات الأزمة"])),
        );
        let source = SourceSpec::new("WAM Breaking", url, &[]).breaking("وام عاجل");
        let outcome = fetcher.fetch(&source).await;
        assert_eq!(outcome.items.len(), 2);
        assert!(outcome.items.iter().all(|i| i.is_breaking()));
        assert!(outcome.items.iter().all(|i| i.source_name == "وام عاجل"));
    }
}
