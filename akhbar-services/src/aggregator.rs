//! News Aggregator
//!
//! Fetches priority groups of sources as concurrent batches, merges every
//! batch through validation, classification and deduplication, then drops
//! stale items, sorts newest first, truncates and backfills thin categories.
//!
//! Merges run sequentially after each batch settles, so the accumulating
//! set needs no locking. Only the last report is shared with readers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use akhbar_core::{CategoryLabel, FeedItem, GroupKind, SourceDirectory, SourceGroup, SourceSpec};
use akhbar_news::links::{is_invalid_article_link, repair_link};
use akhbar_news::{
    category_sources, curated_groups, source_directory, FeedRelay, FetchOutcome, FetchPath,
    NewsApiClient, NewsError, SourceFetcher,
};

use crate::classifier::CategoryClassifier;
use crate::config::{AggregateOptions, AggregatorConfig, CategoryFilter};
use crate::dedup::{Deduplicator, UniqueItems};
use crate::keywords::KeywordTables;

/// Source name the JSON search API is reported under
const NEWS_API_SOURCE: &str = "NewsAPI";

/// Language of free-text searches
const SEARCH_LANGUAGE: &str = "ar";

type ApiResult = Result<Vec<FeedItem>, NewsError>;
type CategoryBatch = (Vec<FetchOutcome>, Option<ApiResult>);

// ============================================================================
// Results
// ============================================================================

/// Overall health of one aggregation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationStatus {
    /// Every attempted source returned live data
    Complete,
    /// Some sources fell back to placeholders or returned nothing
    Degraded,
    /// No source returned live or placeholder data
    Exhausted,
}

/// What happened during one aggregation pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    pub groups_fetched: Vec<GroupKind>,
    pub groups_skipped: Vec<GroupKind>,
    pub timed_out_categories: Vec<CategoryLabel>,
    pub sources_attempted: usize,
    pub live_sources: usize,
    pub placeholder_sources: usize,
    pub exhausted_sources: usize,
    /// Items returned by fetchers before any filtering
    pub raw_items: usize,
    pub invalid_dropped: usize,
    pub duplicates_dropped: usize,
    pub stale_dropped: usize,
    pub backfilled: usize,
    pub finished_at: DateTime<Utc>,
}

impl AggregationReport {
    fn record(&mut self, outcome: &FetchOutcome) {
        self.sources_attempted += 1;
        self.raw_items += outcome.items.len();
        match outcome.path {
            FetchPath::Placeholder => self.placeholder_sources += 1,
            FetchPath::Exhausted => self.exhausted_sources += 1,
            _ => self.live_sources += 1,
        }
    }

    fn record_api(&mut self, result: &ApiResult) {
        self.sources_attempted += 1;
        match result {
            Ok(items) => {
                self.live_sources += 1;
                self.raw_items += items.len();
            }
            Err(_) => self.exhausted_sources += 1,
        }
    }

    pub fn status(&self) -> AggregationStatus {
        if self.live_sources == 0 && self.placeholder_sources == 0 {
            AggregationStatus::Exhausted
        } else if self.placeholder_sources > 0 || self.exhausted_sources > 0 {
            AggregationStatus::Degraded
        } else {
            AggregationStatus::Complete
        }
    }
}

/// Bounded, sorted items plus status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub items: Vec<FeedItem>,
    pub status: AggregationStatus,
    pub report: AggregationReport,
}

impl AggregationResult {
    /// Empty because every source failed; the caller substitutes cached content
    pub fn is_exhausted(&self) -> bool {
        self.status == AggregationStatus::Exhausted
    }
}

/// Items for every category, each list filtered, sorted and backfilled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub categories: BTreeMap<CategoryLabel, Vec<FeedItem>>,
    pub status: AggregationStatus,
    pub report: AggregationReport,
}

impl CategoryView {
    pub fn items(&self, category: CategoryLabel) -> &[FeedItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ============================================================================
// Aggregator
// ============================================================================

pub struct NewsAggregator<R: FeedRelay> {
    fetcher: SourceFetcher<R>,
    news_api: Option<NewsApiClient<R>>,
    classifier: CategoryClassifier,
    dedup: Deduplicator,
    groups: Vec<SourceGroup>,
    category_feeds: HashMap<CategoryLabel, Vec<SourceSpec>>,
    config: AggregatorConfig,
    last_report: RwLock<Option<AggregationReport>>,
}

impl<R: FeedRelay> NewsAggregator<R> {
    pub fn new(
        relay: Arc<R>,
        groups: Vec<SourceGroup>,
        tables: Arc<KeywordTables>,
        directory: Arc<SourceDirectory>,
        config: AggregatorConfig,
    ) -> Self {
        info!(
            "Initializing NewsAggregator with {} groups, {} sources",
            groups.len(),
            groups.iter().map(|g| g.sources.len()).sum::<usize>()
        );

        let fetcher = SourceFetcher::new(Arc::clone(&relay)).with_timeout(config.fetch_timeout());
        let news_api = config.news_api_key.clone().map(|key| {
            NewsApiClient::new(Arc::clone(&relay), key).with_timeout(config.fetch_timeout())
        });

        Self {
            fetcher,
            news_api,
            classifier: CategoryClassifier::new(Arc::clone(&tables), directory),
            dedup: Deduplicator::new(tables),
            groups,
            category_feeds: HashMap::new(),
            config,
            last_report: RwLock::new(None),
        }
    }

    /// Curated groups, built-in tables and the dedicated category feeds
    pub fn with_defaults(relay: Arc<R>, config: AggregatorConfig) -> Self {
        let mut aggregator = Self::new(
            relay,
            curated_groups(),
            Arc::new(KeywordTables::builtin()),
            Arc::new(source_directory()),
            config,
        );
        for category in CategoryLabel::ALL {
            aggregator
                .category_feeds
                .insert(category, category_sources(category));
        }
        aggregator
    }

    /// Dedicated feeds used by the per-category view
    pub fn with_category_sources(mut self, category: CategoryLabel, sources: Vec<SourceSpec>) -> Self {
        self.category_feeds.insert(category, sources);
        self
    }

    /// Replace the JSON search client built from the configuration
    pub fn with_news_api(mut self, client: NewsApiClient<R>) -> Self {
        self.news_api = Some(client);
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn groups(&self) -> &[SourceGroup] {
        &self.groups
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Report of the most recent pass
    pub fn last_report(&self) -> Option<AggregationReport> {
        self.last_report.read().clone()
    }

    /// Aggregate the configured groups
    pub async fn aggregate(&self, options: AggregateOptions) -> AggregationResult {
        self.aggregate_groups(&self.groups, options).await
    }

    /// Aggregate the given groups into one bounded list
    #[instrument(skip(self, groups), fields(groups = groups.len()))]
    pub async fn aggregate_groups(
        &self,
        groups: &[SourceGroup],
        options: AggregateOptions,
    ) -> AggregationResult {
        let (pool, mut report) = self.collect(groups, options.category).await;
        report.duplicates_dropped = pool.dropped();

        let (selected, donors): (Vec<FeedItem>, Vec<FeedItem>) = pool
            .into_items()
            .into_iter()
            .partition(|item| options.category.admits(item.category));

        let mut items = finish(selected, &options, &mut report);

        if let CategoryFilter::Only(category) = options.category {
            let (donors, _) = drop_stale(donors, options.freshness_days);
            let wanted = options.min_per_category.min(options.limit);
            report.backfilled += self.backfill(&mut items, category, &donors, wanted);
        }

        let status = self.conclude(&mut report);
        info!(
            "Aggregated {} items ({:?}): {} live, {} placeholder, {} exhausted sources",
            items.len(),
            status,
            report.live_sources,
            report.placeholder_sources,
            report.exhausted_sources
        );

        AggregationResult {
            items,
            status,
            report,
        }
    }

    /// Every category at once: the configured groups plus each category's
    /// dedicated feeds, each category bounded by its own timeout.
    #[instrument(skip(self))]
    pub async fn aggregate_categories(&self, options: AggregateOptions) -> CategoryView {
        let category_fetches = join_all(CategoryLabel::ALL.iter().map(|c| self.fetch_category(*c)));
        let ((pool, mut report), batches) =
            tokio::join!(self.collect(&self.groups, CategoryFilter::All), category_fetches);
        report.duplicates_dropped = pool.dropped();

        let mut buckets: BTreeMap<CategoryLabel, UniqueItems> = CategoryLabel::ALL
            .iter()
            .map(|c| (*c, UniqueItems::new(self.dedup.clone())))
            .collect();

        for item in pool.into_items() {
            let category = item.category.unwrap_or(CategoryLabel::General);
            if let Some(bucket) = buckets.get_mut(&category) {
                bucket.push(item);
            }
        }

        for (category, batch) in CategoryLabel::ALL.into_iter().zip(batches) {
            let Some((outcomes, api)) = batch else {
                report.timed_out_categories.push(category);
                continue;
            };

            let mut fetched = Vec::new();
            for outcome in outcomes {
                report.record(&outcome);
                fetched.extend(outcome.items);
            }
            if let Some(result) = api {
                report.record_api(&result);
                fetched.extend(result.unwrap_or_default());
            }

            for item in fetched {
                let Some(item) = self.admit(item) else {
                    report.invalid_dropped += 1;
                    continue;
                };
                let item = item.with_category(category);

                if category != CategoryLabel::General && self.classifier.is_important(&item, category) {
                    if let Some(general) = buckets.get_mut(&CategoryLabel::General) {
                        general.push(item.clone().with_category(CategoryLabel::General));
                    }
                }
                if let Some(bucket) = buckets.get_mut(&category) {
                    bucket.push(item);
                }
            }
        }

        let mut categories = BTreeMap::new();
        for (category, bucket) in buckets {
            report.duplicates_dropped += bucket.dropped();
            categories.insert(category, finish(bucket.into_items(), &options, &mut report));
        }

        let snapshot = categories.clone();
        let wanted = options.min_per_category.min(options.limit);
        for category in CategoryLabel::ALL {
            let donors: Vec<FeedItem> = snapshot
                .iter()
                .filter(|(other, _)| **other != category)
                .flat_map(|(_, items)| items.iter().cloned())
                .collect();
            if let Some(items) = categories.get_mut(&category) {
                report.backfilled += self.backfill(items, category, &donors, wanted);
            }
        }

        let status = self.conclude(&mut report);
        for (category, items) in &categories {
            debug!("{}: {} items", category, items.len());
        }

        CategoryView {
            categories,
            status,
            report,
        }
    }

    /// Free-text search through the JSON API, filtered and ordered like a
    /// feed pass. `None` when no API key is configured. Does not replace
    /// the last aggregation report.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, options: AggregateOptions) -> Option<AggregationResult> {
        let client = self.news_api.as_ref()?;
        let mut report = AggregationReport::default();

        let result = client
            .search(query, SEARCH_LANGUAGE, self.config.news_api_page_size)
            .await;
        if let Err(e) = &result {
            warn!("{} search for '{}' failed: {}", NEWS_API_SOURCE, query, e);
        }
        report.record_api(&result);

        let mut pool = UniqueItems::new(self.dedup.clone());
        if let Ok(items) = result {
            self.merge(&mut pool, items, &mut report);
        }
        report.duplicates_dropped = pool.dropped();

        let selected: Vec<FeedItem> = pool
            .into_items()
            .into_iter()
            .filter(|item| options.category.admits(item.category))
            .collect();
        let items = finish(selected, &options, &mut report);

        report.finished_at = Utc::now();
        let status = report.status();
        info!("Search '{}' returned {} items ({:?})", query, items.len(), status);

        Some(AggregationResult {
            items,
            status,
            report,
        })
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Fetch groups in order, each as one concurrent batch, merging after
    /// each batch settles.
    async fn collect(
        &self,
        groups: &[SourceGroup],
        filter: CategoryFilter,
    ) -> (UniqueItems, AggregationReport) {
        let mut pool = UniqueItems::new(self.dedup.clone());
        let mut report = AggregationReport::default();

        for group in groups {
            if !self.should_fetch(group.kind, pool.len(), report.live_sources) {
                debug!(
                    "Skipping {} group: {} items, {} live sources",
                    group.kind,
                    pool.len(),
                    report.live_sources
                );
                report.groups_skipped.push(group.kind);
                continue;
            }
            report.groups_fetched.push(group.kind);

            let fetches = join_all(group.sources.iter().map(|s| self.fetcher.fetch(s)));
            let (outcomes, api) = if group.kind == GroupKind::Reliable {
                let category = filter.label().unwrap_or(CategoryLabel::General);
                tokio::join!(fetches, self.fetch_news_api(category))
            } else {
                (fetches.await, None)
            };

            for outcome in outcomes {
                report.record(&outcome);
                self.merge(&mut pool, outcome.items, &mut report);
            }
            if let Some(result) = api {
                report.record_api(&result);
                if let Ok(items) = result {
                    self.merge(&mut pool, items, &mut report);
                }
            }

            info!(
                "{} group: {} sources fetched, {} unique items so far",
                group.kind,
                group.sources.len(),
                pool.len()
            );
        }

        (pool, report)
    }

    fn should_fetch(&self, kind: GroupKind, items: usize, live_sources: usize) -> bool {
        if kind.always_fetch() {
            return true;
        }
        let below_minimum = items < self.config.min_items;
        match kind {
            GroupKind::Backup => below_minimum || live_sources < self.config.min_live_sources,
            _ => below_minimum,
        }
    }

    /// NewsAPI headlines for every configured country, `None` when unconfigured
    async fn fetch_news_api(&self, category: CategoryLabel) -> Option<ApiResult> {
        let client = self.news_api.as_ref()?;
        let page_size = self.config.news_api_page_size;
        let results = join_all(
            self.config
                .news_api_countries
                .iter()
                .map(|country| client.top_headlines(country, category, page_size)),
        )
        .await;

        let mut items = Vec::new();
        let mut last_error = None;
        for result in results {
            match result {
                Ok(batch) => items.extend(batch),
                Err(e) => {
                    warn!("{} {} headlines failed: {}", NEWS_API_SOURCE, category, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if items.is_empty() => Some(Err(e)),
            _ => Some(Ok(items)),
        }
    }

    /// Dedicated feeds and NewsAPI headlines for one category, `None` on timeout.
    /// General headlines come from the Reliable group pass instead.
    async fn fetch_category(&self, category: CategoryLabel) -> Option<CategoryBatch> {
        let sources = self
            .category_feeds
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let work = async {
            let fetches = join_all(sources.iter().map(|s| self.fetcher.fetch(s)));
            let headlines = async {
                if category == CategoryLabel::General {
                    None
                } else {
                    self.fetch_news_api(category).await
                }
            };
            tokio::join!(fetches, headlines)
        };

        match timeout(self.config.category_timeout(), work).await {
            Ok(batch) => Some(batch),
            Err(_) => {
                warn!(
                    "{} feeds timed out after {}ms",
                    category, self.config.category_timeout_ms
                );
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Merging
    // ------------------------------------------------------------------------

    fn merge(&self, pool: &mut UniqueItems, items: Vec<FeedItem>, report: &mut AggregationReport) {
        for item in items {
            let Some(mut item) = self.admit(item) else {
                report.invalid_dropped += 1;
                continue;
            };
            self.classifier.classify_item(&mut item);
            pool.push(item);
        }
    }

    /// Reject unusable items and make sure the link is usable
    fn admit(&self, mut item: FeedItem) -> Option<FeedItem> {
        let title = item.title.trim();
        if title.is_empty() {
            return None;
        }
        if self
            .config
            .title_denylist
            .iter()
            .any(|denied| title.contains(denied.as_str()))
        {
            debug!("Dropped denylisted item: {}", title);
            return None;
        }
        let lowered = title.to_lowercase();
        if self
            .config
            .problematic_fragments
            .iter()
            .any(|fragment| lowered.contains(fragment.as_str()))
        {
            debug!("Dropped item with problematic title: {}", title);
            return None;
        }

        if is_invalid_article_link(&item.link) {
            item.link = repair_link(&item.link, &item.title, &item.source_name, None);
        }
        if is_invalid_article_link(&item.link) {
            debug!("Dropped item without a usable link: {}", item.title);
            return None;
        }
        Some(item)
    }

    /// Top `items` up to `wanted` with donors matching the category's
    /// keywords, newest donors first. Returns how many were added.
    fn backfill(
        &self,
        items: &mut Vec<FeedItem>,
        category: CategoryLabel,
        donors: &[FeedItem],
        wanted: usize,
    ) -> usize {
        if items.len() >= wanted {
            return 0;
        }

        let mut accepted = UniqueItems::new(self.dedup.clone());
        accepted.extend(items.iter().cloned());

        let mut candidates: Vec<&FeedItem> = donors
            .iter()
            .filter(|d| d.category != Some(category))
            .collect();
        candidates.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let before = items.len();
        for donor in candidates
            .iter()
            .filter(|d| self.classifier.matches_category(d, category))
        {
            if items.len() >= wanted {
                break;
            }
            if accepted.push((*donor).clone()) {
                items.push((*donor).clone().with_category(category));
            }
        }

        if self.config.relaxed_backfill {
            for donor in &candidates {
                if items.len() >= wanted {
                    break;
                }
                if accepted.push((*donor).clone()) {
                    items.push((*donor).clone().with_category(category));
                }
            }
        }

        let added = items.len() - before;
        if added > 0 {
            sort_newest_first(items);
            info!("Backfilled {} items into {}", added, category);
        }
        added
    }

    fn conclude(&self, report: &mut AggregationReport) -> AggregationStatus {
        report.finished_at = Utc::now();
        let status = report.status();
        if status == AggregationStatus::Exhausted {
            error!(
                "Every source failed ({} attempted) and no placeholder data was available",
                report.sources_attempted
            );
        }
        *self.last_report.write() = Some(report.clone());
        status
    }
}

// ============================================================================
// Ordering and freshness
// ============================================================================

/// Whether an item is inside the freshness window; inferred dates always are
pub fn is_fresh(item: &FeedItem, cutoff: DateTime<Utc>) -> bool {
    item.date_inferred || item.published_at >= cutoff
}

/// Newest first; equal times keep their relative order
pub fn sort_newest_first(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

fn drop_stale(items: Vec<FeedItem>, freshness_days: i64) -> (Vec<FeedItem>, usize) {
    let cutoff = Utc::now() - ChronoDuration::days(freshness_days);
    let before = items.len();
    let fresh: Vec<FeedItem> = items.into_iter().filter(|i| is_fresh(i, cutoff)).collect();
    let dropped = before - fresh.len();
    (fresh, dropped)
}

/// Freshness filter, sort and truncate
fn finish(items: Vec<FeedItem>, options: &AggregateOptions, report: &mut AggregationReport) -> Vec<FeedItem> {
    let (mut fresh, stale) = drop_stale(items, options.freshness_days);
    report.stale_dropped += stale;
    sort_newest_first(&mut fresh);
    fresh.truncate(options.limit);
    fresh
}
