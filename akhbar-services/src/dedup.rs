//! Near-duplicate detection
//!
//! Four rules, checked in order against everything accepted so far:
//! exact normalized title, identical link, title containment and shared
//! topical keywords. The first item seen wins; later duplicates are dropped.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use akhbar_core::text::normalize;
use akhbar_core::FeedItem;

use crate::keywords::KeywordTables;

/// Titles shorter than this (normalized) only go through exact and link checks
pub const MIN_FUZZY_TITLE_CHARS: usize = 10;

/// Shared topical keywords needed for an overlap match
const TOPIC_OVERLAP: usize = 2;

/// Which rule flagged a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateRule {
    ExactTitle,
    SameLink,
    Substring,
    TopicOverlap,
}

impl fmt::Display for DuplicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicateRule::ExactTitle => "exact-title",
            DuplicateRule::SameLink => "same-link",
            DuplicateRule::Substring => "substring",
            DuplicateRule::TopicOverlap => "topic-overlap",
        };
        f.write_str(name)
    }
}

/// Comparable form of an item
#[derive(Debug, Clone)]
struct Fingerprint {
    title: String,
    title_chars: usize,
    link: String,
}

impl Fingerprint {
    fn of(item: &FeedItem) -> Self {
        let title = normalize(&item.title);
        Self {
            title_chars: title.chars().count(),
            title,
            link: item.link.trim().to_string(),
        }
    }

    fn is_fuzzy_comparable(&self) -> bool {
        self.title_chars >= MIN_FUZZY_TITLE_CHARS
    }
}

#[derive(Debug, Clone)]
pub struct Deduplicator {
    tables: Arc<KeywordTables>,
}

impl Deduplicator {
    pub fn new(tables: Arc<KeywordTables>) -> Self {
        Self { tables }
    }

    /// The rule under which `candidate` duplicates one of `existing`
    pub fn check(&self, candidate: &FeedItem, existing: &[FeedItem]) -> Option<DuplicateRule> {
        let candidate = Fingerprint::of(candidate);
        existing
            .iter()
            .find_map(|item| self.compare(&candidate, &Fingerprint::of(item)))
    }

    pub fn is_duplicate(&self, candidate: &FeedItem, existing: &[FeedItem]) -> bool {
        self.check(candidate, existing).is_some()
    }

    /// Keep first-seen items, dropping later duplicates
    pub fn dedup(&self, items: Vec<FeedItem>) -> Vec<FeedItem> {
        let mut unique = UniqueItems::new(self.clone());
        unique.extend(items);
        unique.into_items()
    }

    fn compare(&self, candidate: &Fingerprint, seen: &Fingerprint) -> Option<DuplicateRule> {
        if candidate.title == seen.title {
            return Some(DuplicateRule::ExactTitle);
        }
        if !candidate.link.is_empty() && candidate.link == seen.link {
            return Some(DuplicateRule::SameLink);
        }
        if !candidate.is_fuzzy_comparable() || !seen.is_fuzzy_comparable() {
            return None;
        }
        if seen.title.contains(&candidate.title) || candidate.title.contains(&seen.title) {
            return Some(DuplicateRule::Substring);
        }

        let shared = self
            .tables
            .topic_keywords()
            .iter()
            .filter(|k| candidate.title.contains(k.as_str()) && seen.title.contains(k.as_str()))
            .count();
        (shared >= TOPIC_OVERLAP).then_some(DuplicateRule::TopicOverlap)
    }
}

/// Accumulating set of accepted items in insertion order
#[derive(Debug, Clone)]
pub struct UniqueItems {
    dedup: Deduplicator,
    items: Vec<FeedItem>,
    seen: Vec<Fingerprint>,
    dropped: usize,
}

impl UniqueItems {
    pub fn new(dedup: Deduplicator) -> Self {
        Self {
            dedup,
            items: Vec::new(),
            seen: Vec::new(),
            dropped: 0,
        }
    }

    /// Accept the item unless it duplicates one already held
    pub fn push(&mut self, item: FeedItem) -> bool {
        let fingerprint = Fingerprint::of(&item);
        if let Some(rule) = self
            .seen
            .iter()
            .find_map(|seen| self.dedup.compare(&fingerprint, seen))
        {
            debug!("Dropped duplicate ({}): {}", rule, item.title);
            self.dropped += 1;
            return false;
        }
        self.seen.push(fingerprint);
        self.items.push(item);
        true
    }

    /// Whether the item would be rejected
    pub fn contains_like(&self, item: &FeedItem) -> bool {
        let fingerprint = Fingerprint::of(item);
        self.seen
            .iter()
            .any(|seen| self.dedup.compare(&fingerprint, seen).is_some())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Duplicates rejected so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<FeedItem> {
        self.items
    }
}

impl Extend<FeedItem> for UniqueItems {
    fn extend<I: IntoIterator<Item = FeedItem>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, link: &str) -> FeedItem {
        FeedItem::new(title, link, "Test")
    }

    fn dedup() -> Deduplicator {
        Deduplicator::new(Arc::new(KeywordTables::builtin()))
    }

    #[test]
    fn test_exact_title_after_normalization() {
        let d = dedup();
        let a = item("الأمم المتحدة تدعو للسلام", "https://a.test/1");
        let b = item("الامم المتحده تدعو للسلام!", "https://b.test/2");
        assert_eq!(d.check(&b, &[a.clone()]), Some(DuplicateRule::ExactTitle));
        assert_eq!(d.check(&a, &[b]), Some(DuplicateRule::ExactTitle));
    }

    #[test]
    fn test_same_link() {
        let d = dedup();
        let a = item("عنوان أول مختلف تماما", "https://a.test/story");
        let b = item("عنوان ثان لا يشبهه", "https://a.test/story");
        assert_eq!(d.check(&b, &[a]), Some(DuplicateRule::SameLink));

        let a = item("قصير", "");
        let b = item("آخر", "");
        assert_eq!(d.check(&b, &[a]), None);
    }

    #[test]
    fn test_substring_either_direction() {
        let d = dedup();
        let long = item("ارتفاع أسعار الذهب في الأسواق العالمية اليوم", "https://a.test/1");
        let short = item("ارتفاع أسعار الذهب في الأسواق", "https://b.test/2");
        assert_eq!(d.check(&short, &[long.clone()]), Some(DuplicateRule::Substring));
        assert_eq!(d.check(&long, &[short]), Some(DuplicateRule::Substring));
    }

    #[test]
    fn test_topic_overlap() {
        let d = dedup();
        let a = item("عاجل: زلزال يضرب المنطقة", "https://a.test/1");
        let b = item("زلزال عنيف يهز المنطقة الليلة", "https://news.google.com/x");
        assert_eq!(d.check(&b, &[a]), Some(DuplicateRule::TopicOverlap));

        let a = item("زلزال قوي في اليابان صباحا", "https://a.test/1");
        let b = item("زلزال يضرب سواحل تشيلي", "https://b.test/2");
        assert_eq!(d.check(&b, &[a]), None);
    }

    #[test]
    fn test_short_titles_skip_fuzzy_rules() {
        let d = dedup();
        let short = item("غزة", "https://a.test/1");
        let long = item("تطورات جديدة في غزة اليوم", "https://b.test/2");
        assert_eq!(d.check(&short, &[long.clone()]), None);
        assert_eq!(d.check(&long, &[short]), None);

        // exact still applies
        let a = item("غزة", "https://a.test/1");
        let b = item("غزة", "https://b.test/2");
        assert_eq!(d.check(&b, &[a]), Some(DuplicateRule::ExactTitle));
    }

    #[test]
    fn test_first_seen_wins() {
        let d = dedup();
        let items = vec![
            item("عاجل: زلزال يضرب المنطقة", "https://a.test/1"),
            item("خبر مختلف عن الاقتصاد المحلي", "https://a.test/2"),
            item("زلزال بقوة 6 درجات يضرب المنطقة", "https://b.test/1"),
            item("عاجل: زلزال يضرب المنطقة", "https://c.test/1"),
        ];
        let unique = d.dedup(items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].link, "https://a.test/1");
        assert_eq!(unique[1].link, "https://a.test/2");
    }

    #[test]
    fn test_surviving_count_is_order_independent() {
        let d = dedup();
        let items = vec![
            item("عاجل: زلزال يضرب المنطقة", "https://a.test/1"),
            item("زلزال بقوة 6 درجات يضرب المنطقة", "https://b.test/1"),
            item("خبر مختلف عن الاقتصاد المحلي", "https://a.test/2"),
            item("تقرير عن الزراعة في مصر", "https://a.test/3"),
        ];
        let mut reversed = items.clone();
        reversed.reverse();
        assert_eq!(d.dedup(items).len(), d.dedup(reversed).len());
    }

    #[test]
    fn test_unique_items_counts_drops() {
        let mut unique = UniqueItems::new(dedup());
        assert!(unique.push(item("خبر أول عن الطقس", "https://a.test/1")));
        assert!(!unique.push(item("خبر أول عن الطقس", "https://a.test/2")));
        assert!(unique.contains_like(&item("x", "https://a.test/1")));
        assert_eq!(unique.len(), 1);
        assert_eq!(unique.dropped(), 1);
    }
}
