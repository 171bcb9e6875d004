//! Feed item types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::category::CategoryLabel;

/// A single news entry produced by parsing one upstream record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Stable identifier derived from source name and title
    pub id: String,
    /// Headline
    pub title: String,
    /// Article URL
    pub link: String,
    /// Plain-text description (markup already stripped)
    pub description: String,
    /// Publication time, "now" when the feed carried no usable date
    pub published_at: DateTime<Utc>,
    /// True when `published_at` was not read from the feed
    #[serde(default)]
    pub date_inferred: bool,
    /// Human-readable origin, stable across fetches of the same feed
    pub source_name: String,
    /// Lead image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Set only by breaking-designated sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_breaking: Option<bool>,
    /// Assigned by the classifier, or by the source for labelled feeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryLabel>,
}

impl FeedItem {
    /// Create an item dated "now" with an inferred date
    pub fn new(title: impl Into<String>, link: impl Into<String>, source_name: impl Into<String>) -> Self {
        let title = title.into();
        let source_name = source_name.into();
        Self {
            id: item_id(&source_name, &title),
            title,
            link: link.into(),
            description: String::new(),
            published_at: Utc::now(),
            date_inferred: true,
            source_name,
            image_url: None,
            is_breaking: None,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a publication time read from the feed
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = published_at;
        self.date_inferred = false;
        self
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_category(mut self, category: CategoryLabel) -> Self {
        self.category = Some(category);
        self
    }

    /// Mark as breaking and attribute to the given display name
    pub fn mark_breaking(&mut self, display_name: &str) {
        self.is_breaking = Some(true);
        if self.source_name != display_name {
            self.source_name = display_name.to_string();
            self.id = item_id(&self.source_name, &self.title);
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.is_breaking.unwrap_or(false)
    }
}

/// Hash of source name and title, truncated to 8 bytes
pub fn item_id(source_name: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_name.as_bytes());
    hasher.update([0u8]);
    hasher.update(title.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_item_has_inferred_date() {
        let item = FeedItem::new("عنوان", "https://example.com/a", "BBC Arabic");
        assert!(item.date_inferred);
        assert_eq!(item.id.len(), 16);
    }

    #[test]
    fn test_with_published_at_clears_inferred_flag() {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        let item = FeedItem::new("t", "l", "s").with_published_at(at);
        assert!(!item.date_inferred);
        assert_eq!(item.published_at, at);
    }

    #[test]
    fn test_mark_breaking_renames_source() {
        let mut item = FeedItem::new("عاجل: خبر", "https://x.test/1", "Al Jazeera Mubasher");
        let before = item.id.clone();
        item.mark_breaking("الجزيرة مباشر");
        assert!(item.is_breaking());
        assert_eq!(item.source_name, "الجزيرة مباشر");
        assert_ne!(item.id, before);
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = FeedItem::new("t", "l", "s");
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("sourceName").is_some());
        assert!(json.get("imageUrl").is_none());
    }
}
