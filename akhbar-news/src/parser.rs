//! Feed Parser
//!
//! Turns a fetched payload into [`FeedItem`]s. The payload format is
//! detected once ([`FeedFormat::detect`]) and dispatched to one extractor:
//!
//! - RSS 2.0 through the `rss` crate,
//! - Atom through `atom_syndication`,
//! - anything else that looks like XML (RSS 1.0/RDF, documents the strict
//!   readers reject) through a streaming `quick-xml` scan,
//! - JSON arrays or `{items|entries|articles: [...]}` objects.
//!
//! Every extractor produces [`RawEntry`] records which are finished the same
//! way: markup stripped, link repaired, date recovered, image picked.
//! A payload that yields nothing usable becomes the source's placeholder list.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use akhbar_core::text::{decode_entities, strip_html};
use akhbar_core::FeedItem;

use crate::error::NewsError;
use crate::google_news::{extract_source_from_google_title, is_google_news_url};
use crate::links::repair_link;
use crate::placeholder::placeholder_items;

/// How far into the payload format sniffing looks
const SNIFF_CHARS: usize = 2048;

/// Payload shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
    GenericXml,
    Json,
    Empty,
}

impl FeedFormat {
    /// Sniff the payload format from its first bytes
    pub fn detect(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('\u{feff}').trim_start();
        if trimmed.is_empty() {
            return FeedFormat::Empty;
        }
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return FeedFormat::Json;
        }

        let head: String = trimmed.chars().take(SNIFF_CHARS).collect::<String>().to_lowercase();
        if head.contains("<rss") {
            FeedFormat::Rss
        } else if head.contains("<feed") {
            FeedFormat::Atom
        } else {
            FeedFormat::GenericXml
        }
    }
}

/// Result of parsing one payload
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Items extracted from the payload itself
    Parsed(Vec<FeedItem>),
    /// The payload was unusable; these are the source's placeholder items
    Placeholder(Vec<FeedItem>),
}

impl ParseOutcome {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ParseOutcome::Placeholder(_))
    }

    pub fn items(&self) -> &[FeedItem] {
        match self {
            ParseOutcome::Parsed(items) | ParseOutcome::Placeholder(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<FeedItem> {
        match self {
            ParseOutcome::Parsed(items) | ParseOutcome::Placeholder(items) => items,
        }
    }
}

/// One record as pulled out of the payload, before cleanup
#[derive(Debug, Default, Clone)]
struct RawEntry {
    title: String,
    link: String,
    /// May contain markup
    description: String,
    /// Unparsed date text
    date: Option<String>,
    /// Already-typed date (Atom)
    published: Option<DateTime<Utc>>,
    image: Option<String>,
}

/// Parse a payload fetched for `source_name`.
///
/// `base_url` qualifies relative article links. Never fails: unusable
/// payloads produce [`ParseOutcome::Placeholder`].
pub fn parse_feed(raw: &str, source_name: &str, base_url: Option<&str>) -> ParseOutcome {
    let format = FeedFormat::detect(raw);

    let entries = match extract_entries(raw, format) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Unparseable {:?} payload from {}: {}", format, source_name, e);
            return ParseOutcome::Placeholder(placeholder_items(source_name));
        }
    };

    let items: Vec<FeedItem> = entries
        .into_iter()
        .filter_map(|entry| finish_entry(entry, source_name, base_url))
        .collect();

    if items.is_empty() {
        debug!("No usable items in {:?} payload from {}", format, source_name);
        return ParseOutcome::Placeholder(placeholder_items(source_name));
    }

    debug!("Parsed {} items ({:?}) from {}", items.len(), format, source_name);
    ParseOutcome::Parsed(items)
}

fn extract_entries(raw: &str, format: FeedFormat) -> Result<Vec<RawEntry>, NewsError> {
    match format {
        FeedFormat::Rss => rss_entries(raw).or_else(|e| {
            debug!("Strict RSS read failed ({}), scanning", e);
            generic_xml_entries(raw)
        }),
        FeedFormat::Atom => atom_entries(raw).or_else(|e| {
            debug!("Strict Atom read failed ({}), scanning", e);
            generic_xml_entries(raw)
        }),
        FeedFormat::GenericXml => generic_xml_entries(raw),
        FeedFormat::Json => json_entries(raw),
        FeedFormat::Empty => Err(NewsError::ParseError("empty payload".to_string())),
    }
}

// ============================================================================
// RSS 2.0
// ============================================================================

fn rss_entries(raw: &str) -> Result<Vec<RawEntry>, NewsError> {
    let channel =
        rss::Channel::read_from(raw.as_bytes()).map_err(|e| NewsError::ParseError(e.to_string()))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| {
            let link = item
                .link()
                .map(str::to_string)
                .or_else(|| {
                    item.guid()
                        .filter(|g| g.is_permalink())
                        .map(|g| g.value().to_string())
                })
                .unwrap_or_default();

            let description = item
                .description()
                .filter(|d| !d.trim().is_empty())
                .or_else(|| item.content())
                .unwrap_or_default();

            let date = item.pub_date().map(str::to_string).or_else(|| {
                item.dublin_core_ext()
                    .and_then(|dc| dc.dates().first().cloned())
            });

            let image = media_image(item.extensions()).or_else(|| {
                item.enclosure()
                    .filter(|e| e.mime_type().starts_with("image/"))
                    .map(|e| e.url().to_string())
            });

            RawEntry {
                title: item.title().unwrap_or_default().to_string(),
                link,
                description: description.to_string(),
                date,
                published: None,
                image,
            }
        })
        .collect())
}

/// Image from `media:content` (image typed) or `media:thumbnail`
fn media_image(extensions: &rss::extension::ExtensionMap) -> Option<String> {
    let media = extensions.get("media")?;

    if let Some(contents) = media.get("content") {
        for content in contents {
            let Some(url) = content.attrs().get("url") else {
                continue;
            };
            let medium = content.attrs().get("medium").map(|s| s.as_str());
            let mime = content.attrs().get("type").map(|s| s.as_str());
            if medium == Some("image")
                || mime.is_some_and(|m| m.starts_with("image/"))
                || has_image_extension(url)
            {
                return Some(url.clone());
            }
        }
    }

    media
        .get("thumbnail")
        .and_then(|thumbs| thumbs.iter().find_map(|t| t.attrs().get("url").cloned()))
}

fn has_image_extension(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url).to_lowercase();
    [".jpg", ".jpeg", ".png", ".webp", ".gif"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

// ============================================================================
// Atom
// ============================================================================

fn atom_entries(raw: &str) -> Result<Vec<RawEntry>, NewsError> {
    let feed = atom_syndication::Feed::read_from(raw.as_bytes())
        .map_err(|e| NewsError::ParseError(e.to_string()))?;

    Ok(feed
        .entries()
        .iter()
        .map(|entry| {
            let links = entry.links();
            let link = links
                .iter()
                .find(|l| l.rel() == "alternate")
                .or_else(|| links.first())
                .map(|l| l.href().to_string())
                .unwrap_or_default();

            let summary = entry.summary().map(|s| s.as_str()).unwrap_or_default();
            let content = entry.content().and_then(|c| c.value()).unwrap_or_default();
            let description = if summary.trim().is_empty() { content } else { summary };

            let image = links
                .iter()
                .find(|l| {
                    l.rel() == "enclosure" && l.mime_type().is_some_and(|m| m.starts_with("image/"))
                })
                .map(|l| l.href().to_string())
                .or_else(|| image_from_html(content));

            // atom_syndication defaults a missing <updated> to the epoch
            let published = entry
                .published()
                .copied()
                .or_else(|| Some(*entry.updated()).filter(|d| d.timestamp() != 0))
                .map(|d| d.with_timezone(&Utc));

            RawEntry {
                title: entry.title().as_str().to_string(),
                link,
                description: description.to_string(),
                date: None,
                published,
                image,
            }
        })
        .collect())
}

// ============================================================================
// Generic XML scan
// ============================================================================

fn is_record_tag(name: &str) -> bool {
    matches!(name, "item" | "entry")
}

fn is_field_tag(name: &str) -> bool {
    matches!(
        name,
        "title"
            | "link"
            | "guid"
            | "description"
            | "summary"
            | "content"
            | "encoded"
            | "pubDate"
            | "published"
            | "updated"
            | "date"
    )
}

/// Scan any XML document for `item`/`entry` records.
///
/// Tolerates namespaces it does not know and keeps whatever records were
/// complete when a syntax error stops the scan.
fn generic_xml_entries(raw: &str) -> Result<Vec<RawEntry>, NewsError> {
    let mut reader = Reader::from_str(raw);
    let mut entries = Vec::new();
    let mut current: Option<RawEntry> = None;
    let mut field: Option<String> = None;
    let mut buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if is_record_tag(&name) {
                    current = Some(RawEntry::default());
                    field = None;
                    continue;
                }
                if let Some(entry) = current.as_mut() {
                    scan_attributes(entry, &e);
                    if is_field_tag(&name) {
                        field = Some(name);
                        buffer.clear();
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    scan_attributes(entry, &e);
                }
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    buffer.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if field.is_some() {
                    buffer.push('&');
                    buffer.push_str(&String::from_utf8_lossy(&r));
                    buffer.push(';');
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    buffer.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if is_record_tag(&name) {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                    field = None;
                } else if field.as_deref() == Some(name.as_str()) {
                    if let Some(entry) = current.as_mut() {
                        assign_field(entry, &name, &decode_entities(buffer.trim()));
                    }
                    field = None;
                    buffer.clear();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                if entries.is_empty() {
                    return Err(NewsError::ParseError(format!(
                        "xml error at byte {}: {}",
                        reader.error_position(),
                        e
                    )));
                }
                warn!("XML scan stopped after {} records: {}", entries.len(), e);
                break;
            }
            _ => {}
        }
    }

    Ok(entries)
}

fn assign_field(entry: &mut RawEntry, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    match name {
        "title" if entry.title.is_empty() => entry.title = value.to_string(),
        "link" if entry.link.is_empty() => entry.link = value.to_string(),
        "guid" if entry.link.is_empty() && value.starts_with("http") => {
            entry.link = value.to_string()
        }
        "description" | "summary" | "content" | "encoded" if entry.description.is_empty() => {
            entry.description = value.to_string()
        }
        "pubDate" | "published" | "updated" | "date" if entry.date.is_none() => {
            entry.date = Some(value.to_string())
        }
        _ => {}
    }
}

/// Pick up attribute-carried fields: Atom links, media elements, enclosures
fn scan_attributes(entry: &mut RawEntry, e: &BytesStart<'_>) {
    let qualified = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    match qualified.as_str() {
        "link" => {
            if entry.link.is_empty() {
                let rel = attribute(e, "rel");
                if rel.as_deref().map_or(true, |r| r == "alternate") {
                    if let Some(href) = attribute(e, "href") {
                        entry.link = href;
                    }
                }
            }
        }
        "media:content" | "media:thumbnail" => {
            if entry.image.is_none() {
                entry.image = attribute(e, "url");
            }
        }
        "enclosure" => {
            let is_image = attribute(e, "type").is_some_and(|t| t.starts_with("image/"));
            if entry.image.is_none() && is_image {
                entry.image = attribute(e, "url");
            }
        }
        _ => {}
    }
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .map(|a| decode_entities(&String::from_utf8_lossy(&a.value)))
}

// ============================================================================
// JSON
// ============================================================================

fn json_entries(raw: &str) -> Result<Vec<RawEntry>, NewsError> {
    let value: Value = serde_json::from_str(raw.trim_start_matches('\u{feff}'))
        .map_err(|e| NewsError::ParseError(e.to_string()))?;

    let records = match &value {
        Value::Array(records) => records,
        Value::Object(map) => ["items", "entries", "articles"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| NewsError::ParseError("no item array in JSON payload".to_string()))?,
        _ => {
            return Err(NewsError::ParseError(
                "JSON payload is neither an array nor an object".to_string(),
            ))
        }
    };

    Ok(records
        .iter()
        .filter_map(Value::as_object)
        .map(|record| RawEntry {
            title: first_string(record, &["title"]).unwrap_or_default(),
            link: first_string(record, &["link", "url"]).unwrap_or_default(),
            description: first_string(
                record,
                &["description", "summary", "content", "content_text", "content_html"],
            )
            .unwrap_or_default(),
            date: first_string(record, &["pubDate", "published", "publishedAt", "date", "date_published"]),
            published: None,
            image: first_string(record, &["imageUrl", "image", "urlToImage"]),
        })
        .collect())
}

fn first_string(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

// ============================================================================
// Cleanup
// ============================================================================

fn finish_entry(raw: RawEntry, source_name: &str, base_url: Option<&str>) -> Option<FeedItem> {
    let mut title = strip_html(&raw.title);
    if title.is_empty() {
        return None;
    }
    let mut description = strip_html(&raw.description);

    if source_name.contains("Google") || is_google_news_url(&raw.link) {
        let (headline, publisher) = extract_source_from_google_title(&title);
        if !publisher.is_empty() {
            // Google descriptions repeat the headline followed by the publisher
            if description.is_empty() || description.starts_with(&headline) {
                description = publisher;
            }
            title = headline;
        }
    }

    let published = raw
        .published
        .or_else(|| raw.date.as_deref().and_then(parse_feed_date))
        .or_else(|| extract_date_from_url(&raw.link));

    let link = repair_link(&raw.link, &title, source_name, base_url);

    let image = raw
        .image
        .or_else(|| image_from_html(&raw.description))
        .and_then(|url| absolute_image_url(&url));

    let mut item = FeedItem::new(title, link, source_name)
        .with_description(description)
        .with_image(image);
    if let Some(at) = published {
        item = item.with_published_at(at);
    }
    Some(item)
}

fn absolute_image_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        Some(url.to_string())
    } else {
        url.strip_prefix("//").map(|rest| format!("https://{}", rest))
    }
}

/// Parse the date forms feeds actually emit
pub fn parse_feed_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn url_date_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // /2026/10/09/ or /2026/10/9/
            r"/(\d{4})/(\d{1,2})/(\d{1,2})/",
            // /2026-10-09/
            r"[/-](\d{4})-(\d{2})-(\d{2})[/-]",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Date embedded in an article URL path, taken as noon UTC
pub fn extract_date_from_url(url: &str) -> Option<DateTime<Utc>> {
    for pattern in url_date_patterns() {
        let Some(caps) = pattern.captures(url) else {
            continue;
        };
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let day: u32 = caps.get(3)?.as_str().parse().ok()?;

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(DateTime::from_naive_utc_and_offset(date.and_hms_opt(12, 0, 0)?, Utc));
        }
    }
    None
}

fn img_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).ok())
        .as_ref()
}

/// First `<img src>` in a markup fragment, ignoring tracking pixels
fn image_from_html(html: &str) -> Option<String> {
    let caps = img_pattern()?.captures(html)?;
    let url = caps.get(1)?.as_str();
    if url.contains("1x1") || url.contains("pixel") || url.contains("spacer") {
        return None;
    }
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>الخليج</title>
    <link>https://www.alkhaleej.ae</link>
    <description>أخبار</description>
    <item>
      <title>افتتاح معرض الكتاب الدولي</title>
      <link>/culture/2026-10-14/book-fair</link>
      <description><![CDATA[<p>افتتح <b>المعرض</b> اليوم</p><img src="https://img.test/fair.jpg"/>]]></description>
      <pubDate>Wed, 14 Oct 2026 09:30:00 +0300</pubDate>
    </item>
    <item>
      <title>   </title>
      <link>https://www.alkhaleej.ae/x</link>
    </item>
    <item>
      <title>خبر بلا تاريخ</title>
      <link>https://www.alkhaleej.ae/2026/10/12/story</link>
      <media:content url="https://img.test/story.png" medium="image"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_detect_formats() {
        assert_eq!(FeedFormat::detect(RSS_SAMPLE), FeedFormat::Rss);
        assert_eq!(FeedFormat::detect("<feed xmlns=\"http://www.w3.org/2005/Atom\">"), FeedFormat::Atom);
        assert_eq!(FeedFormat::detect("\u{feff}  {\"items\": []}"), FeedFormat::Json);
        assert_eq!(FeedFormat::detect("<rdf:RDF></rdf:RDF>"), FeedFormat::GenericXml);
        assert_eq!(FeedFormat::detect("   "), FeedFormat::Empty);
    }

    #[test]
    fn test_parse_rss() {
        let outcome = parse_feed(RSS_SAMPLE, "Al Khaleej", Some("https://www.alkhaleej.ae"));
        assert!(!outcome.is_placeholder());
        let items = outcome.into_items();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title, "افتتاح معرض الكتاب الدولي");
        assert_eq!(first.link, "https://www.alkhaleej.ae/culture/2026-10-14/book-fair");
        assert_eq!(first.description, "افتتح المعرض اليوم");
        assert_eq!(first.image_url.as_deref(), Some("https://img.test/fair.jpg"));
        assert_eq!(
            first.published_at,
            Utc.with_ymd_and_hms(2026, 10, 14, 6, 30, 0).unwrap()
        );
        assert!(!first.date_inferred);

        let second = &items[1];
        assert_eq!(second.image_url.as_deref(), Some("https://img.test/story.png"));
        assert_eq!(
            second.published_at,
            Utc.with_ymd_and_hms(2026, 10, 12, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_atom() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>DW</title>
  <id>urn:dw</id>
  <updated>2026-10-15T08:00:00Z</updated>
  <entry>
    <title>دراسة جديدة عن المناخ</title>
    <link rel="alternate" href="https://www.dw.com/ar/climate/a-1"/>
    <id>urn:1</id>
    <updated>2026-10-15T08:00:00Z</updated>
    <published>2026-10-15T07:00:00Z</published>
    <summary>ملخص الدراسة</summary>
  </entry>
</feed>"#;
        let items = parse_feed(atom, "DW Arabic", None).into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://www.dw.com/ar/climate/a-1");
        assert_eq!(items[0].description, "ملخص الدراسة");
        assert_eq!(
            items[0].published_at,
            Utc.with_ymd_and_hms(2026, 10, 15, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rdf_with_generic_scan() {
        let rdf = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://purl.org/rss/1.0/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel><title>DW</title></channel>
  <item>
    <title>الاقتصاد الألماني &amp; الأسواق</title>
    <link>https://www.dw.com/ar/a-2</link>
    <description>نص</description>
    <dc:date>2026-10-13T10:00:00Z</dc:date>
  </item>
</rdf:RDF>"#;
        let outcome = parse_feed(rdf, "DW Arabic", None);
        assert!(!outcome.is_placeholder());
        let items = outcome.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "الاقتصاد الألماني & الأسواق");
        assert_eq!(
            items[0].published_at,
            Utc.with_ymd_and_hms(2026, 10, 13, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"status":"ok","articles":[
            {"title":"ارتفاع البورصة","url":"https://www.argaam.com/ar/article/1","description":"تفاصيل","publishedAt":"2026-10-14T12:00:00Z","urlToImage":"//cdn.test/a.jpg"},
            {"title":"","url":"https://x.test/empty"}
        ]}"#;
        let items = parse_feed(json, "Argaam", None).into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://www.argaam.com/ar/article/1");
        assert_eq!(items[0].image_url.as_deref(), Some("https://cdn.test/a.jpg"));
        assert!(!items[0].date_inferred);
    }

    #[test]
    fn test_malformed_payload_degrades_to_placeholder() {
        let blocked = "<html><body><h1>Access denied</h1></body></html>";
        let outcome = parse_feed(blocked, "BBC Arabic", None);
        assert!(outcome.is_placeholder());
        assert!(!outcome.items().is_empty());
        assert!(outcome.items().iter().all(|i| i.source_name == "BBC Arabic"));

        let outcome = parse_feed("{not json", "Unknown Source", None);
        assert!(outcome.is_placeholder());
        assert!(outcome.items().is_empty());
    }

    #[test]
    fn test_google_titles_lose_publisher() {
        let rss = r#"<rss version="2.0"><channel><title>Google</title><link>https://news.google.com</link><description>g</description>
<item>
  <title>ارتفاع أسعار النفط - سكاي نيوز عربية</title>
  <link>https://news.google.com/rss/articles/CBMiABC?oc=5</link>
  <description>&lt;a href="x"&gt;ارتفاع أسعار النفط&lt;/a&gt;&amp;nbsp;&lt;font&gt;سكاي نيوز عربية&lt;/font&gt;</description>
</item></channel></rss>"#;
        let items = parse_feed(rss, "Google News", None).into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "ارتفاع أسعار النفط");
        assert_eq!(items[0].description, "سكاي نيوز عربية");
    }

    #[test]
    fn test_atom_entry_without_dates_is_inferred() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>DW</title>
  <id>urn:dw</id>
  <entry>
    <title>خبر بلا تاريخ</title>
    <link rel="alternate" href="https://www.dw.com/ar/world/a-2"/>
    <id>urn:2</id>
  </entry>
</feed>"#;
        let before = Utc::now() - chrono::Duration::minutes(1);
        let items = parse_feed(atom, "DW Arabic", None).into_items();
        assert_eq!(items.len(), 1);
        assert!(items[0].date_inferred);
        assert!(items[0].published_at >= before);
    }

    #[test]
    fn test_missing_date_is_inferred() {
        let rss = r#"<rss version="2.0"><channel><title>t</title><link>https://a.test</link><description>d</description>
<item><title>خبر</title><link>https://a.test/news/1</link><pubDate>not a date</pubDate></item>
</channel></rss>"#;
        let items = parse_feed(rss, "Some Source", None).into_items();
        assert_eq!(items.len(), 1);
        assert!(items[0].date_inferred);
    }

    #[test]
    fn test_parse_feed_date_forms() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 14, 8, 0, 0).unwrap();
        assert_eq!(parse_feed_date("Wed, 14 Oct 2026 08:00:00 GMT"), Some(expected));
        assert_eq!(parse_feed_date("2026-10-14T08:00:00Z"), Some(expected));
        assert_eq!(parse_feed_date("2026-10-14 08:00:00"), Some(expected));
        assert_eq!(
            parse_feed_date("2026-10-14"),
            Some(Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_feed_date("yesterday"), None);
    }

    #[test]
    fn test_extract_date_from_url() {
        assert_eq!(
            extract_date_from_url("https://arabic.cnn.com/world/article/2026/10/9/story"),
            Some(Utc.with_ymd_and_hms(2026, 10, 9, 12, 0, 0).unwrap())
        );
        assert_eq!(extract_date_from_url("https://a.test/news/12345"), None);
    }

    #[test]
    fn test_tracking_pixels_are_skipped() {
        assert_eq!(image_from_html(r#"<img src="https://t.test/pixel.gif">"#), None);
        assert_eq!(
            image_from_html(r#"<p><img class="x" src='https://i.test/a.jpg'></p>"#).as_deref(),
            Some("https://i.test/a.jpg")
        );
    }
}
