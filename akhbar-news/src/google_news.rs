//! Google News URL builders
//!
//! Google News serves RSS for arbitrary searches, which makes it the
//! fallback of last resort for any feed that blocks us: a `site:` query
//! scoped to the failing host usually returns the same stories.

/// Search endpoint of the RSS frontend
pub const SEARCH_RSS_URL: &str = "https://news.google.com/rss/search";

/// Arabic edition parameters
const EDITION_PARAMS: &str = "hl=ar&gl=EG&ceid=EG:ar";

/// Breaking-news marker appended to scoped searches
const BREAKING_MARKER: &str = "عاجل";

/// RSS search scoped to one host
pub fn site_search_url(host: &str) -> String {
    format!("{}?q=site:{}&{}", SEARCH_RSS_URL, host, EDITION_PARAMS)
}

/// RSS search for breaking items on one host
pub fn breaking_search_url(host: &str) -> String {
    format!(
        "{}?q=site:{}+{}&{}",
        SEARCH_RSS_URL,
        host,
        urlencoding::encode(BREAKING_MARKER),
        EDITION_PARAMS
    )
}

/// Human-facing search page for a headline, used as a link of last resort
pub fn title_search_url(title: &str) -> String {
    format!(
        "https://news.google.com/search?q={}&hl=ar",
        urlencoding::encode(title.trim())
    )
}

/// Whether a URL points at Google News itself
pub fn is_google_news_url(url: &str) -> bool {
    hostname_of(url).is_some_and(|h| h == "news.google.com")
}

/// Host component of a URL, tolerating strings the URL parser rejects
pub fn hostname_of(url: &str) -> Option<String> {
    if let Some(host) = url::Url::parse(url).ok().and_then(|u| u.host_str().map(|h| h.to_string())) {
        return Some(host);
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?.trim();
    if host.is_empty() || !host.contains('.') {
        None
    } else {
        Some(host.to_string())
    }
}

/// Scheme and host of a URL
pub(crate) fn origin_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{}", parsed.scheme(), host))
}

/// Split a Google News headline into (title, publisher).
///
/// Google appends " - Publisher" to every headline.
pub fn extract_source_from_google_title(full_title: &str) -> (String, String) {
    if let Some(pos) = full_title.rfind(" - ") {
        let title = full_title[..pos].trim();
        let source = full_title[pos + 3..].trim();
        if !title.is_empty() && !source.is_empty() {
            return (title.to_string(), source.to_string());
        }
    }
    (full_title.trim().to_string(), String::new())
}
