//! Upstream access for the Arabic news aggregator
//!
//! This crate owns everything that touches upstream bytes:
//! - the relay boundary ([`FeedRelay`]) and its HTTP implementation
//! - the Source Fetcher with its fallback chain
//! - the Feed Parser (RSS, Atom, generic XML, JSON) and link repair
//! - the curated source catalog and placeholder content
//! - a NewsAPI-compatible JSON client

pub mod catalog;
pub mod error;
pub mod fetcher;
pub mod google_news;
pub mod links;
pub mod newsapi;
pub mod parser;
pub mod placeholder;
pub mod relay;

pub use catalog::{alternate_url, category_sources, curated_groups, source_directory};
pub use error::NewsError;
pub use fetcher::{FetchOutcome, FetchPath, SourceFetcher};
pub use links::{is_invalid_article_link, repair_link};
pub use newsapi::NewsApiClient;
pub use parser::{parse_feed, FeedFormat, ParseOutcome};
pub use relay::{FeedRelay, HttpRelay, MemoryRelay, RelayRequest, RelayResponse};
