//! Aggregation services for the Arabic news aggregator
//!
//! This crate turns fetched items into the final result: the category
//! classifier and its keyword tables, the deduplicator, and the aggregator
//! that drives group fetching, filtering, ordering and backfill.

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod dedup;
pub mod keywords;

pub use aggregator::{AggregationReport, AggregationResult, AggregationStatus, CategoryView, NewsAggregator};
pub use classifier::{CategoryClassifier, ScoreCard};
pub use config::{AggregateOptions, AggregatorConfig, CategoryFilter, ConfigError};
pub use dedup::{Deduplicator, DuplicateRule, UniqueItems};
pub use keywords::KeywordTables;
