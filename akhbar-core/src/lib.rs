//! Core types for the Arabic news aggregator
//!
//! This crate defines the shared data structures used across the workspace:
//! feed items, category labels, static source configuration and the text
//! normalizer every comparison goes through.

pub mod category;
pub mod error;
pub mod item;
pub mod source;
pub mod text;

pub use category::CategoryLabel;
pub use error::{AkhbarError, AkhbarResult};
pub use item::FeedItem;
pub use source::{GroupKind, SourceDirectory, SourceGroup, SourceSpec};
