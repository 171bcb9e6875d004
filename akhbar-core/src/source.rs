//! Static source configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::category::CategoryLabel;
use crate::error::{AkhbarError, AkhbarResult};

/// One upstream feed. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Human-readable name, also the key for placeholders and the directory
    pub name: String,
    /// Feed URL fetched first
    pub primary_url: String,
    /// Tried once when the primary URL fails
    #[serde(default)]
    pub fallback_url: Option<String>,
    /// Site root used to qualify relative links
    #[serde(default)]
    pub base_url: Option<String>,
    /// Categories this source is authoritative for
    #[serde(default)]
    pub specialized_categories: Vec<CategoryLabel>,
    /// Only keep items carrying a breaking marker, and flag them
    #[serde(default)]
    pub breaking: bool,
    /// Name shown on breaking items instead of `name`
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SourceSpec {
    pub fn new(name: &str, primary_url: &str, categories: &[CategoryLabel]) -> Self {
        Self {
            name: name.to_string(),
            primary_url: primary_url.to_string(),
            fallback_url: None,
            base_url: None,
            specialized_categories: categories.to_vec(),
            breaking: false,
            display_name: None,
        }
    }

    pub fn with_fallback(mut self, url: &str) -> Self {
        self.fallback_url = Some(url.to_string());
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Designate as a breaking source shown under `display_name`
    pub fn breaking(mut self, display_name: &str) -> Self {
        self.breaking = true;
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// The single category of a specialized source
    pub fn specialized_category(&self) -> Option<CategoryLabel> {
        match self.specialized_categories.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Reject specs that could never be fetched
    pub fn validate(&self) -> AkhbarResult<()> {
        if self.name.trim().is_empty() {
            return Err(AkhbarError::invalid_source(&self.primary_url, "empty name"));
        }
        if !self.primary_url.starts_with("http://") && !self.primary_url.starts_with("https://") {
            return Err(AkhbarError::invalid_source(
                &self.name,
                format!("primary url is not absolute: {}", self.primary_url),
            ));
        }
        Ok(())
    }
}

/// Priority tier of a source group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Breaking-designated sources, always fetched
    Breaking,
    /// Sources that rarely fail
    Reliable,
    /// Sources with known access problems
    Supplementary,
    /// Consulted only when earlier groups came up short
    Backup,
}

impl GroupKind {
    /// Whether the group skips the backfill gate
    pub fn always_fetch(&self) -> bool {
        matches!(self, GroupKind::Breaking)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupKind::Breaking => "breaking",
            GroupKind::Reliable => "reliable",
            GroupKind::Supplementary => "supplementary",
            GroupKind::Backup => "backup",
        };
        write!(f, "{}", name)
    }
}

/// Sources fetched together as one concurrent batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGroup {
    pub kind: GroupKind,
    pub sources: Vec<SourceSpec>,
}

impl SourceGroup {
    pub fn new(kind: GroupKind, sources: Vec<SourceSpec>) -> Self {
        Self { kind, sources }
    }
}

/// Lookup from source name to the categories that source covers.
///
/// Built once at startup from the catalog and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct SourceDirectory {
    entries: HashMap<String, Vec<CategoryLabel>>,
}

impl SourceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, categories: &[CategoryLabel]) {
        self.entries.insert(name.to_string(), categories.to_vec());
    }

    /// Register every source of every group, keeping earlier entries
    pub fn extend_from_groups(&mut self, groups: &[SourceGroup]) {
        for source in groups.iter().flat_map(|g| g.sources.iter()) {
            if !source.specialized_categories.is_empty() {
                self.entries
                    .entry(source.name.clone())
                    .or_insert_with(|| source.specialized_categories.clone());
            }
        }
    }

    /// Categories listed for a source, empty when unknown
    pub fn categories(&self, source_name: &str) -> &[CategoryLabel] {
        self.entries
            .get(source_name)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// The single category of a specialized source
    pub fn specialized(&self, source_name: &str) -> Option<CategoryLabel> {
        match self.categories(source_name) {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
