//! News category labels

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AkhbarError;

/// Closed set of categories every classified item carries exactly one of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLabel {
    General,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl CategoryLabel {
    /// All labels in scoring order. Ties between equal scores resolve to the
    /// earlier entry.
    pub const ALL: [CategoryLabel; 7] = [
        CategoryLabel::General,
        CategoryLabel::Business,
        CategoryLabel::Technology,
        CategoryLabel::Entertainment,
        CategoryLabel::Sports,
        CategoryLabel::Science,
        CategoryLabel::Health,
    ];

    /// Stable identifier used in configuration and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::General => "general",
            CategoryLabel::Business => "business",
            CategoryLabel::Technology => "technology",
            CategoryLabel::Entertainment => "entertainment",
            CategoryLabel::Sports => "sports",
            CategoryLabel::Science => "science",
            CategoryLabel::Health => "health",
        }
    }

    /// Arabic display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryLabel::General => "عام",
            CategoryLabel::Business => "أعمال",
            CategoryLabel::Technology => "تكنولوجيا",
            CategoryLabel::Entertainment => "ترفيه",
            CategoryLabel::Sports => "رياضة",
            CategoryLabel::Science => "علوم",
            CategoryLabel::Health => "صحة",
        }
    }

    /// Position in [`CategoryLabel::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CategoryLabel {
    type Err = AkhbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" | "world" => Ok(CategoryLabel::General),
            "business" | "economy" => Ok(CategoryLabel::Business),
            "technology" | "tech" => Ok(CategoryLabel::Technology),
            "entertainment" | "culture" => Ok(CategoryLabel::Entertainment),
            "sports" | "sport" => Ok(CategoryLabel::Sports),
            "science" => Ok(CategoryLabel::Science),
            "health" => Ok(CategoryLabel::Health),
            _ => Err(AkhbarError::unknown_category(s)),
        }
    }
}
