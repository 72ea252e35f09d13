//! Catalog products and category selection.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog product.
///
/// Products are created fresh on every catalog fetch and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image reference (usually a URL).
    pub image: String,
    /// Category name, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Case-insensitive substring match on the title.
    ///
    /// An empty (or whitespace-only) query matches every product.
    #[must_use]
    pub fn title_matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.title.to_lowercase().contains(&needle)
    }
}

/// The current category filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// No filter; the full catalog.
    #[default]
    All,
    /// A single named category (e.g. "electronics").
    Named(String),
}

impl Category {
    /// Sentinel string used for [`Category::All`] in query strings and forms.
    pub const ALL: &'static str = "all";

    /// Parse a user-supplied category value.
    ///
    /// Empty input and the `all` sentinel (any case) both mean no filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(Self::ALL) {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    /// The category name, or `None` for [`Category::All`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }

    /// Human-readable label for menus.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Categories",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
