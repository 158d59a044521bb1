//! Category tags and the short selection history used for diversity.
//!
//! # Examples
//! ```
//! use roamer_core::{Category, RecentCategories};
//!
//! let mut recent = RecentCategories::new();
//! recent.push(Category::new("Cafe"));
//! recent.push(Category::new("cafe"));
//! assert_eq!(recent.repeated(), Some(&Category::new("cafe")));
//! ```

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Place;

/// Number of past selections remembered for diversity down-weighting.
pub const RECENT_CATEGORY_CAPACITY: usize = 2;

/// A normalised category tag such as `cafe` or `park`.
///
/// Tags are trimmed and lowercased on construction so comparisons are
/// insensitive to the casing used by upstream catalogues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "String", into = "String")
)]
pub struct Category(String);

impl Category {
    /// Normalise `tag` into a category.
    ///
    /// # Examples
    /// ```
    /// use roamer_core::Category;
    ///
    /// assert_eq!(Category::new("  Bar ").as_str(), "bar");
    /// ```
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_lowercase())
    }

    /// Borrow the normalised tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Report whether the tag is empty after normalisation.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The categories of the most recent selections, oldest first.
///
/// At most [`RECENT_CATEGORY_CAPACITY`] entries are kept; pushing beyond the
/// capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<Category>", into = "Vec<Category>")
)]
pub struct RecentCategories {
    entries: VecDeque<Category>,
}

impl RecentCategories {
    /// Construct an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the category of a new selection.
    pub fn push(&mut self, category: Category) {
        if self.entries.len() == RECENT_CATEGORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(category);
    }

    /// Append `place`'s primary category, if it has one.
    ///
    /// The primary category is the first tag in set order.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use roamer_core::{Place, RecentCategories};
    ///
    /// let place = Place::new("a", Coord { x: 0.0, y: 0.0 })
    ///     .with_categories(["park", "cafe"]);
    /// let mut recent = RecentCategories::new();
    /// recent.record(&place);
    /// assert_eq!(recent.iter().next().map(|c| c.as_str()), Some("cafe"));
    /// ```
    pub fn record(&mut self, place: &Place) {
        if let Some(category) = place.primary_category() {
            self.push(category.clone());
        }
    }

    /// Return the category shared by the last two selections.
    ///
    /// Yields `None` while fewer than two selections are remembered or when
    /// the last two differ.
    #[must_use]
    pub fn repeated(&self) -> Option<&Category> {
        match (self.entries.front(), self.entries.back()) {
            (Some(older), Some(newer))
                if self.entries.len() == RECENT_CATEGORY_CAPACITY && older == newer =>
            {
                Some(newer)
            }
            _ => None,
        }
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    /// Number of remembered selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether no selection has been remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Category>> for RecentCategories {
    fn from(values: Vec<Category>) -> Self {
        let mut recent = Self::new();
        for category in values {
            recent.push(category);
        }
        recent
    }
}

impl From<RecentCategories> for Vec<Category> {
    fn from(recent: RecentCategories) -> Self {
        recent.entries.into_iter().collect()
    }
}

impl<C: Into<Category>> FromIterator<C> for RecentCategories {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut recent = Self::new();
        for category in iter {
            recent.push(category.into());
        }
        recent
    }
}
