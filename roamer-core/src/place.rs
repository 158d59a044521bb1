//! Venues that can be offered to a user.

use std::collections::BTreeSet;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Category;

/// Lowest rating a catalogue may assign.
pub const MIN_RATING: f64 = 0.0;
/// Highest rating a catalogue may assign.
pub const MAX_RATING: f64 = 5.0;

/// Opaque, catalogue-unique place identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct PlaceId(String);

impl PlaceId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate venue.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Rating and
/// categories are optional here because upstream catalogues are not trusted;
/// use [`Place::validate`] before weighting.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roamer_core::Place;
///
/// let place = Place::new("blue-bottle", Coord { x: -122.41, y: 37.77 })
///     .with_categories(["cafe"])
///     .with_rating(4.5)
///     .with_open_now(true);
///
/// assert!(place.validate().is_ok());
/// assert!(place.is_open());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Place {
    /// Catalogue identifier.
    pub id: PlaceId,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Category tags; order is irrelevant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub categories: BTreeSet<Category>,
    /// Score in `0.0..=5.0`, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: Option<f64>,
    /// Whether the venue is open right now; `None` means unknown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_open_now: Option<bool>,
}

/// Reasons a [`Place`] cannot take part in weighting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaceError {
    /// The place carries no usable category.
    #[error("place {id} has no categories")]
    MissingCategories {
        /// Offending place.
        id: PlaceId,
    },
    /// The place has no rating.
    #[error("place {id} has no rating")]
    MissingRating {
        /// Offending place.
        id: PlaceId,
    },
    /// The rating lies outside `0.0..=5.0` or is not finite.
    #[error("place {id} has rating {rating} outside 0.0..=5.0")]
    RatingOutOfRange {
        /// Offending place.
        id: PlaceId,
        /// Rating reported by the catalogue.
        rating: f64,
    },
    /// The coordinate is not a valid WGS84 position.
    #[error("place {id} has invalid location ({x}, {y})")]
    InvalidLocation {
        /// Offending place.
        id: PlaceId,
        /// Longitude.
        x: f64,
        /// Latitude.
        y: f64,
    },
}

impl Place {
    /// Construct a place with no categories, rating or opening state.
    pub fn new(id: impl Into<PlaceId>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            location,
            categories: BTreeSet::new(),
            rating: None,
            is_open_now: None,
        }
    }

    /// Replace the category set.
    #[must_use]
    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the opening state.
    #[must_use]
    pub const fn with_open_now(mut self, open: bool) -> Self {
        self.is_open_now = Some(open);
        self
    }

    /// Treat unknown opening state as open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.is_open_now, Some(false))
    }

    /// First category in set order.
    #[must_use]
    pub fn primary_category(&self) -> Option<&Category> {
        self.categories.iter().find(|category| !category.is_blank())
    }

    /// Report whether the place carries `category`.
    #[must_use]
    pub fn has_category(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    /// Check the invariants weighting relies on and return the rating.
    ///
    /// # Errors
    /// Returns a [`PlaceError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<f64, PlaceError> {
        if !crate::is_valid_coord(self.location) {
            return Err(PlaceError::InvalidLocation {
                id: self.id.clone(),
                x: self.location.x,
                y: self.location.y,
            });
        }
        if self.primary_category().is_none() {
            return Err(PlaceError::MissingCategories {
                id: self.id.clone(),
            });
        }
        let rating = self.rating.ok_or_else(|| PlaceError::MissingRating {
            id: self.id.clone(),
        })?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(PlaceError::RatingOutOfRange {
                id: self.id.clone(),
                rating,
            });
        }
        Ok(rating)
    }
}
