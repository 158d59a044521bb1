//! Parameters for a single randomisation call.

use std::collections::HashSet;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{MAX_RATING, MIN_RATING, PlaceId, RecentCategories};

/// Inclusive rating threshold applied when the caller does not choose one.
pub const DEFAULT_MIN_RATING: f64 = 3.0;

/// Parameters for a selection call.
///
/// Exclusion sets and the category history are supplied by the caller; the
/// engine never mutates them.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use roamer_core::SelectionRequest;
///
/// let request = SelectionRequest::new(Coord { x: -0.12, y: 51.5 }, 1_500.0)
///     .with_min_rating(4.0)
///     .with_visited(["cafe-1"]);
/// assert!(request.validate().is_ok());
/// assert!(request.exclude_closed);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionRequest {
    /// The user's current location.
    pub origin: Coord<f64>,
    /// Search radius in metres.
    pub radius_metres: f64,
    /// Inclusive minimum rating.
    #[cfg_attr(feature = "serde", serde(default = "default_min_rating"))]
    pub min_rating: f64,
    /// Drop places known to be closed.
    #[cfg_attr(feature = "serde", serde(default = "default_exclude_closed"))]
    pub exclude_closed: bool,
    /// Places the user has already visited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub visited_ids: HashSet<PlaceId>,
    /// Places the user never wants to be offered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub no_go_ids: HashSet<PlaceId>,
    /// Categories of the most recent selections, oldest first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recent_categories: RecentCategories,
}

#[cfg(feature = "serde")]
const fn default_min_rating() -> f64 {
    DEFAULT_MIN_RATING
}

#[cfg(feature = "serde")]
const fn default_exclude_closed() -> bool {
    true
}

/// Detailed validation failures for [`SelectionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SelectionRequestValidationError {
    /// The radius was zero, negative or not finite.
    #[error("radius_metres must be a positive finite number (got {0})")]
    NonPositiveRadius(f64),
    /// The minimum rating fell outside `0.0..=5.0`.
    #[error("min_rating must lie within 0.0..=5.0 (got {0})")]
    MinRatingOutOfRange(f64),
    /// The origin latitude was not a finite value within `-90.0..=90.0`.
    #[error("origin latitude must lie within -90.0..=90.0 (got {0})")]
    InvalidLatitude(f64),
    /// The origin longitude was not a finite value within `-180.0..=180.0`.
    #[error("origin longitude must lie within -180.0..=180.0 (got {0})")]
    InvalidLongitude(f64),
}

impl SelectionRequest {
    /// Build a request with default thresholds and empty exclusions.
    #[must_use]
    pub fn new(origin: Coord<f64>, radius_metres: f64) -> Self {
        Self {
            origin,
            radius_metres,
            min_rating: DEFAULT_MIN_RATING,
            exclude_closed: true,
            visited_ids: HashSet::new(),
            no_go_ids: HashSet::new(),
            recent_categories: RecentCategories::new(),
        }
    }

    /// Override the rating threshold.
    #[must_use]
    pub const fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Choose whether closed places are dropped.
    #[must_use]
    pub const fn with_exclude_closed(mut self, exclude_closed: bool) -> Self {
        self.exclude_closed = exclude_closed;
        self
    }

    /// Add ids to the visit history.
    #[must_use]
    pub fn with_visited<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlaceId>,
    {
        self.visited_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Add ids to the no-go list.
    #[must_use]
    pub fn with_no_go<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlaceId>,
    {
        self.no_go_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Replace the category history.
    #[must_use]
    pub fn with_recent_categories(mut self, recent: RecentCategories) -> Self {
        self.recent_categories = recent;
        self
    }

    /// Report whether `id` is excluded by history or the no-go list.
    #[must_use]
    pub fn is_excluded(&self, id: &PlaceId) -> bool {
        self.visited_ids.contains(id) || self.no_go_ids.contains(id)
    }

    /// Validate the request, reporting the first failing field.
    ///
    /// # Errors
    /// Returns [`SelectionRequestValidationError`] for a non-positive radius,
    /// an out-of-range rating threshold or an invalid origin.
    pub fn validate(&self) -> Result<(), SelectionRequestValidationError> {
        if !(self.radius_metres.is_finite() && self.radius_metres > 0.0) {
            return Err(SelectionRequestValidationError::NonPositiveRadius(
                self.radius_metres,
            ));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.min_rating) {
            return Err(SelectionRequestValidationError::MinRatingOutOfRange(
                self.min_rating,
            ));
        }
        if !(self.origin.y.is_finite() && (-90.0..=90.0).contains(&self.origin.y)) {
            return Err(SelectionRequestValidationError::InvalidLatitude(
                self.origin.y,
            ));
        }
        if !(self.origin.x.is_finite() && (-180.0..=180.0).contains(&self.origin.x)) {
            return Err(SelectionRequestValidationError::InvalidLongitude(
                self.origin.x,
            ));
        }
        Ok(())
    }
}
