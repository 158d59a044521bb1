//! The selection contract: one weighted pick or a typed failure.

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Place, SelectionRequest, SelectionRequestValidationError};

/// A successful pick.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use roamer_core::{Place, Selection};
///
/// let selection = Selection {
///     place: Place::new("a", Coord { x: 0.0, y: 0.0 }),
///     weight: 1.35,
///     distance_metres: 480.0,
///     candidates_considered: 2,
/// };
/// assert_eq!(selection.place.id.as_str(), "a");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Selection {
    /// The chosen place.
    pub place: Place,
    /// Weight the place won the draw with.
    pub weight: f64,
    /// Distance from the request origin in metres.
    pub distance_metres: f64,
    /// Number of positively weighted candidates in the draw.
    pub candidates_considered: usize,
}

/// Errors returned by [`Selector::select`].
///
/// Both variants are expected outcomes the caller can act on, e.g. by
/// widening the radius after [`SelectError::NoEligiblePlaces`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    /// Request parameters were invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] SelectionRequestValidationError),
    /// Filtering left nothing with a positive weight.
    #[error("no eligible places matched the request")]
    NoEligiblePlaces,
}

/// Pick one place from a candidate set.
///
/// Implementations must be pure apart from the supplied random source:
/// identical inputs and an identically seeded `rng` produce the same pick.
/// Selectors must be `Send + Sync` so a single instance can serve concurrent
/// callers, each bringing its own generator.
pub trait Selector: Send + Sync {
    /// Select a place for `request` from `candidates`.
    ///
    /// # Errors
    /// Returns [`SelectError::InvalidRequest`] before any filtering when the
    /// request fails validation, or [`SelectError::NoEligiblePlaces`] when
    /// no candidate survives filtering with a positive weight.
    fn select(
        &self,
        request: &SelectionRequest,
        candidates: &[Place],
        rng: &mut dyn RngCore,
    ) -> Result<Selection, SelectError>;
}
