//! Facade crate for the Roamer place-selection engine.
//!
//! This crate re-exports the core domain types and exposes the weighted
//! selector and SQLite-backed stores behind feature flags.

#![forbid(unsafe_code)]

pub use roamer_core::{
    Category, MAX_RATING, METRES_PER_MILE, MIN_RATING, Place, PlaceCatalog, PlaceError, PlaceId,
    RecentCategories, SelectError, Selection, SelectionRequest, SelectionRequestValidationError,
    Selector, UserState, UserStateError, UserStateStore, haversine_metres, metres_to_miles,
};

#[cfg(feature = "store-sqlite")]
pub use roamer_core::{SqlitePlaceCatalog, SqlitePlaceCatalogError, SqliteUserStateStore};

#[cfg(feature = "test-support")]
pub use roamer_core::test_support;

#[cfg(feature = "selector")]
pub use roamer_selector::{WeightPolicy, WeightPolicyError, WeightedCandidate, WeightedSelector};
