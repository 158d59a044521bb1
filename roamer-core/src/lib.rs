//! Core domain types for the Roamer place-selection engine.
//!
//! The crate defines the data model (places, categories, selection
//! requests), the [`Selector`] contract implemented by engine crates, and the
//! collaborator traits that feed it: a [`PlaceCatalog`] for candidates and a
//! [`UserStateStore`] for visit history and no-go lists.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalog;
pub mod category;
pub mod distance;
pub mod place;
pub mod request;
pub mod selector;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod user_state;

pub use catalog::PlaceCatalog;
#[cfg(feature = "store-sqlite")]
pub use catalog::{PLACES_SCHEMA, SqlitePlaceCatalog, SqlitePlaceCatalogError};
pub use category::{Category, RECENT_CATEGORY_CAPACITY, RecentCategories};
pub use distance::{
    EARTH_RADIUS_METRES, METRES_PER_MILE, haversine_metres, is_valid_coord, metres_to_miles,
    search_bounds,
};
pub use place::{MAX_RATING, MIN_RATING, Place, PlaceError, PlaceId};
pub use request::{DEFAULT_MIN_RATING, SelectionRequest, SelectionRequestValidationError};
pub use selector::{SelectError, Selection, Selector};
pub use user_state::{UserState, UserStateError, UserStateStore};
#[cfg(feature = "store-sqlite")]
pub use user_state::{SqliteUserStateStore, USER_STATE_SCHEMA};
