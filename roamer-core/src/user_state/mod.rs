//! Per-user exclusion state: visit history, no-go list and recent categories.
//!
//! The selector only reads this state through a [`SelectionRequest`]; the
//! `UserStateStore` trait is the write side, used after a user accepts a
//! pick or blocks a place.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Place, PlaceId, RecentCategories, SelectionRequest};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteUserStateStore, USER_STATE_SCHEMA};

/// Snapshot of one user's persisted selection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserState {
    /// Places previously accepted.
    pub visited: HashSet<PlaceId>,
    /// Places the user never wants offered.
    pub no_go: HashSet<PlaceId>,
    /// Categories of the latest accepted places, oldest first.
    pub recent_categories: RecentCategories,
}

impl UserState {
    /// Merge this state into `request`.
    ///
    /// Exclusions are added to those already on the request. The stored
    /// category history is used only when the request carries none.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use roamer_core::{PlaceId, SelectionRequest, UserState};
    ///
    /// let mut state = UserState::default();
    /// state.no_go.insert(PlaceId::from("loud-bar"));
    /// let request = state.apply_to(SelectionRequest::new(Coord { x: 0.0, y: 0.0 }, 800.0));
    /// assert!(request.is_excluded(&PlaceId::from("loud-bar")));
    /// ```
    #[must_use]
    pub fn apply_to(&self, mut request: SelectionRequest) -> SelectionRequest {
        request.visited_ids.extend(self.visited.iter().cloned());
        request.no_go_ids.extend(self.no_go.iter().cloned());
        if request.recent_categories.is_empty() {
            request.recent_categories = self.recent_categories.clone();
        }
        request
    }

    /// Record an accepted place.
    pub fn record_visit(&mut self, place: &Place) {
        self.visited.insert(place.id.clone());
        self.recent_categories.record(place);
    }
}

/// Errors raised by [`UserStateStore`] implementations.
#[derive(Debug, Error)]
pub enum UserStateError {
    /// Opening the backing database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open user state database at {path}: {source}")]
    OpenDatabase {
        /// Location of the database.
        path: std::path::PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Reading or writing a row failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to {operation}: {source}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A previous writer panicked while holding the store lock.
    #[error("user state store lock is poisoned")]
    Poisoned,
}

/// Read and update per-user selection state.
///
/// Methods take `&self`; implementations provide their own synchronisation
/// so one store can be shared between concurrent requests.
pub trait UserStateStore: Send + Sync {
    /// Load the state for `user`. Unknown users have empty state.
    ///
    /// # Errors
    /// Returns [`UserStateError`] when the backing storage fails.
    fn user_state(&self, user: &str) -> Result<UserState, UserStateError>;

    /// Append `place` to the visit history and category history.
    ///
    /// # Errors
    /// Returns [`UserStateError`] when the backing storage fails.
    fn record_visit(&self, user: &str, place: &Place) -> Result<(), UserStateError>;

    /// Add `id` to the no-go list. Adding an existing entry is a no-op.
    ///
    /// # Errors
    /// Returns [`UserStateError`] when the backing storage fails.
    fn add_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError>;

    /// Remove `id` from the no-go list. Removing a missing entry is a no-op.
    ///
    /// # Errors
    /// Returns [`UserStateError`] when the backing storage fails.
    fn remove_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, test_support::MemoryUserStateStore};
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cafe() -> Place {
        Place::new("cafe-1", Coord { x: 0.0, y: 0.0 })
            .with_categories(["cafe"])
            .with_rating(4.0)
    }

    #[rstest]
    fn apply_to_merges_exclusions() {
        let mut state = UserState::default();
        state.visited.insert(PlaceId::from("a"));
        state.no_go.insert(PlaceId::from("b"));
        let request = SelectionRequest::new(Coord { x: 0.0, y: 0.0 }, 100.0).with_visited(["c"]);

        let merged = state.apply_to(request);
        for id in ["a", "b", "c"] {
            assert!(merged.is_excluded(&PlaceId::from(id)), "{id} should be excluded");
        }
    }

    #[rstest]
    fn apply_to_keeps_explicit_history() {
        let mut state = UserState::default();
        state.recent_categories.push(Category::new("gym"));
        let explicit: RecentCategories = ["bar"].into_iter().collect();
        let request = SelectionRequest::new(Coord { x: 0.0, y: 0.0 }, 100.0)
            .with_recent_categories(explicit.clone());

        assert_eq!(state.apply_to(request).recent_categories, explicit);
    }

    #[rstest]
    fn apply_to_fills_empty_history() {
        let mut state = UserState::default();
        state.recent_categories.push(Category::new("gym"));
        let request = SelectionRequest::new(Coord { x: 0.0, y: 0.0 }, 100.0);

        assert_eq!(
            state.apply_to(request).recent_categories,
            state.recent_categories
        );
    }

    #[rstest]
    fn memory_store_records_visits(cafe: Place) {
        let store = MemoryUserStateStore::default();
        store.record_visit("ana", &cafe).expect("record visit");
        store.record_visit("ana", &cafe).expect("record visit");

        let state = store.user_state("ana").expect("load state");
        assert!(state.visited.contains(&cafe.id));
        assert_eq!(state.recent_categories.repeated(), Some(&Category::new("cafe")));
        assert_eq!(
            store.user_state("ben").expect("load state"),
            UserState::default()
        );
    }

    #[rstest]
    fn memory_store_toggles_no_go(cafe: Place) {
        let store = MemoryUserStateStore::default();
        store.add_no_go("ana", &cafe.id).expect("add");
        assert!(store.user_state("ana").expect("load").no_go.contains(&cafe.id));
        store.remove_no_go("ana", &cafe.id).expect("remove");
        assert!(store.user_state("ana").expect("load").no_go.is_empty());
    }
}
