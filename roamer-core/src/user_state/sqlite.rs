//! SQLite-backed user state.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, params};

use crate::{Category, Place, PlaceId, RECENT_CATEGORY_CAPACITY, RecentCategories};

use super::{UserState, UserStateError, UserStateStore};

/// DDL applied when opening a [`SqliteUserStateStore`].
///
/// Visits are append-only; the category history is derived from the latest
/// rows rather than stored separately.
pub const USER_STATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS visits (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    place_id TEXT NOT NULL,
    category TEXT
);
CREATE INDEX IF NOT EXISTS visits_by_user ON visits (user_id, seq);
CREATE TABLE IF NOT EXISTS no_go (
    user_id TEXT NOT NULL,
    place_id TEXT NOT NULL,
    PRIMARY KEY (user_id, place_id)
);
";

/// User state persisted in a SQLite database.
///
/// The connection is guarded by a mutex so the store can be shared across
/// threads.
#[derive(Debug)]
pub struct SqliteUserStateStore {
    connection: Mutex<Connection>,
}

impl SqliteUserStateStore {
    /// Open or create the database at `path` and apply the schema.
    ///
    /// # Errors
    /// Returns [`UserStateError::OpenDatabase`] when the file cannot be
    /// opened, or [`UserStateError::Query`] when the schema cannot be applied.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, UserStateError> {
        let db_path = path.as_ref();
        let connection =
            Connection::open(db_path).map_err(|source| UserStateError::OpenDatabase {
                path: db_path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection)
    }

    /// Wrap an existing connection, applying the schema.
    ///
    /// # Errors
    /// Returns [`UserStateError::Query`] when the schema cannot be applied.
    pub fn with_connection(connection: Connection) -> Result<Self, UserStateError> {
        connection
            .execute_batch(USER_STATE_SCHEMA)
            .map_err(|source| UserStateError::Query {
                operation: "apply user state schema",
                source,
            })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, UserStateError> {
        self.connection
            .lock()
            .map_err(|_| UserStateError::Poisoned)
    }
}

impl UserStateStore for SqliteUserStateStore {
    fn user_state(&self, user: &str) -> Result<UserState, UserStateError> {
        let connection = self.lock()?;
        Ok(UserState {
            visited: load_ids(
                &connection,
                "SELECT DISTINCT place_id FROM visits WHERE user_id = ?1",
                user,
                "read visit history",
            )?,
            no_go: load_ids(
                &connection,
                "SELECT place_id FROM no_go WHERE user_id = ?1",
                user,
                "read no-go list",
            )?,
            recent_categories: load_recent_categories(&connection, user)?,
        })
    }

    fn record_visit(&self, user: &str, place: &Place) -> Result<(), UserStateError> {
        let category = place.primary_category().map(Category::as_str);
        self.lock()?
            .execute(
                "INSERT INTO visits (user_id, place_id, category) VALUES (?1, ?2, ?3)",
                params![user, place.id.as_str(), category],
            )
            .map_err(|source| UserStateError::Query {
                operation: "record visit",
                source,
            })?;
        log::debug!("recorded visit to {} for {user}", place.id);
        Ok(())
    }

    fn add_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError> {
        self.lock()?
            .execute(
                "INSERT OR IGNORE INTO no_go (user_id, place_id) VALUES (?1, ?2)",
                params![user, id.as_str()],
            )
            .map_err(|source| UserStateError::Query {
                operation: "add no-go entry",
                source,
            })?;
        Ok(())
    }

    fn remove_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError> {
        self.lock()?
            .execute(
                "DELETE FROM no_go WHERE user_id = ?1 AND place_id = ?2",
                params![user, id.as_str()],
            )
            .map_err(|source| UserStateError::Query {
                operation: "remove no-go entry",
                source,
            })?;
        Ok(())
    }
}

fn load_ids<C>(
    connection: &Connection,
    sql: &str,
    user: &str,
    operation: &'static str,
) -> Result<C, UserStateError>
where
    C: FromIterator<PlaceId>,
{
    let query_error = |source| UserStateError::Query { operation, source };
    let mut statement = connection.prepare(sql).map_err(query_error)?;
    let rows = statement
        .query_map([user], |row| row.get::<_, String>(0))
        .map_err(query_error)?;
    rows.map(|row| row.map(PlaceId::from).map_err(query_error))
        .collect()
}

fn load_recent_categories(
    connection: &Connection,
    user: &str,
) -> Result<RecentCategories, UserStateError> {
    let query_error = |source| UserStateError::Query {
        operation: "read category history",
        source,
    };
    let mut statement = connection
        .prepare(
            "SELECT category FROM visits
             WHERE user_id = ?1 AND category IS NOT NULL
             ORDER BY seq DESC LIMIT ?2",
        )
        .map_err(query_error)?;
    let limit = i64::try_from(RECENT_CATEGORY_CAPACITY).unwrap_or(i64::MAX);
    let newest_first = statement
        .query_map(params![user, limit], |row| row.get::<_, String>(0))
        .map_err(query_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(query_error)?;
    Ok(newest_first.into_iter().rev().map(Category::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn store() -> (TempDir, SqliteUserStateStore) {
        let dir = TempDir::new().expect("create temp dir");
        let store = SqliteUserStateStore::open(dir.path().join("users.db")).expect("open store");
        (dir, store)
    }

    fn place(id: &str, category: &str) -> Place {
        Place::new(id, Coord { x: 0.0, y: 0.0 })
            .with_categories([category])
            .with_rating(4.0)
    }

    #[rstest]
    fn unknown_user_has_empty_state(#[from(store)] (_dir, store): (TempDir, SqliteUserStateStore)) {
        assert_eq!(store.user_state("nobody").expect("load"), UserState::default());
    }

    #[rstest]
    fn visits_feed_history_and_categories(
        #[from(store)] (_dir, store): (TempDir, SqliteUserStateStore),
    ) {
        store.record_visit("ana", &place("a", "bar")).expect("visit a");
        store.record_visit("ana", &place("b", "cafe")).expect("visit b");
        store.record_visit("ana", &place("c", "cafe")).expect("visit c");
        store.record_visit("ben", &place("d", "gym")).expect("visit d");

        let state = store.user_state("ana").expect("load");
        assert_eq!(state.visited.len(), 3);
        assert!(!state.visited.contains(&PlaceId::from("d")));
        let categories: Vec<_> = state.recent_categories.iter().map(Category::as_str).collect();
        assert_eq!(categories, vec!["cafe", "cafe"]);
    }

    #[rstest]
    fn no_go_entries_are_idempotent(#[from(store)] (_dir, store): (TempDir, SqliteUserStateStore)) {
        let id = PlaceId::from("loud");
        store.add_no_go("ana", &id).expect("add");
        store.add_no_go("ana", &id).expect("add again");
        assert_eq!(store.user_state("ana").expect("load").no_go.len(), 1);

        store.remove_no_go("ana", &id).expect("remove");
        store.remove_no_go("ana", &id).expect("remove again");
        assert!(store.user_state("ana").expect("load").no_go.is_empty());
    }

    #[rstest]
    fn state_survives_reopening() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("users.db");
        {
            let store = SqliteUserStateStore::open(&path).expect("open store");
            store.record_visit("ana", &place("a", "park")).expect("visit");
        }
        let reopened = SqliteUserStateStore::open(&path).expect("reopen store");
        let state = reopened.user_state("ana").expect("load");
        assert!(state.visited.contains(&PlaceId::from("a")));
    }
}
