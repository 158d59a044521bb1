//! Test helpers: temporary artefact directories and in-memory stores.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use roamer_core::{
    Place, PlaceCatalog, PlaceId, UserState, UserStateError, UserStateStore,
    test_support::{MemoryCatalog, MemoryUserStateStore, place_north_of},
};
use tempfile::TempDir;

use crate::{CliError, artefacts::StoreBuilder};

pub(super) const ORIGIN: Coord<f64> = Coord { x: -0.1276, y: 51.5072 };

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory exposed as a UTF-8 path.
pub(super) fn temp_root() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Two open cafes: `a` is near and well rated, `b` further and average.
pub(super) fn two_cafes() -> Vec<Place> {
    vec![
        place_north_of("a", ORIGIN, 0.3, "cafe", 4.5).with_open_now(true),
        place_north_of("b", ORIGIN, 1.5, "cafe", 3.0).with_open_now(true),
    ]
}

struct SharedUsers(Arc<MemoryUserStateStore>);

impl UserStateStore for SharedUsers {
    fn user_state(&self, user: &str) -> Result<UserState, UserStateError> {
        self.0.user_state(user)
    }

    fn record_visit(&self, user: &str, place: &Place) -> Result<(), UserStateError> {
        self.0.record_visit(user, place)
    }

    fn add_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError> {
        self.0.add_no_go(user, id)
    }

    fn remove_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError> {
        self.0.remove_no_go(user, id)
    }
}

/// In-memory stores that ignore the artefact paths they are given.
///
/// The user store is shared so state written by one command is visible to
/// the next.
#[derive(Debug, Default)]
pub(super) struct MemoryStores {
    pub(super) catalog: MemoryCatalog,
    pub(super) users: Arc<MemoryUserStateStore>,
}

impl MemoryStores {
    pub(super) fn with_places(places: Vec<Place>) -> Self {
        Self {
            catalog: MemoryCatalog::with_places(places),
            users: Arc::default(),
        }
    }
}

impl StoreBuilder for MemoryStores {
    fn catalog(&self, _path: &Utf8Path) -> Result<Box<dyn PlaceCatalog>, CliError> {
        Ok(Box::new(self.catalog.clone()))
    }

    fn user_state(&self, _path: &Utf8Path) -> Result<Box<dyn UserStateStore>, CliError> {
        Ok(Box::new(SharedUsers(Arc::clone(&self.users))))
    }
}
