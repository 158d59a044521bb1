//! SQLite-backed place catalogue with an in-memory R\*-tree.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use crate::{Category, Place, PlaceId, search_bounds};

use super::PlaceCatalog;

/// DDL for the `places` table read by [`SqlitePlaceCatalog`].
///
/// `categories` holds a JSON array of strings; `rating` and `is_open_now`
/// are nullable.
pub const PLACES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS places (
    id TEXT PRIMARY KEY NOT NULL,
    lon REAL NOT NULL,
    lat REAL NOT NULL,
    categories TEXT NOT NULL DEFAULT '[]',
    rating REAL,
    is_open_now INTEGER
)";

/// Error raised when loading the persisted catalogue.
#[derive(Debug, Error)]
pub enum SqlitePlaceCatalogError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The stored category payload was not a JSON array of strings.
    #[error("failed to parse categories for place {id}: {source}")]
    InvalidCategories {
        /// Identifier of the place whose categories failed to parse.
        id: PlaceId,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Generic SQLite error when reading place rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Position of a place inside the catalogue's backing vector.
#[derive(Debug, Clone, Copy)]
struct IndexedPlace {
    position: [f64; 2],
    slot: usize,
}

impl RTreeObject for IndexedPlace {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// Read-only catalogue loaded from a SQLite `places` table.
///
/// Rows are read once at open time and indexed in an R\*-tree so radius
/// queries only touch nearby places.
pub struct SqlitePlaceCatalog {
    places: Vec<Place>,
    by_id: HashMap<PlaceId, usize>,
    index: RTree<IndexedPlace>,
}

impl fmt::Debug for SqlitePlaceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceCatalog")
            .field("entries", &self.index.size())
            .finish_non_exhaustive()
    }
}

impl SqlitePlaceCatalog {
    /// Open the catalogue stored at `database_path`.
    ///
    /// # Errors
    /// Returns [`SqlitePlaceCatalogError`] when the database cannot be
    /// opened or queried, or when a row carries malformed categories.
    pub fn open<P>(database_path: P) -> Result<Self, SqlitePlaceCatalogError>
    where
        P: AsRef<Path>,
    {
        let path = database_path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqlitePlaceCatalogError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        let places = load_places(&connection)?;
        log::debug!("loaded {} places from {}", places.len(), path.display());
        Ok(Self::from_places(places))
    }

    /// Build a catalogue from already loaded places.
    #[must_use]
    pub fn from_places(places: Vec<Place>) -> Self {
        let entries = places
            .iter()
            .enumerate()
            .map(|(slot, place)| IndexedPlace {
                position: [place.location.x, place.location.y],
                slot,
            })
            .collect();
        let by_id = places
            .iter()
            .enumerate()
            .map(|(slot, place)| (place.id.clone(), slot))
            .collect();
        Self {
            places,
            by_id,
            index: RTree::bulk_load(entries),
        }
    }

    /// Number of catalogued places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Report whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceCatalog for SqlitePlaceCatalog {
    fn places_within(
        &self,
        origin: Coord<f64>,
        radius_metres: f64,
    ) -> Box<dyn Iterator<Item = Place> + Send + '_> {
        let bounds = search_bounds(origin, radius_metres);
        let envelope = AABB::from_corners(
            [bounds.min().x, bounds.min().y],
            [bounds.max().x, bounds.max().y],
        );
        let mut slots: Vec<usize> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.slot)
            .collect();
        // Deterministic order keeps seeded selections reproducible.
        slots.sort_unstable();

        Box::new(
            slots
                .into_iter()
                .filter_map(|slot| self.places.get(slot).cloned()),
        )
    }

    fn place(&self, id: &PlaceId) -> Option<Place> {
        self.by_id
            .get(id)
            .and_then(|slot| self.places.get(*slot))
            .cloned()
    }
}

fn load_places(connection: &Connection) -> Result<Vec<Place>, SqlitePlaceCatalogError> {
    let mut statement = connection.prepare(
        "SELECT id, lon, lat, categories, rating, is_open_now FROM places ORDER BY id",
    )?;
    let mut rows = statement.query([])?;
    let mut places = Vec::new();

    while let Some(row) = rows.next()? {
        let id = PlaceId::new(row.get::<_, String>(0)?);
        let lon: f64 = row.get(1)?;
        let lat: f64 = row.get(2)?;
        let categories_json: String = row.get(3)?;
        let rating: Option<f64> = row.get(4)?;
        let is_open_now: Option<bool> = row.get(5)?;
        let categories: BTreeSet<Category> = serde_json::from_str(&categories_json)
            .map_err(|source| SqlitePlaceCatalogError::InvalidCategories {
                id: id.clone(),
                source,
            })?;

        places.push(Place {
            id,
            location: Coord { x: lon, y: lat },
            categories,
            rating,
            is_open_now,
        });
    }

    Ok(places)
}
