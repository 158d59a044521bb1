//! In-memory collaborators used by unit and behaviour tests.
//!
//! Compiled for the crate's own tests and, for downstream crates, behind the
//! `test-support` feature.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use geo::Coord;

use crate::{
    EARTH_RADIUS_METRES, METRES_PER_MILE, Place, PlaceCatalog, PlaceId, UserState,
    UserStateError, UserStateStore, haversine_metres,
};

/// Point `metres` due north of `origin` along its meridian.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use roamer_core::{haversine_metres, test_support::north_of};
///
/// let origin = Coord { x: -0.12, y: 51.5 };
/// let distance = haversine_metres(origin, north_of(origin, 800.0));
/// assert!((distance - 800.0).abs() < 1e-6);
/// ```
#[expect(clippy::float_arithmetic, reason = "arc length is converted to degrees")]
#[must_use]
pub fn north_of(origin: Coord<f64>, metres: f64) -> Coord<f64> {
    Coord {
        x: origin.x,
        y: origin.y + (metres / EARTH_RADIUS_METRES).to_degrees(),
    }
}

/// Rated single-category place `miles` due north of `origin`.
#[expect(clippy::float_arithmetic, reason = "miles are converted to metres")]
#[must_use]
pub fn place_north_of(
    id: &str,
    origin: Coord<f64>,
    miles: f64,
    category: &str,
    rating: f64,
) -> Place {
    Place::new(id, north_of(origin, miles * METRES_PER_MILE))
        .with_categories([category])
        .with_rating(rating)
}

/// In-memory `PlaceCatalog` implementation used in tests.
///
/// The catalogue performs a linear scan and answers radius queries exactly.
#[derive(Default, Debug, Clone)]
pub struct MemoryCatalog {
    places: Vec<Place>,
}

impl MemoryCatalog {
    /// Create a catalogue containing a single place.
    #[must_use]
    pub fn with_place(place: Place) -> Self {
        Self::with_places(std::iter::once(place))
    }

    /// Create a catalogue from a collection of places.
    pub fn with_places<I>(places: I) -> Self
    where
        I: IntoIterator<Item = Place>,
    {
        Self {
            places: places.into_iter().collect(),
        }
    }
}

impl PlaceCatalog for MemoryCatalog {
    fn places_within(
        &self,
        origin: Coord<f64>,
        radius_metres: f64,
    ) -> Box<dyn Iterator<Item = Place> + Send + '_> {
        Box::new(
            self.places
                .iter()
                .filter(move |place| haversine_metres(origin, place.location) <= radius_metres)
                .cloned(),
        )
    }

    fn place(&self, id: &PlaceId) -> Option<Place> {
        self.places.iter().find(|place| &place.id == id).cloned()
    }
}

/// In-memory `UserStateStore` keyed by user id.
#[derive(Default, Debug)]
pub struct MemoryUserStateStore {
    users: Mutex<HashMap<String, UserState>>,
}

impl MemoryUserStateStore {
    /// Seed the store with an existing state for `user`.
    #[must_use]
    pub fn with_user(user: &str, state: UserState) -> Self {
        Self {
            users: Mutex::new(HashMap::from([(user.to_owned(), state)])),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, UserState>>, UserStateError> {
        self.users.lock().map_err(|_| UserStateError::Poisoned)
    }
}

impl UserStateStore for MemoryUserStateStore {
    fn user_state(&self, user: &str) -> Result<UserState, UserStateError> {
        Ok(self.lock()?.get(user).cloned().unwrap_or_default())
    }

    fn record_visit(&self, user: &str, place: &Place) -> Result<(), UserStateError> {
        self.lock()?
            .entry(user.to_owned())
            .or_default()
            .record_visit(place);
        Ok(())
    }

    fn add_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError> {
        self.lock()?
            .entry(user.to_owned())
            .or_default()
            .no_go
            .insert(id.clone());
        Ok(())
    }

    fn remove_no_go(&self, user: &str, id: &PlaceId) -> Result<(), UserStateError> {
        if let Some(state) = self.lock()?.get_mut(user) {
            state.no_go.remove(id);
        }
        Ok(())
    }
}

/// Write `places` into a fresh SQLite catalogue at `path`.
///
/// # Errors
/// Returns the underlying `rusqlite` error when the database cannot be
/// created or populated.
#[cfg(feature = "store-sqlite")]
pub fn write_sqlite_catalog(
    path: &std::path::Path,
    places: &[Place],
) -> Result<(), rusqlite::Error> {
    use crate::Category;

    let mut connection = rusqlite::Connection::open(path)?;
    connection.execute(crate::PLACES_SCHEMA, [])?;
    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare(
            "INSERT INTO places (id, lon, lat, categories, rating, is_open_now)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for place in places {
            let categories: Vec<&str> = place.categories.iter().map(Category::as_str).collect();
            let categories_json = serde_json::to_string(&categories)
                .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
            statement.execute(rusqlite::params![
                place.id.as_str(),
                place.location.x,
                place.location.y,
                categories_json,
                place.rating,
                place.is_open_now,
            ])?;
        }
    }
    tx.commit()
}
