//! Behavioural tests for `SqlitePlaceCatalog` using rstest-bdd.
#![cfg(feature = "store-sqlite")]

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use geo::Coord;
use roamer_core::{
    Category, PLACES_SCHEMA, Place, PlaceCatalog, SqlitePlaceCatalog, SqlitePlaceCatalogError,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use rusqlite::{Connection, params};
use tempfile::TempDir;

/// Shared state for catalogue scenarios.
#[derive(Debug)]
struct CatalogWorld {
    temp_dir: TempDir,
    db_path: RefCell<Option<PathBuf>>,
    catalog: RefCell<Option<SqlitePlaceCatalog>>,
    error: RefCell<Option<SqlitePlaceCatalogError>>,
    results: RefCell<Vec<Place>>,
}

impl CatalogWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            db_path: RefCell::new(None),
            catalog: RefCell::new(None),
            error: RefCell::new(None),
            results: RefCell::new(Vec::new()),
        }
    }

    fn expect_path(&self) -> PathBuf {
        self.db_path
            .borrow()
            .clone()
            .expect("database should be written before opening")
    }
}

#[fixture]
fn world() -> CatalogWorld {
    CatalogWorld::new()
}

/// Create the `places` table at `path` and insert `places`.
fn write_catalogue(path: &Path, places: &[Place]) {
    let connection = Connection::open(path).expect("create database");
    connection.execute(PLACES_SCHEMA, []).expect("apply schema");
    for place in places {
        let categories: Vec<&str> = place.categories.iter().map(Category::as_str).collect();
        connection
            .execute(
                "INSERT INTO places (id, lon, lat, categories, rating, is_open_now)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    place.id.as_str(),
                    place.location.x,
                    place.location.y,
                    serde_json::to_string(&categories).expect("encode categories"),
                    place.rating,
                    place.is_open_now,
                ],
            )
            .expect("insert place");
    }
}

fn place(id: &str, x: f64, y: f64, category: &str) -> Place {
    Place::new(id, Coord { x, y })
        .with_categories([category])
        .with_rating(4.0)
}

#[given("a SQLite catalogue with places around the origin")]
fn given_catalogue(world: &CatalogWorld) {
    let path = world.temp_dir.path().join("places.db");
    let places = [
        place("cafe", 0.002, 0.0, "cafe"),
        place("bar", 0.001, 0.001, "bar"),
        place("museum", 1.0, 1.0, "museum"),
    ];
    write_catalogue(&path, &places);
    world.db_path.replace(Some(path));
    open_catalogue(world);
}

#[given("a SQLite catalogue whose categories are not JSON")]
fn given_malformed_catalogue(world: &CatalogWorld) {
    let path = world.temp_dir.path().join("places.db");
    let connection = Connection::open(&path).expect("create database");
    connection.execute(PLACES_SCHEMA, []).expect("apply schema");
    connection
        .execute(
            "INSERT INTO places (id, lon, lat, categories, rating)
             VALUES ('odd', 0, 0, 'cafe', 4.0)",
            [],
        )
        .expect("insert row");
    world.db_path.replace(Some(path));
}

#[when("I open the SQLite catalogue")]
fn open_catalogue(world: &CatalogWorld) {
    match SqlitePlaceCatalog::open(world.expect_path()) {
        Ok(catalog) => {
            world.catalog.replace(Some(catalog));
            world.error.replace(None);
        }
        Err(err) => {
            world.catalog.replace(None);
            world.error.replace(Some(err));
        }
    }
}

fn query(world: &CatalogWorld, origin: Coord<f64>, radius_metres: f64) {
    let results = {
        let borrowed = world.catalog.borrow();
        let catalog = borrowed
            .as_ref()
            .expect("catalogue should be open for querying");
        catalog.places_within(origin, radius_metres).collect()
    };
    world.results.replace(results);
}

#[when("I query places within 1 km of the origin")]
fn query_origin(world: &CatalogWorld) {
    query(world, Coord { x: 0.0, y: 0.0 }, 1_000.0);
}

#[when("I query places within 1 km of a distant point")]
fn query_distant(world: &CatalogWorld) {
    query(world, Coord { x: 10.0, y: 10.0 }, 1_000.0);
}

#[then("the nearby places are returned in identifier order")]
fn then_nearby(world: &CatalogWorld) {
    let results = world.results.borrow();
    let ids: Vec<_> = results.iter().map(|place| place.id.as_str()).collect();
    assert_eq!(ids, vec!["bar", "cafe"]);
}

#[then("no places are returned")]
fn then_empty(world: &CatalogWorld) {
    assert!(world.results.borrow().is_empty(), "expected no places");
}

#[then("opening fails with an invalid categories error")]
fn then_invalid_categories(world: &CatalogWorld) {
    let binding = world.error.borrow();
    let error = binding.as_ref().expect("an error should be recorded");
    assert!(
        matches!(
            error,
            SqlitePlaceCatalogError::InvalidCategories { id, .. } if id.as_str() == "odd"
        ),
        "unexpected error: {error}"
    );
}

#[scenario(path = "tests/features/place_catalog.feature", index = 0)]
fn nearby_places(world: CatalogWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/place_catalog.feature", index = 1)]
fn distant_query(world: CatalogWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/place_catalog.feature", index = 2)]
fn malformed_categories(world: CatalogWorld) {
    let _ = world;
}
