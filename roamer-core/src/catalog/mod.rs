//! Read access to the place catalogue.
//!
//! The `PlaceCatalog` trait supplies the candidate sequence handed to a
//! [`Selector`](crate::Selector). Catalogues answer radius queries and may
//! over-approximate them; the selector's distance filter is authoritative.

use geo::Coord;

use crate::{Place, PlaceId};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{PLACES_SCHEMA, SqlitePlaceCatalog, SqlitePlaceCatalogError};

/// Read-only access to catalogued places.
///
/// Coordinates use WGS84 (`x = longitude`, `y = latitude`).
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use roamer_core::{Place, PlaceCatalog, PlaceId, haversine_metres};
///
/// struct VecCatalog {
///     places: Vec<Place>,
/// }
///
/// impl PlaceCatalog for VecCatalog {
///     fn places_within(
///         &self,
///         origin: Coord<f64>,
///         radius_metres: f64,
///     ) -> Box<dyn Iterator<Item = Place> + Send + '_> {
///         Box::new(
///             self.places
///                 .iter()
///                 .filter(move |p| haversine_metres(origin, p.location) <= radius_metres)
///                 .cloned(),
///         )
///     }
///
///     fn place(&self, id: &PlaceId) -> Option<Place> {
///         self.places.iter().find(|p| &p.id == id).cloned()
///     }
/// }
///
/// let place = Place::new("a", Coord { x: 0.0, y: 0.0 });
/// let catalog = VecCatalog { places: vec![place.clone()] };
/// let found: Vec<_> = catalog.places_within(Coord { x: 0.0, y: 0.001 }, 500.0).collect();
/// assert_eq!(found, vec![place]);
/// ```
pub trait PlaceCatalog {
    /// Return places that may lie within `radius_metres` of `origin`.
    ///
    /// Every place within the radius must be yielded. Places slightly beyond
    /// it may also be yielded, e.g. when the lookup uses a bounding box.
    fn places_within(
        &self,
        origin: Coord<f64>,
        radius_metres: f64,
    ) -> Box<dyn Iterator<Item = Place> + Send + '_>;

    /// Look up a single place by identifier.
    fn place(&self, id: &PlaceId) -> Option<Place>;
}
