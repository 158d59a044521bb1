//! Great-circle distances on a spherical earth.
//!
//! Coordinates follow the `geo` convention of `x = longitude` and
//! `y = latitude`, both in degrees.

use geo::{Coord, Distance, Haversine, Point, Rect};

/// Mean earth radius in metres (IUGG).
pub const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// Metres in one statute mile.
pub const METRES_PER_MILE: f64 = 1_609.344;

/// Haversine distance between two coordinates in metres.
///
/// Delegates to [`geo::Haversine`], whose mean radius matches
/// [`EARTH_RADIUS_METRES`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roamer_core::haversine_metres;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 };
/// let metres = haversine_metres(a, b);
/// assert!((metres - 111_195.0).abs() < 10.0);
/// ```
#[must_use]
pub fn haversine_metres(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// Convert metres to statute miles.
#[expect(clippy::float_arithmetic, reason = "unit conversion")]
#[must_use]
pub fn metres_to_miles(metres: f64) -> f64 {
    metres / METRES_PER_MILE
}

/// Report whether `coord` is a finite WGS84 position.
#[must_use]
pub fn is_valid_coord(coord: Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}

/// Axis-aligned rectangle enclosing every point within `radius_metres` of
/// `origin`.
///
/// The rectangle over-approximates the circle so it is safe for coarse
/// spatial-index queries; callers must still filter by exact distance.
/// Latitudes are clamped to the poles. Near the poles, or when the circle
/// would cross the antimeridian, the longitude span widens to the full
/// `-180.0..=180.0` range.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roamer_core::search_bounds;
///
/// let bounds = search_bounds(Coord { x: 0.0, y: 0.0 }, 1_000.0);
/// assert!(bounds.max().y > 0.0089 && bounds.max().y < 0.0091);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "bounding box derivation converts metres to degrees"
)]
#[must_use]
pub fn search_bounds(origin: Coord<f64>, radius_metres: f64) -> Rect<f64> {
    let angular = (radius_metres / EARTH_RADIUS_METRES).to_degrees();
    let min_y = (origin.y - angular).max(-90.0);
    let max_y = (origin.y + angular).min(90.0);

    let widest_lat = origin.y.abs() + angular;
    let (min_x, max_x) = if widest_lat >= 90.0 {
        (-180.0, 180.0)
    } else {
        let lon_delta = angular / widest_lat.to_radians().cos();
        let west = origin.x - lon_delta;
        let east = origin.x + lon_delta;
        if west < -180.0 || east > 180.0 {
            (-180.0, 180.0)
        } else {
            (west, east)
        }
    };

    Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y })
}
