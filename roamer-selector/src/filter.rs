//! Eligibility stages run before weighting.
//!
//! Stages run in a fixed order and only ever narrow the pool: malformed
//! places, then radius, then exclusions, then closed venues, then rating.

use roamer_core::{Place, SelectionRequest, haversine_metres};

/// A place that passed every filter, with the values weighting needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Eligible<'a> {
    pub(crate) place: &'a Place,
    pub(crate) rating: f64,
    pub(crate) distance_metres: f64,
}

/// Pool sizes after each stage, for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StageCounts {
    pub(crate) supplied: usize,
    pub(crate) well_formed: usize,
    pub(crate) within_radius: usize,
    pub(crate) not_excluded: usize,
    pub(crate) open: usize,
    pub(crate) rated: usize,
}

/// Run the filter stages over `candidates`.
///
/// The request must already be validated.
pub(crate) fn eligible<'a>(
    request: &SelectionRequest,
    candidates: &'a [Place],
) -> (Vec<Eligible<'a>>, StageCounts) {
    let mut counts = StageCounts {
        supplied: candidates.len(),
        ..StageCounts::default()
    };

    let mut pool: Vec<Eligible<'a>> = candidates
        .iter()
        .filter_map(|place| match place.validate() {
            Ok(rating) => Some(Eligible {
                place,
                rating,
                distance_metres: haversine_metres(request.origin, place.location),
            }),
            Err(err) => {
                log::warn!("skipping malformed place: {err}");
                None
            }
        })
        .collect();
    counts.well_formed = pool.len();

    pool.retain(|candidate| candidate.distance_metres <= request.radius_metres);
    counts.within_radius = pool.len();

    pool.retain(|candidate| !request.is_excluded(&candidate.place.id));
    counts.not_excluded = pool.len();

    if request.exclude_closed {
        pool.retain(|candidate| candidate.place.is_open());
    }
    counts.open = pool.len();

    pool.retain(|candidate| candidate.rating >= request.min_rating);
    counts.rated = pool.len();

    (pool, counts)
}
