//! `WeightedSelector`: filters, weights and draws.

use rand::RngCore;
use roamer_core::{Place, SelectError, Selection, SelectionRequest, Selector};

use crate::{
    draw::draw_index,
    filter::{Eligible, eligible},
    weight::{WeightPolicy, WeightPolicyError},
};

/// A candidate that survived filtering with a positive weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCandidate<'a> {
    /// The candidate place.
    pub place: &'a Place,
    /// Selection weight; always positive and finite.
    pub weight: f64,
    /// Distance from the request origin in metres.
    pub distance_metres: f64,
}

/// Default [`Selector`]: weighted random choice among eligible places.
///
/// The selector holds no mutable state, so one instance can be shared
/// between threads as long as each caller supplies its own generator.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use roamer_core::{Place, SelectionRequest, Selector};
/// use roamer_selector::WeightedSelector;
///
/// let candidates = vec![
///     Place::new("cafe", Coord { x: 0.0, y: 0.001 })
///         .with_categories(["cafe"])
///         .with_rating(4.5),
/// ];
/// let request = SelectionRequest::new(Coord { x: 0.0, y: 0.0 }, 1_000.0);
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let selection = WeightedSelector::new()
///     .select(&request, &candidates, &mut rng)
///     .expect("one eligible place");
/// assert_eq!(selection.place.id.as_str(), "cafe");
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeightedSelector {
    policy: WeightPolicy,
}

impl WeightedSelector {
    /// Construct a selector with the default [`WeightPolicy`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a selector with a custom policy.
    ///
    /// # Errors
    /// Returns [`WeightPolicyError`] when the policy is inconsistent.
    pub fn with_policy(policy: WeightPolicy) -> Result<Self, WeightPolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// The policy used to weight candidates.
    #[must_use]
    pub const fn policy(&self) -> &WeightPolicy {
        &self.policy
    }

    /// Filter and weight `candidates` without drawing.
    ///
    /// Zero-weight candidates are dropped, so every returned entry has a
    /// positive chance of being selected. Input order is preserved.
    ///
    /// # Errors
    /// Returns [`SelectError::InvalidRequest`] when `request` fails
    /// validation, or [`SelectError::NoEligiblePlaces`] when nothing is left.
    pub fn weigh<'a>(
        &self,
        request: &SelectionRequest,
        candidates: &'a [Place],
    ) -> Result<Vec<WeightedCandidate<'a>>, SelectError> {
        request.validate()?;

        let (pool, counts) = eligible(request, candidates);
        let weighted: Vec<_> = pool
            .into_iter()
            .map(|candidate| self.weighted(request, candidate))
            .filter(|candidate| candidate.weight.is_finite() && candidate.weight > 0.0)
            .collect();

        log::debug!(
            "candidates: {} supplied, {} well formed, {} in radius, {} not excluded, \
             {} open, {} rated, {} weighted",
            counts.supplied,
            counts.well_formed,
            counts.within_radius,
            counts.not_excluded,
            counts.open,
            counts.rated,
            weighted.len(),
        );

        if weighted.is_empty() {
            return Err(SelectError::NoEligiblePlaces);
        }
        Ok(weighted)
    }

    fn weighted<'a>(
        &self,
        request: &SelectionRequest,
        candidate: Eligible<'a>,
    ) -> WeightedCandidate<'a> {
        WeightedCandidate {
            place: candidate.place,
            weight: self.policy.weight(
                candidate.place,
                candidate.rating,
                candidate.distance_metres,
                &request.recent_categories,
            ),
            distance_metres: candidate.distance_metres,
        }
    }
}

impl Selector for WeightedSelector {
    fn select(
        &self,
        request: &SelectionRequest,
        candidates: &[Place],
        rng: &mut dyn RngCore,
    ) -> Result<Selection, SelectError> {
        let weighted = self.weigh(request, candidates)?;
        let weights: Vec<f64> = weighted.iter().map(|candidate| candidate.weight).collect();
        let chosen = draw_index(&weights, rng)
            .and_then(|index| weighted.get(index))
            .ok_or(SelectError::NoEligiblePlaces)?;

        log::debug!(
            "selected {} with weight {:.4} out of {}",
            chosen.place.id,
            chosen.weight,
            weighted.len()
        );
        Ok(Selection {
            place: chosen.place.clone(),
            weight: chosen.weight,
            distance_metres: chosen.distance_metres,
            candidates_considered: weighted.len(),
        })
    }
}
