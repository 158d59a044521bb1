//! Weighting rules applied to candidates that survived filtering.
//!
//! A weight is the product of three independent factors: a distance tier, a
//! category diversity penalty and a rating boost.

use roamer_core::{MAX_RATING, Place, RecentCategories, metres_to_miles};
use thiserror::Error;

/// Tunable weighting parameters.
///
/// The default reproduces the stock tiers: under half a mile scores `1.5`,
/// under one mile `1.0`, under two miles `0.75` and anything further `0.5`.
/// Places matching a repeated category are halved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightPolicy {
    /// Upper bound (exclusive, miles) of the nearest tier.
    pub near_miles: f64,
    /// Upper bound (exclusive, miles) of the middle tier.
    pub mid_miles: f64,
    /// Upper bound (exclusive, miles) of the far tier.
    pub far_miles: f64,
    /// Multiplier for places closer than `near_miles`.
    pub near_multiplier: f64,
    /// Multiplier for places in `[near_miles, mid_miles)`.
    pub mid_multiplier: f64,
    /// Multiplier for places in `[mid_miles, far_miles)`.
    pub far_multiplier: f64,
    /// Multiplier for places at `far_miles` or beyond.
    pub beyond_multiplier: f64,
    /// Multiplier applied when a place repeats the latest category streak.
    pub diversity_penalty: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            near_miles: 0.5,
            mid_miles: 1.0,
            far_miles: 2.0,
            near_multiplier: 1.5,
            mid_multiplier: 1.0,
            far_multiplier: 0.75,
            beyond_multiplier: 0.5,
            diversity_penalty: 0.5,
        }
    }
}

/// Reasons a [`WeightPolicy`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WeightPolicyError {
    /// Tier thresholds were not strictly increasing positive numbers.
    #[error("distance tiers must be finite and strictly increasing, got {near} < {mid} < {far}")]
    UnorderedTiers {
        /// Nearest threshold in miles.
        near: f64,
        /// Middle threshold in miles.
        mid: f64,
        /// Far threshold in miles.
        far: f64,
    },
    /// A multiplier was negative, NaN or infinite.
    #[error("multiplier `{name}` must be finite and non-negative, got {value}")]
    InvalidMultiplier {
        /// Field name of the offending multiplier.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

impl WeightPolicy {
    /// Check the policy for internally consistent values.
    ///
    /// # Errors
    /// Returns [`WeightPolicyError::UnorderedTiers`] when the thresholds are
    /// not positive and strictly increasing, or
    /// [`WeightPolicyError::InvalidMultiplier`] for a negative or non-finite
    /// multiplier.
    ///
    /// # Examples
    /// ```
    /// use roamer_selector::WeightPolicy;
    ///
    /// assert!(WeightPolicy::default().validate().is_ok());
    /// let broken = WeightPolicy { mid_miles: 0.1, ..WeightPolicy::default() };
    /// assert!(broken.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), WeightPolicyError> {
        let ordered = self.near_miles.is_finite()
            && self.far_miles.is_finite()
            && self.near_miles > 0.0
            && self.near_miles < self.mid_miles
            && self.mid_miles < self.far_miles;
        if !ordered {
            return Err(WeightPolicyError::UnorderedTiers {
                near: self.near_miles,
                mid: self.mid_miles,
                far: self.far_miles,
            });
        }
        let multipliers = [
            ("near_multiplier", self.near_multiplier),
            ("mid_multiplier", self.mid_multiplier),
            ("far_multiplier", self.far_multiplier),
            ("beyond_multiplier", self.beyond_multiplier),
            ("diversity_penalty", self.diversity_penalty),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightPolicyError::InvalidMultiplier { name, value });
            }
        }
        Ok(())
    }

    /// Multiplier for a place `distance_metres` away from the origin.
    #[must_use]
    pub fn distance_tier(&self, distance_metres: f64) -> f64 {
        let miles = metres_to_miles(distance_metres);
        if miles < self.near_miles {
            self.near_multiplier
        } else if miles < self.mid_miles {
            self.mid_multiplier
        } else if miles < self.far_miles {
            self.far_multiplier
        } else {
            self.beyond_multiplier
        }
    }

    /// Penalty applied when `place` carries the category of the last two
    /// picks.
    #[must_use]
    pub fn diversity_factor(&self, place: &Place, recent: &RecentCategories) -> f64 {
        match recent.repeated() {
            Some(category) if place.has_category(category) => self.diversity_penalty,
            _ => 1.0,
        }
    }

    /// Rating boost in `[0, 1]`; a zero rating yields a zero weight.
    ///
    /// The boost is fixed by the rating scale rather than the policy.
    #[expect(clippy::float_arithmetic, reason = "rating is scaled to a unit factor")]
    #[must_use]
    pub const fn rating_boost(rating: f64) -> f64 {
        rating / MAX_RATING
    }

    /// Combined weight for a validated `place`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use roamer_core::{Place, RecentCategories};
    /// use roamer_selector::WeightPolicy;
    ///
    /// let place = Place::new("a", Coord { x: 0.0, y: 0.0 })
    ///     .with_categories(["cafe"])
    ///     .with_rating(4.5);
    /// let weight = WeightPolicy::default().weight(&place, 4.5, 480.0, &RecentCategories::new());
    /// assert!((weight - 1.35).abs() < 1e-9);
    /// ```
    #[expect(clippy::float_arithmetic, reason = "weights are products of factors")]
    #[must_use]
    pub fn weight(
        &self,
        place: &Place,
        rating: f64,
        distance_metres: f64,
        recent: &RecentCategories,
    ) -> f64 {
        self.distance_tier(distance_metres)
            * self.diversity_factor(place, recent)
            * Self::rating_boost(rating)
    }
}
