//! Weighted random place selection for Roamer.
//!
//! This crate provides [`WeightedSelector`], the default implementation of
//! the [`Selector`](roamer_core::Selector) trait. Candidates pass a fixed
//! series of filters (sanity, radius, exclusions, opening hours, rating),
//! are weighted by distance tier, category diversity and rating, and one is
//! drawn with probability proportional to its weight.
//!
//! Randomness is always supplied by the caller, so a seeded generator such
//! as `rand_chacha::ChaCha8Rng` makes every pick reproducible.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod draw;
mod filter;
mod selector;
mod weight;

pub use draw::draw_index;
pub use selector::{WeightedCandidate, WeightedSelector};
pub use weight::{WeightPolicy, WeightPolicyError};
