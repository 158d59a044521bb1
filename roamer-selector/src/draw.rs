//! Weighted random draw over prefix sums.

use rand::{Rng, RngCore};

/// Pick an index with probability proportional to its weight.
///
/// Each index owns the half-open interval `[prefix_before, prefix_after)` of
/// the cumulative weight line. A uniform sample in `[0, total)` is located
/// by binary search, so zero-weight entries own an empty interval and are
/// never returned. Returns `None` when no entry has a positive, finite
/// weight.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use roamer_selector::draw_index;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// assert_eq!(draw_index(&[0.0, 2.0, 0.0], &mut rng), Some(1));
/// assert_eq!(draw_index(&[0.0, 0.0], &mut rng), None);
/// ```
pub fn draw_index(weights: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
    let cumulative = prefix_sums(weights);
    let total = cumulative.last().copied().unwrap_or(0.0);
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    let sample = rng.gen_range(0.0..total);
    locate(&cumulative, sample)
}

/// Index whose half-open interval contains `sample`.
///
/// `sample` must lie in `[0, total)`; values past the end map to `None`.
pub(crate) fn locate(cumulative: &[f64], sample: f64) -> Option<usize> {
    let index = cumulative.partition_point(|&upper| upper <= sample);
    (index < cumulative.len()).then_some(index)
}

#[expect(clippy::float_arithmetic, reason = "cumulative weights are summed")]
fn prefix_sums(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0_f64, |running, weight| {
            if weight.is_finite() && *weight > 0.0 {
                *running += weight;
            }
            Some(*running)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Some(0))]
    #[case(0.99, Some(0))]
    #[case(1.0, Some(2))]
    #[case(2.5, Some(2))]
    #[case(3.0, Some(3))]
    #[case(3.999, Some(3))]
    #[case(4.0, None)]
    fn intervals_are_half_open(#[case] sample: f64, #[case] expected: Option<usize>) {
        // Weights 1, 0, 2, 1 give boundaries [0,1) [1,1) [1,3) [3,4).
        let cumulative = prefix_sums(&[1.0, 0.0, 2.0, 1.0]);
        assert_eq!(cumulative, vec![1.0, 1.0, 3.0, 4.0]);
        assert_eq!(locate(&cumulative, sample), expected);
    }

    #[rstest]
    fn non_finite_and_negative_weights_are_ignored() {
        assert_eq!(
            prefix_sums(&[f64::NAN, -1.0, 2.0, f64::INFINITY]),
            vec![0.0, 0.0, 2.0, 2.0]
        );
    }

    #[rstest]
    #[case(&[])]
    #[case(&[0.0])]
    #[case(&[0.0, 0.0, 0.0])]
    #[case(&[f64::NAN])]
    fn no_positive_weight_draws_nothing(#[case] weights: &[f64]) {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(draw_index(weights, &mut rng), None);
    }

    #[rstest]
    fn zero_weight_entries_are_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let weights = [0.0, 0.5, 0.0, 0.25, 0.0];
        for _ in 0..2_000 {
            let index = draw_index(&weights, &mut rng).expect("positive weights exist");
            assert!(index == 1 || index == 3, "drew zero-weight index {index}");
        }
    }

    #[rstest]
    fn identical_seeds_repeat_the_draw() {
        let weights = [0.3, 0.1, 0.6];
        let mut first = ChaCha8Rng::seed_from_u64(2024);
        let mut second = ChaCha8Rng::seed_from_u64(2024);
        let lhs: Vec<_> = (0..64).map(|_| draw_index(&weights, &mut first)).collect();
        let rhs: Vec<_> = (0..64).map(|_| draw_index(&weights, &mut second)).collect();
        assert_eq!(lhs, rhs);
    }
}
