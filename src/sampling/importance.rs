//! Importance sampling toward the space's weights
//!
//! Each uniform draw `u` is pulled halfway toward the dimension's normalized
//! weight `p`:
//!
//! ```text
//! x = u + SHIFT * (p - u)
//! ```
//!
//! The per-dimension factor is `target / proposal`, with `p` as the target
//! probability and a proposal density of 1 for any `x` strictly inside (0, 1).
//! A draw landing exactly on 0 or 1 has no proposal mass and contributes
//! `f64::MIN_POSITIVE` instead, never zero. The sample weight is the product
//! of the factors.
//!
//! This weighting is a heuristic. It is not an unbiased importance ratio, so
//! `weighted_mean` under this strategy describes the shifted draws rather
//! than the uniform expectation.

use tracing::warn;

use crate::probability::{ProbabilitySpace, Sample};
use crate::random::RandomEngine;

/// Fraction of the distance to the target weight a draw is moved.
const SHIFT: f64 = 0.5;

#[inline]
fn shift_toward(u: f64, p: f64) -> f64 {
    u + SHIFT * (p - u)
}

/// Proposal density of a shifted draw: 1 strictly inside (0, 1), 0 on the boundary.
#[inline]
pub(crate) fn proposal_density(x: f64) -> f64 {
    if x > 0.0 && x < 1.0 {
        1.0
    } else {
        0.0
    }
}

/// `p / q(x)`, floored at `f64::MIN_POSITIVE`.
#[inline]
pub(crate) fn importance_factor(x: f64, p: f64) -> f64 {
    let q = proposal_density(x);
    if q > 0.0 {
        (p / q).max(f64::MIN_POSITIVE)
    } else {
        f64::MIN_POSITIVE
    }
}

/// Draw `n` samples shifted toward each dimension's normalized weight.
pub fn importance(space: &ProbabilitySpace, n: usize, rng: &mut RandomEngine) -> Vec<Sample> {
    if space.total_weight() <= 0.0 {
        warn!("importance sampling over a space with zero total weight, shifting toward uniform weights");
    }

    let keys = space.shared_keys();
    let targets = space.normalized_weights();

    (0..n)
        .map(|_| {
            let mut weight = 1.0;
            let values = targets
                .iter()
                .map(|&p| {
                    let x = shift_toward(rng.next_float(), p);
                    weight *= importance_factor(x, p);
                    x
                })
                .collect();

            Sample::weighted(keys.clone(), values, weight.max(f64::MIN_POSITIVE))
        })
        .collect()
}
