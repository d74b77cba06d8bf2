//! Probability spaces, samples and payoffs
//!
//! - [`ProbabilitySpace`] / [`Dimension`]: the weighted axes a simulation draws over
//! - [`Sample`] / [`EvaluatedSample`]: one draw, and the draw with its payoff
//! - [`Payoff`]: caller-supplied scalar evaluation, with [`DefaultPayoff`]
//!   used when the caller supplies none

mod space;
mod sample;
pub mod payoff;

pub use space::{Dimension, ProbabilitySpace, DEFAULT_KEY, DEFAULT_WEIGHT};
pub use sample::{EvaluatedSample, Sample};
pub use payoff::{DefaultPayoff, Payoff};
