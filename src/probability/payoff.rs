//! Payoff functions
//!
//! A payoff maps a [`Sample`] to a scalar. The engine treats it as opaque: it
//! is called once per retained sample and any error it returns is handed back
//! to the caller unchanged.
//!
//! Closures returning `Result<f64, E>` implement [`Payoff`] directly. Plain
//! `f64`-returning closures go through [`from_fn`]:
//!
//! ```
//! use probsim::probability::{payoff, Payoff, ProbabilitySpace, Sample};
//!
//! let space = ProbabilitySpace::from_weights([("a", 0.2)]).unwrap();
//! let mut sum = payoff::from_fn(|s: &Sample| s.values().iter().sum());
//! let mut check = |s: &Sample| -> Result<f64, String> {
//!     s.get("a").ok_or_else(|| "missing a".to_string())
//! };
//! # let _ = (&space, &mut sum, &mut check);
//! ```

use super::{ProbabilitySpace, Sample};
use crate::error::CallbackError;

/// Scalar evaluation of a sample.
pub trait Payoff {
    fn evaluate(&mut self, sample: &Sample) -> Result<f64, CallbackError>;
}

impl<F, E> Payoff for F
where
    F: FnMut(&Sample) -> Result<f64, E>,
    E: Into<CallbackError>,
{
    #[inline]
    fn evaluate(&mut self, sample: &Sample) -> Result<f64, CallbackError> {
        self(sample).map_err(Into::into)
    }
}

/// Adapter for payoff closures that cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct FnPayoff<F>(F);

/// Wrap an infallible closure as a [`Payoff`].
pub fn from_fn<F>(f: F) -> FnPayoff<F>
where
    F: FnMut(&Sample) -> f64,
{
    FnPayoff(f)
}

impl<F> Payoff for FnPayoff<F>
where
    F: FnMut(&Sample) -> f64,
{
    #[inline]
    fn evaluate(&mut self, sample: &Sample) -> Result<f64, CallbackError> {
        Ok((self.0)(sample))
    }
}

/// Rewards samples that sit close to the space's weights:
/// mean over dimensions of `1 - |x - weight|`.
#[derive(Debug, Clone)]
pub struct DefaultPayoff {
    weights: Vec<f64>,
}

impl DefaultPayoff {
    pub fn new(space: &ProbabilitySpace) -> Self {
        Self {
            weights: space.dimensions().iter().map(|d| d.weight).collect(),
        }
    }

    #[inline]
    pub fn score(&self, sample: &Sample) -> f64 {
        let values = sample.values();
        if values.is_empty() {
            return 0.0;
        }
        let total: f64 = values
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| 1.0 - (x - w).abs())
            .sum();
        total / values.len() as f64
    }
}

impl Payoff for DefaultPayoff {
    #[inline]
    fn evaluate(&mut self, sample: &Sample) -> Result<f64, CallbackError> {
        Ok(self.score(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payoff_peaks_at_weights() {
        let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
        let payoff = DefaultPayoff::new(&space);

        let exact = Sample::new(space.shared_keys(), vec![0.2, 0.8]);
        assert!((payoff.score(&exact) - 1.0).abs() < 1e-12);

        let off = Sample::new(space.shared_keys(), vec![0.0, 1.0]);
        assert!((payoff.score(&off) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_closure_payoffs() {
        let space = ProbabilitySpace::from_weights([("a", 0.5)]).unwrap();
        let s = Sample::new(space.shared_keys(), vec![0.25]);

        let mut ok = |s: &Sample| -> Result<f64, String> { Ok(s.values()[0] * 2.0) };
        assert_eq!(ok.evaluate(&s).unwrap(), 0.5);

        let mut failing = |_: &Sample| -> Result<f64, String> { Err("bad".into()) };
        assert_eq!(failing.evaluate(&s).unwrap_err().to_string(), "bad");

        let mut calls = 0;
        let mut counted = from_fn(|_: &Sample| {
            calls += 1;
            1.0
        });
        counted.evaluate(&s).unwrap();
        counted.evaluate(&s).unwrap();
        drop(counted);
        assert_eq!(calls, 2);
    }
}
