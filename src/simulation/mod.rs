//! Batch Monte Carlo simulation with convergence tracking
//!
//! The loop is: draw a batch → drop burn-in (first batch only) and thin →
//! evaluate payoffs → fold into the running aggregate → check the configured
//! criterion. It stops at the first converged batch or once `max_samples`
//! draws have been made; running out of budget is not an error, the result
//! just reports `converged = false`.
//!
//! # Example
//!
//! ```
//! use probsim::config::EngineConfig;
//! use probsim::probability::{DefaultPayoff, ProbabilitySpace};
//! use probsim::random::RandomEngine;
//! use probsim::sampling::SamplingStrategy;
//! use probsim::simulation::simulate;
//!
//! let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
//! let config = EngineConfig::default()
//!     .with_seed(42)
//!     .with_strategy(SamplingStrategy::LatinHypercube)
//!     .with_max_samples(5_000);
//!
//! let mut rng = RandomEngine::new(config.seed);
//! let mut payoff = DefaultPayoff::new(&space);
//! let result = simulate(&space, &mut payoff, &config, &mut rng, None).unwrap();
//!
//! assert!(result.sample_count <= 5_000);
//! assert!(result.confidence_interval.lower <= result.weighted_mean);
//! ```

mod convergence;
mod result;

pub use convergence::{
    check_convergence, Aggregator, ConvergenceCriterion, RunningSummary,
    MIN_SAMPLES_FOR_CONVERGENCE,
};
pub use result::{ConfidenceInterval, Percentiles, SimulationResult};

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::error::{Result, SimError};
use crate::probability::{EvaluatedSample, Payoff, ProbabilitySpace, Sample};
use crate::random::RandomEngine;
use crate::sampling;

/// Evaluate one sample, passing callback errors through and rejecting
/// non-finite payoffs.
pub(crate) fn evaluate<P: Payoff + ?Sized>(payoff: &mut P, sample: &Sample) -> Result<f64> {
    let value = payoff.evaluate(sample).map_err(SimError::Payoff)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::NonFinitePayoff(value))
    }
}

/// Evaluate a whole sample set.
pub fn evaluate_all<P: Payoff + ?Sized>(
    payoff: &mut P,
    samples: Vec<Sample>,
) -> Result<Vec<EvaluatedSample>> {
    samples
        .into_iter()
        .map(|sample| {
            let value = evaluate(payoff, &sample)?;
            Ok(EvaluatedSample { sample, payoff: value })
        })
        .collect()
}

/// Run the batch loop described in the module docs.
pub fn simulate<P: Payoff + ?Sized>(
    space: &ProbabilitySpace,
    payoff: &mut P,
    config: &EngineConfig,
    rng: &mut RandomEngine,
    cancel: Option<&CancellationToken>,
) -> Result<SimulationResult> {
    config.validate()?;

    let expected = config.max_samples / config.thinning + 1;
    let mut agg = Aggregator::with_capacity(expected.min(config.max_samples));
    let mut drawn = 0usize;
    let mut batches = 0usize;
    let mut converged = false;

    while drawn < config.max_samples {
        if cancel.map_or(false, CancellationToken::is_cancelled) {
            return Err(SimError::Cancelled { completed: batches });
        }

        let n = config.batch_size.min(config.max_samples - drawn);
        let samples = sampling::draw(config.strategy, space, n, rng)?;
        drawn += n;

        let skip = if batches == 0 { config.burn_in } else { 0 };
        for sample in samples.into_iter().skip(skip).step_by(config.thinning) {
            let value = evaluate(payoff, &sample)?;
            agg.push(value, sample.weight);
        }
        batches += 1;

        let stats = agg.summary();
        stats.ensure_finite()?;
        debug!(
            batch = batches,
            drawn,
            retained = stats.count,
            mean = stats.weighted_mean,
            std_error = stats.std_error,
            "simulation batch complete"
        );

        if config
            .criterion
            .is_met(&stats, config.convergence_threshold, config.confidence_level)
        {
            converged = true;
            break;
        }
    }

    let result = agg.finish(
        space,
        config.strategy,
        config.criterion,
        config.confidence_level,
        converged,
        batches,
    )?;

    info!(
        strategy = %config.strategy,
        criterion = %config.criterion,
        samples = result.sample_count,
        batches,
        converged,
        weighted_mean = result.weighted_mean,
        "simulation finished"
    );

    Ok(result)
}
