//! Convergence criteria and running aggregation
//!
//! [`Aggregator`] folds evaluated samples into running sums (Welford for the
//! unweighted moments, plain sums for the weighted ones) so a convergence
//! check after every batch costs O(1). Percentiles are only computed once,
//! when the final [`SimulationResult`] is built.
//!
//! | Criterion | Converged when |
//! |---|---|
//! | `Variance` | sample variance < threshold |
//! | `ConfidenceInterval` | z · SE < threshold · \|mean\| (denominator 1 when mean = 0) |
//! | `EffectiveSampleSize` | (Σw)² / Σw² > n / 2 |
//!
//! No criterion is consulted before [`MIN_SAMPLES_FOR_CONVERGENCE`] samples
//! have been accumulated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::{ConfidenceInterval, Percentiles, SimulationResult};
use crate::error::{Result, SimError};
use crate::probability::{EvaluatedSample, ProbabilitySpace};
use crate::sampling::SamplingStrategy;
use crate::stats::{kish_ess, percentile_sorted, z_value};

/// Convergence is never declared on fewer samples than this.
pub const MIN_SAMPLES_FOR_CONVERGENCE: usize = 100;

/// Rule deciding when enough samples have been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceCriterion {
    Variance,
    #[default]
    ConfidenceInterval,
    EffectiveSampleSize,
}

impl ConvergenceCriterion {
    pub const ALL: [ConvergenceCriterion; 3] = [
        ConvergenceCriterion::Variance,
        ConvergenceCriterion::ConfidenceInterval,
        ConvergenceCriterion::EffectiveSampleSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variance => "variance",
            Self::ConfidenceInterval => "confidence_interval",
            Self::EffectiveSampleSize => "effective_sample_size",
        }
    }

    /// Apply the criterion to a running summary.
    pub fn is_met(&self, stats: &RunningSummary, threshold: f64, confidence_level: f64) -> bool {
        if stats.count < MIN_SAMPLES_FOR_CONVERGENCE {
            return false;
        }

        match self {
            Self::Variance => stats.variance < threshold,
            Self::ConfidenceInterval => {
                let denom = if stats.weighted_mean != 0.0 {
                    stats.weighted_mean.abs()
                } else {
                    1.0
                };
                z_value(confidence_level) * stats.std_error < threshold * denom
            }
            Self::EffectiveSampleSize => {
                stats.effective_sample_size > 0.5 * stats.count as f64
            }
        }
    }
}

impl fmt::Display for ConvergenceCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConvergenceCriterion {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "variance" => Ok(Self::Variance),
            "confidence_interval" | "confidence" | "ci" => Ok(Self::ConfidenceInterval),
            "effective_sample_size" | "ess" => Ok(Self::EffectiveSampleSize),
            _ => Err(SimError::UnknownCriterion(s.to_string())),
        }
    }
}

/// Moments available after each batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningSummary {
    pub count: usize,
    pub mean: f64,
    pub weighted_mean: f64,
    pub variance: f64,
    pub std_error: f64,
    pub effective_sample_size: f64,
}

impl RunningSummary {
    /// Fails when payoff magnitudes pushed a moment past `f64` range.
    pub fn ensure_finite(&self) -> Result<()> {
        [
            ("mean", self.mean),
            ("weighted_mean", self.weighted_mean),
            ("variance", self.variance),
            ("std_error", self.std_error),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map_or(Ok(()), |(statistic, value)| {
            Err(SimError::NonFiniteStatistic { statistic, value })
        })
    }
}

/// Accumulates evaluated samples for one `simulate` call.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    payoffs: Vec<f64>,
    count: usize,
    mean: f64,
    m2: f64,
    sum_w: f64,
    sum_w2: f64,
    sum_wx: f64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            payoffs: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fold one payoff with its importance weight.
    pub fn push(&mut self, payoff: f64, weight: f64) {
        self.count += 1;
        let delta = payoff - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (payoff - self.mean);

        self.sum_w += weight;
        self.sum_w2 += weight * weight;
        self.sum_wx += weight * payoff;
        self.payoffs.push(payoff);
    }

    pub fn push_evaluated(&mut self, evaluated: &EvaluatedSample) {
        self.push(evaluated.payoff, evaluated.sample.weight);
    }

    pub fn summary(&self) -> RunningSummary {
        let n = self.count;
        let variance = if n > 1 {
            (self.m2 / (n - 1) as f64).max(0.0)
        } else {
            0.0
        };
        let std_error = if n > 0 { (variance / n as f64).sqrt() } else { 0.0 };

        let weighted_mean = if self.sum_w > 0.0 && self.sum_w.is_finite() {
            let wm = self.sum_wx / self.sum_w;
            if wm.is_finite() { wm } else { self.mean }
        } else {
            self.mean
        };

        RunningSummary {
            count: n,
            mean: self.mean,
            weighted_mean,
            variance,
            std_error,
            effective_sample_size: kish_ess(self.sum_w, self.sum_w2, n),
        }
    }

    /// Build the immutable result; consumes the accumulated payoffs. Fails
    /// with [`SimError::NonFiniteStatistic`] rather than return NaN or ±inf.
    pub(crate) fn finish(
        self,
        space: &ProbabilitySpace,
        strategy: SamplingStrategy,
        criterion: ConvergenceCriterion,
        confidence_level: f64,
        converged: bool,
        batches: usize,
    ) -> Result<SimulationResult> {
        let stats = self.summary();
        stats.ensure_finite()?;
        let mut sorted = self.payoffs;
        sorted.sort_by(|a, b| a.total_cmp(b));

        let half_width = z_value(confidence_level) * stats.std_error;

        let result = SimulationResult {
            weighted_mean: stats.weighted_mean,
            mean: stats.mean,
            variance: stats.variance,
            std_error: stats.std_error,
            confidence_interval: ConfidenceInterval {
                level: confidence_level,
                lower: stats.weighted_mean - half_width,
                upper: stats.weighted_mean + half_width,
            },
            percentiles: Percentiles {
                p5: percentile_sorted(&sorted, 0.05),
                p25: percentile_sorted(&sorted, 0.25),
                p50: percentile_sorted(&sorted, 0.50),
                p75: percentile_sorted(&sorted, 0.75),
                p95: percentile_sorted(&sorted, 0.95),
            },
            sample_count: stats.count,
            effective_sample_size: stats.effective_sample_size,
            converged,
            batches,
            strategy,
            criterion,
            distribution: space.dimensions().to_vec(),
        };

        match result.first_non_finite() {
            Some((statistic, value)) => Err(SimError::NonFiniteStatistic { statistic, value }),
            None => Ok(result),
        }
    }
}

/// Decide convergence directly over a list of evaluated samples.
pub fn check_convergence(
    evaluated: &[EvaluatedSample],
    criterion: ConvergenceCriterion,
    threshold: f64,
    confidence_level: f64,
) -> bool {
    let mut agg = Aggregator::with_capacity(evaluated.len());
    for e in evaluated {
        agg.push_evaluated(e);
    }
    criterion.is_met(&agg.summary(), threshold, confidence_level)
}
