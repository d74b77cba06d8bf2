//! First-order variance sensitivity per dimension
//!
//! A Latin-hypercube baseline fixes the payoff variance `V`. For each
//! dimension a uniform set is drawn, that one dimension is re-drawn in every
//! sample, and the payoff variance `Vⱼ` of the perturbed set gives the raw
//! index `1 − Vⱼ / V`. Raw indices are clamped at zero and normalized to sum
//! to one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SimError};
use crate::probability::{Payoff, ProbabilitySpace, Sample};
use crate::random::RandomEngine;
use crate::sampling;
use crate::simulation::evaluate;
use crate::stats::sample_variance;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSensitivity {
    pub key: String,
    /// `1 − perturbed / baseline`; may be negative
    pub raw_index: f64,
    pub perturbed_variance: f64,
    /// Clamped raw index scaled by the baseline variance
    pub variance_contribution: f64,
    /// Share of the clamped indices; all zero when none is positive
    pub normalized_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    /// In the space's dimension order
    pub dimensions: Vec<DimensionSensitivity>,
    pub baseline_variance: f64,
    /// Highest normalized index (first on ties); `None` if all are zero
    pub most_sensitive: Option<String>,
}

impl SensitivityReport {
    pub fn get(&self, key: &str) -> Option<&DimensionSensitivity> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    pub fn normalized_sum(&self) -> f64 {
        self.dimensions.iter().map(|d| d.normalized_index).sum()
    }
}

/// Raw first-order index; 0 when the baseline has no variance or either
/// variance is not finite.
#[inline]
pub fn first_order_index(baseline_variance: f64, perturbed_variance: f64) -> f64 {
    if baseline_variance > 0.0 && baseline_variance.is_finite() && perturbed_variance.is_finite() {
        1.0 - perturbed_variance / baseline_variance
    } else {
        0.0
    }
}

/// Clamped index scaled by the baseline variance; 0 for non-finite input.
#[inline]
pub fn variance_contribution(raw_index: f64, baseline_variance: f64) -> f64 {
    let c = raw_index.max(0.0) * baseline_variance;
    if c.is_finite() {
        c
    } else {
        0.0
    }
}

/// Clamp at zero and scale to sum to one. All zeros stay all zeros.
pub fn normalize_indices(raw: &[f64]) -> Vec<f64> {
    let clamped: Vec<f64> = raw.iter().map(|&r| if r > 0.0 { r } else { 0.0 }).collect();
    let total: f64 = clamped.iter().sum();
    if total > 0.0 {
        clamped.iter().map(|c| c / total).collect()
    } else {
        clamped
    }
}

fn payoff_variance<P: Payoff + ?Sized>(payoff: &mut P, samples: &[Sample]) -> Result<f64> {
    let values = samples
        .iter()
        .map(|s| evaluate(payoff, s))
        .collect::<Result<Vec<f64>>>()?;
    let v = sample_variance(&values);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SimError::NonFiniteStatistic { statistic: "variance", value: v })
    }
}

/// Run the analysis with `n` samples per set.
pub fn sensitivity_analysis<P: Payoff + ?Sized>(
    space: &ProbabilitySpace,
    payoff: &mut P,
    n: usize,
    rng: &mut RandomEngine,
) -> Result<SensitivityReport> {
    if n == 0 {
        return Err(SimError::InvalidSampleCount { what: "sensitivity_samples", value: n });
    }

    let baseline = sampling::latin_hypercube(space, n, rng);
    let baseline_variance = payoff_variance(payoff, &baseline)?;

    let mut raw = Vec::with_capacity(space.len());
    let mut perturbed = Vec::with_capacity(space.len());
    for (j, dim) in space.dimensions().iter().enumerate() {
        let samples: Vec<Sample> = sampling::uniform(space, n, rng)
            .iter()
            .map(|s| s.with_value(j, rng.next_float()))
            .collect();
        let v = payoff_variance(payoff, &samples)?;
        let index = first_order_index(baseline_variance, v);
        debug!(key = %dim.key, perturbed_variance = v, raw_index = index, "dimension perturbed");
        raw.push(index);
        perturbed.push(v);
    }

    let normalized = normalize_indices(&raw);
    let dimensions: Vec<DimensionSensitivity> = space
        .dimensions()
        .iter()
        .zip(raw.iter().zip(perturbed.iter()).zip(normalized.iter()))
        .map(|(dim, ((&r, &v), &norm))| DimensionSensitivity {
            key: dim.key.clone(),
            raw_index: r,
            perturbed_variance: v,
            variance_contribution: variance_contribution(r, baseline_variance),
            normalized_index: norm,
        })
        .collect();

    let mut most_sensitive: Option<&DimensionSensitivity> = None;
    for d in &dimensions {
        if d.normalized_index > most_sensitive.map_or(0.0, |m| m.normalized_index) {
            most_sensitive = Some(d);
        }
    }
    let most_sensitive = most_sensitive.map(|d| d.key.clone());

    info!(
        dimensions = dimensions.len(),
        samples = n,
        baseline_variance,
        most_sensitive = most_sensitive.as_deref().unwrap_or("none"),
        "sensitivity analysis finished"
    );

    Ok(SensitivityReport {
        dimensions,
        baseline_variance,
        most_sensitive,
    })
}
