//! Beta-model assessment of weighted alternatives.
//!
//! Each alternative's outcome is modelled as `Beta(α, β)` with
//!
//! ```text
//! α = p · c · 20 + 1
//! β = (1 − p) · c · 20 + 1
//! ```
//!
//! so `c = 0` collapses to the uniform distribution and high confidence
//! concentrates mass around `p`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::metrics::{conditional_value_at_risk, risk_score, value_at_risk, TAIL};
use crate::error::{Result, SimError};
use crate::random::RandomEngine;
use crate::stats::{mean, minmax, percentile_sorted, sample_variance};

/// Concentration applied to `confidence` when deriving Beta shapes.
const CONCENTRATION: f64 = 20.0;

/// One candidate pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    /// Expected success probability in [0, 1]
    pub probability: f64,
    /// Certainty about `probability`, in [0, 1]
    pub confidence: f64,
}

impl Alternative {
    pub fn new(id: impl Into<String>, probability: f64, confidence: f64) -> Self {
        Self {
            id: id.into(),
            probability,
            confidence,
        }
    }

    /// Beta shape parameters `(alpha, beta)` for this alternative.
    pub fn beta_shapes(&self) -> (f64, f64) {
        let k = self.confidence * CONCENTRATION;
        (self.probability * k + 1.0, (1.0 - self.probability) * k + 1.0)
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(SimError::InvalidAlternative {
                id: self.id.clone(),
                reason: "id must not be empty".into(),
            });
        }
        for (name, v) in [("probability", self.probability), ("confidence", self.confidence)] {
            if !(v.is_finite() && (0.0..=1.0).contains(&v)) {
                return Err(SimError::InvalidAlternative {
                    id: self.id.clone(),
                    reason: format!("{} must lie in [0, 1], got {}", name, v),
                });
            }
        }
        Ok(())
    }
}

/// Distribution statistics for one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRisk {
    pub id: String,
    pub alpha: f64,
    pub beta: f64,
    pub mean_probability: f64,
    pub std_dev: f64,
    /// 5th-percentile Value at Risk
    pub var_5: f64,
    /// Mean of the worst 5%; `None` when fewer than 20 draws were made
    pub cvar_5: Option<f64>,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
    pub risk_score: f64,
}

/// Per-alternative stats plus the extremes by risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub alternatives: Vec<AlternativeRisk>,
    /// Lowest risk score (first wins on ties)
    pub safest: String,
    /// Highest risk score (first wins on ties)
    pub riskiest: String,
}

impl RiskAssessment {
    pub fn get(&self, id: &str) -> Option<&AlternativeRisk> {
        self.alternatives.iter().find(|a| a.id == id)
    }
}

/// Draw `n` Beta samples per alternative and summarize them.
pub fn assess_risk(
    alternatives: &[Alternative],
    n: usize,
    rng: &mut RandomEngine,
) -> Result<RiskAssessment> {
    if alternatives.is_empty() {
        return Err(SimError::NoAlternatives);
    }
    if n == 0 {
        return Err(SimError::InvalidSampleCount { what: "risk_samples", value: n });
    }
    for alt in alternatives {
        alt.validate()?;
    }

    let mut out = Vec::with_capacity(alternatives.len());
    let mut draws = vec![0.0; n];

    for alt in alternatives {
        let (a, b) = alt.beta_shapes();
        for d in draws.iter_mut() {
            *d = rng.next_beta(a, b)?;
        }
        draws.sort_by(|x, y| x.total_cmp(y));

        let m = mean(&draws);
        let std_dev = sample_variance(&draws).sqrt();
        let (min, max) = minmax(&draws);

        let stats = AlternativeRisk {
            id: alt.id.clone(),
            alpha: a,
            beta: b,
            mean_probability: m,
            std_dev,
            var_5: value_at_risk(&draws, TAIL),
            cvar_5: conditional_value_at_risk(&draws, TAIL),
            q1: percentile_sorted(&draws, 0.25),
            median: percentile_sorted(&draws, 0.50),
            q3: percentile_sorted(&draws, 0.75),
            min,
            max,
            risk_score: risk_score(m, std_dev),
        };
        debug!(id = %stats.id, mean = m, std_dev, score = stats.risk_score, "alternative assessed");
        out.push(stats);
    }

    let mut safest = 0;
    let mut riskiest = 0;
    for (i, r) in out.iter().enumerate() {
        if r.risk_score < out[safest].risk_score {
            safest = i;
        }
        if r.risk_score > out[riskiest].risk_score {
            riskiest = i;
        }
    }

    let assessment = RiskAssessment {
        safest: out[safest].id.clone(),
        riskiest: out[riskiest].id.clone(),
        alternatives: out,
    };
    info!(
        alternatives = assessment.alternatives.len(),
        samples = n,
        safest = %assessment.safest,
        riskiest = %assessment.riskiest,
        "risk assessment finished"
    );
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beta_shapes() {
        let alt = Alternative::new("x", 0.5, 1.0);
        assert_eq!(alt.beta_shapes(), (11.0, 11.0));
        let alt = Alternative::new("y", 0.9, 0.0);
        assert_eq!(alt.beta_shapes(), (1.0, 1.0));
    }

    #[test]
    fn test_balanced_alternative() {
        let mut rng = RandomEngine::new(Some(42));
        let r = assess_risk(&[Alternative::new("coin", 0.5, 1.0)], 10_000, &mut rng).unwrap();
        let s = r.get("coin").unwrap();

        assert!((0.3..=0.7).contains(&s.mean_probability));
        // Beta(11, 11) has sd = sqrt(121 / (484 * 23)) ≈ 0.1043
        assert!((s.std_dev - 0.1043).abs() < 0.01);
        assert!(s.min <= s.var_5 && s.var_5 <= s.q1);
        assert!(s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
        assert!(s.cvar_5.unwrap() <= s.var_5);
        assert_eq!(r.safest, "coin");
        assert_eq!(r.riskiest, "coin");
    }

    #[test]
    fn test_safest_and_riskiest() {
        let mut rng = RandomEngine::new(Some(7));
        let alts = [
            Alternative::new("likely", 0.9, 0.9),
            Alternative::new("unlikely", 0.1, 0.9),
            Alternative::new("unknown", 0.5, 0.0),
        ];
        let r = assess_risk(&alts, 5_000, &mut rng).unwrap();
        assert_eq!(r.safest, "likely");
        assert_eq!(r.riskiest, "unlikely");
        assert_eq!(r.alternatives.len(), 3);
    }

    #[test]
    fn test_tiny_sample_has_no_cvar() {
        let mut rng = RandomEngine::new(Some(1));
        let r = assess_risk(&[Alternative::new("a", 0.5, 0.5)], 10, &mut rng).unwrap();
        let s = &r.alternatives[0];
        assert!(s.cvar_5.is_none());
        assert!(s.var_5.is_finite());
        assert!(s.std_dev.is_finite());
    }

    #[test]
    fn test_single_draw() {
        let mut rng = RandomEngine::new(Some(1));
        let r = assess_risk(&[Alternative::new("a", 0.5, 0.5)], 1, &mut rng).unwrap();
        let s = &r.alternatives[0];
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.min, s.max);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = RandomEngine::new(Some(1));
        assert!(matches!(assess_risk(&[], 10, &mut rng), Err(SimError::NoAlternatives)));
        assert!(assess_risk(&[Alternative::new("a", 0.5, 0.5)], 0, &mut rng).is_err());
        assert!(matches!(
            assess_risk(&[Alternative::new("a", 1.5, 0.5)], 10, &mut rng),
            Err(SimError::InvalidAlternative { .. })
        ));
        assert!(assess_risk(&[Alternative::new("", 0.5, 0.5)], 10, &mut rng).is_err());
        assert!(assess_risk(&[Alternative::new("a", 0.5, f64::NAN)], 10, &mut rng).is_err());
    }
}
