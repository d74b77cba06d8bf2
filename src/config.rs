//! Engine configuration
//!
//! One explicit [`EngineConfig`] is handed to every operation; there is no
//! process-wide default object. Configs deserialize from partial JSON, with
//! missing fields taking their defaults:
//!
//! ```
//! use probsim::config::EngineConfig;
//! use probsim::sampling::SamplingStrategy;
//!
//! let cfg: EngineConfig = serde_json::from_str(
//!     r#"{"seed": 7, "strategy": "latin_hypercube", "batch_size": 500}"#,
//! ).unwrap();
//!
//! assert_eq!(cfg.seed, Some(7));
//! assert_eq!(cfg.strategy, SamplingStrategy::LatinHypercube);
//! assert_eq!(cfg.max_samples, 100_000);
//! cfg.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::sampling::SamplingStrategy;
use crate::simulation::ConvergenceCriterion;

/// Recognised options for every engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on total draws in `simulate`
    pub max_samples: usize,
    /// Draws per convergence check
    pub batch_size: usize,
    /// Criterion-specific threshold
    pub convergence_threshold: f64,
    /// 0.90, 0.95 or 0.99
    pub confidence_level: f64,
    /// Samples discarded from the first batch
    pub burn_in: usize,
    /// Keep every k-th sample
    pub thinning: usize,
    pub seed: Option<u64>,
    pub strategy: SamplingStrategy,
    pub criterion: ConvergenceCriterion,

    /// UCB1 exploration constant `C`
    pub mcts_exploration_constant: f64,
    /// Select/expand/rollout/backpropagate iterations per search
    pub mcts_simulations: usize,
    /// Rollouts averaged per leaf evaluation
    pub mcts_simulations_per_node: usize,
    /// Nodes at this depth are never expanded
    pub mcts_max_depth: usize,

    /// Beta draws per alternative in `assess_risk`
    pub risk_samples: usize,
    /// Size of the baseline and perturbed sets in `sensitivity_analysis`
    pub sensitivity_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_samples: 100_000,
            batch_size: 1_000,
            convergence_threshold: 0.01,
            confidence_level: 0.95,
            burn_in: 0,
            thinning: 1,
            seed: None,
            strategy: SamplingStrategy::Uniform,
            criterion: ConvergenceCriterion::ConfidenceInterval,
            mcts_exploration_constant: std::f64::consts::SQRT_2,
            mcts_simulations: 1_000,
            mcts_simulations_per_node: 1,
            mcts_max_depth: 10,
            risk_samples: 10_000,
            sensitivity_samples: 1_000,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_criterion(mut self, criterion: ConvergenceCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    pub fn with_thinning(mut self, thinning: usize) -> Self {
        self.thinning = thinning;
        self
    }

    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.mcts_exploration_constant = c;
        self
    }

    pub fn with_mcts_simulations(mut self, simulations: usize) -> Self {
        self.mcts_simulations = simulations;
        self
    }

    pub fn with_mcts_simulations_per_node(mut self, rollouts: usize) -> Self {
        self.mcts_simulations_per_node = rollouts;
        self
    }

    pub fn with_mcts_max_depth(mut self, depth: usize) -> Self {
        self.mcts_max_depth = depth;
        self
    }

    pub fn with_risk_samples(mut self, n: usize) -> Self {
        self.risk_samples = n;
        self
    }

    pub fn with_sensitivity_samples(mut self, n: usize) -> Self {
        self.sensitivity_samples = n;
        self
    }

    /// Reject settings that would make the simulation loop ill-defined.
    pub fn validate(&self) -> Result<()> {
        nonzero("max_samples", self.max_samples)?;
        nonzero("batch_size", self.batch_size)?;
        nonzero("thinning", self.thinning)?;

        if self.burn_in >= self.batch_size.min(self.max_samples) {
            return Err(SimError::InvalidConfig(format!(
                "burn_in ({}) must be smaller than the first batch ({})",
                self.burn_in,
                self.batch_size.min(self.max_samples)
            )));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "convergence_threshold must be a positive number, got {}",
                self.convergence_threshold
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "confidence_level must lie in (0, 1), got {}",
                self.confidence_level
            )));
        }
        self.validate_search()
    }

    /// Checks used by `mcts` only.
    pub fn validate_search(&self) -> Result<()> {
        nonzero("mcts_simulations", self.mcts_simulations)?;
        nonzero("mcts_simulations_per_node", self.mcts_simulations_per_node)?;
        if !(self.mcts_exploration_constant.is_finite() && self.mcts_exploration_constant >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "mcts_exploration_constant must be finite and >= 0, got {}",
                self.mcts_exploration_constant
            )));
        }
        Ok(())
    }
}

fn nonzero(what: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        Err(SimError::InvalidSampleCount { what, value })
    } else {
        Ok(())
    }
}
