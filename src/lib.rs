//! # probsim
//!
//! Probabilistic simulation and search over weighted probability spaces.
//!
//! ## Design Philosophy
//!
//! - **Reproducible**: every draw flows from one seedable [`random::RandomEngine`]
//! - **Explicit configuration**: one [`config::EngineConfig`] per call, no globals
//! - **Opaque callbacks**: payoff, expansion and rollout are traits; their
//!   errors come back unmodified
//! - **Finite results**: degenerate data yields sentinels, never NaN
//!
//! ## Modules
//!
//! - `random`: seeded generator, Normal/Gamma/Beta draws, Halton sequence
//! - `probability`: dimensions, probability spaces, samples, payoffs
//! - `sampling`: uniform, importance, stratified, antithetic, Latin hypercube, quasi-random
//! - `simulation`: batch loop, convergence criteria, `SimulationResult`
//! - `risk`: Beta-model pathway assessment, VaR / CVaR
//! - `search`: UCB1 Monte Carlo Tree Search on an arena tree
//! - `sensitivity`: first-order variance indices per dimension
//! - `stats`: mean, variance, percentiles, effective sample size
//!
//! ## Example
//!
//! ```rust
//! use probsim::prelude::*;
//!
//! let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
//! let config = EngineConfig::default()
//!     .with_seed(7)
//!     .with_strategy(SamplingStrategy::Antithetic);
//!
//! let mut engine = Engine::new(config).unwrap();
//! let result = engine.simulate_default(&space).unwrap();
//! assert!((result.weighted_mean - 0.66).abs() < 0.02);
//!
//! let risk = engine
//!     .assess_risk(&[Alternative::new("steady", 0.8, 0.9), Alternative::new("long_shot", 0.2, 0.3)])
//!     .unwrap();
//! assert_eq!(risk.safest, "steady");
//! ```

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod probability;
pub mod random;
pub mod risk;
pub mod sampling;
pub mod search;
pub mod sensitivity;
pub mod simulation;
pub mod stats;

/// Common imports
pub mod prelude {
    pub use crate::cancel::CancellationToken;
    pub use crate::config::EngineConfig;
    pub use crate::engine::Engine;
    pub use crate::error::{Result, SimError};

    pub use crate::probability::{
        DefaultPayoff,
        Dimension,
        EvaluatedSample,
        Payoff,
        ProbabilitySpace,
        Sample,
    };
    pub use crate::random::RandomEngine;
    pub use crate::sampling::SamplingStrategy;

    pub use crate::simulation::{
        simulate,
        ConvergenceCriterion,
        SimulationResult,
    };

    pub use crate::risk::{assess_risk, Alternative, RiskAssessment};
    pub use crate::search::{mcts, Expansion, MctsSummary};
    pub use crate::sensitivity::{sensitivity_analysis, SensitivityReport};
}
