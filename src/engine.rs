//! [`Engine`] bundles one validated [`EngineConfig`] with the random engine
//! it seeds, and exposes every operation with that configuration applied.

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::probability::{DefaultPayoff, Payoff, ProbabilitySpace};
use crate::random::RandomEngine;
use crate::risk::{self, Alternative, RiskAssessment};
use crate::search::{self, Expander, MctsSummary, RolloutPolicy};
use crate::sensitivity::{self, SensitivityReport};
use crate::simulation::{self, SimulationResult};

/// Stateful entry point. Operations share one random stream, so a seeded
/// engine replays the same sequence of results call for call.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    rng: RandomEngine,
}

impl Engine {
    /// Validate `config` and seed the random engine from `config.seed`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rng = RandomEngine::new(config.seed);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut RandomEngine {
        &mut self.rng
    }

    /// Restart the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = RandomEngine::from_seed(seed);
    }

    pub fn simulate<P: Payoff + ?Sized>(
        &mut self,
        space: &ProbabilitySpace,
        payoff: &mut P,
    ) -> Result<SimulationResult> {
        simulation::simulate(space, payoff, &self.config, &mut self.rng, None)
    }

    /// Simulate with the built-in closeness-to-weight payoff.
    pub fn simulate_default(&mut self, space: &ProbabilitySpace) -> Result<SimulationResult> {
        let mut payoff = DefaultPayoff::new(space);
        self.simulate(space, &mut payoff)
    }

    pub fn simulate_with_cancel<P: Payoff + ?Sized>(
        &mut self,
        space: &ProbabilitySpace,
        payoff: &mut P,
        cancel: &CancellationToken,
    ) -> Result<SimulationResult> {
        simulation::simulate(space, payoff, &self.config, &mut self.rng, Some(cancel))
    }

    /// Uses `config.risk_samples` draws per alternative.
    pub fn assess_risk(&mut self, alternatives: &[Alternative]) -> Result<RiskAssessment> {
        risk::assess_risk(alternatives, self.config.risk_samples, &mut self.rng)
    }

    pub fn mcts<S, A, X, R>(&mut self, root: S, expander: X, rollout: R) -> Result<MctsSummary<A>>
    where
        A: Clone,
        X: Expander<S, A>,
        R: RolloutPolicy<S>,
    {
        search::mcts(root, expander, rollout, &self.config, &mut self.rng, None)
    }

    pub fn mcts_with_cancel<S, A, X, R>(
        &mut self,
        root: S,
        expander: X,
        rollout: R,
        cancel: &CancellationToken,
    ) -> Result<MctsSummary<A>>
    where
        A: Clone,
        X: Expander<S, A>,
        R: RolloutPolicy<S>,
    {
        search::mcts(root, expander, rollout, &self.config, &mut self.rng, Some(cancel))
    }

    /// Uses `config.sensitivity_samples` samples per set.
    pub fn sensitivity_analysis<P: Payoff + ?Sized>(
        &mut self,
        space: &ProbabilitySpace,
        payoff: &mut P,
    ) -> Result<SensitivityReport> {
        sensitivity::sensitivity_analysis(space, payoff, self.config.sensitivity_samples, &mut self.rng)
    }

    pub fn sensitivity_analysis_default(&mut self, space: &ProbabilitySpace) -> Result<SensitivityReport> {
        let mut payoff = DefaultPayoff::new(space);
        self.sensitivity_analysis(space, &mut payoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_rejects_invalid_config() {
        let err = Engine::new(EngineConfig::default().with_thinning(0)).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_seeded_engines_replay() {
        let space = ProbabilitySpace::from_weights([("a", 0.3), ("b", 0.6)]).unwrap();
        let config = EngineConfig::default().with_seed(17).with_max_samples(3_000);
        let mut e1 = Engine::new(config.clone()).unwrap();
        let mut e2 = Engine::new(config).unwrap();

        assert_eq!(e1.simulate_default(&space).unwrap(), e2.simulate_default(&space).unwrap());
        assert_eq!(
            e1.sensitivity_analysis_default(&space).unwrap(),
            e2.sensitivity_analysis_default(&space).unwrap()
        );
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let space = ProbabilitySpace::fallback();
        let mut engine = Engine::new(EngineConfig::default().with_seed(1).with_max_samples(500)).unwrap();
        let first = engine.simulate_default(&space).unwrap();
        engine.reseed(1);
        assert_eq!(engine.simulate_default(&space).unwrap(), first);
    }

    #[test]
    fn test_risk_uses_configured_samples() {
        let mut engine = Engine::new(EngineConfig::default().with_seed(3).with_risk_samples(10)).unwrap();
        let r = engine.assess_risk(&[Alternative::new("a", 0.5, 1.0)]).unwrap();
        // 10 draws leave an empty 5% tail
        assert!(r.alternatives[0].cvar_5.is_none());
    }

    #[test]
    fn test_cancelled_simulation() {
        let space = ProbabilitySpace::fallback();
        let mut engine = Engine::new(EngineConfig::default().with_seed(1)).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let mut payoff = DefaultPayoff::new(&space);
        assert!(matches!(
            engine.simulate_with_cancel(&space, &mut payoff, &token),
            Err(SimError::Cancelled { .. })
        ));
    }
}
