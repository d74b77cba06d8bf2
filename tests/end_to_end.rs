use probsim::prelude::*;
use std::result::Result;

/// E|U - w| for U ~ U(0, 1)
fn expected_abs_deviation(w: f64) -> f64 {
    (w * w + (1.0 - w) * (1.0 - w)) / 2.0
}

#[test]
fn test_end_to_end_two_dimension_scenario() {
    let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
    let config = EngineConfig::default()
        .with_seed(2024)
        .with_strategy(SamplingStrategy::Uniform)
        .with_max_samples(50_000)
        .with_criterion(ConvergenceCriterion::Variance)
        .with_convergence_threshold(1e-12);

    let mut engine = Engine::new(config).unwrap();
    let result = engine.simulate_default(&space).unwrap();

    let expected = 1.0 - (expected_abs_deviation(0.2) + expected_abs_deviation(0.8)) / 2.0;
    assert!((expected - 0.66).abs() < 1e-12);

    assert_eq!(result.sample_count, 50_000);
    assert_eq!(result.batches, 50);
    assert!(!result.converged);
    assert!((result.weighted_mean - expected).abs() < 0.01, "{}", result.weighted_mean);
    assert!(result.confidence_interval.width() < 0.01);
    assert!(result.confidence_interval.contains(result.weighted_mean));
    assert!((result.effective_sample_size - 50_000.0).abs() < 1e-6);

    let p = result.percentiles;
    assert!(p.p5 <= p.p25 && p.p25 <= p.p50 && p.p50 <= p.p75 && p.p75 <= p.p95);
}

#[test]
fn test_end_to_end_early_convergence() {
    let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
    let config = EngineConfig::default()
        .with_seed(9)
        .with_strategy(SamplingStrategy::LatinHypercube)
        .with_convergence_threshold(0.02);

    let mut engine = Engine::new(config).unwrap();
    let result = engine.simulate_default(&space).unwrap();

    assert!(result.converged);
    assert!(result.sample_count < 100_000);
    assert_eq!(result.sample_count, result.batches * 1_000);
    assert!((result.weighted_mean - 0.66).abs() < 0.02);
}

#[test]
fn test_end_to_end_custom_payoff_error_surfaces() {
    let space = ProbabilitySpace::from_weights([("a", 0.5)]).unwrap();
    let mut engine = Engine::new(EngineConfig::default().with_seed(1)).unwrap();

    let mut seen = 0;
    let mut payoff = |s: &Sample| -> Result<f64, String> {
        seen += 1;
        if seen > 10 {
            Err(format!("rejected sample {:?}", s.get("a")))
        } else {
            Ok(1.0)
        }
    };

    let err = engine.simulate(&space, &mut payoff).unwrap_err();
    assert!(err.to_string().starts_with("payoff function failed: rejected sample"));
    assert_eq!(seen, 11);
}

#[test]
fn test_end_to_end_mcts_and_risk() {
    let mut engine = Engine::new(
        EngineConfig::default()
            .with_seed(3)
            .with_mcts_simulations(400)
            .with_mcts_max_depth(4),
    )
    .unwrap();

    // walk right (+1) or left (-1); reward is how far right we ended up
    let expand = |pos: &i32| -> Result<Vec<Expansion<i32, i32>>, std::convert::Infallible> {
        Ok(vec![
            Expansion::new(pos - 1, -1, 0.5),
            Expansion::new(pos + 1, 1, 0.5),
        ])
    };
    let rollout = |pos: &i32| -> Result<f64, std::convert::Infallible> {
        Ok((*pos as f64 + 4.0) / 8.0)
    };

    let summary = engine.mcts(0, expand, rollout).unwrap();
    assert_eq!(summary.best_action, Some(1));
    assert_eq!(summary.best_sequence.first(), Some(&1));
    assert!(summary.max_depth_reached <= 4);

    let risk = engine
        .assess_risk(&[
            Alternative::new("steady", 0.7, 0.9),
            Alternative::new("gamble", 0.3, 0.2),
        ])
        .unwrap();
    assert_eq!(risk.safest, "steady");
    assert_eq!(risk.riskiest, "gamble");
}
