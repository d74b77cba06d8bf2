use probsim::prelude::*;
use serde_json::json;

#[test]
fn test_integration_smoke() {
    let space = ProbabilitySpace::from_value(&json!({"a": 0.2, "b": 0.8})).unwrap();
    let mut engine = Engine::new(EngineConfig::default().with_seed(1).with_max_samples(5_000)).unwrap();

    let result = engine.simulate_default(&space).unwrap();
    assert!(result.sample_count > 0 && result.sample_count <= 5_000);
    assert!(result.is_finite());
    assert_eq!(result.distribution.len(), 2);

    let risk = engine.assess_risk(&[Alternative::new("a", 0.6, 0.5)]).unwrap();
    assert_eq!(risk.safest, "a");

    let report = engine.sensitivity_analysis_default(&space).unwrap();
    assert_eq!(report.dimensions.len(), 2);
}

#[test]
fn test_every_strategy_runs() {
    let space = ProbabilitySpace::from_weights([("a", 0.1), ("b", 0.5), ("c", 0.9)]).unwrap();
    for strategy in SamplingStrategy::ALL {
        let config = EngineConfig::default()
            .with_seed(5)
            .with_strategy(strategy)
            .with_max_samples(4_000);
        let mut engine = Engine::new(config).unwrap();
        let result = engine.simulate_default(&space).unwrap();

        assert_eq!(result.strategy, strategy);
        assert!(result.is_finite(), "{}", strategy);
        if strategy == SamplingStrategy::Importance {
            // shifted draws are not reweighted back to uniform
            assert!((0.0..=1.0).contains(&result.weighted_mean));
            continue;
        }
        // default payoff over three dimensions: 1 - mean E|U - w| = 1 - (0.41 + 0.25 + 0.41) / 3
        assert!((result.weighted_mean - 0.6433).abs() < 0.03, "{}: {}", strategy, result.weighted_mean);
    }
}

#[test]
fn test_config_and_result_serialize() {
    let config: EngineConfig = serde_json::from_value(json!({
        "seed": 11,
        "strategy": "quasi_random",
        "criterion": "effective_sample_size",
        "max_samples": 2000
    }))
    .unwrap();
    assert_eq!(config.strategy, SamplingStrategy::QuasiRandom);

    let space = ProbabilitySpace::fallback();
    let mut engine = Engine::new(config).unwrap();
    let result = engine.simulate_default(&space).unwrap();

    let encoded = serde_json::to_value(&result).unwrap();
    assert_eq!(encoded["strategy"], "quasi_random");
    assert_eq!(encoded["criterion"], "effective_sample_size");
    assert!(encoded["confidence_interval"]["lower"].is_number());
    assert!(encoded["percentiles"]["p95"].is_number());

    let back: SimulationResult = serde_json::from_value(encoded).unwrap();
    assert_eq!(back.sample_count, result.sample_count);
}

#[test]
fn test_identifiers_parse() {
    assert_eq!("latin-hypercube".parse::<SamplingStrategy>().unwrap(), SamplingStrategy::LatinHypercube);
    assert!(matches!("sobol".parse::<SamplingStrategy>(), Err(SimError::UnknownStrategy(_))));
    assert_eq!("variance".parse::<ConvergenceCriterion>().unwrap(), ConvergenceCriterion::Variance);
}
