use crate::probability::{ProbabilitySpace, Sample};
use crate::random::{halton, prime_base, RandomEngine};

/// Largest random starting index for a quasi-random batch.
const MAX_START: usize = 1 << 20;

/// Halton points, dimension `j` using the `j`-th prime base.
///
/// The starting index is drawn from the engine so that consecutive batches
/// walk fresh stretches of the sequence.
pub fn quasi_random(space: &ProbabilitySpace, n: usize, rng: &mut RandomEngine) -> Vec<Sample> {
    let keys = space.shared_keys();
    let d = space.len();
    let start = (rng.next_index(MAX_START) + 1) as u64;

    (0..n as u64)
        .map(|i| {
            let index = start + i;
            let values = (0..d).map(|j| halton(index, prime_base(j))).collect();
            Sample::new(keys.clone(), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quasi_random_is_evenly_spread() {
        let space = ProbabilitySpace::from_weights([("a", 0.5), ("b", 0.5)]).unwrap();
        let mut rng = RandomEngine::new(Some(3));
        let samples = quasi_random(&space, 1_024, &mut rng);

        // a base-2 point's quarter is fixed by its index mod 4
        let mut bins = [0usize; 4];
        for s in &samples {
            bins[(s.get("a").unwrap() * 4.0) as usize] += 1;
        }
        assert!(bins.iter().all(|&c| (250..=262).contains(&c)), "{:?}", bins);
    }

    #[test]
    fn test_many_dimensions_cycle_primes() {
        let space = ProbabilitySpace::from_weights((0..40).map(|j| (format!("d{}", j), 0.1))).unwrap();
        let mut rng = RandomEngine::new(Some(3));
        let samples = quasi_random(&space, 5, &mut rng);
        // dimension 32 reuses base 2, same as dimension 0
        for s in &samples {
            assert_eq!(s.values()[0], s.values()[32]);
        }
    }

    #[test]
    fn test_start_index_skips_origin() {
        // index 0 is the all-zero point; every batch starts at 1 or later
        let space = ProbabilitySpace::from_weights([("a", 0.5)]).unwrap();
        for seed in 0..200 {
            let mut rng = RandomEngine::new(Some(seed));
            let first = quasi_random(&space, 1, &mut rng);
            assert!(first[0].values()[0] > 0.0, "seed {}", seed);
        }
    }

    #[test]
    fn test_batches_start_at_different_indices() {
        let space = ProbabilitySpace::from_weights([("a", 0.5)]).unwrap();
        let mut rng = RandomEngine::new(Some(5));
        let first = quasi_random(&space, 8, &mut rng);
        let second = quasi_random(&space, 8, &mut rng);
        assert_ne!(first, second);
    }
}
