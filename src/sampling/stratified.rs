use crate::probability::{ProbabilitySpace, Sample};
use crate::random::RandomEngine;

/// Jittered point inside stratum `cell` of `cells`, kept strictly below the
/// next stratum's lower edge.
#[inline]
fn in_stratum(cell: usize, cells: usize, u: f64) -> f64 {
    let width = cells as f64;
    let x = (cell as f64 + u) / width;
    let upper = (cell + 1) as f64 / width;
    if x >= upper {
        (cell as f64 + 0.5) / width
    } else {
        x
    }
}

/// Splits [0, 1] into ⌈√n⌉ strata and visits them round-robin.
///
/// Sample `i` falls in stratum `i mod ⌈√n⌉` on every dimension, with an
/// independent jitter per dimension.
pub fn stratified(space: &ProbabilitySpace, n: usize, rng: &mut RandomEngine) -> Vec<Sample> {
    let keys = space.shared_keys();
    let d = space.len();
    let strata = ((n as f64).sqrt().ceil() as usize).max(1);

    (0..n)
        .map(|i| {
            let cell = i % strata;
            let values = (0..d).map(|_| in_stratum(cell, strata, rng.next_float())).collect();
            Sample::new(keys.clone(), values)
        })
        .collect()
}

/// Latin hypercube: each dimension gets its own shuffled assignment of the
/// `n` strata, so every stratum of every dimension holds exactly one sample.
pub fn latin_hypercube(space: &ProbabilitySpace, n: usize, rng: &mut RandomEngine) -> Vec<Sample> {
    let keys = space.shared_keys();
    let d = space.len();

    // column-major: columns[j][i] = value of sample i on dimension j
    let mut columns = Vec::with_capacity(d);
    for _ in 0..d {
        let mut perm: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut perm);
        let column: Vec<f64> = perm
            .into_iter()
            .map(|cell| in_stratum(cell, n, rng.next_float()))
            .collect();
        columns.push(column);
    }

    (0..n)
        .map(|i| Sample::new(keys.clone(), columns.iter().map(|c| c[i]).collect()))
        .collect()
}
