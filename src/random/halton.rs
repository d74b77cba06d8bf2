//! Halton low-discrepancy sequence
//!
//! The radical inverse of `index` in a prime `base`. Consecutive indices fill
//! [0, 1) far more evenly than pseudo-random draws; pairing each dimension
//! with a distinct prime keeps the dimensions decorrelated.

/// Prime bases assigned to dimensions in order. Dimensions beyond the table
/// wrap around to the start.
pub const PRIMES: [u32; 32] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131,
];

/// Prime base for dimension `j`, cycling through [`PRIMES`].
#[inline]
pub fn prime_base(dimension: usize) -> u32 {
    PRIMES[dimension % PRIMES.len()]
}

/// Radical inverse of `index` in `base`.
///
/// Returns 0 for `base < 2`, which has no meaningful expansion.
///
/// # Examples
///
/// ```
/// use probsim::random::halton;
///
/// assert_eq!(halton(1, 2), 0.5);
/// assert_eq!(halton(2, 2), 0.25);
/// assert_eq!(halton(3, 2), 0.75);
/// assert!((halton(1, 3) - 1.0 / 3.0).abs() < 1e-15);
/// ```
#[inline]
pub fn halton(index: u64, base: u32) -> f64 {
    if base < 2 {
        return 0.0;
    }

    let b = base as u64;
    let inv_base = 1.0 / base as f64;
    let mut result = 0.0;
    let mut f = inv_base;
    let mut i = index;

    while i > 0 {
        result += f * (i % b) as f64;
        i /= b;
        f *= inv_base;
    }

    result
}
