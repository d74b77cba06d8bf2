// src/stats/core.rs

/// Arithmetic mean; 0 for empty input.
#[inline]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (divides by n); 0 for empty input.
#[inline]
pub fn variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64
}

/// Unbiased sample variance (divides by n - 1); 0 when fewer than two points.
#[inline]
pub fn sample_variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    (ss / (n - 1) as f64).max(0.0)
}

#[inline]
pub fn stddev(data: &[f64]) -> f64 {
    sample_variance(data).sqrt()
}

/// Σ wᵢxᵢ / Σ wᵢ, falling back to the plain mean when the weights carry no mass.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return mean(values);
    }
    let acc: f64 = values.iter().zip(weights).map(|(x, w)| x * w).sum();
    acc / total
}

/// Kish effective sample size `(Σw)² / Σw²`.
pub fn effective_sample_size(weights: &[f64]) -> f64 {
    let sum: f64 = weights.iter().sum();
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    kish_ess(sum, sum_sq, weights.len())
}

/// Kish ESS from running sums over `n` weights. 0 when `Σw² = 0`; `n` when
/// the ratio overflows.
#[inline]
pub fn kish_ess(sum_w: f64, sum_w2: f64, n: usize) -> f64 {
    if !(sum_w2 > 0.0) {
        return 0.0;
    }
    let ess = sum_w * sum_w / sum_w2;
    if ess.is_finite() {
        ess
    } else {
        n as f64
    }
}

/// Percentile using linear interpolation
pub fn percentile(data: &[f64], p: f64) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, p)
}

/// Percentile of already sorted data; 0 for empty input
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&p));
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let w = idx - lo as f64;
        sorted[lo] * (1.0 - w) + sorted[hi] * w
    }
}

/// Returns min and max in one pass
#[inline]
pub fn minmax(data: &[f64]) -> (f64, f64) {
    data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    })
}

/// Two-sided z critical value for the supported confidence levels.
///
/// 0.90 → 1.645, 0.95 → 1.96, 0.99 → 2.576; anything else → 1.96.
pub fn z_value(confidence_level: f64) -> f64 {
    const TABLE: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.576)];
    TABLE
        .iter()
        .find(|(level, _)| (level - confidence_level).abs() < 1e-9)
        .map(|&(_, z)| z)
        .unwrap_or(1.96)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variances() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data) - 5.0).abs() < 1e-12);
        assert!((variance(&data) - 4.0).abs() < 1e-12);
        assert!((sample_variance(&data) - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(sample_variance(&[1.0]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert!((weighted_mean(&[1.0, 3.0], &[1.0, 3.0]) - 2.5).abs() < 1e-12);
        // no mass -> plain mean
        assert!((weighted_mean(&[1.0, 3.0], &[0.0, 0.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_effective_sample_size() {
        assert!((effective_sample_size(&[1.0; 50]) - 50.0).abs() < 1e-9);
        let skewed = [10.0, 0.1, 0.1, 0.1];
        assert!(effective_sample_size(&skewed) < 1.1);
        assert_eq!(effective_sample_size(&[]), 0.0);
    }

    #[test]
    fn test_kish_ess_from_sums() {
        // weights 1 and 3: (4)^2 / 10
        assert!((kish_ess(4.0, 10.0, 2) - 1.6).abs() < 1e-12);
        assert_eq!(kish_ess(0.0, 0.0, 5), 0.0);
        assert_eq!(kish_ess(1e200, 1e-200, 7), 7.0);
    }

    #[test]
    fn test_percentile_interpolation() {
        let data = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 0.5), 3.0);
        assert_eq!(percentile(&data, 1.0), 5.0);
        assert!((percentile(&data, 0.125) - 1.5).abs() < 1e-12);
        assert_eq!(percentile_sorted(&[], 0.5), 0.0);
    }

    #[test]
    fn test_minmax() {
        assert_eq!(minmax(&[3.0, -1.0, 8.0]), (-1.0, 8.0));
    }

    #[test]
    fn test_z_table() {
        assert_eq!(z_value(0.90), 1.645);
        assert_eq!(z_value(0.95), 1.96);
        assert_eq!(z_value(0.99), 2.576);
        assert_eq!(z_value(0.8), 1.96);
    }
}
