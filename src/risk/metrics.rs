/// Tail fraction used by the pathway assessor (worst 5%).
pub const TAIL: f64 = 0.05;

/// Number of observations in the lower `tail` of `n` values.
#[inline]
pub fn tail_len(n: usize, tail: f64) -> usize {
    (tail * n as f64).floor() as usize
}

/// Historical Value at Risk: the value at index ⌊tail·n⌋ of the ascending
/// `sorted` slice, clamped to the last element. Returns 0 for an empty slice.
#[inline]
pub fn value_at_risk(sorted: &[f64], tail: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = tail_len(sorted.len(), tail);
    sorted[index.min(sorted.len() - 1)]
}

/// Conditional VaR (expected shortfall): mean of the worst ⌊tail·n⌋ values.
///
/// `None` when the tail holds no observations, which happens whenever
/// `n < 1 / tail`.
#[inline]
pub fn conditional_value_at_risk(sorted: &[f64], tail: f64) -> Option<f64> {
    let k = tail_len(sorted.len(), tail);
    if k == 0 {
        return None;
    }
    let sum: f64 = sorted[..k].iter().sum();
    Some(sum / k as f64)
}

/// Higher is riskier: low expected value and wide dispersion both count.
#[inline]
pub fn risk_score(mean: f64, std_dev: f64) -> f64 {
    1.0 - mean + std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_index() {
        let sorted: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_eq!(value_at_risk(&sorted, TAIL), 5.0);
        assert_eq!(value_at_risk(&[3.0], TAIL), 3.0);
        assert_eq!(value_at_risk(&[], TAIL), 0.0);
        // tail of 1.0 would index past the end
        assert_eq!(value_at_risk(&[1.0, 2.0], 1.0), 2.0);
    }

    #[test]
    fn test_cvar_mean_of_tail() {
        let sorted: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let cvar = conditional_value_at_risk(&sorted, TAIL).unwrap();
        assert!((cvar - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cvar_empty_tail() {
        let sorted: Vec<f64> = (0..19).map(|i| i as f64).collect();
        assert!(conditional_value_at_risk(&sorted, TAIL).is_none());
        let sorted: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(conditional_value_at_risk(&sorted, TAIL), Some(0.0));
    }

    #[test]
    fn test_risk_score() {
        assert!((risk_score(0.8, 0.1) - 0.3).abs() < 1e-12);
        assert!(risk_score(0.2, 0.1) > risk_score(0.8, 0.1));
    }
}
