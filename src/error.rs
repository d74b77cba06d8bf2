//! Error types shared by every engine operation.
//!
//! Three classes of problems exist:
//!
//! - **Configuration errors** are rejected before any sampling begins
//!   (`InvalidShape`, `UnknownStrategy`, `InvalidSampleCount`, ...).
//! - **Degenerate data** is never an error. Zero variance, empty VaR tails and
//!   unvisited tree nodes are reported through sentinels (`0.0`, `None`).
//! - **Exhaustion** of the sample budget is not an error either; the result
//!   simply carries `converged = false`.
//! - **Overflow** is an error. Finite payoffs whose moments leave `f64` range
//!   produce `NonFiniteStatistic` instead of a result holding NaN or ±inf.
//!
//! Failures raised by caller-supplied callbacks are passed through untouched
//! inside the `Payoff`, `Expansion` and `Rollout` variants.

use thiserror::Error;

/// Boxed error produced by a caller-supplied payoff, expansion or rollout function.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the simulation and search engine.
#[derive(Debug, Error)]
pub enum SimError {
    /// Gamma/Beta shape parameter was not a positive finite number
    #[error("invalid shape parameter {name} = {value} (must be finite and > 0)")]
    InvalidShape { name: &'static str, value: f64 },

    #[error("unknown sampling strategy '{0}'")]
    UnknownStrategy(String),

    #[error("unknown convergence criterion '{0}'")]
    UnknownCriterion(String),

    /// A sample count (`n`, `max_samples`, `batch_size`, ...) was zero
    #[error("invalid sample count for {what}: {value}")]
    InvalidSampleCount { what: &'static str, value: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `next_int` called with `min > max`
    #[error("invalid integer range [{min}, {max}]")]
    InvalidRange { min: i64, max: i64 },

    #[error("invalid probability space: {0}")]
    InvalidSpace(String),

    #[error("invalid alternative '{id}': {reason}")]
    InvalidAlternative { id: String, reason: String },

    #[error("no alternatives supplied for risk assessment")]
    NoAlternatives,

    /// Payoff function returned NaN or an infinity
    #[error("payoff function returned a non-finite value: {0}")]
    NonFinitePayoff(f64),

    /// Rollout function returned NaN or an infinity
    #[error("rollout function returned a non-finite reward: {0}")]
    NonFiniteReward(f64),

    /// An aggregate (variance, standard error, ...) overflowed even though every
    /// payoff was finite
    #[error("{statistic} is not finite ({value}); payoff magnitudes are too large to summarise")]
    NonFiniteStatistic { statistic: &'static str, value: f64 },

    #[error("payoff function failed: {0}")]
    Payoff(#[source] CallbackError),

    #[error("expansion function failed: {0}")]
    Expansion(#[source] CallbackError),

    #[error("rollout function failed: {0}")]
    Rollout(#[source] CallbackError),

    /// Cooperative cancellation observed after `completed` batches or simulations
    #[error("operation cancelled after {completed} completed iterations")]
    Cancelled { completed: usize },
}

impl SimError {
    /// Returns the caller's original error if this error came from a callback.
    pub fn into_callback_error(self) -> Option<CallbackError> {
        match self {
            SimError::Payoff(e) | SimError::Expansion(e) | SimError::Rollout(e) => Some(e),
            _ => None,
        }
    }

    /// True for errors that are rejected before any sampling begins.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SimError::InvalidShape { .. }
                | SimError::UnknownStrategy(_)
                | SimError::UnknownCriterion(_)
                | SimError::InvalidSampleCount { .. }
                | SimError::InvalidConfig(_)
                | SimError::InvalidRange { .. }
                | SimError::InvalidSpace(_)
                | SimError::InvalidAlternative { .. }
                | SimError::NoAlternatives
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn test_callback_error_round_trips_unmodified() {
        let err = SimError::Payoff(Box::new(Boom));
        assert!(!err.is_configuration_error());
        assert_eq!(err.to_string(), "payoff function failed: boom");

        let inner = err.into_callback_error().unwrap();
        assert!(inner.downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn test_configuration_errors_are_classified() {
        let err = SimError::InvalidShape { name: "alpha", value: 0.0 };
        assert!(err.is_configuration_error());
        assert!(err.into_callback_error().is_none());

        assert!(SimError::UnknownStrategy("sobol".into()).is_configuration_error());
        assert!(!SimError::Cancelled { completed: 3 }.is_configuration_error());
    }
}
