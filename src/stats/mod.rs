//! Summary statistics over payoff and outcome vectors
//!
//! Plain slice functions shared by aggregation, the risk assessor and the
//! sensitivity analyzer.
//!
//! # Examples
//!
//! ```
//! use probsim::stats::{mean, percentile, effective_sample_size};
//!
//! let payoffs = [0.1, 0.4, 0.35, 0.8];
//! assert!((mean(&payoffs) - 0.4125).abs() < 1e-12);
//! assert_eq!(percentile(&payoffs, 1.0), 0.8);
//! assert_eq!(effective_sample_size(&[1.0; 4]), 4.0);
//! ```

pub mod core;

pub use self::core::{
    mean, variance, sample_variance, stddev, weighted_mean, effective_sample_size, kish_ess,
    percentile, percentile_sorted, minmax, z_value,
};
