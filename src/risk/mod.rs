//! Risk statistics and the pathway assessor
//!
//! - [`metrics`]: historical VaR / CVaR over sorted draws
//! - [`assess_risk`]: Beta-distributed outcome model per alternative

pub mod assessor;
pub mod metrics;

pub use assessor::{assess_risk, Alternative, AlternativeRisk, RiskAssessment};
pub use metrics::{conditional_value_at_risk, value_at_risk};
