use thiserror::Error;

use crate::domain::Month;

/// Contract violations rejected before any computation runs.
///
/// Metrics that are legitimately not computable (payback on negative
/// cashflow, LCOE at zero energy) are not errors; they come back as `None`
/// fields on the result instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("monthly irradiance is missing {0}")]
    MissingMonth(Month),

    #[error("invalid irradiance for {month}: {value} (must be finite and non-negative)")]
    InvalidIrradiance { month: Month, value: f64 },

    #[error("invalid assumptions: {0}")]
    InvalidAssumptions(#[from] validator::ValidationErrors),
}
