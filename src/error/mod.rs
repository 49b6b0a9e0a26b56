//! Error handling for the rollout simulation.
//!
//! Only genuinely unrecoverable situations surface as errors; data-quality
//! anomalies (non-monotonic counts, unknown vaccine names, missing delivery
//! weeks) are logged as warnings and the computation continues.

use crate::utils::calendar::CalendarWeek;

/// Errors surfaced by the simulation library
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A required dataset has not been loaded yet; retry after loading
    #[error("required dataset not loaded: {0}")]
    DataNotReady(&'static str),

    /// No historical record exists for a week the simulation must seed from
    #[error("no historical data for week {0}")]
    MissingHistory(CalendarWeek),

    /// A calendar week string or number pair was malformed
    #[error("invalid calendar week: {0}")]
    InvalidWeek(String),

    /// A simulation parameter is outside its allowed range
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Field name of the offending parameter
        name: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;
