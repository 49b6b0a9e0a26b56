//! Weekly vaccination-rollout projection.
//!
//! Given historical vaccination and delivery time series, population
//! demographics, per-vaccine dosing rules and a set of scenario parameters,
//! the engine projects week-by-week first-dose and second-dose
//! administration, immunization counts and vaccine stockpiles over a
//! bounded horizon. Data fetching and chart rendering live outside this
//! crate; everything here is a pure, synchronous computation over
//! already-loaded snapshots.

pub mod config;
pub mod convert;
pub mod error;
pub mod models;
pub mod partition;
pub mod simulation;
pub mod usage;
pub mod utils;

// Re-export the most common types for easier use
pub use config::SimulationParameters;
pub use error::{Result, SimulationError};
pub use models::{
    DeliveryWeek, SimulationResults, VaccinationWeek, VaccineLedger, WeeklyDeliveryData,
    WeeklyVaccinationData,
};
pub use simulation::{BasicSimulation, NamedPartitioning, SimulationData};
pub use usage::VaccineUsage;
pub use utils::calendar::CalendarWeek;
