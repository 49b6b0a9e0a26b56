//! Domain models: per-vaccine ledgers, raw input records and the weekly
//! aggregate and result records.

pub mod ledger;
pub mod raw;
pub mod vaccine;
pub mod weekly;

pub use ledger::VaccineLedger;
pub use vaccine::{canonical_vaccine_names, normalize_vaccine_name};
pub use weekly::{
    DeliveryWeek, SimulationResults, VaccinationWeek, WeeklyDeliveryData, WeeklyVaccinationData,
};
