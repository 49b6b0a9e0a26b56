//! Weekly aggregates and simulation output records.

use std::collections::BTreeMap;

use crate::models::ledger::VaccineLedger;
use crate::utils::calendar::CalendarWeek;

/// One week of vaccination activity, historical or simulated.
///
/// Weekly fields equal the difference of consecutive cumulative fields.
/// The record is the superset of everything any consumer needs:
/// per-vaccine dose and first-dose ledgers plus, for simulated weeks, the
/// stockpile left after the week's activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccinationWeek {
    /// Doses administered this week
    pub doses: f64,
    /// People who received their first dose this week
    pub partially_immunized: f64,
    /// People who completed their dose course this week
    pub fully_immunized: f64,
    pub cum_doses: f64,
    pub cum_partially_immunized: f64,
    pub cum_fully_immunized: f64,
    pub doses_by_vaccine: VaccineLedger,
    pub cum_doses_by_vaccine: VaccineLedger,
    pub first_doses_by_vaccine: VaccineLedger,
    pub cum_first_doses_by_vaccine: VaccineLedger,
    /// Doses delivered but not yet administered, after this week's activity
    pub stockpile: VaccineLedger,
}

/// One week of vaccine deliveries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryWeek {
    pub doses_by_vaccine: VaccineLedger,
    pub cum_doses_by_vaccine: VaccineLedger,
}

/// Week-keyed vaccination series; map iteration is chronological.
pub type WeeklyVaccinationData = BTreeMap<CalendarWeek, VaccinationWeek>;

/// Week-keyed delivery series.
pub type WeeklyDeliveryData = BTreeMap<CalendarWeek, DeliveryWeek>;

/// Output of one simulation run, fresh per call and never mutated after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResults {
    pub weekly: BTreeMap<CalendarWeek, VaccinationWeek>,
}
