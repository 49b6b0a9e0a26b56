//! Raw input records as produced by the external loading layer.
//!
//! Fetching and TSV/JSON parsing live outside this crate; these types are
//! the contract with that layer. Vaccine names are still raw manufacturer
//! spellings here and get normalized during weekly aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Region marker denoting the nationwide aggregate in planning data.
pub const AGGREGATE_REGION: &str = "Gesamt";

/// The named delivery scenarios shipped with the planning data.
pub const DELIVERY_SCENARIOS: &[&str] =
    &["Gleichverteilung", "Linearer Anstieg der Produktion in Q2"];

/// Scheme id for the priority tiers laid down by the vaccination decree.
pub const SCHEME_DECREE: &str = "decree";
/// Scheme id for the priority tiers estimated by the RKI recommendation.
pub const SCHEME_RKI: &str = "rki";

/// One day of the national vaccination time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyVaccinationRecord {
    pub date: NaiveDate,
    /// Cumulative doses administered up to and including this day
    pub cum_doses: f64,
    /// Cumulative people with at least one dose
    pub cum_partially_immunized: f64,
    /// Cumulative people with a completed dose course
    pub cum_fully_immunized: f64,
    /// Doses administered on this day
    pub daily_doses: f64,
    /// First doses administered on this day
    pub daily_first_doses: f64,
    /// Second doses administered on this day
    pub daily_second_doses: f64,
    /// Cumulative doses per manufacturer (raw spellings)
    #[serde(default)]
    pub cum_doses_by_vaccine: BTreeMap<String, f64>,
    /// Cumulative first doses per manufacturer (raw spellings)
    #[serde(default)]
    pub cum_first_doses_by_vaccine: BTreeMap<String, f64>,
}

/// One recorded vaccine delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyDeliveryRecord {
    pub date: NaiveDate,
    pub doses: f64,
    /// Free-text manufacturer name, normalized during aggregation
    pub vaccine: String,
    pub region: String,
}

/// One row of the delivery planning table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPlanRow {
    pub region: String,
    pub scenario: String,
    /// Bare calendar week number within the plan year
    pub week: u32,
    pub manufacturer: String,
    /// Doses scheduled for delivery in that week
    pub doses: f64,
}

/// Population total and per-age breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationData {
    pub total: f64,
    /// People per single year of age
    pub by_age: BTreeMap<u32, f64>,
}

/// Willingness survey results keyed by survey date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WillingnessSurveyData {
    pub surveys: BTreeMap<NaiveDate, WillingnessSurvey>,
}

impl WillingnessSurveyData {
    /// The most recent survey, if any was loaded.
    #[must_use]
    pub fn latest(&self) -> Option<&WillingnessSurvey> {
        self.surveys.values().next_back()
    }
}

/// One survey on the 7-point willingness scale.
///
/// Point 7 is "definitely willing", point 1 "definitely not"; values are
/// population fractions summing to one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WillingnessSurvey {
    /// Fraction of respondents per scale point (1..=7)
    pub fractions: BTreeMap<u8, f64>,
}

impl WillingnessSurvey {
    /// Fraction of respondents at one scale point.
    #[must_use]
    pub fn fraction(&self, point: u8) -> f64 {
        self.fractions.get(&point).copied().unwrap_or(0.0)
    }
}

/// One priority tier of a prioritization scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityGroup {
    pub id: String,
    pub label: String,
    /// Estimated people in the tier
    pub size: f64,
}

/// A named prioritization; tiers are listed in priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityGroupScheme {
    pub groups: Vec<PriorityGroup>,
}

/// All prioritization schemes, keyed by scheme id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityGroupsData {
    pub schemes: BTreeMap<String, PriorityGroupScheme>,
}

/// One phase of a vaccine's usage timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsagePhase {
    /// First date the phase applies
    pub from: NaiveDate,
    /// Required gap between first and second dose; 0 marks a single-dose
    /// vaccine
    pub second_dose_interval_weeks: u32,
    /// Whether the vaccine is part of the active rollout
    pub in_use: bool,
}

/// Usage timelines per vaccine (raw spellings allowed).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaccineUsageData {
    pub vaccines: BTreeMap<String, Vec<UsagePhase>>,
}
