//! Vaccine usage policy: dosing intervals, active-rollout status and the
//! first-dose priority order.

use std::collections::BTreeMap;

use crate::models::raw::{UsagePhase, VaccineUsageData};
use crate::models::vaccine::{canonical_vaccine_names, normalize_vaccine_name};
use crate::utils::calendar::CalendarWeek;

/// Second-dose interval assumed when no timeline covers a vaccine.
const DEFAULT_INTERVAL_WEEKS: u32 = 6;

/// Per-vaccine usage rules derived from the loaded timeline metadata.
#[derive(Debug, Clone, Default)]
pub struct VaccineUsage {
    timelines: BTreeMap<String, Vec<UsagePhase>>,
}

impl VaccineUsage {
    /// Build the policy from raw timeline data, normalizing names and
    /// sorting each vaccine's phases by start date.
    #[must_use]
    pub fn from_data(data: &VaccineUsageData) -> Self {
        let mut timelines: BTreeMap<String, Vec<UsagePhase>> = BTreeMap::new();
        for (name, phases) in &data.vaccines {
            timelines
                .entry(normalize_vaccine_name(name))
                .or_default()
                .extend(phases.iter().cloned());
        }
        for phases in timelines.values_mut() {
            phases.sort_by_key(|phase| phase.from);
        }
        Self { timelines }
    }

    /// The timeline phase in effect for `name` during `week`, if any.
    fn phase_at(&self, week: CalendarWeek, name: &str) -> Option<&UsagePhase> {
        let monday = week.monday();
        self.timelines
            .get(name)?
            .iter()
            .rev()
            .find(|phase| phase.from <= monday)
    }

    /// Required gap in weeks between first and second dose; 0 marks a
    /// single-dose vaccine.
    #[must_use]
    pub fn interval_weeks(&self, week: CalendarWeek, name: &str) -> u32 {
        self.phase_at(week, name)
            .map_or_else(|| default_interval(name), |phase| phase.second_dose_interval_weeks)
    }

    /// Whether the vaccine is part of the active rollout in `week`.
    #[must_use]
    pub fn is_used(&self, week: CalendarWeek, name: &str) -> bool {
        self.phase_at(week, name).is_none_or(|phase| phase.in_use)
    }

    /// Fixed order in which stockpile is allocated to first doses.
    #[must_use]
    pub fn priority_list(&self) -> Vec<&'static str> {
        canonical_vaccine_names()
    }
}

/// Static fallback intervals for vaccines without timeline data.
fn default_interval(name: &str) -> u32 {
    match name {
        "az" => 12,
        "j&j" => 0,
        _ => DEFAULT_INTERVAL_WEEKS,
    }
}
