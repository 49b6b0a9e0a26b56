//! Dataset store injected into the simulation engine.

use crate::error::{Result, SimulationError};
use crate::models::raw::{
    DailyDeliveryRecord, DailyVaccinationRecord, PopulationData, PriorityGroupsData,
    ScenarioPlanRow, VaccineUsageData, WillingnessSurveyData,
};

/// All external datasets the engine consumes.
///
/// Fields stay `None` until the loading layer has produced them; the
/// engine refuses to run before [`SimulationData::all_loaded`] holds, so
/// callers sequence loading first and simulation second.
#[derive(Debug, Clone, Default)]
pub struct SimulationData {
    pub vaccinations: Option<Vec<DailyVaccinationRecord>>,
    pub deliveries: Option<Vec<DailyDeliveryRecord>>,
    pub scenario_rows: Option<Vec<ScenarioPlanRow>>,
    pub population: Option<PopulationData>,
    pub willingness: Option<WillingnessSurveyData>,
    pub priorities: Option<PriorityGroupsData>,
    pub vaccine_usage: Option<VaccineUsageData>,
}

impl SimulationData {
    /// Whether every dataset has been loaded.
    #[must_use]
    pub fn all_loaded(&self) -> bool {
        self.vaccinations.is_some()
            && self.deliveries.is_some()
            && self.scenario_rows.is_some()
            && self.population.is_some()
            && self.willingness.is_some()
            && self.priorities.is_some()
            && self.vaccine_usage.is_some()
    }

    pub(crate) fn vaccinations(&self) -> Result<&[DailyVaccinationRecord]> {
        self.vaccinations
            .as_deref()
            .ok_or(SimulationError::DataNotReady("vaccinations"))
    }

    pub(crate) fn deliveries(&self) -> Result<&[DailyDeliveryRecord]> {
        self.deliveries
            .as_deref()
            .ok_or(SimulationError::DataNotReady("deliveries"))
    }

    pub(crate) fn scenario_rows(&self) -> Result<&[ScenarioPlanRow]> {
        self.scenario_rows
            .as_deref()
            .ok_or(SimulationError::DataNotReady("scenario_rows"))
    }

    pub(crate) fn population(&self) -> Result<&PopulationData> {
        self.population
            .as_ref()
            .ok_or(SimulationError::DataNotReady("population"))
    }

    pub(crate) fn willingness(&self) -> Result<&WillingnessSurveyData> {
        self.willingness
            .as_ref()
            .ok_or(SimulationError::DataNotReady("willingness"))
    }

    pub(crate) fn priorities(&self) -> Result<&PriorityGroupsData> {
        self.priorities
            .as_ref()
            .ok_or(SimulationError::DataNotReady("priorities"))
    }

    pub(crate) fn vaccine_usage(&self) -> Result<&VaccineUsageData> {
        self.vaccine_usage
            .as_ref()
            .ok_or(SimulationError::DataNotReady("vaccine_usage"))
    }
}
