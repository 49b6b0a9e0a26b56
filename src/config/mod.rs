//! Simulation parameters.

use std::collections::BTreeMap;

use crate::error::{Result, SimulationError};
use crate::models::raw::DELIVERY_SCENARIOS;

/// Scenario and policy knobs for a simulation run.
///
/// All fields have defaults modelling the baseline rollout scenario.
/// Changing `delivery_scenario` invalidates the cached planned-delivery
/// series; the engine rebuilds it on the next run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// Exclude people contraindicated by age
    pub consider_contraindicated: bool,
    /// Exclude people unwilling to be vaccinated
    pub consider_not_willing: bool,
    /// Model a separately slower hesitant sub-population
    pub consider_hesitating: bool,
    /// Start from the real vaccine stockpile instead of an empty one
    pub consider_stock_pile: bool,
    /// People younger than this count as contraindicated
    pub contraindication_age: u32,
    /// Multiplicative factor applied to all scheduled deliveries
    pub delivery_amount_factor: f64,
    /// Named delivery scenario merged with historical deliveries
    pub delivery_scenario: String,
    /// Fraction of stockpile held back to guarantee future second doses
    pub keep_second_doses_back: f64,
    /// Extra weeks added to every second-dose interval
    pub extra_interval_weeks: u32,
    /// Apply the extra interval only to cohorts vaccinated from now on
    pub extra_interval_weeks_only_future: bool,
    /// Baseline fraction of the population willing to be vaccinated
    pub fraction_willing: f64,
    /// Per-vaccine enabled flags, derived from the usage policy
    pub vaccines_used: BTreeMap<String, bool>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            consider_contraindicated: true,
            consider_not_willing: true,
            consider_hesitating: true,
            consider_stock_pile: true,
            contraindication_age: 16,
            delivery_amount_factor: 1.0,
            delivery_scenario: DELIVERY_SCENARIOS[1].to_string(),
            keep_second_doses_back: 0.0,
            extra_interval_weeks: 0,
            extra_interval_weeks_only_future: false,
            fraction_willing: 0.80,
            vaccines_used: BTreeMap::new(),
        }
    }
}

impl SimulationParameters {
    /// Check that all numeric parameters are within range.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("delivery_amount_factor", self.delivery_amount_factor),
            ("keep_second_doses_back", self.keep_second_doses_back),
            ("fraction_willing", self.fraction_willing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidParameter {
                    name,
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        for (name, value) in [
            ("keep_second_doses_back", self.keep_second_doses_back),
            ("fraction_willing", self.fraction_willing),
        ] {
            if value > 1.0 {
                return Err(SimulationError::InvalidParameter {
                    name,
                    message: format!("must be a fraction within 0..=1, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Whether a vaccine is enabled for this run.
    #[must_use]
    pub fn vaccine_enabled(&self, name: &str) -> bool {
        self.vaccines_used.get(name).copied().unwrap_or(false)
    }

    /// Whether the vaccine is known to this run at all.
    #[must_use]
    pub fn vaccine_known(&self, name: &str) -> bool {
        self.vaccines_used.contains_key(name)
    }
}
