//! The weekly rollout projection engine.
//!
//! One `run_simulation()` call walks week by week from the start of the
//! horizon to its end, moving doses from deliveries into the stockpile,
//! from the stockpile into arms, and first-dose recipients onto the
//! second-dose waiting list. Everything is synchronous and deterministic;
//! identical inputs and parameters reproduce the identical result.

use crate::config::SimulationParameters;
use crate::convert::{
    aggregate_deliveries, aggregate_vaccinations, extract_scenario_deliveries,
    merge_delivery_scenario, recalculate_cumulative_deliveries,
};
use crate::error::{Result, SimulationError};
use crate::models::VaccineLedger;
use crate::models::raw::{SCHEME_DECREE, SCHEME_RKI};
use crate::models::weekly::{
    SimulationResults, VaccinationWeek, WeeklyDeliveryData, WeeklyVaccinationData,
};
use crate::partition::{
    AgePartitioner, DecreePriorityPartitioner, PartitionPolicy, PopulationPartition,
    RkiPriorityPartitioner, WillingnessPartitioner, remaining_pool,
};
use crate::simulation::data::SimulationData;
use crate::simulation::waiting_list::SecondDoseWaitingList;
use crate::usage::VaccineUsage;
use crate::utils::calendar::CalendarWeek;
use crate::utils::logging::warn_week;

/// How far back the waiting-list seeding walks through history.
const SEED_LOOKBACK_WEEKS: u32 = 12;
/// Marginal weekly uptake of the hesitant pool while it is still full.
const HESITANT_MAX_UPTAKE: f64 = 0.5;
/// Marginal weekly uptake once the hesitant pool is nearly exhausted.
const HESITANT_MIN_UPTAKE: f64 = 0.1;

/// A population partitioning computed for the chart layer.
#[derive(Debug, Clone)]
pub struct NamedPartitioning {
    pub id: &'static str,
    pub title: &'static str,
    pub partitions: Vec<PopulationPartition>,
}

/// The rollout projection engine.
///
/// Construct with the loaded datasets, adjust `params` and the horizon,
/// call [`prepare_data`](Self::prepare_data) once loading has finished,
/// then [`run_simulation`](Self::run_simulation) as often as parameters
/// change. Converted weekly series are cached between runs; changing the
/// delivery scenario invalidates the affected caches.
#[derive(Debug)]
pub struct BasicSimulation {
    data: SimulationData,
    pub params: SimulationParameters,
    /// First simulated week (inclusive)
    pub start_week: CalendarWeek,
    /// End of the horizon (exclusive)
    pub end_week: CalendarWeek,
    /// Weeks between a dose being recorded as delivered and it becoming
    /// available for administration
    pub delivery_delay_weeks: u32,

    weekly_vaccinations: Option<WeeklyVaccinationData>,
    weekly_deliveries: Option<WeeklyDeliveryData>,
    planned_deliveries: Option<WeeklyDeliveryData>,
    cached_scenario: Option<String>,
    partitionings: Vec<NamedPartitioning>,
}

impl BasicSimulation {
    #[must_use]
    pub fn new(data: SimulationData) -> Self {
        Self {
            data,
            params: SimulationParameters::default(),
            start_week: CalendarWeek::new(2021, 10),
            end_week: CalendarWeek::new(2021, 43),
            delivery_delay_weeks: 1,
            weekly_vaccinations: None,
            weekly_deliveries: None,
            planned_deliveries: None,
            cached_scenario: None,
            partitionings: Vec::new(),
        }
    }

    /// Derive the per-vaccine enabled flags from the usage policy at the
    /// start week. Call once all datasets are loaded and after moving the
    /// start week.
    pub fn prepare_data(&mut self) -> Result<()> {
        let usage = VaccineUsage::from_data(self.data.vaccine_usage()?);
        self.params.vaccines_used = usage
            .priority_list()
            .iter()
            .map(|name| ((*name).to_string(), usage.is_used(self.start_week, name)))
            .collect();
        Ok(())
    }

    /// Partitionings computed by the latest run, for the chart layer.
    #[must_use]
    pub fn partitionings(&self) -> &[NamedPartitioning] {
        &self.partitionings
    }

    /// Run the projection over `[start_week, end_week)`.
    ///
    /// Returns [`SimulationError::DataNotReady`] or
    /// [`SimulationError::MissingHistory`] while inputs are incomplete;
    /// callers treat that as "not ready yet" and retry after loading.
    pub fn run_simulation(&mut self) -> Result<SimulationResults> {
        self.params.validate()?;
        self.ensure_weekly_data()?;

        log::info!(
            "running rollout simulation {} -> {}",
            self.start_week,
            self.end_week
        );

        let scenario = self.adjusted_scenario_deliveries()?;
        let partitionings = self.compute_partitionings()?;
        let usage = VaccineUsage::from_data(self.data.vaccine_usage()?);
        let contraindicated = self.contraindicated_count()?;
        let population_total = self.data.population()?.total;
        let hesitant_share = WillingnessPartitioner::new(
            self.data.willingness()?,
            self.data.population()?,
        )
        .hesitant_share_of_willing();

        // seed the carried state from the last fully known historical week
        let weekly_vaccinations = self
            .weekly_vaccinations
            .as_ref()
            .ok_or(SimulationError::DataNotReady("weekly vaccinations"))?;
        let before_week = self.start_week.prev();
        let before = weekly_vaccinations
            .get(&before_week)
            .ok_or(SimulationError::MissingHistory(before_week))?;

        let mut cum_partially_immunized = before.cum_partially_immunized;
        let mut cum_fully_immunized = before.cum_fully_immunized;
        let mut cum_doses = before.cum_doses;
        let mut cum_doses_by_vaccine = before.cum_doses_by_vaccine.clone();
        let mut cum_first_doses_by_vaccine = before.cum_first_doses_by_vaccine.clone();

        let delivered_through = self
            .start_week
            .weeks_before(1 + i64::from(self.delivery_delay_weeks));
        let cum_delivered = scenario
            .get(&delivered_through)
            .map(|entry| entry.cum_doses_by_vaccine.clone())
            .ok_or(SimulationError::MissingHistory(delivered_through))?;

        // A negative initial stock only means doses were administered
        // faster than the delivery delay allows; that offset persists, so
        // it is clamped away.
        let mut stockpile = if self.params.consider_stock_pile {
            cum_delivered.sub(&cum_doses_by_vaccine)
        } else {
            VaccineLedger::new()
        };
        stockpile = stockpile.clamp_min(0.0);
        log::info!("initial stockpile: {stockpile:?}");

        let mut waiting = SecondDoseWaitingList::new();
        seed_waiting_list(
            &mut waiting,
            before,
            weekly_vaccinations,
            self.start_week,
            &usage,
            &self.params,
        );

        let mut results = SimulationResults::default();
        let mut week = self.start_week;
        while week < self.end_week {
            let delivery_week = week.weeks_before(i64::from(self.delivery_delay_weeks));
            let Some(delayed_delivery) = scenario.get(&delivery_week) else {
                self.skip_week_without_delivery(delivery_week);
                week = week.next();
                continue;
            };

            stockpile = stockpile.add(&delayed_delivery.doses_by_vaccine);

            // second doses first, bounded per vaccine by what is on stock;
            // the shortfall defers to next week instead of vanishing
            let due = waiting.pop_due();
            let given_second = stockpile.min_with(&due);
            waiting.defer(&due.sub(&given_second));
            stockpile = stockpile.sub(&given_second);

            let mut available_people = available_first_dose_pool(
                &self.params,
                population_total,
                contraindicated,
                hesitant_share,
                cum_partially_immunized,
            );

            let mut available_stock = stockpile.clone();
            if self.params.keep_second_doses_back > 0.0 {
                let reserve = self.params.keep_second_doses_back;
                available_stock = available_stock.sub(&waiting.pending().scale(reserve));
                // only hand out what keeps the reserve intact after this week
                available_stock = available_stock.scale(1.0 - reserve / 2.0);
            }

            // first doses in fixed priority order; every vaccine sees the
            // pool remaining after the ones before it
            let mut given_first = VaccineLedger::new();
            for name in usage.priority_list() {
                if available_stock.contains(name) && self.params.vaccine_enabled(name) {
                    let shots = available_stock.get(name).min(available_people).max(0.0);
                    given_first.set(name, shots);
                    available_people -= shots;
                }
            }
            stockpile = stockpile.sub(&given_first);

            let mut partially_immunized = 0.0;
            let mut fully_immunized = given_second.total();

            for (name, &count) in given_first.iter() {
                partially_immunized += count;
                let interval = usage.interval_weeks(week, name);
                if interval > 0 {
                    // slot [0] is next week, so due-in-n-weeks is slot n-1
                    let offset = (interval + self.params.extra_interval_weeks - 1) as usize;
                    waiting.schedule(offset, name, count);
                } else {
                    // single-dose vaccine: recipients complete immediately
                    fully_immunized += count;
                }
            }

            let doses_by_vaccine = given_first.add(&given_second);
            let doses = doses_by_vaccine.total();
            cum_doses_by_vaccine = cum_doses_by_vaccine.add(&doses_by_vaccine);
            cum_first_doses_by_vaccine = cum_first_doses_by_vaccine.add(&given_first);
            cum_partially_immunized += partially_immunized;
            cum_fully_immunized += fully_immunized;
            cum_doses += doses;

            results.weekly.insert(
                week,
                VaccinationWeek {
                    doses,
                    partially_immunized,
                    fully_immunized,
                    cum_doses,
                    cum_partially_immunized,
                    cum_fully_immunized,
                    doses_by_vaccine,
                    cum_doses_by_vaccine: cum_doses_by_vaccine.clone(),
                    first_doses_by_vaccine: given_first,
                    cum_first_doses_by_vaccine: cum_first_doses_by_vaccine.clone(),
                    stockpile: stockpile.clone(),
                },
            );

            week = week.next();
        }

        self.partitionings = partitionings;
        log::info!("simulation finished with {} weeks", results.weekly.len());
        Ok(results)
    }

    /// Build the converted weekly series that are still missing and drop
    /// the planned-delivery cache when the scenario parameter changed.
    fn ensure_weekly_data(&mut self) -> Result<()> {
        if !self.data.all_loaded() {
            return Err(SimulationError::DataNotReady("historical datasets"));
        }
        if self.weekly_vaccinations.is_none() {
            self.weekly_vaccinations = Some(aggregate_vaccinations(self.data.vaccinations()?));
        }
        if self.weekly_deliveries.is_none() {
            self.weekly_deliveries = Some(aggregate_deliveries(self.data.deliveries()?));
        }
        let scenario_changed =
            self.cached_scenario.as_deref() != Some(self.params.delivery_scenario.as_str());
        if self.planned_deliveries.is_none() || scenario_changed {
            self.planned_deliveries = Some(extract_scenario_deliveries(
                self.data.scenario_rows()?,
                &self.params.delivery_scenario,
                self.start_week.year(),
            ));
            self.cached_scenario = Some(self.params.delivery_scenario.clone());
        }
        Ok(())
    }

    /// Merge historical and planned deliveries, then apply the delivery
    /// parameters: disabled vaccines deliver nothing, unknown vaccines are
    /// dropped with a warning, and everything scales by the amount factor.
    fn adjusted_scenario_deliveries(&self) -> Result<WeeklyDeliveryData> {
        let historical = self
            .weekly_deliveries
            .as_ref()
            .ok_or(SimulationError::DataNotReady("weekly deliveries"))?;
        let planned = self
            .planned_deliveries
            .as_ref()
            .ok_or(SimulationError::DataNotReady("planned deliveries"))?;
        let mut scenario = merge_delivery_scenario(historical, planned);

        let mut week = self.start_week;
        while week < self.end_week {
            if let Some(entry) = scenario.get_mut(&week) {
                let mut adjusted = VaccineLedger::new();
                for (name, &amount) in entry.doses_by_vaccine.iter() {
                    if !self.params.vaccine_known(name) {
                        log::warn!("unknown vaccine in delivery plan, ignoring: {name}");
                        continue;
                    }
                    let amount = if self.params.vaccine_enabled(name) {
                        amount
                    } else {
                        0.0
                    };
                    adjusted.set(name, amount * self.params.delivery_amount_factor);
                }
                entry.doses_by_vaccine = adjusted;
            }
            week = week.next();
        }
        recalculate_cumulative_deliveries(&mut scenario);
        Ok(scenario)
    }

    /// The base partitioning (exclusions per the active parameters) and
    /// the named display partitionings derived from it.
    fn compute_partitionings(&self) -> Result<Vec<NamedPartitioning>> {
        let population = self.data.population()?;

        let mut base = Vec::new();
        if self.params.consider_contraindicated {
            base.push(PopulationPartition::new(
                "contraindicated",
                "Contraindicated",
                self.contraindicated_count()?,
            ));
        }
        if self.params.consider_not_willing {
            let rest = remaining_pool(population.total, &base);
            base.push(PopulationPartition::new(
                "unwilling",
                "Unwilling",
                (rest * (1.0 - self.params.fraction_willing)).floor(),
            ));
        }

        let willingness = WillingnessPartitioner::new(self.data.willingness()?, population);
        let priorities = self.data.priorities()?;
        let decree = priorities
            .schemes
            .get(SCHEME_DECREE)
            .cloned()
            .unwrap_or_default();
        let rki = priorities
            .schemes
            .get(SCHEME_RKI)
            .cloned()
            .unwrap_or_default();

        Ok(vec![
            NamedPartitioning {
                id: "willingness",
                title: "Vaccination willingness (surveyed)",
                partitions: willingness.add_partitions(base.clone()),
            },
            NamedPartitioning {
                id: "priorities_decree",
                title: "Priority groups by decree (estimated)",
                partitions: DecreePriorityPartitioner::new(&decree, population)
                    .add_partitions(base.clone()),
            },
            NamedPartitioning {
                id: "priorities_rki",
                title: "Priority groups by RKI (estimated)",
                partitions: RkiPriorityPartitioner::new(&rki, population)
                    .add_partitions(base.clone()),
            },
            NamedPartitioning {
                id: "age",
                title: "Population by age",
                partitions: AgePartitioner::new(population).add_partitions(base),
            },
        ])
    }

    /// People below the contraindication age threshold.
    fn contraindicated_count(&self) -> Result<f64> {
        let population = self.data.population()?;
        Ok(population
            .by_age
            .iter()
            .filter(|&(&age, _)| age < self.params.contraindication_age)
            .map(|(_, &count)| count)
            .sum())
    }

    /// Policy hook for a missing delayed-delivery week: log and skip the
    /// week. Deliveries are sparse in some historical stretches; treating
    /// a gap as "nothing to administer" keeps the projection going.
    fn skip_week_without_delivery(&self, delivery_week: CalendarWeek) {
        warn_week("no delivery data, skipping simulation week", delivery_week);
    }
}

/// People reachable for a first dose this week.
fn available_first_dose_pool(
    params: &SimulationParameters,
    population_total: f64,
    contraindicated: f64,
    hesitant_share: f64,
    cum_partially_immunized: f64,
) -> f64 {
    let mut available = population_total;
    if params.consider_contraindicated {
        available -= contraindicated;
    }
    if params.consider_not_willing {
        available *= params.fraction_willing;
    }
    if params.consider_hesitating {
        let hesitating = (available * hesitant_share).floor();
        let pool = available - cum_partially_immunized;
        available = (pool - hesitating).max(0.0);
        if hesitating > 0.0 {
            // the hesitant tail empties with linearly decreasing weekly
            // uptake between the max and min rates, so vaccinations slow
            // down instead of stopping at a hard cutoff
            let reachable = pool.min(hesitating);
            let fill = reachable / hesitating;
            available += (reachable
                * (fill * (HESITANT_MAX_UPTAKE - HESITANT_MIN_UPTAKE) / 2.0 + HESITANT_MIN_UPTAKE))
                .floor();
        }
    } else {
        available -= cum_partially_immunized;
    }
    available
}

/// Distribute the historical second-dose backlog onto the waiting list.
///
/// History does not record which vaccine each partially immunized person
/// received, so the backlog is attributed by walking each vaccine's
/// first-dose history backward through its interval. Whatever the lookback
/// cannot attribute is lump-deposited into the next-week slot.
fn seed_waiting_list(
    waiting: &mut SecondDoseWaitingList,
    before: &VaccinationWeek,
    weekly_vaccinations: &WeeklyVaccinationData,
    start_week: CalendarWeek,
    usage: &VaccineUsage,
    params: &SimulationParameters,
) {
    let mut pending = before.cum_partially_immunized - before.cum_fully_immunized;
    log::info!("{pending} people still waiting for their second dose");

    let names: Vec<String> = before
        .cum_doses_by_vaccine
        .names()
        .map(str::to_string)
        .collect();

    let mut offset = 0;
    while pending > 0.0 && offset < SEED_LOOKBACK_WEEKS {
        for name in &names {
            let interval = usage.interval_weeks(start_week, name);
            if interval > 0 && interval > offset {
                // the week this cohort would have received its first dose
                let first_dose_week = start_week.weeks_before(i64::from(interval - offset));
                if let Some(that_week) = weekly_vaccinations.get(&first_dose_week) {
                    let first_doses = that_week.first_doses_by_vaccine.get(name).max(0.0);
                    let people = pending.min(first_doses);
                    waiting.schedule(offset as usize, name, people);
                    pending -= people;
                }
            }
        }
        offset += 1;
    }

    if pending > 0.0 {
        warn_week("second-dose backlog exceeds the attribution lookback", start_week);
        lump_deposit(waiting, &names, pending);
    }

    if !params.extra_interval_weeks_only_future {
        waiting.delay_all(params.extra_interval_weeks);
    }
}

/// Spread an unattributable backlog evenly over the next-week slot.
fn lump_deposit(waiting: &mut SecondDoseWaitingList, fallback_names: &[String], mut pending: f64) {
    let slot = waiting.slot(0);
    let names: Vec<String> = if slot.is_empty() {
        fallback_names.to_vec()
    } else {
        slot.names().map(str::to_string).collect()
    };
    if names.is_empty() {
        log::warn!("no vaccine to attribute {pending} pending second doses to");
        return;
    }

    let share = (pending / names.len() as f64).ceil();
    for name in &names {
        let people = pending.min(share);
        waiting.schedule(0, name, people);
        pending -= people;
        if pending <= 0.0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weekly::WeeklyVaccinationData;

    fn params() -> SimulationParameters {
        SimulationParameters {
            consider_contraindicated: false,
            consider_not_willing: false,
            consider_hesitating: false,
            ..SimulationParameters::default()
        }
    }

    #[test]
    fn first_dose_pool_subtracts_the_already_vaccinated() {
        let pool = available_first_dose_pool(&params(), 1000.0, 0.0, 0.0, 300.0);
        assert_eq!(pool, 700.0);
    }

    #[test]
    fn first_dose_pool_applies_exclusions_in_order() {
        let mut params = params();
        params.consider_contraindicated = true;
        params.consider_not_willing = true;
        params.fraction_willing = 0.8;
        // (1000 - 100) * 0.8 - 100 = 620
        let pool = available_first_dose_pool(&params, 1000.0, 100.0, 0.0, 100.0);
        assert_eq!(pool, 620.0);
    }

    #[test]
    fn hesitant_pool_contributes_a_diminishing_tail() {
        let mut params = params();
        params.consider_hesitating = true;
        // hesitating = 20; pool = 90; core = 70; tail = floor(20 * 0.3) = 6
        let pool = available_first_dose_pool(&params, 100.0, 0.0, 0.2, 10.0);
        assert_eq!(pool, 76.0);
    }

    #[test]
    fn an_empty_hesitant_pool_contributes_nothing() {
        let mut params = params();
        params.consider_hesitating = true;
        let pool = available_first_dose_pool(&params, 100.0, 0.0, 0.0, 10.0);
        assert_eq!(pool, 90.0);
    }

    #[test]
    fn seeding_places_the_backlog_at_the_right_offset() {
        let start = CalendarWeek::new(2021, 10);
        let usage = VaccineUsage::default();

        let mut history = WeeklyVaccinationData::new();
        let mut before = VaccinationWeek::default();
        before.cum_partially_immunized = 10.0;
        before.cum_fully_immunized = 0.0;
        before.cum_doses_by_vaccine.set("biontech", 10.0);
        before.first_doses_by_vaccine.set("biontech", 10.0);
        history.insert(start.prev(), before.clone());

        let mut waiting = SecondDoseWaitingList::new();
        seed_waiting_list(&mut waiting, &before, &history, start, &usage, &params());

        // first doses one week ago with a six-week interval: due in five
        // more pops, i.e. slot 5
        assert_eq!(waiting.slot(5).get("biontech"), 10.0);
        assert_eq!(waiting.total(), 10.0);
    }

    #[test]
    fn unattributable_backlog_lands_in_the_next_slot() {
        let start = CalendarWeek::new(2021, 10);
        let usage = VaccineUsage::default();

        let mut before = VaccinationWeek::default();
        before.cum_partially_immunized = 50.0;
        before.cum_fully_immunized = 0.0;
        before.cum_doses_by_vaccine.set("biontech", 50.0);
        // no weekly first-dose history at all, nothing to attribute against
        let history = WeeklyVaccinationData::new();

        let mut waiting = SecondDoseWaitingList::new();
        seed_waiting_list(&mut waiting, &before, &history, start, &usage, &params());

        assert_eq!(waiting.slot(0).get("biontech"), 50.0);
        assert_eq!(waiting.total(), 50.0);
    }

    #[test]
    fn extra_interval_weeks_delay_the_seeded_backlog() {
        let start = CalendarWeek::new(2021, 10);
        let usage = VaccineUsage::default();

        let mut history = WeeklyVaccinationData::new();
        let mut before = VaccinationWeek::default();
        before.cum_partially_immunized = 10.0;
        before.cum_doses_by_vaccine.set("biontech", 10.0);
        before.first_doses_by_vaccine.set("biontech", 10.0);
        history.insert(start.prev(), before.clone());

        let mut delayed_params = params();
        delayed_params.extra_interval_weeks = 2;
        let mut waiting = SecondDoseWaitingList::new();
        seed_waiting_list(&mut waiting, &before, &history, start, &usage, &delayed_params);
        assert_eq!(waiting.slot(7).get("biontech"), 10.0);

        let mut future_only = params();
        future_only.extra_interval_weeks = 2;
        future_only.extra_interval_weeks_only_future = true;
        let mut waiting = SecondDoseWaitingList::new();
        seed_waiting_list(&mut waiting, &before, &history, start, &usage, &future_only);
        assert_eq!(waiting.slot(5).get("biontech"), 10.0);
    }
}
