//! Aggregation of raw daily records into weekly series.
//!
//! Historical feeds are daily; the simulation thinks in calendar weeks.
//! All passes assume records sorted by date ascending, which is how the
//! loading layer hands them over. Inconsistencies in the source data are
//! logged and defended against, never fatal.

use crate::models::VaccineLedger;
use crate::models::raw::{
    AGGREGATE_REGION, DailyDeliveryRecord, DailyVaccinationRecord, ScenarioPlanRow,
};
use crate::models::vaccine::normalize_vaccine_name;
use crate::models::weekly::{
    DeliveryWeek, VaccinationWeek, WeeklyDeliveryData, WeeklyVaccinationData,
};
use crate::utils::calendar::CalendarWeek;
use crate::utils::logging::warn_week;

/// Tolerance for "these dose counts should match" checks on whole-valued
/// source numbers.
const COUNT_EPSILON: f64 = 0.5;

/// Recompute the cumulative ledgers of a delivery series in place.
///
/// An explicit ascending pass rather than incremental bookkeeping: merging
/// historical and planned data inserts weeks out of original insertion
/// order, which invalidates previously accumulated totals.
pub fn recalculate_cumulative_deliveries(weekly: &mut WeeklyDeliveryData) {
    let mut running = VaccineLedger::new();
    for entry in weekly.values_mut() {
        running = running.add(&entry.doses_by_vaccine);
        entry.cum_doses_by_vaccine = running.clone();
    }
}

/// Aggregate daily delivery records into per-week, per-vaccine ledgers.
pub fn aggregate_deliveries(deliveries: &[DailyDeliveryRecord]) -> WeeklyDeliveryData {
    let mut weekly = WeeklyDeliveryData::new();
    for delivery in deliveries {
        let week = CalendarWeek::from_date(delivery.date);
        let name = normalize_vaccine_name(&delivery.vaccine);
        weekly
            .entry(week)
            .or_default()
            .doses_by_vaccine
            .add_to(&name, delivery.doses);
    }
    recalculate_cumulative_deliveries(&mut weekly);
    log::info!(
        "aggregated {} delivery records into {} weeks",
        deliveries.len(),
        weekly.len()
    );
    weekly
}

/// Aggregate the daily vaccination series into weekly records.
///
/// Cumulative fields within a week are folded with `max()`, which defends
/// against occasionally non-monotonic source data. Incremental fields are
/// finalized as the difference of consecutive cumulative fields once the
/// following week begins, and once more for the trailing week.
pub fn aggregate_vaccinations(records: &[DailyVaccinationRecord]) -> WeeklyVaccinationData {
    let mut weekly = WeeklyVaccinationData::new();
    let mut last: Option<VaccinationWeek> = None;
    let mut curr = VaccinationWeek::default();
    let mut curr_key: Option<CalendarWeek> = None;
    let mut week_first_doses = 0.0;
    let mut week_second_doses = 0.0;

    for day in records {
        let week = CalendarWeek::from_date(day.date);

        if curr_key != Some(week) {
            if let Some(key) = curr_key {
                finalize_week(&mut curr, last.as_ref(), week_first_doses, week_second_doses, key);
                weekly.insert(key, curr.clone());
                last = Some(curr.clone());
            }
            curr = carry_forward(last.as_ref());
            week_first_doses = 0.0;
            week_second_doses = 0.0;
            curr_key = Some(week);
        }

        curr.cum_doses = curr.cum_doses.max(day.cum_doses);
        curr.cum_partially_immunized = curr
            .cum_partially_immunized
            .max(day.cum_partially_immunized);
        curr.cum_fully_immunized = curr.cum_fully_immunized.max(day.cum_fully_immunized);
        for (name, &doses) in &day.cum_doses_by_vaccine {
            curr.cum_doses_by_vaccine
                .set(normalize_vaccine_name(name), doses);
        }
        for (name, &doses) in &day.cum_first_doses_by_vaccine {
            curr.cum_first_doses_by_vaccine
                .set(normalize_vaccine_name(name), doses);
        }

        week_first_doses += day.daily_first_doses;
        week_second_doses += day.daily_second_doses;
        if (day.daily_first_doses + day.daily_second_doses - day.daily_doses).abs() > COUNT_EPSILON
        {
            log::warn!("daily dose split does not add up on {}", day.date);
        }
    }

    if let Some(key) = curr_key {
        finalize_week(&mut curr, last.as_ref(), week_first_doses, week_second_doses, key);
        weekly.insert(key, curr);
    }

    log::info!(
        "aggregated {} vaccination days into {} weeks",
        records.len(),
        weekly.len()
    );
    weekly
}

/// Start a fresh week record from the cumulative state of the previous one.
fn carry_forward(last: Option<&VaccinationWeek>) -> VaccinationWeek {
    match last {
        Some(prev) => VaccinationWeek {
            cum_doses: prev.cum_doses,
            cum_partially_immunized: prev.cum_partially_immunized,
            cum_fully_immunized: prev.cum_fully_immunized,
            cum_doses_by_vaccine: prev.cum_doses_by_vaccine.clone(),
            cum_first_doses_by_vaccine: prev.cum_first_doses_by_vaccine.clone(),
            ..VaccinationWeek::default()
        },
        None => VaccinationWeek::default(),
    }
}

/// Derive the weekly incremental fields of a finished week and run the
/// per-week consistency checks.
fn finalize_week(
    curr: &mut VaccinationWeek,
    last: Option<&VaccinationWeek>,
    week_first_doses: f64,
    week_second_doses: f64,
    week: CalendarWeek,
) {
    if let Some(prev) = last {
        curr.doses = curr.cum_doses - prev.cum_doses;
        curr.partially_immunized = curr.cum_partially_immunized - prev.cum_partially_immunized;
        curr.fully_immunized = curr.cum_fully_immunized - prev.cum_fully_immunized;
        curr.doses_by_vaccine = curr.cum_doses_by_vaccine.sub(&prev.cum_doses_by_vaccine);
        curr.first_doses_by_vaccine = curr
            .cum_first_doses_by_vaccine
            .sub(&prev.cum_first_doses_by_vaccine);
    } else {
        // the first observed week diffs against nothing
        curr.doses = curr.cum_doses;
        curr.partially_immunized = curr.cum_partially_immunized;
        curr.fully_immunized = curr.cum_fully_immunized;
        curr.doses_by_vaccine = curr.cum_doses_by_vaccine.clone();
        curr.first_doses_by_vaccine = curr.cum_first_doses_by_vaccine.clone();
    }

    if (week_first_doses + week_second_doses - curr.doses).abs() > COUNT_EPSILON {
        warn_week("weekly dose split does not match the cumulative difference", week);
    }
    if (week_second_doses - (curr.doses - curr.partially_immunized)).abs() > COUNT_EPSILON {
        warn_week("weekly second doses do not match the immunization deltas", week);
    }
}

/// Extract one named scenario's planned deliveries.
///
/// Only rows for the nationwide aggregate region are used; week numbers in
/// the planning table are bare and resolve against `plan_year`.
pub fn extract_scenario_deliveries(
    rows: &[ScenarioPlanRow],
    scenario: &str,
    plan_year: i32,
) -> WeeklyDeliveryData {
    let mut weekly = WeeklyDeliveryData::new();
    for row in rows {
        if row.scenario != scenario || row.region != AGGREGATE_REGION {
            continue;
        }
        let week = CalendarWeek::new(plan_year, row.week);
        let name = normalize_vaccine_name(&row.manufacturer);
        weekly
            .entry(week)
            .or_default()
            .doses_by_vaccine
            .add_to(&name, row.doses);
    }
    recalculate_cumulative_deliveries(&mut weekly);
    weekly
}

/// Merge historical deliveries with a planned scenario.
///
/// Weeks present in both keep the historical entry; planned data only
/// fills gaps, typically future weeks without observed deliveries yet.
pub fn merge_delivery_scenario(
    historical: &WeeklyDeliveryData,
    planned: &WeeklyDeliveryData,
) -> WeeklyDeliveryData {
    let mut merged = historical.clone();
    for (week, entry) in planned {
        merged.entry(*week).or_insert_with(|| entry.clone());
    }
    recalculate_cumulative_deliveries(&mut merged);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn delivery(date_: NaiveDate, vaccine: &str, doses: f64) -> DailyDeliveryRecord {
        DailyDeliveryRecord {
            date: date_,
            doses,
            vaccine: vaccine.to_string(),
            region: "DE-BUND".to_string(),
        }
    }

    fn vaccination_day(
        date_: NaiveDate,
        cum_doses: f64,
        cum_partial: f64,
        cum_full: f64,
        daily: (f64, f64, f64),
        by_vaccine: &[(&str, f64)],
        first_by_vaccine: &[(&str, f64)],
    ) -> DailyVaccinationRecord {
        let to_map = |pairs: &[(&str, f64)]| -> BTreeMap<String, f64> {
            pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect()
        };
        DailyVaccinationRecord {
            date: date_,
            cum_doses,
            cum_partially_immunized: cum_partial,
            cum_fully_immunized: cum_full,
            daily_doses: daily.0,
            daily_first_doses: daily.1,
            daily_second_doses: daily.2,
            cum_doses_by_vaccine: to_map(by_vaccine),
            cum_first_doses_by_vaccine: to_map(first_by_vaccine),
        }
    }

    #[test]
    fn deliveries_group_by_week_and_normalized_name() {
        // week 2021/01 runs Jan 4 through Jan 10
        let deliveries = vec![
            delivery(date(2021, 1, 4), "comirnaty", 100.0),
            delivery(date(2021, 1, 6), "BNT/Pfizer", 50.0),
            delivery(date(2021, 1, 11), "astra", 30.0),
        ];
        let weekly = aggregate_deliveries(&deliveries);

        assert_eq!(weekly.len(), 2);
        let week1 = &weekly[&CalendarWeek::new(2021, 1)];
        assert_eq!(week1.doses_by_vaccine.get("biontech"), 150.0);

        let week2 = &weekly[&CalendarWeek::new(2021, 2)];
        assert_eq!(week2.doses_by_vaccine.get("az"), 30.0);
        // cumulative carries the earlier week forward
        assert_eq!(week2.cum_doses_by_vaccine.get("biontech"), 150.0);
        assert_eq!(week2.cum_doses_by_vaccine.get("az"), 30.0);
    }

    #[test]
    fn vaccinations_aggregate_into_weekly_differences() {
        let days = vec![
            vaccination_day(
                date(2021, 1, 4),
                10.0,
                10.0,
                0.0,
                (10.0, 10.0, 0.0),
                &[("comirnaty", 10.0)],
                &[("comirnaty", 10.0)],
            ),
            vaccination_day(
                date(2021, 1, 7),
                25.0,
                20.0,
                5.0,
                (15.0, 10.0, 5.0),
                &[("comirnaty", 25.0)],
                &[("comirnaty", 20.0)],
            ),
            vaccination_day(
                date(2021, 1, 11),
                40.0,
                30.0,
                10.0,
                (15.0, 10.0, 5.0),
                &[("comirnaty", 40.0)],
                &[("comirnaty", 30.0)],
            ),
        ];
        let weekly = aggregate_vaccinations(&days);
        assert_eq!(weekly.len(), 2);

        let week1 = &weekly[&CalendarWeek::new(2021, 1)];
        assert_eq!(week1.cum_doses, 25.0);
        assert_eq!(week1.doses, 25.0);
        assert_eq!(week1.first_doses_by_vaccine.get("biontech"), 20.0);

        let week2 = &weekly[&CalendarWeek::new(2021, 2)];
        assert_eq!(week2.cum_doses, 40.0);
        assert_eq!(week2.doses, 15.0);
        assert_eq!(week2.partially_immunized, 10.0);
        assert_eq!(week2.fully_immunized, 5.0);
        assert_eq!(week2.doses_by_vaccine.get("biontech"), 15.0);
        assert_eq!(week2.first_doses_by_vaccine.get("biontech"), 10.0);
    }

    #[test]
    fn cumulative_fields_never_decrease() {
        // the second day dips below the first; max() keeps the high-water mark
        let days = vec![
            vaccination_day(
                date(2021, 1, 4),
                30.0,
                25.0,
                5.0,
                (30.0, 25.0, 5.0),
                &[],
                &[],
            ),
            vaccination_day(
                date(2021, 1, 5),
                28.0,
                24.0,
                4.0,
                (0.0, 0.0, 0.0),
                &[],
                &[],
            ),
            vaccination_day(
                date(2021, 1, 11),
                35.0,
                28.0,
                7.0,
                (5.0, 3.0, 2.0),
                &[],
                &[],
            ),
        ];
        let weekly = aggregate_vaccinations(&days);

        let mut prev: Option<&VaccinationWeek> = None;
        for week in weekly.values() {
            if let Some(prev) = prev {
                assert!(week.cum_doses >= prev.cum_doses);
                assert!(week.cum_partially_immunized >= prev.cum_partially_immunized);
                assert!(week.cum_fully_immunized >= prev.cum_fully_immunized);
            }
            prev = Some(week);
        }
        assert_eq!(weekly[&CalendarWeek::new(2021, 1)].cum_doses, 30.0);
    }

    #[test]
    fn scenario_extraction_filters_region_and_scenario() {
        let rows = vec![
            ScenarioPlanRow {
                region: AGGREGATE_REGION.to_string(),
                scenario: "base".to_string(),
                week: 12,
                manufacturer: "Moderna".to_string(),
                doses: 500.0,
            },
            ScenarioPlanRow {
                region: "BY".to_string(),
                scenario: "base".to_string(),
                week: 12,
                manufacturer: "Moderna".to_string(),
                doses: 100.0,
            },
            ScenarioPlanRow {
                region: AGGREGATE_REGION.to_string(),
                scenario: "optimistic".to_string(),
                week: 12,
                manufacturer: "Moderna".to_string(),
                doses: 900.0,
            },
        ];
        let weekly = extract_scenario_deliveries(&rows, "base", 2021);
        assert_eq!(weekly.len(), 1);
        assert_eq!(
            weekly[&CalendarWeek::new(2021, 12)]
                .doses_by_vaccine
                .get("moderna"),
            500.0
        );
    }

    #[test]
    fn merge_prefers_historical_weeks_over_planned() {
        let week = CalendarWeek::new(2021, 10);
        let later = CalendarWeek::new(2021, 11);

        let mut historical = WeeklyDeliveryData::new();
        historical
            .entry(week)
            .or_default()
            .doses_by_vaccine
            .add_to("biontech", 100.0);

        let mut planned = WeeklyDeliveryData::new();
        planned
            .entry(week)
            .or_default()
            .doses_by_vaccine
            .add_to("biontech", 999.0);
        planned
            .entry(later)
            .or_default()
            .doses_by_vaccine
            .add_to("biontech", 200.0);

        let merged = merge_delivery_scenario(&historical, &planned);
        // overlapping week keeps the historical figure
        assert_eq!(merged[&week].doses_by_vaccine.get("biontech"), 100.0);
        // planned data fills the gap and the cumulative spans both
        assert_eq!(merged[&later].doses_by_vaccine.get("biontech"), 200.0);
        assert_eq!(merged[&later].cum_doses_by_vaccine.get("biontech"), 300.0);
    }
}
