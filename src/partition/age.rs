//! Age-band partitioning.

use std::collections::BTreeMap;

use crate::models::raw::PopulationData;

use super::{PartitionPolicy, PopulationPartition, remaining_pool};

/// Width of one age band in years.
const BAND_WIDTH: u32 = 10;

/// Buckets the population into 10-year age bands, oldest first.
///
/// Each band is scaled by a uniform willingness factor, the share of the
/// total population still in the remaining pool, as an approximation of
/// how the already-excluded groups spread across ages.
#[derive(Debug)]
pub struct AgePartitioner<'a> {
    population: &'a PopulationData,
}

impl<'a> AgePartitioner<'a> {
    #[must_use]
    pub fn new(population: &'a PopulationData) -> Self {
        Self { population }
    }

    fn bands(&self) -> BTreeMap<u32, f64> {
        let mut bands = BTreeMap::new();
        for (&age, &count) in &self.population.by_age {
            *bands.entry(age / BAND_WIDTH * BAND_WIDTH).or_insert(0.0) += count;
        }
        bands
    }
}

impl PartitionPolicy for AgePartitioner<'_> {
    fn add_partitions(&self, mut partitions: Vec<PopulationPartition>) -> Vec<PopulationPartition> {
        let total = self.population.total;
        let mut rest = remaining_pool(total, &partitions);
        let willingness_factor = if total > 0.0 {
            (rest / total).max(0.0)
        } else {
            0.0
        };

        let bands = self.bands();
        for (&band, &count) in bands.iter().rev() {
            let size = (count * willingness_factor).min(rest).max(0.0);
            partitions.push(PopulationPartition::new(
                format!("age_{band}"),
                format!("Age {band}-{}", band + BAND_WIDTH - 1),
                size,
            ));
            rest -= size;
        }
        partitions
    }
}
