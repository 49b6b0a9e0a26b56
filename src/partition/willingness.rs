//! Willingness-survey-driven partitioning.

use crate::models::raw::{PopulationData, WillingnessSurveyData};

use super::{PartitionPolicy, PopulationPartition, remaining_pool};

/// Partitions the population by vaccination willingness, using the latest
/// available 7-point survey. Scale points 1 and 2 count as unwilling,
/// 3 and 4 as hesitant, 5 and 6 as moderately willing and 7 as willing.
#[derive(Debug)]
pub struct WillingnessPartitioner<'a> {
    survey: &'a WillingnessSurveyData,
    population: &'a PopulationData,
}

impl<'a> WillingnessPartitioner<'a> {
    #[must_use]
    pub fn new(survey: &'a WillingnessSurveyData, population: &'a PopulationData) -> Self {
        Self { survey, population }
    }

    fn points(&self, points: &[u8]) -> f64 {
        match self.survey.latest() {
            Some(survey) => points.iter().map(|point| survey.fraction(*point)).sum(),
            None => {
                log::warn!("no willingness survey loaded; assuming zero");
                0.0
            }
        }
    }

    /// Fraction of the population unwilling to be vaccinated.
    #[must_use]
    pub fn unwilling_fraction(&self) -> f64 {
        self.points(&[1, 2])
    }

    /// Fraction willing in principle but slow to act on it.
    #[must_use]
    pub fn hesitant_fraction(&self) -> f64 {
        self.points(&[3, 4])
    }

    /// Hesitant share of the non-unwilling pool.
    #[must_use]
    pub fn hesitant_share_of_willing(&self) -> f64 {
        self.hesitant_fraction() / (1.0 - self.unwilling_fraction())
    }

    /// Append the unwilling slice of the remaining pool.
    #[must_use]
    pub fn add_unwilling_partition(
        &self,
        mut partitions: Vec<PopulationPartition>,
    ) -> Vec<PopulationPartition> {
        let rest = remaining_pool(self.population.total, &partitions);
        partitions.push(PopulationPartition::new(
            "unwilling",
            "Unwilling (1,2)",
            rest * self.unwilling_fraction(),
        ));
        partitions
    }
}

impl PartitionPolicy for WillingnessPartitioner<'_> {
    /// Appends the hesitant, moderately-willing and willing tiers, each
    /// rescaled by 1/(1-unwilling) so the tiers partition the non-unwilling
    /// pool exactly.
    fn add_partitions(&self, mut partitions: Vec<PopulationPartition>) -> Vec<PopulationPartition> {
        let rest = remaining_pool(self.population.total, &partitions);
        let factor = 1.0 / (1.0 - self.unwilling_fraction());

        partitions.push(PopulationPartition::new(
            "hesitant",
            "Rather hesitant (3,4)",
            rest * self.points(&[3, 4]) * factor,
        ));
        partitions.push(PopulationPartition::new(
            "moderately_willing",
            "Rather willing (5,6)",
            rest * self.points(&[5, 6]) * factor,
        ));
        partitions.push(PopulationPartition::new(
            "willing",
            "Willing (7)",
            rest * self.points(&[7]) * factor,
        ));
        partitions
    }
}
