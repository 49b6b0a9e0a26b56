//! Priority-group partitioning.
//!
//! Two prioritizations of the same shape exist: the tiers laid down by the
//! vaccination decree and the tiers estimated by the RKI recommendation.
//! Both consume the remaining pool tier by tier in priority order and
//! close with a residual "rest" partition.

use crate::models::raw::{PopulationData, PriorityGroupScheme};

use super::{PartitionPolicy, PopulationPartition, remaining_pool};

fn add_tiered_partitions(
    scheme: &PriorityGroupScheme,
    population: &PopulationData,
    mut partitions: Vec<PopulationPartition>,
) -> Vec<PopulationPartition> {
    let mut rest = remaining_pool(population.total, &partitions);
    for group in &scheme.groups {
        let size = group.size.min(rest).max(0.0);
        partitions.push(PopulationPartition::new(
            group.id.clone(),
            group.label.clone(),
            size,
        ));
        rest -= size;
    }
    partitions.push(PopulationPartition::new("rest", "Rest", rest.max(0.0)));
    partitions
}

/// Priority tiers as laid down by the vaccination decree.
#[derive(Debug)]
pub struct DecreePriorityPartitioner<'a> {
    scheme: &'a PriorityGroupScheme,
    population: &'a PopulationData,
}

impl<'a> DecreePriorityPartitioner<'a> {
    #[must_use]
    pub fn new(scheme: &'a PriorityGroupScheme, population: &'a PopulationData) -> Self {
        Self { scheme, population }
    }
}

impl PartitionPolicy for DecreePriorityPartitioner<'_> {
    fn add_partitions(&self, partitions: Vec<PopulationPartition>) -> Vec<PopulationPartition> {
        add_tiered_partitions(self.scheme, self.population, partitions)
    }
}

/// Priority tiers as estimated by the RKI recommendation.
#[derive(Debug)]
pub struct RkiPriorityPartitioner<'a> {
    scheme: &'a PriorityGroupScheme,
    population: &'a PopulationData,
}

impl<'a> RkiPriorityPartitioner<'a> {
    #[must_use]
    pub fn new(scheme: &'a PriorityGroupScheme, population: &'a PopulationData) -> Self {
        Self { scheme, population }
    }
}

impl PartitionPolicy for RkiPriorityPartitioner<'_> {
    fn add_partitions(&self, partitions: Vec<PopulationPartition>) -> Vec<PopulationPartition> {
        add_tiered_partitions(self.scheme, self.population, partitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raw::PriorityGroup;

    fn scheme(groups: &[(&str, f64)]) -> PriorityGroupScheme {
        PriorityGroupScheme {
            groups: groups
                .iter()
                .map(|(id, size)| PriorityGroup {
                    id: (*id).to_string(),
                    label: (*id).to_string(),
                    size: *size,
                })
                .collect(),
        }
    }

    fn population(total: f64) -> PopulationData {
        PopulationData {
            total,
            ..PopulationData::default()
        }
    }

    #[test]
    fn tiers_consume_the_pool_in_priority_order() {
        let scheme = scheme(&[("prio1", 300.0), ("prio2", 500.0), ("prio3", 400.0)]);
        let population = population(1000.0);
        let partitioner = DecreePriorityPartitioner::new(&scheme, &population);

        let partitions = partitioner.add_partitions(Vec::new());
        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions[0].size, 300.0);
        assert_eq!(partitions[1].size, 500.0);
        // the last tier is capped at what is left
        assert_eq!(partitions[2].size, 200.0);
        assert_eq!(partitions[3].id, "rest");
        assert_eq!(partitions[3].size, 0.0);

        let total: f64 = partitions.iter().map(|p| p.size).sum();
        assert_eq!(total, 1000.0);
    }

    #[test]
    fn earlier_partitions_shrink_the_pool() {
        let scheme = scheme(&[("prio1", 300.0)]);
        let population = population(1000.0);
        let partitioner = RkiPriorityPartitioner::new(&scheme, &population);

        let base = vec![PopulationPartition::new("unwilling", "Unwilling", 800.0)];
        let partitions = partitioner.add_partitions(base);
        assert_eq!(partitions[1].size, 200.0);
        assert_eq!(partitions[2].size, 0.0);
    }
}
