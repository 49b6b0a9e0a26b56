//! Population partitioning policies.
//!
//! A partitioning is an ordered list of named, sized slices of the total
//! population. Policies append their partitions onto whatever the caller
//! has already allocated and size themselves against the remaining pool,
//! so the order in which policies are applied changes the result.

mod age;
mod priority;
mod willingness;

pub use age::AgePartitioner;
pub use priority::{DecreePriorityPartitioner, RkiPriorityPartitioner};
pub use willingness::WillingnessPartitioner;

/// One named slice of the population.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationPartition {
    pub id: String,
    /// Human-readable label for the chart layer
    pub label: String,
    pub size: f64,
}

impl PopulationPartition {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, size: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size,
        }
    }
}

/// Population not yet covered by the accumulated partitions.
#[must_use]
pub fn remaining_pool(total: f64, partitions: &[PopulationPartition]) -> f64 {
    total - partitions.iter().map(|p| p.size).sum::<f64>()
}

/// A policy that appends derived partitions onto an accumulator.
pub trait PartitionPolicy {
    /// Append this policy's partitions, sized against the population left
    /// over by `partitions`.
    fn add_partitions(&self, partitions: Vec<PopulationPartition>) -> Vec<PopulationPartition>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_pool_subtracts_allocated_sizes() {
        let partitions = vec![
            PopulationPartition::new("a", "A", 100.0),
            PopulationPartition::new("b", "B", 250.0),
        ];
        assert_eq!(remaining_pool(1000.0, &partitions), 650.0);
        assert_eq!(remaining_pool(1000.0, &[]), 1000.0);
    }
}
