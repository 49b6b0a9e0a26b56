//! The simulation engine and its supporting state machinery.

pub mod data;
pub mod engine;
pub mod waiting_list;

pub use data::SimulationData;
pub use engine::{BasicSimulation, NamedPartitioning};
pub use waiting_list::SecondDoseWaitingList;
