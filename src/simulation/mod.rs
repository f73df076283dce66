//! The growth-policy simulation engine.
//!
//! Stands are generated once from a seed, every (stand, policy) pair is run
//! through the [`RotationScheduler`], and the trajectories are aggregated into
//! [`SimulationResults`].

mod growth;
mod generator;
mod scheduler;
mod driver;
mod aggregator;

pub use growth::GrowthModel;
pub use generator::{generate_stands, SpeciesMix};
pub use scheduler::{PolicyExhaustion, RotationScheduler};
pub use driver::{simulate, CancellationToken, SimulationDriver};
pub use aggregator::{aggregate, FinalBiomassEntry, FinalBiomassIndex, SimulationResults};
