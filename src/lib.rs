//! Stand-level forest rotation simulator.
//!
//! A seeded forest of pine and eucalyptus stands is simulated under every
//! applicable harvest-age policy, producing per-year biomass trajectories,
//! per-combination summaries, a final-biomass index and a pooled
//! `(age, biomass, species)` dataset for growth-curve estimation.
//!
//! ```
//! use forest_rotation_simulator::{GrowthModel, Species};
//!
//! let model = GrowthModel::default();
//! let young = model.biomass(Species::Eucalyptus, 3.0).unwrap();
//! let older = model.biomass(Species::Eucalyptus, 8.0).unwrap();
//! assert!(older > young);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod simulation;
pub mod visualization;

pub use analysis::{compare_strategies, ResultsAnalyzer, Strategy};
pub use config::{ExecutionStrategy, SimulationConfig};
pub use error::SimulationError;
pub use io::ResultsWriter;
pub use models::{Policy, Species, Stand, Trajectory};
pub use simulation::{
    simulate, CancellationToken, GrowthModel, PolicyExhaustion, SimulationDriver,
    SimulationResults,
};
