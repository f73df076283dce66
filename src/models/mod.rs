mod species;
mod stand;
mod policy;
mod growth_params;
mod trajectory;

pub use species::Species;
pub use stand::Stand;
pub use policy::Policy;
pub use growth_params::GrowthParameters;
pub use trajectory::{EstimationPoint, SummaryRecord, Trajectory, TrajectoryPoint};
