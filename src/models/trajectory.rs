use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Policy, Species};

/// Biomass of one stand under one policy in a single simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub stand_id: u32,
    pub species: Species,
    /// Shared by every point of a trajectory
    pub policy: Arc<Policy>,
    /// Simulated year, `0..=horizon`
    pub year: u32,
    /// Years since the current rotation was planted
    pub age: u32,
    /// Standing biomass (tons/ha); pre-harvest value in a harvest year
    pub biomass: f64,
    /// True when the stand is harvested at the end of this year
    pub harvested: bool,
}

/// Year-by-year trajectory of one (stand, policy) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub stand_id: u32,
    pub species: Species,
    pub policy: Policy,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Number of harvest events recorded over the horizon.
    pub fn rotations(&self) -> usize {
        self.points.iter().filter(|p| p.harvested).count()
    }

    /// Biomass of the last simulated year.
    pub fn final_biomass(&self) -> Option<f64> {
        self.points.last().map(|p| p.biomass)
    }

    /// Years at which a harvest was recorded.
    pub fn harvest_years(&self) -> Vec<u32> {
        self.points
            .iter()
            .filter(|p| p.harvested)
            .map(|p| p.year)
            .collect()
    }

    /// Largest biomass reached at any point of the trajectory.
    pub fn peak_biomass(&self) -> f64 {
        self.points.iter().map(|p| p.biomass).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Per-combination summary derived from a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub stand_id: u32,
    pub species: Species,
    pub policy: Policy,
    pub number_of_rotations: usize,
    pub final_biomass: f64,
}

/// One pooled `(age, biomass, species)` observation for growth-curve fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationPoint {
    pub age: u32,
    pub biomass: f64,
    pub species: Species,
}
