use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::models::{EstimationPoint, Policy, Species, Stand, SummaryRecord, Trajectory};

/// One `(stand, policy) -> final biomass` entry, the serialized form of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalBiomassEntry {
    pub stand_id: u32,
    pub policy: Policy,
    pub final_biomass: f64,
}

/// Final biomass keyed by `(stand_id, policy)`, with exactly one entry per combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<FinalBiomassEntry>", try_from = "Vec<FinalBiomassEntry>")]
pub struct FinalBiomassIndex {
    entries: BTreeMap<(u32, Policy), f64>,
}

impl FinalBiomassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a combination; a repeated key is an [`SimulationError::AggregationError`].
    pub fn insert(
        &mut self,
        stand_id: u32,
        policy: Policy,
        final_biomass: f64,
    ) -> Result<(), SimulationError> {
        let key = (stand_id, policy);
        if self.entries.contains_key(&key) {
            return Err(SimulationError::AggregationError(format!(
                "duplicate final biomass entry for stand {} under policy {}",
                key.0, key.1
            )));
        }
        self.entries.insert(key, final_biomass);
        Ok(())
    }

    pub fn get(&self, stand_id: u32, policy: &Policy) -> Option<f64> {
        self.entries.get(&(stand_id, policy.clone())).copied()
    }

    pub fn contains(&self, stand_id: u32, policy: &Policy) -> bool {
        self.get(stand_id, policy).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by stand id, then policy.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Policy, f64)> + '_ {
        self.entries
            .iter()
            .map(|((stand_id, policy), &biomass)| (*stand_id, policy, biomass))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.values().copied()
    }
}

impl From<FinalBiomassIndex> for Vec<FinalBiomassEntry> {
    fn from(index: FinalBiomassIndex) -> Self {
        index
            .entries
            .into_iter()
            .map(|((stand_id, policy), final_biomass)| FinalBiomassEntry {
                stand_id,
                policy,
                final_biomass,
            })
            .collect()
    }
}

impl TryFrom<Vec<FinalBiomassEntry>> for FinalBiomassIndex {
    type Error = SimulationError;

    fn try_from(entries: Vec<FinalBiomassEntry>) -> Result<Self, Self::Error> {
        let mut index = FinalBiomassIndex::new();
        for e in entries {
            index.insert(e.stand_id, e.policy, e.final_biomass)?;
        }
        Ok(index)
    }
}

/// Everything a simulation run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Generated stands, in id order
    pub stands: Vec<Stand>,
    /// One trajectory per (stand, policy), stand-major then policy order
    pub trajectories: Vec<Trajectory>,
    pub summaries: Vec<SummaryRecord>,
    pub final_biomass: FinalBiomassIndex,
    /// Pooled `(age, biomass, species)` observations of every point
    pub estimation_points: Vec<EstimationPoint>,
}

impl SimulationResults {
    /// Number of simulated (stand, policy) combinations.
    pub fn num_combinations(&self) -> usize {
        self.trajectories.len()
    }

    /// Number of generated stands of each species.
    pub fn stand_counts(&self) -> BTreeMap<Species, usize> {
        let mut counts = BTreeMap::new();
        for stand in &self.stands {
            *counts.entry(stand.species).or_insert(0) += 1;
        }
        counts
    }

    /// Trajectory for a specific combination.
    pub fn trajectory(&self, stand_id: u32, policy: &Policy) -> Option<&Trajectory> {
        self.trajectories
            .iter()
            .find(|t| t.stand_id == stand_id && &t.policy == policy)
    }

    /// Summaries of combinations whose stand is of `species`.
    pub fn summaries_for(&self, species: Species) -> impl Iterator<Item = &SummaryRecord> + '_ {
        self.summaries.iter().filter(move |s| s.species == species)
    }
}

/// Build summaries, the final-biomass index and the pooled estimation dataset
/// from ordered trajectories.
///
/// Input order is preserved in every ordered artifact.
pub fn aggregate(
    stands: Vec<Stand>,
    trajectories: Vec<Trajectory>,
) -> Result<SimulationResults, SimulationError> {
    let mut summaries = Vec::with_capacity(trajectories.len());
    let mut final_biomass = FinalBiomassIndex::new();
    let total_points: usize = trajectories.iter().map(Trajectory::len).sum();
    let mut estimation_points = Vec::with_capacity(total_points);

    for trajectory in &trajectories {
        let last = trajectory.final_biomass().ok_or_else(|| {
            SimulationError::AggregationError(format!(
                "trajectory for stand {} under policy {} has no points",
                trajectory.stand_id, trajectory.policy
            ))
        })?;

        final_biomass.insert(trajectory.stand_id, trajectory.policy.clone(), last)?;

        summaries.push(SummaryRecord {
            stand_id: trajectory.stand_id,
            species: trajectory.species,
            policy: trajectory.policy.clone(),
            number_of_rotations: trajectory.rotations(),
            final_biomass: last,
        });

        estimation_points.extend(trajectory.points.iter().map(|p| EstimationPoint {
            age: p.age,
            biomass: p.biomass,
            species: p.species,
        }));
    }

    Ok(SimulationResults {
        stands,
        trajectories,
        summaries,
        final_biomass,
        estimation_points,
    })
}
