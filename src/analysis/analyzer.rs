use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{confidence_interval, BiomassStatistics, ConfidenceInterval};
use crate::error::SimulationError;
use crate::models::{Policy, Species, Trajectory};
use crate::simulation::SimulationResults;

/// Final-biomass summary of all combinations of one species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub species: Species,
    pub stands: usize,
    pub combinations: usize,
    pub final_biomass: BiomassStatistics,
}

/// Final-biomass summary of all stands run under one policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySummary {
    pub species: Species,
    pub policy: Policy,
    pub stands: usize,
    pub mean_final_biomass: f64,
    pub mean_rotations: f64,
}

/// Unified analysis API over the results of one simulation run.
pub struct ResultsAnalyzer<'a> {
    results: &'a SimulationResults,
}

impl<'a> ResultsAnalyzer<'a> {
    pub fn new(results: &'a SimulationResults) -> Self {
        Self { results }
    }

    /// Statistics of the final biomass of every combination.
    pub fn final_biomass_statistics(&self) -> Result<BiomassStatistics, SimulationError> {
        let values: Vec<f64> = self.results.final_biomass.values().collect();
        BiomassStatistics::from_values(&values)
    }

    /// Confidence interval of mean final biomass at the given level (e.g. 0.95).
    pub fn final_biomass_confidence(
        &self,
        confidence: f64,
    ) -> Result<ConfidenceInterval, SimulationError> {
        let values: Vec<f64> = self.results.final_biomass.values().collect();
        confidence_interval(&values, confidence)
    }

    /// Per-species summaries, for species with at least one simulated combination.
    pub fn species_summaries(&self) -> Vec<SpeciesSummary> {
        let stand_counts = self.results.stand_counts();
        Species::ALL
            .iter()
            .filter_map(|&species| {
                let values: Vec<f64> = self
                    .results
                    .summaries_for(species)
                    .map(|s| s.final_biomass)
                    .collect();
                let final_biomass = BiomassStatistics::from_values(&values).ok()?;
                Some(SpeciesSummary {
                    species,
                    stands: stand_counts.get(&species).copied().unwrap_or(0),
                    combinations: values.len(),
                    final_biomass,
                })
            })
            .collect()
    }

    /// Per-policy summaries, ordered by species then policy.
    pub fn policy_summaries(&self) -> Vec<PolicySummary> {
        // (stand count, final biomass sum, rotation sum)
        let mut accum: BTreeMap<(Species, Policy), (usize, f64, usize)> = BTreeMap::new();
        for s in &self.results.summaries {
            let entry = accum
                .entry((s.species, s.policy.clone()))
                .or_insert((0, 0.0, 0));
            entry.0 += 1;
            entry.1 += s.final_biomass;
            entry.2 += s.number_of_rotations;
        }
        accum
            .into_iter()
            .map(|((species, policy), (n, biomass, rotations))| PolicySummary {
                species,
                policy,
                stands: n,
                mean_final_biomass: biomass / n as f64,
                mean_rotations: rotations as f64 / n as f64,
            })
            .collect()
    }

    /// Policy of `species` with the highest mean final biomass.
    pub fn best_policy(&self, species: Species) -> Option<PolicySummary> {
        self.policy_summaries()
            .into_iter()
            .filter(|p| p.species == species)
            .max_by(|a, b| a.mean_final_biomass.total_cmp(&b.mean_final_biomass))
    }

    /// Trajectory of one combination, or a configuration error naming it.
    pub fn trajectory(
        &self,
        stand_id: u32,
        policy: &Policy,
    ) -> Result<&'a Trajectory, SimulationError> {
        self.results.trajectory(stand_id, policy).ok_or_else(|| {
            SimulationError::ConfigurationError(format!(
                "no trajectory for stand {stand_id} under policy {policy}"
            ))
        })
    }
}
