use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::Strategy;
use crate::error::SimulationError;
use crate::models::{Policy, Species};
use crate::simulation::{GrowthModel, PolicyExhaustion, SpeciesMix};

pub const DEFAULT_HORIZON: u32 = 20;
pub const DEFAULT_NUM_STANDS: u32 = 50;
pub const DEFAULT_SEED: u64 = 42;
/// Longest planning horizon accepted, in years.
pub const MAX_HORIZON: u32 = 10_000;

/// Built-in pine catalog: two-harvest schedules fitting the default horizon.
pub fn default_pine_policies() -> Vec<Policy> {
    vec![
        Policy::from([8, 16]),
        Policy::from([9, 18]),
        Policy::from([10, 20]),
    ]
}

/// Built-in eucalyptus catalog: single coppice harvests.
pub fn default_eucalyptus_policies() -> Vec<Policy> {
    vec![Policy::from([8]), Policy::from([9]), Policy::from([10])]
}

/// How the driver dispatches (stand, policy) work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Work items run on the rayon thread pool and are collected in order.
    #[default]
    Parallel,
    Sequential,
}

/// Complete configuration of one simulation run.
///
/// Every field has a default, so a TOML file only needs the values it
/// overrides:
///
/// ```toml
/// horizon = 25
/// num_stands = 30
/// seed = 2024
/// pine_policies = [[11, 22], [12, 24]]
/// eucalyptus_policies = [[11], [12]]
///
/// [growth.eucalyptus]
/// max_biomass = 280.0
/// rate = 0.25
/// shape = 2.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pine_policies: Vec<Policy>,
    pub eucalyptus_policies: Vec<Policy>,
    /// Number of simulated years; trajectories cover years `0..=horizon`
    pub horizon: u32,
    pub num_stands: u32,
    pub seed: u64,
    pub species_mix: SpeciesMix,
    pub growth: GrowthModel,
    pub exhaustion: PolicyExhaustion,
    pub execution: ExecutionStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pine_policies: default_pine_policies(),
            eucalyptus_policies: default_eucalyptus_policies(),
            horizon: DEFAULT_HORIZON,
            num_stands: DEFAULT_NUM_STANDS,
            seed: DEFAULT_SEED,
            species_mix: SpeciesMix::default(),
            growth: GrowthModel::default(),
            exhaustion: PolicyExhaustion::default(),
            execution: ExecutionStrategy::default(),
        }
    }
}

impl SimulationConfig {
    /// Policy catalog applied to stands of `species`.
    pub fn policies_for(&self, species: Species) -> &[Policy] {
        match species {
            Species::Pine => &self.pine_policies,
            Species::Eucalyptus => &self.eucalyptus_policies,
        }
    }

    /// Copy of this configuration with the policy catalogs of `strategy`.
    pub fn with_strategy(&self, strategy: &Strategy) -> Self {
        Self {
            pine_policies: strategy.pine_policies.clone(),
            eucalyptus_policies: strategy.eucalyptus_policies.clone(),
            ..self.clone()
        }
    }

    /// Check every setting before any simulation work is done.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.horizon == 0 {
            return Err(SimulationError::ConfigurationError(
                "horizon must be positive".to_string(),
            ));
        }
        if self.horizon > MAX_HORIZON {
            return Err(SimulationError::ConfigurationError(format!(
                "horizon {} exceeds the maximum of {MAX_HORIZON} years",
                self.horizon
            )));
        }
        if self.num_stands == 0 {
            return Err(SimulationError::ConfigurationError(
                "number of stands must be positive".to_string(),
            ));
        }
        if self.pine_policies.is_empty() && self.eucalyptus_policies.is_empty() {
            return Err(SimulationError::ConfigurationError(
                "at least one rotation policy is required".to_string(),
            ));
        }
        self.species_mix.validate()?;
        self.growth.validate()?;
        for species in Species::ALL {
            if self.policies_for(species).is_empty() && self.species_mix.weight(species) > 0.0 {
                tracing::warn!(
                    "no {species} policies configured; {species} stands will not be simulated"
                );
            }
            for policy in self.policies_for(species) {
                policy.validate(species, self.horizon)?;
            }
        }
        Ok(())
    }

    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, SimulationError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Deserialize)]
struct StrategyFile {
    #[serde(default)]
    strategies: Vec<Strategy>,
}

/// Load a [`SimulationConfig`] from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, SimulationError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    SimulationConfig::from_toml_str(&content)
}

/// Parse the `[[strategies]]` tables of a TOML document.
pub fn strategies_from_toml_str(content: &str) -> Result<Vec<Strategy>, SimulationError> {
    let file: StrategyFile = toml::from_str(content)?;
    Ok(file.strategies)
}

/// Load the `[[strategies]]` tables of a TOML file.
pub fn load_strategies(path: impl AsRef<Path>) -> Result<Vec<Strategy>, SimulationError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    strategies_from_toml_str(&content)
}
