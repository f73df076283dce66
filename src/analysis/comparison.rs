use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{BiomassStatistics, ResultsAnalyzer};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::models::{Policy, Species};
use crate::simulation::simulate;

/// A named pair of policy catalogs evaluated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    #[serde(default)]
    pub pine_policies: Vec<Policy>,
    #[serde(default)]
    pub eucalyptus_policies: Vec<Policy>,
}

impl Strategy {
    pub fn new(
        name: impl Into<String>,
        pine_policies: Vec<Policy>,
        eucalyptus_policies: Vec<Policy>,
    ) -> Self {
        Self {
            name: name.into(),
            pine_policies,
            eucalyptus_policies,
        }
    }

    /// Long rotations.
    pub fn conservative() -> Self {
        Self::new(
            "Conservative",
            vec![Policy::from([11, 22]), Policy::from([12, 24])],
            vec![Policy::from([11]), Policy::from([12])],
        )
    }

    /// Short rotations.
    pub fn intensive() -> Self {
        Self::new(
            "Intensive",
            vec![
                Policy::from([9, 18]),
                Policy::from([9, 20]),
                Policy::from([10, 18]),
            ],
            vec![Policy::from([9]), Policy::from([10])],
        )
    }

    pub fn intermediate() -> Self {
        Self::new(
            "Intermediate",
            vec![
                Policy::from([10, 20]),
                Policy::from([11, 21]),
                Policy::from([10, 22]),
            ],
            vec![Policy::from([10]), Policy::from([11])],
        )
    }

    /// The three built-in strategies; they fit a 25-year horizon.
    pub fn presets() -> Vec<Strategy> {
        vec![
            Strategy::conservative(),
            Strategy::intensive(),
            Strategy::intermediate(),
        ]
    }
}

/// Result of running one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub name: String,
    pub combinations: usize,
    pub final_biomass: BiomassStatistics,
    /// Mean final biomass per species
    pub species_means: BTreeMap<Species, f64>,
}

/// Outcomes of several strategies run on the same forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub outcomes: Vec<StrategyOutcome>,
}

impl StrategyComparison {
    /// Strategy with the highest average final biomass.
    pub fn best(&self) -> Option<&StrategyOutcome> {
        self.outcomes
            .iter()
            .max_by(|a, b| a.final_biomass.mean.total_cmp(&b.final_biomass.mean))
    }

    /// Outcomes sorted from highest to lowest average final biomass.
    pub fn ranked(&self) -> Vec<&StrategyOutcome> {
        let mut ranked: Vec<&StrategyOutcome> = self.outcomes.iter().collect();
        ranked.sort_by(|a, b| b.final_biomass.mean.total_cmp(&a.final_biomass.mean));
        ranked
    }
}

/// Run every strategy with the horizon, stand count, seed and growth model of
/// `base`, so all strategies are evaluated on the same generated forest.
pub fn compare_strategies(
    base: &SimulationConfig,
    strategies: &[Strategy],
) -> Result<StrategyComparison, SimulationError> {
    if strategies.is_empty() {
        return Err(SimulationError::ConfigurationError(
            "at least one strategy is required for a comparison".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = strategies.iter().find(|s| !seen.insert(s.name.as_str())) {
        return Err(SimulationError::ConfigurationError(format!(
            "duplicate strategy name: '{}'",
            dup.name
        )));
    }

    let mut outcomes = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        info!(strategy = %strategy.name, "simulating strategy");
        let results = simulate(&base.with_strategy(strategy))?;
        let analyzer = ResultsAnalyzer::new(&results);
        let final_biomass = analyzer.final_biomass_statistics()?;
        let species_means = analyzer
            .species_summaries()
            .into_iter()
            .map(|s| (s.species, s.final_biomass.mean))
            .collect();
        outcomes.push(StrategyOutcome {
            name: strategy.name.clone(),
            combinations: results.num_combinations(),
            final_biomass,
            species_means,
        });
    }

    Ok(StrategyComparison { outcomes })
}
