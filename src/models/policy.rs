use serde::{Deserialize, Serialize};

use super::Species;
use crate::error::SimulationError;

/// A harvest-rotation policy: the ascending years at which a stand is
/// harvested and replanted within one policy cycle.
///
/// A pine policy such as `(11, 22)` harvests at years 11 and 22 of the cycle;
/// a eucalyptus policy such as `(11,)` harvests once at year 11.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policy {
    ages: Vec<u32>,
}

impl Policy {
    /// Create a policy from harvest ages. Use [`Policy::validate`] to check it
    /// against a species and horizon.
    pub fn new(ages: impl Into<Vec<u32>>) -> Self {
        Self { ages: ages.into() }
    }

    /// Harvest ages in cycle order.
    pub fn ages(&self) -> &[u32] {
        &self.ages
    }

    /// Number of harvests in one policy cycle.
    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    /// Length of one full policy cycle (its last harvest age).
    pub fn cycle_length(&self) -> Option<u32> {
        self.ages.last().copied()
    }

    /// Check the policy shape and ages for `species` over a planning horizon.
    ///
    /// Ages must match the species arity, be positive, strictly ascending and
    /// no larger than `horizon`.
    pub fn validate(&self, species: Species, horizon: u32) -> Result<(), SimulationError> {
        if self.ages.len() != species.policy_arity() {
            return Err(SimulationError::ConfigurationError(format!(
                "{species} policy {self} must have {} harvest age(s), got {}",
                species.policy_arity(),
                self.ages.len()
            )));
        }
        if self.ages.iter().any(|&age| age == 0) {
            return Err(SimulationError::ConfigurationError(format!(
                "{species} policy {self}: harvest ages must be positive"
            )));
        }
        if self.ages.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SimulationError::ConfigurationError(format!(
                "{species} policy {self}: harvest ages must be strictly ascending"
            )));
        }
        if let Some(&age) = self.ages.iter().find(|&&age| age > horizon) {
            return Err(SimulationError::ConfigurationError(format!(
                "{species} policy {self}: harvest age {age} exceeds horizon {horizon}"
            )));
        }
        Ok(())
    }
}

impl From<Vec<u32>> for Policy {
    fn from(ages: Vec<u32>) -> Self {
        Self { ages }
    }
}

impl<const N: usize> From<[u32; N]> for Policy {
    fn from(ages: [u32; N]) -> Self {
        Self {
            ages: ages.to_vec(),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .ages
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if self.ages.len() == 1 {
            write!(f, "({joined},)")
        } else {
            write!(f, "({joined})")
        }
    }
}

impl std::str::FromStr for Policy {
    type Err = SimulationError;

    /// Parse `"11,22"`, `"(11, 22)"`, `"11"` or `"(11,)"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let ages = inner
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>().map_err(|_| {
                    SimulationError::ConfigurationError(format!(
                        "Invalid harvest age '{part}' in policy '{s}'"
                    ))
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        if ages.is_empty() {
            return Err(SimulationError::ConfigurationError(format!(
                "Policy '{s}' has no harvest ages"
            )));
        }
        Ok(Policy { ages })
    }
}
