use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Tree species a stand can be planted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Pine,
    Eucalyptus,
}

impl Species {
    /// All species, in the order the stand generator draws them.
    pub const ALL: [Species; 2] = [Species::Pine, Species::Eucalyptus];

    /// Number of harvest ages a rotation policy for this species must carry.
    ///
    /// Pine is managed with a two-harvest schedule, eucalyptus with a single
    /// coppice harvest.
    pub fn policy_arity(self) -> usize {
        match self {
            Species::Pine => 2,
            Species::Eucalyptus => 1,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Species::Pine => write!(f, "Pine"),
            Species::Eucalyptus => write!(f, "Eucalyptus"),
        }
    }
}

impl std::str::FromStr for Species {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pine" | "pinus" | "p" => Ok(Species::Pine),
            "eucalyptus" | "eucalypt" | "e" => Ok(Species::Eucalyptus),
            _ => Err(SimulationError::ConfigurationError(format!(
                "Unknown species: '{s}'"
            ))),
        }
    }
}
