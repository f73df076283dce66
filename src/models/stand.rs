use serde::{Deserialize, Serialize};

use super::Species;

/// A unit of forest land with a single species.
///
/// Stands are created once per simulation run by the stand generator and are
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stand {
    /// Sequential identifier, unique within a run
    pub id: u32,
    /// Species planted on the stand
    pub species: Species,
}

impl Stand {
    pub fn new(id: u32, species: Species) -> Self {
        Self { id, species }
    }
}

impl std::fmt::Display for Stand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stand {} ({})", self.id, self.species)
    }
}
