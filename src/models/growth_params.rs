use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Chapman–Richards growth curve coefficients for one species.
///
/// Biomass at age `t`: `B(t) = seedling + (max_biomass - seedling) * (1 - e^(-rate * t))^shape`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParameters {
    /// Asymptotic standing biomass (tons/ha)
    pub max_biomass: f64,
    /// Growth rate coefficient (1/year)
    pub rate: f64,
    /// Shape exponent controlling the inflection of the sigmoid
    pub shape: f64,
    /// Biomass of a freshly replanted stand (tons/ha)
    #[serde(default)]
    pub seedling_biomass: f64,
}

impl GrowthParameters {
    /// Default radiata pine coefficients.
    pub fn pine() -> Self {
        Self {
            max_biomass: 420.0,
            rate: 0.09,
            shape: 2.6,
            seedling_biomass: 0.0,
        }
    }

    /// Default eucalyptus coefficients.
    pub fn eucalyptus() -> Self {
        Self {
            max_biomass: 300.0,
            rate: 0.22,
            shape: 2.1,
            seedling_biomass: 0.0,
        }
    }

    /// Reject coefficients that would not give a finite, saturating,
    /// non-decreasing curve.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("max_biomass", self.max_biomass),
            ("rate", self.rate),
            ("shape", self.shape),
            ("seedling_biomass", self.seedling_biomass),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "growth parameter {name} must be finite, got {value}"
            )));
        }
        if self.max_biomass <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "max_biomass must be positive, got {}",
                self.max_biomass
            )));
        }
        if self.rate <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "rate must be positive, got {}",
                self.rate
            )));
        }
        if self.shape <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "shape must be positive, got {}",
                self.shape
            )));
        }
        if !(0.0..self.max_biomass).contains(&self.seedling_biomass) {
            return Err(SimulationError::ConfigurationError(format!(
                "seedling_biomass must be in 0.0..{}, got {}",
                self.max_biomass, self.seedling_biomass
            )));
        }
        Ok(())
    }
}
