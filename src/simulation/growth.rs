use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::models::{GrowthParameters, Species};

/// Per-species biomass yield curves.
///
/// The model is a pure function of species and age since the start of the
/// current rotation. It holds no state besides its coefficients and is shared
/// read-only by every scheduler in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    #[serde(default = "GrowthParameters::pine")]
    pub pine: GrowthParameters,
    #[serde(default = "GrowthParameters::eucalyptus")]
    pub eucalyptus: GrowthParameters,
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self {
            pine: GrowthParameters::pine(),
            eucalyptus: GrowthParameters::eucalyptus(),
        }
    }
}

impl GrowthModel {
    /// Coefficients used for `species`.
    pub fn parameters(&self, species: Species) -> &GrowthParameters {
        match species {
            Species::Pine => &self.pine,
            Species::Eucalyptus => &self.eucalyptus,
        }
    }

    /// Validate the coefficients of every species.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for species in Species::ALL {
            self.parameters(species).validate().map_err(|e| match e {
                SimulationError::ConfigurationError(msg) => {
                    SimulationError::ConfigurationError(format!("{species}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Standing biomass (tons/ha) of a `species` stand `age` years after planting.
    ///
    /// # Examples
    ///
    /// ```
    /// use forest_rotation_simulator::{GrowthModel, Species};
    ///
    /// let model = GrowthModel::default();
    /// let young = model.biomass(Species::Pine, 5.0).unwrap();
    /// let old = model.biomass(Species::Pine, 25.0).unwrap();
    /// assert!(model.biomass(Species::Pine, 0.0).unwrap() < young);
    /// assert!(young < old);
    /// assert!(model.biomass(Species::Pine, -1.0).is_err());
    /// ```
    pub fn biomass(&self, species: Species, age: f64) -> Result<f64, SimulationError> {
        if !age.is_finite() || age < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "age must be a non-negative number, got {age}"
            )));
        }
        let p = self.parameters(species);
        let fraction = (1.0 - (-p.rate * age).exp()).powf(p.shape);
        Ok(p.seedling_biomass + (p.max_biomass - p.seedling_biomass) * fraction)
    }

    /// Yield curve for `species` as `(age, biomass)` pairs for ages `0..=years`.
    pub fn curve(&self, species: Species, years: u32) -> Result<Vec<(u32, f64)>, SimulationError> {
        (0..=years)
            .map(|age| Ok((age, self.biomass(species, age as f64)?)))
            .collect()
    }
}
