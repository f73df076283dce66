use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::error::SimulationError;

/// Confidence interval for a mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub std_error: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
    pub sample_size: usize,
    pub sampling_error_percent: f64,
}

/// Descriptive statistics of a set of biomass values (tons/ha).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomassStatistics {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; 0.0 for a single value
    pub std_dev: f64,
}

impl BiomassStatistics {
    /// Summarize `values`. At least one value is required.
    pub fn from_values(values: &[f64]) -> Result<Self, SimulationError> {
        if values.is_empty() {
            return Err(SimulationError::InsufficientData(
                "Need at least 1 biomass value".to_string(),
            ));
        }
        let std_dev = if values.len() > 1 {
            Statistics::std_dev(values)
        } else {
            0.0
        };
        Ok(BiomassStatistics {
            count: values.len(),
            mean: Statistics::mean(values),
            min: Statistics::min(values),
            max: Statistics::max(values),
            std_dev,
        })
    }

    /// Difference between the largest and smallest value.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Student-t confidence interval for the mean of `values` at `confidence` (e.g. 0.95).
pub fn confidence_interval(
    values: &[f64],
    confidence: f64,
) -> Result<ConfidenceInterval, SimulationError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(SimulationError::ConfigurationError(format!(
            "confidence level must be between 0 and 1, got {confidence}"
        )));
    }
    let n = values.len();
    if n < 2 {
        return Err(SimulationError::InsufficientData(
            "Need at least 2 observations".to_string(),
        ));
    }

    let mean = Statistics::mean(values);
    let std_error = Statistics::std_dev(values) / (n as f64).sqrt();

    let df = (n - 1) as f64;
    let alpha = 1.0 - confidence;
    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| SimulationError::InsufficientData(e.to_string()))?;
    let t_value = t_dist.inverse_cdf(1.0 - alpha / 2.0);

    let margin = t_value * std_error;
    let sampling_error_percent = if mean.abs() > f64::EPSILON {
        (margin / mean) * 100.0
    } else {
        0.0
    };

    Ok(ConfidenceInterval {
        mean,
        std_error,
        lower: mean - margin,
        upper: mean + margin,
        confidence_level: confidence,
        sample_size: n,
        sampling_error_percent,
    })
}
