use thiserror::Error;

/// Errors that can occur while configuring, running or exporting a rotation simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    /// Invalid horizon, stand count, policy ages, species mix or growth parameters.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal invariant violated while aggregating trajectories.
    #[error("Aggregation error: {0}")]
    AggregationError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Simulation cancelled")]
    Cancelled,
}

impl From<rust_xlsxwriter::XlsxError> for SimulationError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SimulationError::Excel(e.to_string())
    }
}
