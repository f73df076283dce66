use std::path::Path;

use crate::error::SimulationError;
use crate::simulation::SimulationResults;

/// Read simulation results previously written with [`write_json`].
///
/// The final-biomass index is rebuilt from its entry list, so a file with a
/// repeated (stand, policy) entry is rejected.
pub fn read_json(path: impl AsRef<Path>) -> Result<SimulationResults, SimulationError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    read_json_from_str(&content)
}

pub fn read_json_from_str(content: &str) -> Result<SimulationResults, SimulationError> {
    let results: SimulationResults = serde_json::from_str(content)?;
    Ok(results)
}

/// Write simulation results to a JSON file.
pub fn write_json(
    results: &SimulationResults,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), SimulationError> {
    let content = if pretty {
        serde_json::to_string_pretty(results)?
    } else {
        serde_json::to_string(results)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
