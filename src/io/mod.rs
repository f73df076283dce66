mod csv_io;
mod json_io;
mod excel_io;

use std::path::Path;

use crate::error::SimulationError;
use crate::simulation::SimulationResults;

pub use csv_io::{write_all_csv, write_csv, write_csv_to, CsvTable};
pub use json_io::{read_json, read_json_from_str, write_json};
pub use excel_io::write_excel;

/// Trait for writing simulation results to a file.
pub trait ResultsWriter {
    fn write(&self, results: &SimulationResults, path: &Path) -> Result<(), SimulationError>;
}

/// CSV writer for one result table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat {
    pub table: CsvTable,
}

impl ResultsWriter for CsvFormat {
    fn write(&self, results: &SimulationResults, path: &Path) -> Result<(), SimulationError> {
        write_csv(results, self.table, path)
    }
}

/// JSON format reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl JsonFormat {
    pub fn read(&self, path: &Path) -> Result<SimulationResults, SimulationError> {
        read_json(path)
    }
}

impl ResultsWriter for JsonFormat {
    fn write(&self, results: &SimulationResults, path: &Path) -> Result<(), SimulationError> {
        write_json(results, path, self.pretty)
    }
}

/// Excel (.xlsx) writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelFormat;

impl ResultsWriter for ExcelFormat {
    fn write(&self, results: &SimulationResults, path: &Path) -> Result<(), SimulationError> {
        write_excel(results, path)
    }
}

/// Pick a writer from the file extension (`csv`, `json`, `xlsx`).
pub fn writer_for_path(path: &Path) -> Result<Box<dyn ResultsWriter>, SimulationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => Ok(Box::new(CsvFormat::default())),
        "json" => Ok(Box::new(JsonFormat { pretty: true })),
        "xlsx" => Ok(Box::new(ExcelFormat)),
        other => Err(SimulationError::ConfigurationError(format!(
            "unsupported export format: '{other}' (use .csv, .json or .xlsx)"
        ))),
    }
}
