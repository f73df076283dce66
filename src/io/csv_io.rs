use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SimulationError;
use crate::models::Species;
use crate::simulation::SimulationResults;

/// Which result table a CSV export holds. CSV is flat, so each table
/// goes to its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvTable {
    #[default]
    Trajectories,
    Summaries,
    FinalBiomass,
    Estimation,
}

impl CsvTable {
    pub const ALL: [CsvTable; 4] = [
        CsvTable::Trajectories,
        CsvTable::Summaries,
        CsvTable::FinalBiomass,
        CsvTable::Estimation,
    ];

    /// File stem used when every table is exported next to each other.
    pub fn file_stem(&self) -> &'static str {
        match self {
            CsvTable::Trajectories => "trajectories",
            CsvTable::Summaries => "summaries",
            CsvTable::FinalBiomass => "final_biomass",
            CsvTable::Estimation => "estimation",
        }
    }
}

impl fmt::Display for CsvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for CsvTable {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "trajectories" | "trajectory" => Ok(CsvTable::Trajectories),
            "summaries" | "summary" => Ok(CsvTable::Summaries),
            "final_biomass" | "final" => Ok(CsvTable::FinalBiomass),
            "estimation" | "estimation_points" => Ok(CsvTable::Estimation),
            _ => Err(SimulationError::ConfigurationError(format!(
                "Unknown CSV table: '{s}'"
            ))),
        }
    }
}

#[derive(Serialize)]
struct TrajectoryRow<'a> {
    stand_id: u32,
    species: &'a str,
    policy: String,
    year: u32,
    age: u32,
    biomass: f64,
    harvested: bool,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    stand_id: u32,
    species: &'a str,
    policy: String,
    number_of_rotations: usize,
    final_biomass: f64,
}

#[derive(Serialize)]
struct FinalBiomassRow {
    stand_id: u32,
    policy: String,
    final_biomass: f64,
}

#[derive(Serialize)]
struct EstimationRow<'a> {
    age: u32,
    biomass: f64,
    species: &'a str,
}

fn species_label(species: Species) -> &'static str {
    match species {
        Species::Pine => "pine",
        Species::Eucalyptus => "eucalyptus",
    }
}

/// Write one result table as CSV to any writer.
pub fn write_csv_to<W: Write>(
    results: &SimulationResults,
    table: CsvTable,
    writer: W,
) -> Result<(), SimulationError> {
    let mut wtr = csv::Writer::from_writer(writer);

    match table {
        CsvTable::Trajectories => {
            for t in &results.trajectories {
                let policy = t.policy.to_string();
                for p in &t.points {
                    wtr.serialize(TrajectoryRow {
                        stand_id: p.stand_id,
                        species: species_label(p.species),
                        policy: policy.clone(),
                        year: p.year,
                        age: p.age,
                        biomass: p.biomass,
                        harvested: p.harvested,
                    })?;
                }
            }
        }
        CsvTable::Summaries => {
            for s in &results.summaries {
                wtr.serialize(SummaryRow {
                    stand_id: s.stand_id,
                    species: species_label(s.species),
                    policy: s.policy.to_string(),
                    number_of_rotations: s.number_of_rotations,
                    final_biomass: s.final_biomass,
                })?;
            }
        }
        CsvTable::FinalBiomass => {
            for (stand_id, policy, final_biomass) in results.final_biomass.iter() {
                wtr.serialize(FinalBiomassRow {
                    stand_id,
                    policy: policy.to_string(),
                    final_biomass,
                })?;
            }
        }
        CsvTable::Estimation => {
            for e in &results.estimation_points {
                wtr.serialize(EstimationRow {
                    age: e.age,
                    biomass: e.biomass,
                    species: species_label(e.species),
                })?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write one result table to a CSV file.
pub fn write_csv(
    results: &SimulationResults,
    table: CsvTable,
    path: impl AsRef<Path>,
) -> Result<(), SimulationError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv_to(results, table, file)
}

/// Write every table into `dir` as `<table>.csv`, returning the written paths.
pub fn write_all_csv(
    results: &SimulationResults,
    dir: impl AsRef<Path>,
) -> Result<Vec<std::path::PathBuf>, SimulationError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    CsvTable::ALL
        .iter()
        .map(|table| {
            let path = dir.join(format!("{}.csv", table.file_stem()));
            write_csv(results, *table, &path)?;
            Ok(path)
        })
        .collect()
}
