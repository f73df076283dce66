use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::SimulationError;
use crate::simulation::SimulationResults;

fn write_headers(
    worksheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> Result<(), SimulationError> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

/// Write simulation results to an Excel (.xlsx) workbook with one sheet per
/// table: Trajectories, Summaries, Final Biomass and Estimation.
pub fn write_excel(
    results: &SimulationResults,
    path: impl AsRef<Path>,
) -> Result<(), SimulationError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Trajectories")?;
        write_headers(
            sheet,
            &["stand_id", "species", "policy", "year", "age", "biomass", "harvested"],
            &bold,
        )?;
        let mut row: u32 = 1;
        for t in &results.trajectories {
            let policy = t.policy.to_string();
            for p in &t.points {
                sheet.write_number(row, 0, p.stand_id as f64)?;
                sheet.write_string(row, 1, p.species.to_string())?;
                sheet.write_string(row, 2, &policy)?;
                sheet.write_number(row, 3, p.year as f64)?;
                sheet.write_number(row, 4, p.age as f64)?;
                sheet.write_number(row, 5, p.biomass)?;
                sheet.write_boolean(row, 6, p.harvested)?;
                row += 1;
            }
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summaries")?;
        write_headers(
            sheet,
            &["stand_id", "species", "policy", "number_of_rotations", "final_biomass"],
            &bold,
        )?;
        for (i, s) in results.summaries.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, s.stand_id as f64)?;
            sheet.write_string(row, 1, s.species.to_string())?;
            sheet.write_string(row, 2, s.policy.to_string())?;
            sheet.write_number(row, 3, s.number_of_rotations as f64)?;
            sheet.write_number(row, 4, s.final_biomass)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Final Biomass")?;
        write_headers(sheet, &["stand_id", "policy", "final_biomass"], &bold)?;
        for (i, (stand_id, policy, biomass)) in results.final_biomass.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, stand_id as f64)?;
            sheet.write_string(row, 1, policy.to_string())?;
            sheet.write_number(row, 2, biomass)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Estimation")?;
        write_headers(sheet, &["age", "biomass", "species"], &bold)?;
        for (i, e) in results.estimation_points.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, e.age as f64)?;
            sheet.write_number(row, 1, e.biomass)?;
            sheet.write_string(row, 2, e.species.to_string())?;
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
