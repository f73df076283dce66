use colored::Colorize;

use crate::models::Trajectory;

const BAR_WIDTH: usize = 40;

/// Format a text bar chart of biomass per year as a string.
///
/// Harvest years are drawn in yellow and marked with `H`.
pub fn format_trajectory_chart(trajectory: &Trajectory) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Biomass Trajectory".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if trajectory.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max_biomass = trajectory.peak_biomass();

    output.push_str(&format!(
        "  {:>4}  {:>3}  {:>9}  Biomass\n",
        "Year", "Age", "t/ha"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(60)));

    for p in &trajectory.points {
        let bar_len = if max_biomass > 0.0 {
            ((p.biomass / max_biomass) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "\u{2588}".repeat(bar_len);
        let (bar, marker) = if p.harvested {
            (bar.yellow(), " H")
        } else {
            (bar.green(), "")
        };

        output.push_str(&format!(
            "  {:>4}  {:>3}  {:>9.1}  {}{}\n",
            p.year, p.age, p.biomass, bar, marker
        ));
    }

    output.push('\n');
    output
}

/// Print a text bar chart of one trajectory.
pub fn print_trajectory_chart(trajectory: &Trajectory) {
    print!("{}", format_trajectory_chart(trajectory));
}
