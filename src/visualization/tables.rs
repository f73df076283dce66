use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{
    BiomassStatistics, ConfidenceInterval, PolicySummary, SpeciesSummary, StrategyComparison,
};
use crate::config::SimulationConfig;
use crate::models::{Policy, Species, Trajectory};
use crate::simulation::SimulationResults;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn heading(output: &mut String, title: &str, width: usize) {
    output.push_str(&format!("\n{}\n", title.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(width)));
}

/// Format the settings and sizes of a finished run as a string.
pub fn format_run_summary(config: &SimulationConfig, results: &SimulationResults) -> String {
    let mut output = String::new();
    heading(&mut output, "Simulation Summary", 50);

    let counts = results.stand_counts();
    let mut table = new_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        Cell::new("Horizon"),
        Cell::new(format!("{} years", config.horizon)),
    ]);
    table.add_row(vec![Cell::new("Seed"), Cell::new(config.seed)]);
    table.add_row(vec![Cell::new("Stands"), Cell::new(results.stands.len())]);
    for species in Species::ALL {
        table.add_row(vec![
            Cell::new(format!("  {species}")),
            Cell::new(counts.get(&species).copied().unwrap_or(0)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Pine policies"),
        Cell::new(join_policies(&config.pine_policies)),
    ]);
    table.add_row(vec![
        Cell::new("Eucalyptus policies"),
        Cell::new(join_policies(&config.eucalyptus_policies)),
    ]);
    table.add_row(vec![
        Cell::new("Combinations"),
        Cell::new(results.num_combinations()),
    ]);
    table.add_row(vec![
        Cell::new("Estimation points"),
        Cell::new(results.estimation_points.len()),
    ]);

    output.push_str(&format!("{table}"));
    output
}

fn join_policies(policies: &[Policy]) -> String {
    if policies.is_empty() {
        return "-".to_string();
    }
    policies
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the run summary.
pub fn print_run_summary(config: &SimulationConfig, results: &SimulationResults) {
    print!("{}", format_run_summary(config, results));
}

/// Format the first `limit` per-combination summaries as a string.
pub fn format_summary_table(results: &SimulationResults, limit: usize) -> String {
    let mut output = String::new();
    heading(&mut output, "Stand Summaries", 60);

    let mut table = new_table();
    table.set_header(vec!["Stand", "Species", "Policy", "Rotations", "Final Biomass (t/ha)"]);
    for s in results.summaries.iter().take(limit) {
        table.add_row(vec![
            Cell::new(s.stand_id),
            Cell::new(s.species),
            Cell::new(&s.policy),
            Cell::new(s.number_of_rotations),
            Cell::new(format!("{:.1}", s.final_biomass)),
        ]);
    }
    output.push_str(&format!("{table}"));

    if results.summaries.len() > limit {
        output.push_str(&format!(
            "\n{}\n",
            format!("... {} more rows", results.summaries.len() - limit).dimmed()
        ));
    }
    output
}

/// Print per-combination summaries.
pub fn print_summary_table(results: &SimulationResults, limit: usize) {
    print!("{}", format_summary_table(results, limit));
}

/// Format final-biomass statistics and an optional confidence interval as a string.
pub fn format_statistics_table(
    stats: &BiomassStatistics,
    ci: Option<&ConfidenceInterval>,
) -> String {
    let mut output = String::new();
    heading(&mut output, "Final Biomass Statistics", 50);

    let mut table = new_table();
    table.set_header(vec!["Statistic", "Value"]);
    table.add_row(vec![Cell::new("Combinations"), Cell::new(stats.count)]);
    table.add_row(vec![Cell::new("Mean"), Cell::new(format!("{:.2}", stats.mean))]);
    table.add_row(vec![Cell::new("Std Dev"), Cell::new(format!("{:.2}", stats.std_dev))]);
    table.add_row(vec![Cell::new("Min"), Cell::new(format!("{:.2}", stats.min))]);
    table.add_row(vec![Cell::new("Max"), Cell::new(format!("{:.2}", stats.max))]);
    if let Some(ci) = ci {
        table.add_row(vec![
            Cell::new(format!("{:.0}% CI", ci.confidence_level * 100.0)),
            Cell::new(format!("{:.2} - {:.2}", ci.lower, ci.upper)),
        ]);
        table.add_row(vec![
            Cell::new("Samp. Error %"),
            Cell::new(format!("{:.1}%", ci.sampling_error_percent)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print final-biomass statistics.
pub fn print_statistics_table(stats: &BiomassStatistics, ci: Option<&ConfidenceInterval>) {
    print!("{}", format_statistics_table(stats, ci));
}

/// Format per-species final-biomass summaries as a string.
pub fn format_species_table(species: &[SpeciesSummary]) -> String {
    let mut output = String::new();
    heading(&mut output, "Final Biomass by Species", 60);

    let mut table = new_table();
    table.set_header(vec!["Species", "Stands", "Combinations", "Mean", "Min", "Max"]);
    for s in species {
        table.add_row(vec![
            Cell::new(s.species),
            Cell::new(s.stands),
            Cell::new(s.combinations),
            Cell::new(format!("{:.1}", s.final_biomass.mean)),
            Cell::new(format!("{:.1}", s.final_biomass.min)),
            Cell::new(format!("{:.1}", s.final_biomass.max)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print per-species summaries.
pub fn print_species_table(species: &[SpeciesSummary]) {
    print!("{}", format_species_table(species));
}

/// Format per-policy summaries as a string.
pub fn format_policy_table(policies: &[PolicySummary]) -> String {
    let mut output = String::new();
    heading(&mut output, "Final Biomass by Policy", 60);

    let mut table = new_table();
    table.set_header(vec!["Species", "Policy", "Stands", "Mean Rotations", "Mean Final Biomass"]);
    for p in policies {
        table.add_row(vec![
            Cell::new(p.species),
            Cell::new(&p.policy),
            Cell::new(p.stands),
            Cell::new(format!("{:.2}", p.mean_rotations)),
            Cell::new(format!("{:.1}", p.mean_final_biomass)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print per-policy summaries.
pub fn print_policy_table(policies: &[PolicySummary]) {
    print!("{}", format_policy_table(policies));
}

/// Format a strategy comparison, best strategy last, as a string.
pub fn format_comparison_table(comparison: &StrategyComparison) -> String {
    let mut output = String::new();
    heading(&mut output, "Strategy Comparison", 70);

    let mut table = new_table();
    table.set_header(vec![
        "Strategy",
        "Combinations",
        "Mean",
        "Min",
        "Max",
        "Pine Mean",
        "Eucalyptus Mean",
    ]);
    for o in &comparison.outcomes {
        let species_mean = |species: Species| {
            o.species_means
                .get(&species)
                .map(|m| format!("{m:.1}"))
                .unwrap_or_else(|| "-".to_string())
        };
        table.add_row(vec![
            Cell::new(&o.name),
            Cell::new(o.combinations),
            Cell::new(format!("{:.1}", o.final_biomass.mean)),
            Cell::new(format!("{:.1}", o.final_biomass.min)),
            Cell::new(format!("{:.1}", o.final_biomass.max)),
            Cell::new(species_mean(Species::Pine)),
            Cell::new(species_mean(Species::Eucalyptus)),
        ]);
    }
    output.push_str(&format!("{table}"));

    if let Some(best) = comparison.best() {
        output.push_str(&format!(
            "\n{} {} ({:.1} t/ha average final biomass)\n",
            "Best strategy:".bold(),
            best.name.bold().yellow(),
            best.final_biomass.mean
        ));
    }
    output
}

/// Print a strategy comparison.
pub fn print_comparison_table(comparison: &StrategyComparison) {
    print!("{}", format_comparison_table(comparison));
}

/// Format the year-by-year points of one trajectory as a string.
pub fn format_trajectory_table(trajectory: &Trajectory) -> String {
    let mut output = String::new();
    heading(
        &mut output,
        &format!(
            "Stand {} ({}) under policy {}",
            trajectory.stand_id, trajectory.species, trajectory.policy
        ),
        50,
    );

    let mut table = new_table();
    table.set_header(vec!["Year", "Age", "Biomass (t/ha)", "Harvest"]);
    for p in &trajectory.points {
        table.add_row(vec![
            Cell::new(p.year),
            Cell::new(p.age),
            Cell::new(format!("{:.2}", p.biomass)),
            Cell::new(if p.harvested { "yes" } else { "" }),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print one trajectory.
pub fn print_trajectory_table(trajectory: &Trajectory) {
    print!("{}", format_trajectory_table(trajectory));
}

/// Format a species growth curve as a string.
pub fn format_growth_table(species: Species, curve: &[(u32, f64)]) -> String {
    let mut output = String::new();
    heading(&mut output, &format!("{species} Growth Curve"), 50);

    let mut table = new_table();
    table.set_header(vec!["Age", "Biomass (t/ha)", "Annual Increment"]);
    let mut previous: Option<f64> = None;
    for &(age, biomass) in curve {
        let increment = previous
            .map(|prev| format!("{:.2}", biomass - prev))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(age),
            Cell::new(format!("{biomass:.2}")),
            Cell::new(increment),
        ]);
        previous = Some(biomass);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a growth curve.
pub fn print_growth_table(species: Species, curve: &[(u32, f64)]) {
    print!("{}", format_growth_table(species, curve));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{compare_strategies, ResultsAnalyzer, Strategy};
    use crate::simulation::{simulate, GrowthModel};

    fn config() -> SimulationConfig {
        SimulationConfig {
            num_stands: 8,
            seed: 17,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_format_run_summary() {
        let config = config();
        let results = simulate(&config).unwrap();
        let output = format_run_summary(&config, &results);
        assert!(output.contains("Simulation Summary"));
        assert!(output.contains("Combinations"));
        assert!(output.contains("(8, 16)"));
        assert!(output.contains("(10,)"));
    }

    #[test]
    fn test_format_summary_table_limit() {
        let results = simulate(&config()).unwrap();
        let output = format_summary_table(&results, 5);
        assert!(output.contains("Stand Summaries"));
        assert!(output.contains(&format!("{} more rows", results.summaries.len() - 5)));
    }

    #[test]
    fn test_format_statistics_table_with_ci() {
        let results = simulate(&config()).unwrap();
        let analyzer = ResultsAnalyzer::new(&results);
        let stats = analyzer.final_biomass_statistics().unwrap();
        let ci = analyzer.final_biomass_confidence(0.95).unwrap();
        let output = format_statistics_table(&stats, Some(&ci));
        assert!(output.contains("Final Biomass Statistics"));
        assert!(output.contains("95% CI"));
        assert!(output.contains(&format!("{:.2}", stats.mean)));
    }

    #[test]
    fn test_format_species_and_policy_tables() {
        let results = simulate(&config()).unwrap();
        let analyzer = ResultsAnalyzer::new(&results);
        let species = format_species_table(&analyzer.species_summaries());
        assert!(species.contains("Final Biomass by Species"));
        let policies = format_policy_table(&analyzer.policy_summaries());
        assert!(policies.contains("Mean Rotations"));
    }

    #[test]
    fn test_format_comparison_names_best() {
        let base = SimulationConfig {
            horizon: 25,
            num_stands: 10,
            seed: 2024,
            ..SimulationConfig::default()
        };
        let comparison = compare_strategies(&base, &Strategy::presets()).unwrap();
        let output = format_comparison_table(&comparison);
        assert!(output.contains("Strategy Comparison"));
        assert!(output.contains("Best strategy:"));
        assert!(output.contains(&comparison.best().unwrap().name));
    }

    #[test]
    fn test_format_trajectory_table() {
        let results = simulate(&config()).unwrap();
        let output = format_trajectory_table(&results.trajectories[0]);
        assert!(output.contains("Harvest"));
        assert!(output.contains("yes"));
    }

    #[test]
    fn test_format_growth_table() {
        let model = GrowthModel::default();
        let curve = model.curve(Species::Pine, 5).unwrap();
        let output = format_growth_table(Species::Pine, &curve);
        assert!(output.contains("Pine Growth Curve"));
        assert!(output.contains("Annual Increment"));
    }
}
