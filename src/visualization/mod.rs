mod tables;
mod charts;

pub use tables::{
    format_run_summary, print_run_summary,
    format_summary_table, print_summary_table,
    format_statistics_table, print_statistics_table,
    format_species_table, print_species_table,
    format_policy_table, print_policy_table,
    format_comparison_table, print_comparison_table,
    format_trajectory_table, print_trajectory_table,
    format_growth_table, print_growth_table,
};
pub use charts::{format_trajectory_chart, print_trajectory_chart};
