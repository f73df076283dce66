use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use forest_rotation_simulator::{
    analysis::{compare_strategies, ResultsAnalyzer, Strategy},
    config::{load_config, load_strategies},
    io::{self, CsvFormat, CsvTable, ResultsWriter},
    simulate,
    visualization::{
        print_comparison_table, print_growth_table, print_policy_table, print_run_summary,
        print_species_table, print_statistics_table, print_summary_table,
        print_trajectory_chart, print_trajectory_table,
    },
    ExecutionStrategy, GrowthModel, Policy, PolicyExhaustion, SimulationConfig,
    SimulationResults, Species,
};

#[derive(Parser)]
#[command(
    name = "rotation-sim",
    about = "Forest rotation simulator - biomass trajectories under harvest-age policies",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Simulation settings shared by the subcommands that run a simulation.
/// Flags override values loaded from `--config`.
#[derive(Args)]
struct RunArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of simulated years
    #[arg(long)]
    horizon: Option<u32>,

    /// Number of stands to generate
    #[arg(short, long)]
    stands: Option<u32>,

    /// Random seed for stand generation
    #[arg(long)]
    seed: Option<u64>,

    /// Pine policy as two harvest ages, e.g. 11,22 (repeatable)
    #[arg(long)]
    pine: Vec<Policy>,

    /// Eucalyptus policy as one harvest age, e.g. 11 (repeatable)
    #[arg(long)]
    eucalyptus: Vec<Policy>,

    /// Relative weight of pine when assigning species to stands
    #[arg(long)]
    pine_weight: Option<f64>,

    /// Relative weight of eucalyptus when assigning species to stands
    #[arg(long)]
    eucalyptus_weight: Option<f64>,

    /// Behavior after the last policy age: cycle or continue
    #[arg(long)]
    exhaustion: Option<PolicyExhaustion>,

    /// Simulate work items on the current thread
    #[arg(long)]
    sequential: bool,
}

impl RunArgs {
    fn build_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(stands) = self.stands {
            config.num_stands = stands;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if !self.pine.is_empty() {
            config.pine_policies = self.pine.clone();
        }
        if !self.eucalyptus.is_empty() {
            config.eucalyptus_policies = self.eucalyptus.clone();
        }
        if let Some(weight) = self.pine_weight {
            config.species_mix.pine = weight;
        }
        if let Some(weight) = self.eucalyptus_weight {
            config.species_mix.eucalyptus = weight;
        }
        if let Some(exhaustion) = self.exhaustion {
            config.exhaustion = exhaustion;
        }
        if self.sequential {
            config.execution = ExecutionStrategy::Sequential;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate every stand under every applicable policy and summarize
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Number of per-combination summary rows to display
        #[arg(long, default_value = "10")]
        show: usize,

        /// Confidence level for the mean final biomass (0.0-1.0)
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Also write results to this file (.csv, .json or .xlsx)
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Compare policy strategies on the same generated forest
    Compare {
        /// TOML file with [[strategies]] tables; built-in presets when omitted
        #[arg(long)]
        strategies: Option<PathBuf>,

        /// TOML configuration file for growth, species mix and exhaustion;
        /// its policy catalogs are replaced by each strategy's
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of simulated years [default: 25 without --config]
        #[arg(long)]
        horizon: Option<u32>,

        /// Number of stands to generate [default: 30 without --config]
        #[arg(short, long)]
        stands: Option<u32>,

        /// Random seed for stand generation [default: 2024 without --config]
        #[arg(long)]
        seed: Option<u64>,

        /// Behavior after the last policy age: cycle or continue
        #[arg(long)]
        exhaustion: Option<PolicyExhaustion>,
    },

    /// Show the trajectory of one stand under one policy
    Trajectory {
        #[command(flatten)]
        run: RunArgs,

        /// Stand id
        #[arg(long)]
        stand: u32,

        /// Policy, e.g. 8,16 or 9
        #[arg(short, long)]
        policy: Policy,
    },

    /// Print the growth curve of a species
    Growth {
        /// Species: pine or eucalyptus
        #[arg(long)]
        species: Species,

        /// Number of years to tabulate
        #[arg(short, long, default_value = "30")]
        years: u32,

        /// TOML configuration file with growth parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run a simulation and write the results to disk
    Export {
        #[command(flatten)]
        run: RunArgs,

        /// Output file (.csv, .json, .xlsx) or a directory for all CSV tables
        #[arg(short, long)]
        output: PathBuf,

        /// Table written to a .csv output
        #[arg(long, default_value = "trajectories")]
        table: CsvTable,
    },
}

/// Base configuration for `compare`: the config file when given, otherwise
/// a 30-stand, 25-year forest seeded with 2024. Flags override either.
fn compare_base(
    config: Option<&Path>,
    horizon: Option<u32>,
    stands: Option<u32>,
    seed: Option<u64>,
    exhaustion: Option<PolicyExhaustion>,
) -> Result<SimulationConfig> {
    let mut base = match config {
        Some(path) => load_config(path)?,
        None => SimulationConfig {
            horizon: 25,
            num_stands: 30,
            seed: 2024,
            ..SimulationConfig::default()
        },
    };
    if let Some(horizon) = horizon {
        base.horizon = horizon;
    }
    if let Some(stands) = stands {
        base.num_stands = stands;
    }
    if let Some(seed) = seed {
        base.seed = seed;
    }
    if let Some(exhaustion) = exhaustion {
        base.exhaustion = exhaustion;
    }
    Ok(base)
}

fn export_results(results: &SimulationResults, output: &Path, table: CsvTable) -> Result<()> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "" => {
            let paths = io::write_all_csv(results, output)?;
            for path in paths {
                println!("{} Wrote {}", "Success:".green().bold(), path.display());
            }
            return Ok(());
        }
        "csv" => CsvFormat { table }.write(results, output)?,
        "json" | "xlsx" => io::writer_for_path(output)?.write(results, output)?,
        _ => anyhow::bail!("Unsupported output format: .{ext}. Use .csv, .json, or .xlsx"),
    }

    println!("{} Wrote {}", "Success:".green().bold(), output.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            run,
            show,
            confidence,
            export,
        } => {
            let config = run.build_config()?;
            println!(
                "\n{}",
                format!(
                    "Rotation Simulation: {} stands over {} years",
                    config.num_stands, config.horizon
                )
                .bold()
                .cyan()
            );

            let results = simulate(&config)?;
            print_run_summary(&config, &results);
            print_summary_table(&results, show);

            let analyzer = ResultsAnalyzer::new(&results);
            let stats = analyzer.final_biomass_statistics()?;
            match analyzer.final_biomass_confidence(confidence) {
                Ok(ci) => print_statistics_table(&stats, Some(&ci)),
                Err(e) => {
                    eprintln!("{}: {e}", "Warning".yellow());
                    print_statistics_table(&stats, None);
                }
            }
            print_species_table(&analyzer.species_summaries());
            print_policy_table(&analyzer.policy_summaries());

            if let Some(path) = export {
                export_results(&results, &path, CsvTable::default())?;
            }
        }

        Commands::Compare {
            strategies,
            config,
            horizon,
            stands,
            seed,
            exhaustion,
        } => {
            let strategies = match strategies {
                Some(path) => load_strategies(&path)?,
                None => Strategy::presets(),
            };
            let base = compare_base(config.as_deref(), horizon, stands, seed, exhaustion)?;

            println!(
                "\n{}",
                format!(
                    "Comparing {} strategies: {} stands, {} years, seed {}",
                    strategies.len(),
                    base.num_stands,
                    base.horizon,
                    base.seed
                )
                .bold()
                .cyan()
            );

            let comparison = compare_strategies(&base, &strategies)?;
            print_comparison_table(&comparison);
        }

        Commands::Trajectory { run, stand, policy } => {
            let config = run.build_config()?;
            let results = simulate(&config)?;
            let analyzer = ResultsAnalyzer::new(&results);
            let trajectory = analyzer.trajectory(stand, &policy)?;

            print_trajectory_table(trajectory);
            print_trajectory_chart(trajectory);
            println!(
                "  Rotations: {}  Final biomass: {:.1} t/ha",
                trajectory.rotations(),
                trajectory.final_biomass().unwrap_or(0.0)
            );
        }

        Commands::Growth {
            species,
            years,
            config,
        } => {
            let model = match config {
                Some(path) => load_config(&path)?.growth,
                None => GrowthModel::default(),
            };
            model.validate()?;
            let curve = model.curve(species, years)?;
            print_growth_table(species, &curve);
        }

        Commands::Export { run, output, table } => {
            let config = run.build_config()?;
            let results = simulate(&config)?;
            println!(
                "  Simulated {} combinations over {} stands",
                results.num_combinations(),
                results.stands.len()
            );
            export_results(&results, &output, table)?;
        }
    }

    Ok(())
}
