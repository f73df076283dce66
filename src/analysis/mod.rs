mod statistics;
mod analyzer;
mod comparison;

pub use statistics::{confidence_interval, BiomassStatistics, ConfidenceInterval};
pub use analyzer::{PolicySummary, ResultsAnalyzer, SpeciesSummary};
pub use comparison::{compare_strategies, Strategy, StrategyComparison, StrategyOutcome};
