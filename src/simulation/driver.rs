use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use super::{aggregate, generate_stands, RotationScheduler, SimulationResults};
use crate::config::{ExecutionStrategy, SimulationConfig};
use crate::error::SimulationError;
use crate::models::{Policy, Stand, Trajectory};

/// Shared flag used to abort a running simulation.
///
/// Cloning the token shares the flag; cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One (stand, policy) combination to simulate.
#[derive(Debug, Clone, Copy)]
struct WorkItem<'a> {
    stand: &'a Stand,
    policy: &'a Policy,
}

/// Called with `(completed, total)` after each work item finishes.
type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Runs every valid (stand, policy) combination of a configuration.
pub struct SimulationDriver {
    config: SimulationConfig,
    cancellation: Option<CancellationToken>,
    progress: Option<Box<ProgressFn>>,
}

impl SimulationDriver {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            cancellation: None,
            progress: None,
        }
    }

    /// Abort the run with [`SimulationError::Cancelled`] once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Report progress after every simulated combination. Under parallel
    /// execution the callback runs on rayon worker threads.
    pub fn with_progress(
        mut self,
        progress: impl Fn(usize, usize) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn check_cancelled(&self) -> Result<(), SimulationError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(SimulationError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Stand-major, then catalog order. This order is the order of every
    /// ordered artifact in the results.
    fn work_items<'a>(&'a self, stands: &'a [Stand]) -> Vec<WorkItem<'a>> {
        stands
            .iter()
            .flat_map(|stand| {
                self.config
                    .policies_for(stand.species)
                    .iter()
                    .map(move |policy| WorkItem { stand, policy })
            })
            .collect()
    }

    fn simulate_item(
        &self,
        scheduler: &RotationScheduler<'_>,
        item: &WorkItem<'_>,
        completed: &AtomicUsize,
        total: usize,
    ) -> Result<Trajectory, SimulationError> {
        self.check_cancelled()?;
        let trajectory = scheduler.simulate(item.stand, item.policy)?;
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(progress) = &self.progress {
            progress(done, total);
        }
        Ok(trajectory)
    }

    /// Validate the configuration, generate stands and simulate every combination.
    ///
    /// Any error aborts the whole run; no partial results are returned.
    pub fn run(&self) -> Result<SimulationResults, SimulationError> {
        let config = &self.config;
        config.validate()?;
        self.check_cancelled()?;

        let start = Instant::now();
        let stands = generate_stands(config.num_stands, config.seed, &config.species_mix)?;
        let work = self.work_items(&stands);

        info!(
            stands = stands.len(),
            combinations = work.len(),
            horizon = config.horizon,
            seed = config.seed,
            "starting rotation simulation"
        );
        debug!(
            execution = ?config.execution,
            exhaustion = %config.exhaustion,
            "dispatching work items"
        );

        let scheduler =
            RotationScheduler::new(&config.growth, config.horizon).with_exhaustion(config.exhaustion);

        let completed = AtomicUsize::new(0);
        let total = work.len();
        let trajectories: Vec<Trajectory> = match config.execution {
            ExecutionStrategy::Parallel => work
                .par_iter()
                .map(|item| self.simulate_item(&scheduler, item, &completed, total))
                .collect::<Result<Vec<_>, SimulationError>>()?,
            ExecutionStrategy::Sequential => work
                .iter()
                .map(|item| self.simulate_item(&scheduler, item, &completed, total))
                .collect::<Result<Vec<_>, SimulationError>>()?,
        };
        self.check_cancelled()?;

        let results = aggregate(stands, trajectories)?;
        info!(
            combinations = results.num_combinations(),
            estimation_points = results.estimation_points.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "rotation simulation finished"
        );
        Ok(results)
    }
}

/// Run a simulation for `config`.
///
/// # Examples
///
/// ```
/// use forest_rotation_simulator::{simulate, Policy, SimulationConfig};
///
/// let config = SimulationConfig {
///     pine_policies: vec![Policy::from([11, 22]), Policy::from([12, 24])],
///     eucalyptus_policies: vec![Policy::from([11]), Policy::from([12])],
///     horizon: 25,
///     num_stands: 30,
///     seed: 2024,
///     ..SimulationConfig::default()
/// };
/// let results = simulate(&config).unwrap();
/// assert_eq!(results.num_combinations(), 60);
/// assert_eq!(results.estimation_points.len(), 60 * 26);
/// ```
pub fn simulate(config: &SimulationConfig) -> Result<SimulationResults, SimulationError> {
    SimulationDriver::new(config.clone()).run()
}
