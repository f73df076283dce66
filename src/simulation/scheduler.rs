use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::GrowthModel;
use crate::config::MAX_HORIZON;
use crate::error::SimulationError;
use crate::models::{Policy, Stand, Trajectory, TrajectoryPoint};

/// What happens once every harvest age of a policy has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyExhaustion {
    /// Replant and reapply the policy's rotation lengths from the start.
    #[default]
    Cycle,
    /// Keep growing the last rotation with no further harvests.
    Continue,
}

impl std::fmt::Display for PolicyExhaustion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyExhaustion::Cycle => write!(f, "cycle"),
            PolicyExhaustion::Continue => write!(f, "continue"),
        }
    }
}

impl std::str::FromStr for PolicyExhaustion {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cycle" | "repeat" => Ok(PolicyExhaustion::Cycle),
            "continue" | "hold" => Ok(PolicyExhaustion::Continue),
            _ => Err(SimulationError::ConfigurationError(format!(
                "Unknown policy exhaustion rule: '{s}'. Use: cycle or continue"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RotationState {
    Growing { rotation_start: u32 },
    HarvestedAndReplanted { harvest_year: u32 },
}

impl RotationState {
    /// Year in which the rotation growing in `year` was planted.
    fn rotation_start(self) -> u32 {
        match self {
            RotationState::Growing { rotation_start } => rotation_start,
            RotationState::HarvestedAndReplanted { harvest_year } => harvest_year + 1,
        }
    }
}

/// Tracks which harvest of the policy comes next.
///
/// Policy ages are cumulative from the start of a cycle, so rotation `i`
/// lasts `ages[i] - ages[i - 1]` years. Each rotation is counted from the
/// year it was replanted.
struct HarvestCursor<'p> {
    ages: &'p [u32],
    index: usize,
    next_year: Option<u32>,
}

impl<'p> HarvestCursor<'p> {
    fn new(policy: &'p Policy) -> Self {
        let ages = policy.ages();
        Self {
            ages,
            index: 0,
            next_year: ages.first().copied(),
        }
    }

    fn rotation_length(&self) -> u32 {
        match self.index {
            0 => self.ages[0],
            i => self.ages[i].saturating_sub(self.ages[i - 1]),
        }
    }

    fn next_harvest_year(&self) -> Option<u32> {
        self.next_year
    }

    /// Record the harvest at `year`; the next rotation is planted in `year + 1`.
    fn consume(&mut self, year: u32, exhaustion: PolicyExhaustion) {
        self.index += 1;
        if self.index == self.ages.len() {
            match exhaustion {
                PolicyExhaustion::Cycle => self.index = 0,
                PolicyExhaustion::Continue => {
                    self.next_year = None;
                    return;
                }
            }
        }
        self.next_year = year
            .checked_add(1)
            .and_then(|replanted| replanted.checked_add(self.rotation_length()));
    }
}

/// Simulates one stand under one rotation policy across the planning horizon.
///
/// Each year the stand's biomass is read from the growth model at its age
/// since the current rotation was planted. In a harvest year the point keeps
/// the pre-harvest biomass; the stand is replanted and the following year is
/// age 0 of the next rotation.
#[derive(Debug, Clone, Copy)]
pub struct RotationScheduler<'a> {
    model: &'a GrowthModel,
    horizon: u32,
    exhaustion: PolicyExhaustion,
}

impl<'a> RotationScheduler<'a> {
    pub fn new(model: &'a GrowthModel, horizon: u32) -> Self {
        Self {
            model,
            horizon,
            exhaustion: PolicyExhaustion::default(),
        }
    }

    pub fn with_exhaustion(mut self, exhaustion: PolicyExhaustion) -> Self {
        self.exhaustion = exhaustion;
        self
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Run `stand` under `policy`, returning `horizon + 1` points ordered by year.
    pub fn simulate(&self, stand: &Stand, policy: &Policy) -> Result<Trajectory, SimulationError> {
        if self.horizon == 0 {
            return Err(SimulationError::ConfigurationError(
                "horizon must be positive".to_string(),
            ));
        }
        if self.horizon > MAX_HORIZON {
            return Err(SimulationError::ConfigurationError(format!(
                "horizon {} exceeds the maximum of {MAX_HORIZON} years",
                self.horizon
            )));
        }
        policy.validate(stand.species, self.horizon)?;

        let mut points = Vec::with_capacity(self.horizon as usize + 1);
        let mut state = RotationState::Growing { rotation_start: 0 };
        let mut cursor = HarvestCursor::new(policy);
        let shared = Arc::new(policy.clone());

        for year in 0..=self.horizon {
            let rotation_start = state.rotation_start();
            let age = year - rotation_start;
            let biomass = self.model.biomass(stand.species, age as f64)?;
            let harvested = cursor.next_harvest_year() == Some(year);

            points.push(TrajectoryPoint {
                stand_id: stand.id,
                species: stand.species,
                policy: Arc::clone(&shared),
                year,
                age,
                biomass,
                harvested,
            });

            state = if harvested {
                cursor.consume(year, self.exhaustion);
                RotationState::HarvestedAndReplanted { harvest_year: year }
            } else {
                RotationState::Growing { rotation_start }
            };
        }

        Ok(Trajectory {
            stand_id: stand.id,
            species: stand.species,
            policy: policy.clone(),
            points,
        })
    }
}
