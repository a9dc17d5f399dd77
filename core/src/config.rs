//! Setup parameters and the level table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum Manhattan separation between any two goals.
pub const MIN_GOAL_DISTANCE: u32 = 10;

/// Chance that a pod spawned beneath an AI drive starts out lifted.
pub const POD_PICKUP_PROBABILITY: f64 = 0.8;

/// Tick budget granted to a single round.
pub const MAX_MOVES_PER_ROUND: u32 = 1000;

/// Default grid width in tiles.
pub const DEFAULT_COLUMNS: u32 = 30;

/// Default grid height in tiles.
pub const DEFAULT_ROWS: u32 = 20;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0x5eed_0f_d21e_7a5c;

/// Parameters consumed by the field during setup. Never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Number of AI drives spawned after the player.
    pub ai_drives: usize,
    /// Number of pods spawned. One goal is placed per pod.
    pub pods: usize,
    /// Manhattan radius of drive perception. `None` means unlimited.
    pub sensor_range: Option<u32>,
    /// Minimum Manhattan distance between goals, and between the player and goals.
    pub min_goal_distance: u32,
    /// Probability that a pod spawned beneath an AI drive starts lifted.
    pub pod_pickup_probability: f64,
    /// Seed for every random choice made during setup.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            ai_drives: 0,
            pods: 1,
            sensor_range: None,
            min_goal_distance: MIN_GOAL_DISTANCE,
            pod_pickup_probability: POD_PICKUP_PROBABILITY,
            seed: DEFAULT_SEED,
        }
    }
}

impl FieldConfig {
    /// Derives a configuration for `level`, keeping grid and seed settings.
    #[must_use]
    pub fn with_level(mut self, level: &GameLevel) -> Self {
        self.ai_drives = level.ai_drives;
        self.pods = level.pods;
        self.sensor_range = level.sensor_range;
        self
    }
}

/// Named preset describing the population of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLevel {
    /// Display name of the level.
    pub name: String,
    /// Number of AI drives sharing the grid with the player.
    pub ai_drives: usize,
    /// Number of pods that must be delivered.
    pub pods: usize,
    /// Perception radius, or `None` for full visibility.
    #[serde(default)]
    pub sensor_range: Option<u32>,
}

impl GameLevel {
    /// Creates a level preset.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ai_drives: usize,
        pods: usize,
        sensor_range: Option<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            ai_drives,
            pods,
            sensor_range,
        }
    }

    /// Built-in campaign played when no level file is supplied.
    #[must_use]
    pub fn presets() -> Vec<GameLevel> {
        vec![
            Self::new("Level 1 - Collect One Pod", 0, 1, None),
            Self::new("Level 2 - Collect One Pod with AI Drives", 2, 1, None),
            Self::new("Level 3 - Collect 2 Pods with AI Drives", 5, 2, None),
            Self::new("Level 4 - Collect 5 Pods with Minimum Moves", 0, 5, None),
        ]
    }

    /// Parses a JSON array of levels.
    pub fn parse_list(json: &str) -> Result<Vec<GameLevel>, LevelError> {
        let levels: Vec<GameLevel> = serde_json::from_str(json)?;
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(levels)
    }
}

/// Failures raised while reading a level table.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The document is not a valid level list.
    #[error("invalid level table: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but contained no levels.
    #[error("level table contains no levels")]
    Empty,
}
