//! Failures surfaced while building a field.

use podfield_core::Coord;
use thiserror::Error;

/// Reasons a setup operation may be rejected by the field.
///
/// These are configuration or ordering mistakes made by the caller. Gameplay
/// variance (crashes, rejected lifts and drops) is never reported here.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SetupError {
    /// The grid must contain at least one tile.
    #[error("field must be at least 1x1, got {columns}x{rows}")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The pickup probability lies outside `[0, 1]`.
    #[error("pod pickup probability must lie within [0, 1], got {0}")]
    InvalidProbability(f64),
    /// A player or pod was spawned before any goal existed.
    #[error("no goals exist; place goals before spawning the player or pods")]
    NoGoals,
    /// The player was spawned twice.
    #[error("a player drive has already been spawned")]
    PlayerAlreadySpawned,
    /// The requested tile lies outside the grid.
    #[error("tile {0} lies outside the field")]
    OutOfBounds(Coord),
    /// The requested tile already holds the entity being placed.
    #[error("tile {0} is already occupied")]
    TileOccupied(Coord),
    /// The requested goal violates the minimum goal separation.
    #[error("goal at {0} is closer than the minimum goal distance")]
    GoalTooClose(Coord),
    /// Rejection sampling ran out of attempts.
    #[error("could not place {what} after {attempts} attempts")]
    PlacementExhausted {
        /// Kind of entity being placed.
        what: &'static str,
        /// Number of samples drawn.
        attempts: u32,
    },
}
