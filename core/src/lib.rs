#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Podfield simulation.
//!
//! This crate defines the vocabulary that connects the authoritative field,
//! the drive strategies, and the adapters. Strategies receive a
//! [`SensorSnapshot`] describing the part of the world their drive can
//! perceive and respond with exactly one [`DriveMove`]. The field applies the
//! move, reports what happened through [`Event`] values, and the round driver
//! condenses the result into a [`RoundOutcome`].

mod config;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::{
    FieldConfig, GameLevel, LevelError, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_SEED,
    MAX_MOVES_PER_ROUND, MIN_GOAL_DISTANCE, POD_PICKUP_PROBABILITY,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Podfield.";

/// Location of a single grid tile expressed as signed column and row values.
///
/// Coordinates are signed so that the ring of boundary cells surrounding the
/// grid (column or row `-1`) can be described with the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the coordinate. Increases toward the east.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the coordinate. Increases toward the north.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the coordinate reached by applying `mv` from this coordinate.
    ///
    /// Non-displacing moves return the coordinate unchanged.
    #[must_use]
    pub fn step(self, mv: DriveMove) -> Coord {
        let (dx, dy) = mv.offset();
        Coord::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Discrete moves a drive may request each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMove {
    /// Do nothing this tick.
    None,
    /// Move one tile toward increasing `y`.
    Up,
    /// Move one tile toward decreasing `y`.
    Down,
    /// Move one tile toward increasing `x`.
    Right,
    /// Move one tile toward decreasing `x`.
    Left,
    /// Lift the pod resting on the drive's tile.
    LiftPod,
    /// Drop the carried pod on the drive's tile.
    DropPod,
}

impl DriveMove {
    /// Displacing moves in the order the planner and tests iterate them.
    pub const DIRECTIONS: [DriveMove; 4] =
        [DriveMove::Up, DriveMove::Down, DriveMove::Right, DriveMove::Left];

    /// Column and row delta produced by the move.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::None | Self::LiftPod | Self::DropPod => (0, 0),
        }
    }

    /// Reports whether the move relocates the drive.
    #[must_use]
    pub const fn is_displacing(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Right | Self::Left)
    }

    /// Heading a drive faces after performing the move, if it moves at all.
    #[must_use]
    pub const fn heading(self) -> Option<Heading> {
        match self {
            Self::Up => Some(Heading::North),
            Self::Down => Some(Heading::South),
            Self::Right => Some(Heading::East),
            Self::Left => Some(Heading::West),
            Self::None | Self::LiftPod | Self::DropPod => None,
        }
    }

    /// Translates a single-tile step between two coordinates into a move.
    ///
    /// The column delta is inspected before the row delta. Returns `None` when
    /// the coordinates coincide.
    #[must_use]
    pub fn toward(from: Coord, to: Coord) -> Option<DriveMove> {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        if dx > 0 {
            Some(Self::Right)
        } else if dx < 0 {
            Some(Self::Left)
        } else if dy > 0 {
            Some(Self::Up)
        } else if dy < 0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// Facing direction recorded for presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Facing toward increasing `y`.
    #[default]
    North,
    /// Facing toward increasing `x`.
    East,
    /// Facing toward decreasing `y`.
    South,
    /// Facing toward decreasing `x`.
    West,
}

/// Unique identifier assigned to a drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriveId(u32);

impl DriveId {
    /// Creates a new drive identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PodId(u32);

impl PodId {
    /// Creates a new pod identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable record of a pod created during setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pod {
    id: PodId,
    origin: Coord,
    target_goal: Option<Coord>,
}

impl Pod {
    /// Creates a pod spawned at `origin` that must be delivered to `target_goal`.
    #[must_use]
    pub const fn new(id: PodId, origin: Coord, target_goal: Option<Coord>) -> Self {
        Self {
            id,
            origin,
            target_goal,
        }
    }

    /// Identifier of the pod.
    #[must_use]
    pub const fn id(&self) -> PodId {
        self.id
    }

    /// Tile the pod was spawned on.
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Goal the pod must be delivered to. `None` when no goal was left to
    /// assign, in which case the pod can never be delivered.
    #[must_use]
    pub const fn target_goal(&self) -> Option<Coord> {
        self.target_goal
    }
}

/// Relation recording that a drive currently holds a pod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarryPair {
    /// Drive holding the pod.
    pub drive: DriveId,
    /// Pod being held.
    pub pod: PodId,
}

/// Immutable representation of a single pod used by sensor snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PodSnapshot {
    /// Identifier of the pod.
    pub id: PodId,
    /// Tile the pod currently occupies, following its carrier when lifted.
    pub location: Coord,
    /// Goal the pod must be delivered to, if one was assigned.
    pub target_goal: Option<Coord>,
    /// Indicates whether the pod has already been delivered.
    pub delivered: bool,
}

/// Read-only view of the world produced for a single drive.
///
/// When the field is configured with a sensor range, boundaries, drives, pods
/// and carry pairs only contain entries within that Manhattan radius of the
/// requesting drive. Goals are always reported in full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Ring of cells immediately outside the grid.
    pub field_boundaries: Vec<Coord>,
    /// Locations of every other drive on the grid.
    pub drive_locations: Vec<Coord>,
    /// Current location of every pod.
    pub pod_locations: Vec<Coord>,
    /// Drives currently holding pods.
    pub carry_pairs: Vec<CarryPair>,
    /// Location of the requesting drive.
    pub location: Coord,
    /// Goal tiles in placement order.
    pub goal_locations: Vec<Coord>,
    /// Pod records including their assigned goals.
    pub pods: Vec<PodSnapshot>,
}

impl SensorSnapshot {
    /// Returns the pod carried by `drive`, if the snapshot reports one.
    #[must_use]
    pub fn carried_by(&self, drive: DriveId) -> Option<PodId> {
        self.carry_pairs
            .iter()
            .find(|pair| pair.drive == drive)
            .map(|pair| pair.pod)
    }

    /// Looks up the pod record with the provided identifier.
    #[must_use]
    pub fn pod(&self, id: PodId) -> Option<&PodSnapshot> {
        self.pods.iter().find(|pod| pod.id == id)
    }
}

/// Capability shared by everything that can steer a drive.
///
/// Implementations must not assume anything about the world beyond what the
/// snapshot reports. They may keep private state between ticks.
pub trait DriveStrategy {
    /// Chooses the move for the next tick.
    fn next_move(&mut self, snapshot: &SensorSnapshot) -> DriveMove;
}

/// Status of a round after applying a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The round continues.
    InProgress,
    /// The player requested a move that crashed; the round is lost.
    PlayerCrashed,
    /// Every pod was delivered to its target goal.
    Won,
    /// The maximum number of ticks elapsed without a win.
    Exhausted,
}

impl RoundOutcome {
    /// Reports whether the round has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Events reported by the field after applying a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a drive moved between two tiles.
    DriveMoved {
        /// Drive that moved.
        drive: DriveId,
        /// Tile occupied before the move.
        from: Coord,
        /// Tile occupied after the move.
        to: Coord,
        /// Pod carried along, if any.
        carrying: Option<PodId>,
    },
    /// Confirms that a drive lifted a pod.
    PodLifted {
        /// Drive that lifted the pod.
        drive: DriveId,
        /// Pod that was lifted.
        pod: PodId,
        /// Tile the pod was lifted from.
        cell: Coord,
    },
    /// Confirms that a pod reached its target goal.
    PodDelivered {
        /// Drive that delivered the pod.
        drive: DriveId,
        /// Pod that was delivered.
        pod: PodId,
        /// Goal the pod was dropped on.
        goal: Coord,
    },
    /// Reports a lift request on a tile without a liftable pod.
    LiftRejected {
        /// Drive that requested the lift.
        drive: DriveId,
        /// Tile the drive occupied.
        cell: Coord,
    },
    /// Reports a drop request that did not deliver a pod.
    DropRejected {
        /// Drive that requested the drop.
        drive: DriveId,
        /// Pod the drive was carrying, or `None` when it carried nothing.
        pod: Option<PodId>,
        /// Tile the drive occupied.
        cell: Coord,
    },
    /// Reports that an AI drive requested a crashing move and lost its turn.
    MoveSkipped {
        /// Drive whose move was discarded.
        drive: DriveId,
        /// Move that would have crashed.
        attempted: DriveMove,
    },
    /// Reports that the player crashed and left the grid.
    PlayerCrashed {
        /// Player drive.
        drive: DriveId,
        /// Tile the player occupied before crashing.
        cell: Coord,
        /// Move that caused the crash.
        attempted: DriveMove,
    },
}
