#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative field state management for Podfield.
//!
//! The [`Field`] owns the tile grid, every drive's [`DriveState`] and all pod
//! bookkeeping. It is the only writer of world state: strategies observe it
//! through [`Field::sensor_snapshot`] and request changes through
//! [`Field::apply_move`], which validates each move before mutating anything.

mod drive;
mod error;
mod grid;
mod pods;
mod sensor;
mod spawn;

use std::collections::BTreeMap;

use podfield_core::{Coord, DriveId, DriveMove, Event, FieldConfig, PodId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

pub use drive::{DriveRole, DriveState};
pub use error::SetupError;
pub use grid::GridTile;

use drive::DriveEntry;
use grid::TileGrid;
use pods::PodRegistry;

/// Represents the authoritative field state for a single round.
#[derive(Debug)]
pub struct Field {
    grid: TileGrid,
    boundaries: Vec<Coord>,
    drives: BTreeMap<DriveId, DriveEntry>,
    player: Option<DriveId>,
    next_drive_id: u32,
    pods: PodRegistry,
    goals: Vec<Coord>,
    sensor_range: Option<u32>,
    min_goal_distance: u32,
    pod_pickup_probability: f64,
    rng: ChaCha8Rng,
}

impl Field {
    /// Creates an empty field using the default tuning values.
    pub fn new(columns: u32, rows: u32) -> Result<Self, SetupError> {
        Self::from_config(&FieldConfig {
            columns,
            rows,
            ..FieldConfig::default()
        })
    }

    /// Creates an empty field from `config` without spawning anything.
    pub fn from_config(config: &FieldConfig) -> Result<Self, SetupError> {
        if config.columns == 0 || config.rows == 0 {
            return Err(SetupError::InvalidDimensions {
                columns: config.columns,
                rows: config.rows,
            });
        }
        if !(0.0..=1.0).contains(&config.pod_pickup_probability) {
            return Err(SetupError::InvalidProbability(
                config.pod_pickup_probability,
            ));
        }

        let grid = TileGrid::new(config.columns, config.rows);
        let boundaries = grid.boundary_cells();
        Ok(Self {
            grid,
            boundaries,
            drives: BTreeMap::new(),
            player: None,
            next_drive_id: 0,
            pods: PodRegistry::default(),
            goals: Vec::new(),
            sensor_range: config.sensor_range,
            min_goal_distance: config.min_goal_distance,
            pod_pickup_probability: config.pod_pickup_probability,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Builds a field and runs the full setup sequence described by `config`:
    /// one goal per pod, then the player, the AI drives, and finally the pods.
    pub fn setup(config: &FieldConfig) -> Result<Self, SetupError> {
        let mut field = Self::from_config(config)?;
        field.spawn_goals(config.pods.max(1))?;
        let _ = field.spawn_player()?;
        for _ in 0..config.ai_drives {
            let _ = field.spawn_ai_drive()?;
        }
        for _ in 0..config.pods {
            let _ = field.spawn_pod()?;
        }
        Ok(field)
    }

    /// Limits perception to the provided Manhattan radius. `None` disables filtering.
    pub fn set_sensor_range(&mut self, sensor_range: Option<u32>) {
        self.sensor_range = sensor_range;
    }

    /// Reports whether `mv` would crash `drive`.
    ///
    /// A move crashes when it leaves the grid, when it enters a tile holding
    /// another drive, or when a drive carrying a pod enters a tile holding a
    /// pod. Non-displacing moves never crash.
    #[must_use]
    pub fn will_crash(&self, drive: DriveId, mv: DriveMove) -> bool {
        let Some(entry) = self.drives.get(&drive) else {
            return false;
        };
        let from = entry.state.cell();
        let to = entry.state.next_cell(mv);
        if to == from {
            return false;
        }

        let Some(tile) = self.grid.tile(to) else {
            return true;
        };
        if tile.drive().is_some_and(|occupant| occupant != drive) {
            return true;
        }
        tile.pod().is_some() && self.pods.carried_by(drive).is_some()
    }

    /// Validates and applies `mv` for `drive`, appending the resulting events.
    ///
    /// Returns `true` when the turn was consumed normally, including rejected
    /// pod interactions and discarded AI moves. Returns `false` only when the
    /// player crashed, which ends the round.
    pub fn apply_move(&mut self, drive: DriveId, mv: DriveMove, out: &mut Vec<Event>) -> bool {
        let Some(entry) = self.drives.get(&drive).copied() else {
            warn!(drive = drive.get(), "move requested for unknown drive");
            return true;
        };
        if entry.crashed {
            return false;
        }

        let cell = entry.state.cell();
        if self.will_crash(drive, mv) {
            return match entry.role {
                DriveRole::Player => {
                    self.crash_player(drive, cell, mv, out);
                    false
                }
                DriveRole::Ai => {
                    debug!(drive = drive.get(), ?mv, "discarding crashing AI move");
                    out.push(Event::MoveSkipped {
                        drive,
                        attempted: mv,
                    });
                    true
                }
            };
        }

        match mv {
            DriveMove::None => {}
            DriveMove::LiftPod => self.lift_pod(drive, entry.role, cell, out),
            DriveMove::DropPod => self.drop_pod(drive, entry.role, cell, out),
            DriveMove::Up | DriveMove::Down | DriveMove::Right | DriveMove::Left => {
                self.relocate_drive(drive, mv, out);
            }
        }
        true
    }

    /// Reports whether every pod has been delivered to its target goal.
    ///
    /// Pure read over the current state; calling it repeatedly without an
    /// intervening move yields the same answer.
    #[must_use]
    pub fn is_won(&self) -> bool {
        if self.pods.delivered_count() != self.pods.tracked_count() {
            return false;
        }
        if self.pods.has_carried_pods() {
            return false;
        }
        self.pods.pods().iter().all(|pod| match pod.target_goal() {
            Some(goal) => self.pods.location(pod.id()) == Some(goal),
            None => true,
        })
    }

    fn allocate_drive_id(&mut self) -> DriveId {
        let id = DriveId::new(self.next_drive_id);
        self.next_drive_id = self.next_drive_id.saturating_add(1);
        id
    }

    fn crash_player(&mut self, drive: DriveId, cell: Coord, mv: DriveMove, out: &mut Vec<Event>) {
        if let Some(tile) = self.grid.tile_mut(cell) {
            tile.drive = None;
            tile.is_crash = true;
        }
        if let Some(entry) = self.drives.get_mut(&drive) {
            entry.crashed = true;
        }
        info!(drive = drive.get(), %cell, ?mv, "player crashed");
        out.push(Event::PlayerCrashed {
            drive,
            cell,
            attempted: mv,
        });
    }

    /// Records `pod` as carried by `drive`. Shared by live lifts and the
    /// spawn-time pre-attachment.
    fn attach_pod(&mut self, drive: DriveId, pod: PodId, cell: Coord, out: &mut Vec<Event>) {
        self.pods.attach(drive, pod);
        self.pods.relocate(pod, cell);
        debug!(drive = drive.get(), pod = pod.get(), %cell, "pod lifted");
        out.push(Event::PodLifted { drive, pod, cell });
    }

    fn lift_pod(&mut self, drive: DriveId, role: DriveRole, cell: Coord, out: &mut Vec<Event>) {
        let resting = self
            .grid
            .tile(cell)
            .and_then(GridTile::pod)
            .filter(|pod| !self.pods.is_carried(*pod) && !self.pods.is_delivered(*pod));

        match resting {
            Some(pod) => self.attach_pod(drive, pod, cell, out),
            None => {
                if role == DriveRole::Player {
                    debug!(drive = drive.get(), %cell, "no resting pod to lift");
                }
                out.push(Event::LiftRejected { drive, cell });
            }
        }
    }

    fn drop_pod(&mut self, drive: DriveId, role: DriveRole, cell: Coord, out: &mut Vec<Event>) {
        let Some(pod) = self.pods.carried_by(drive) else {
            if role == DriveRole::Player {
                debug!(drive = drive.get(), %cell, "drop requested without a pod");
            }
            out.push(Event::DropRejected {
                drive,
                pod: None,
                cell,
            });
            return;
        };

        let target = self.pods.pod(pod).and_then(|record| record.target_goal());
        if target != Some(cell) {
            debug!(
                drive = drive.get(),
                pod = pod.get(),
                %cell,
                ?target,
                "pod can only be dropped on its target goal"
            );
            out.push(Event::DropRejected {
                drive,
                pod: Some(pod),
                cell,
            });
            return;
        }

        let _ = self.pods.release(drive);
        self.pods.mark_delivered(pod);
        info!(drive = drive.get(), pod = pod.get(), goal = %cell, "pod delivered");
        out.push(Event::PodDelivered {
            drive,
            pod,
            goal: cell,
        });
    }

    fn relocate_drive(&mut self, drive: DriveId, mv: DriveMove, out: &mut Vec<Event>) {
        let carrying = self.pods.carried_by(drive);
        let Some(entry) = self.drives.get_mut(&drive) else {
            return;
        };

        let from = entry.state.cell();
        if let Some(tile) = self.grid.tile_mut(from) {
            tile.drive = None;
            if carrying.is_some() {
                tile.pod = None;
            }
        }

        entry.state.advance(mv);
        let to = entry.state.cell();
        if let Some(tile) = self.grid.tile_mut(to) {
            tile.drive = Some(drive);
            tile.drive_heading = mv.heading();
            if let Some(pod) = carrying {
                tile.pod = Some(pod);
            }
        }
        if let Some(pod) = carrying {
            self.pods.relocate(pod, to);
        }

        out.push(Event::DriveMoved {
            drive,
            from,
            to,
            carrying,
        });
    }
}

/// Query functions that provide read-only access to the field state.
pub mod query {
    use podfield_core::{Coord, DriveId, Pod, PodId};

    use super::{DriveRole, DriveState, Field, GridTile};

    /// Width and height of the grid in tiles.
    #[must_use]
    pub fn dimensions(field: &Field) -> (u32, u32) {
        (field.grid.columns(), field.grid.rows())
    }

    /// Provides read-only access to a single tile.
    #[must_use]
    pub fn tile(field: &Field, cell: Coord) -> Option<&GridTile> {
        field.grid.tile(cell)
    }

    /// Goal tiles in placement order.
    #[must_use]
    pub fn goals(field: &Field) -> &[Coord] {
        &field.goals
    }

    /// Identifier of the player drive, once spawned.
    #[must_use]
    pub fn player(field: &Field) -> Option<DriveId> {
        field.player
    }

    /// Every drive in the order moves are applied each tick.
    #[must_use]
    pub fn drive_ids(field: &Field) -> Vec<DriveId> {
        field.drives.keys().copied().collect()
    }

    /// Role assigned to `drive`.
    #[must_use]
    pub fn drive_role(field: &Field, drive: DriveId) -> Option<DriveRole> {
        field.drives.get(&drive).map(|entry| entry.role)
    }

    /// Positional state of `drive`.
    #[must_use]
    pub fn drive_state(field: &Field, drive: DriveId) -> Option<DriveState> {
        field.drives.get(&drive).map(|entry| entry.state)
    }

    /// Reports whether the player has crashed.
    #[must_use]
    pub fn player_crashed(field: &Field) -> bool {
        field
            .player
            .and_then(|player| field.drives.get(&player))
            .is_some_and(|entry| entry.crashed)
    }

    /// Pod records in creation order.
    #[must_use]
    pub fn pods(field: &Field) -> &[Pod] {
        field.pods.pods()
    }

    /// Tile currently occupied by `pod`.
    #[must_use]
    pub fn pod_location(field: &Field, pod: PodId) -> Option<Coord> {
        field.pods.location(pod)
    }

    /// Pod carried by `drive`, if any.
    #[must_use]
    pub fn carried_pod(field: &Field, drive: DriveId) -> Option<PodId> {
        field.pods.carried_by(drive)
    }

    /// Pods delivered so far in identifier order.
    #[must_use]
    pub fn delivered_pods(field: &Field) -> Vec<PodId> {
        field.pods.delivered().collect()
    }

    /// Pods that received no target goal and therefore can never be delivered.
    #[must_use]
    pub fn undeliverable_pods(field: &Field) -> Vec<PodId> {
        field
            .pods
            .pods()
            .iter()
            .filter(|pod| pod.target_goal().is_none())
            .map(Pod::id)
            .collect()
    }

    /// Active perception radius, if limited.
    #[must_use]
    pub fn sensor_range(field: &Field) -> Option<u32> {
        field.sensor_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> FieldConfig {
        FieldConfig {
            columns: 5,
            rows: 5,
            min_goal_distance: 2,
            pod_pickup_probability: 0.0,
            ..FieldConfig::default()
        }
    }

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(
            Field::new(0, 4).err(),
            Some(SetupError::InvalidDimensions {
                columns: 0,
                rows: 4
            })
        );
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let config = FieldConfig {
            pod_pickup_probability: 1.5,
            ..small_config()
        };
        assert_eq!(
            Field::from_config(&config).err(),
            Some(SetupError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn leaving_the_grid_crashes() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(0, 0)).expect("player");

        assert!(field.will_crash(player, DriveMove::Left));
        assert!(field.will_crash(player, DriveMove::Down));
        assert!(!field.will_crash(player, DriveMove::Up));
        assert!(!field.will_crash(player, DriveMove::LiftPod));
        assert!(!field.will_crash(player, DriveMove::None));
    }

    #[test]
    fn player_crash_vacates_tile_and_sets_flag() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(0, 0)).expect("player");
        let mut events = Vec::new();

        assert!(!field.apply_move(player, DriveMove::Left, &mut events));

        let tile = query::tile(&field, Coord::new(0, 0)).expect("tile");
        assert!(tile.is_crash());
        assert_eq!(tile.drive(), None);
        assert!(query::player_crashed(&field));
        assert!(!field.apply_move(player, DriveMove::Up, &mut events));
        assert_eq!(
            events,
            vec![Event::PlayerCrashed {
                drive: player,
                cell: Coord::new(0, 0),
                attempted: DriveMove::Left,
            }]
        );
    }

    #[test]
    fn ai_crash_is_absorbed() {
        let mut field = Field::from_config(&small_config()).expect("field");
        let ai = field.spawn_ai_drive_at(Coord::new(4, 0)).expect("ai");
        let mut events = Vec::new();

        assert!(field.apply_move(ai, DriveMove::Right, &mut events));
        assert_eq!(
            query::drive_state(&field, ai).map(|state| state.cell()),
            Some(Coord::new(4, 0))
        );
        assert_eq!(
            events,
            vec![Event::MoveSkipped {
                drive: ai,
                attempted: DriveMove::Right
            }]
        );
    }

    #[test]
    fn uncarrying_drive_may_enter_pod_tile() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(1, 1)).expect("player");
        let pod = field.spawn_pod_at(Coord::new(1, 2)).expect("pod");
        let mut events = Vec::new();

        assert!(!field.will_crash(player, DriveMove::Up));
        assert!(field.apply_move(player, DriveMove::Up, &mut events));
        assert!(field.apply_move(player, DriveMove::Up, &mut events));

        assert_eq!(query::pod_location(&field, pod), Some(Coord::new(1, 2)));
        let tile = query::tile(&field, Coord::new(1, 2)).expect("tile");
        assert_eq!(tile.pod(), Some(pod));
        assert_eq!(tile.drive(), None);
    }

    #[test]
    fn carried_pod_follows_drive() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(2, 2)).expect("player");
        let pod = field.spawn_pod_at(Coord::new(2, 2)).expect("pod");
        let mut events = Vec::new();

        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert_eq!(query::carried_pod(&field, player), Some(pod));
        assert!(field.apply_move(player, DriveMove::Right, &mut events));

        assert_eq!(query::pod_location(&field, pod), Some(Coord::new(3, 2)));
        assert_eq!(query::tile(&field, Coord::new(2, 2)).and_then(GridTile::pod), None);
        let tile = query::tile(&field, Coord::new(3, 2)).expect("tile");
        assert_eq!(tile.pod(), Some(pod));
        assert_eq!(tile.drive(), Some(player));
        assert_eq!(tile.drive_heading(), Some(podfield_core::Heading::East));
    }

    #[test]
    fn carrying_drive_cannot_enter_pod_tile() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(0, 4)).expect("goal");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(2, 2)).expect("player");
        let _ = field.spawn_pod_at(Coord::new(2, 2)).expect("pod");
        let _ = field.spawn_pod_at(Coord::new(3, 2)).expect("pod");
        let mut events = Vec::new();

        assert!(!field.will_crash(player, DriveMove::Right));
        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert!(field.will_crash(player, DriveMove::Right));
    }

    #[test]
    fn lift_without_pod_is_rejected() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(2, 2)).expect("player");
        let mut events = Vec::new();

        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert!(field.apply_move(player, DriveMove::DropPod, &mut events));
        assert_eq!(
            events,
            vec![
                Event::LiftRejected {
                    drive: player,
                    cell: Coord::new(2, 2)
                },
                Event::DropRejected {
                    drive: player,
                    pod: None,
                    cell: Coord::new(2, 2)
                },
            ]
        );
    }

    #[test]
    fn drop_away_from_target_keeps_pod_carried() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        let player = field.spawn_player_at(Coord::new(2, 2)).expect("player");
        let pod = field.spawn_pod_at(Coord::new(2, 2)).expect("pod");
        let mut events = Vec::new();

        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert!(field.apply_move(player, DriveMove::DropPod, &mut events));

        assert_eq!(query::carried_pod(&field, player), Some(pod));
        assert!(query::delivered_pods(&field).is_empty());
        assert!(!field.is_won());
    }

    #[test]
    fn drop_on_another_pods_goal_is_rejected() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(4, 4)).expect("goal");
        field.place_goal(Coord::new(2, 3)).expect("goal");
        let player = field.spawn_player_at(Coord::new(2, 2)).expect("player");
        let pod = field.spawn_pod_at(Coord::new(2, 2)).expect("pod");
        let mut events = Vec::new();

        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert!(field.apply_move(player, DriveMove::Up, &mut events));
        events.clear();
        assert!(field.apply_move(player, DriveMove::DropPod, &mut events));

        assert_eq!(
            events,
            vec![Event::DropRejected {
                drive: player,
                pod: Some(pod),
                cell: Coord::new(2, 3)
            }]
        );
        assert_eq!(query::carried_pod(&field, player), Some(pod));
        assert!(query::delivered_pods(&field).is_empty());
        assert!(!field.is_won());
    }

    #[test]
    fn delivered_pod_cannot_be_lifted_again() {
        let mut field = Field::from_config(&small_config()).expect("field");
        field.place_goal(Coord::new(2, 3)).expect("goal");
        let player = field.spawn_player_at(Coord::new(2, 2)).expect("player");
        let pod = field.spawn_pod_at(Coord::new(2, 2)).expect("pod");
        let mut events = Vec::new();

        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert!(field.apply_move(player, DriveMove::Up, &mut events));
        assert!(field.apply_move(player, DriveMove::DropPod, &mut events));
        assert!(field.is_won());

        events.clear();
        assert!(field.apply_move(player, DriveMove::LiftPod, &mut events));
        assert_eq!(query::carried_pod(&field, player), None);
        assert_eq!(query::delivered_pods(&field), vec![pod]);
        assert!(field.is_won());
    }

    #[test]
    fn field_without_pods_is_won() {
        let field = Field::from_config(&small_config()).expect("field");
        assert!(field.is_won());
    }
}
