//! Setup-time placement of goals, drives and pods.

use std::ops::RangeInclusive;

use podfield_core::{Coord, DriveId, Pod, PodId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::drive::{DriveEntry, DriveRole};
use crate::{Field, SetupError};

/// Upper bound on rejection-sampling draws for a single placement.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

impl Field {
    /// Places `count` goals on uniformly sampled tiles that keep the minimum
    /// goal separation. Must be called before the player or pods are spawned.
    pub fn spawn_goals(&mut self, count: usize) -> Result<(), SetupError> {
        let (columns, rows) = self.full_ranges();
        for _ in 0..count {
            let min_distance = self.min_goal_distance;
            let goals = &self.goals;
            let grid = &self.grid;
            let cell = sample_until(&mut self.rng, columns.clone(), rows.clone(), |cell| {
                grid.tile(cell).is_some_and(|tile| !tile.is_goal())
                    && goals
                        .iter()
                        .all(|goal| goal.manhattan_distance(cell) >= min_distance)
            })
            .ok_or(SetupError::PlacementExhausted {
                what: "goal",
                attempts: MAX_PLACEMENT_ATTEMPTS,
            })?;
            self.mark_goal(cell);
        }
        Ok(())
    }

    /// Places a goal on a specific tile.
    pub fn place_goal(&mut self, cell: Coord) -> Result<(), SetupError> {
        let tile = self.grid.tile(cell).ok_or(SetupError::OutOfBounds(cell))?;
        if tile.is_goal() {
            return Err(SetupError::TileOccupied(cell));
        }
        if self
            .goals
            .iter()
            .any(|goal| goal.manhattan_distance(cell) < self.min_goal_distance)
        {
            return Err(SetupError::GoalTooClose(cell));
        }
        self.mark_goal(cell);
        Ok(())
    }

    /// Spawns the player near the centre of the grid, away from every goal.
    pub fn spawn_player(&mut self) -> Result<DriveId, SetupError> {
        self.ensure_player_can_spawn()?;

        let min_distance = self.min_goal_distance;
        let goals = &self.goals;
        let grid = &self.grid;
        let accept = |cell: Coord| {
            grid.tile(cell).is_some_and(|tile| tile.drive().is_none())
                && goals
                    .iter()
                    .all(|goal| goal.manhattan_distance(cell) >= min_distance)
        };

        let (central_columns, central_rows) = self.central_ranges();
        let (columns, rows) = self.full_ranges();
        let first = random_cell(&mut self.rng, central_columns, central_rows);
        let cell = if accept(first) {
            first
        } else {
            sample_until(&mut self.rng, columns, rows, accept).ok_or(
                SetupError::PlacementExhausted {
                    what: "player",
                    attempts: MAX_PLACEMENT_ATTEMPTS,
                },
            )?
        };

        Ok(self.insert_player(cell))
    }

    /// Spawns the player on a specific tile.
    pub fn spawn_player_at(&mut self, cell: Coord) -> Result<DriveId, SetupError> {
        self.ensure_player_can_spawn()?;
        self.ensure_drive_free(cell)?;
        Ok(self.insert_player(cell))
    }

    /// Spawns an AI drive on a uniformly sampled tile without another drive.
    pub fn spawn_ai_drive(&mut self) -> Result<DriveId, SetupError> {
        let (columns, rows) = self.full_ranges();
        let grid = &self.grid;
        let cell = sample_until(&mut self.rng, columns, rows, |cell| {
            grid.tile(cell).is_some_and(|tile| tile.drive().is_none())
        })
        .ok_or(SetupError::PlacementExhausted {
            what: "AI drive",
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })?;
        Ok(self.insert_drive(cell, DriveRole::Ai))
    }

    /// Spawns an AI drive on a specific tile.
    pub fn spawn_ai_drive_at(&mut self, cell: Coord) -> Result<DriveId, SetupError> {
        self.ensure_drive_free(cell)?;
        Ok(self.insert_drive(cell, DriveRole::Ai))
    }

    /// Spawns a pod on a tile holding neither a drive nor a pod and assigns it
    /// the first unclaimed goal.
    pub fn spawn_pod(&mut self) -> Result<PodId, SetupError> {
        if self.goals.is_empty() {
            return Err(SetupError::NoGoals);
        }
        let (columns, rows) = self.full_ranges();
        let grid = &self.grid;
        let cell = sample_until(&mut self.rng, columns, rows, |cell| {
            grid.tile(cell)
                .is_some_and(|tile| tile.drive().is_none() && tile.pod().is_none())
        })
        .ok_or(SetupError::PlacementExhausted {
            what: "pod",
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })?;
        Ok(self.insert_pod(cell))
    }

    /// Spawns a pod on a specific tile.
    ///
    /// When an AI drive already stands on the tile the pod starts out lifted
    /// with the configured pickup probability.
    pub fn spawn_pod_at(&mut self, cell: Coord) -> Result<PodId, SetupError> {
        if self.goals.is_empty() {
            return Err(SetupError::NoGoals);
        }
        let tile = self.grid.tile(cell).ok_or(SetupError::OutOfBounds(cell))?;
        if tile.pod().is_some() {
            return Err(SetupError::TileOccupied(cell));
        }
        Ok(self.insert_pod(cell))
    }

    fn ensure_player_can_spawn(&self) -> Result<(), SetupError> {
        if self.goals.is_empty() {
            return Err(SetupError::NoGoals);
        }
        if self.player.is_some() {
            return Err(SetupError::PlayerAlreadySpawned);
        }
        Ok(())
    }

    fn ensure_drive_free(&self, cell: Coord) -> Result<(), SetupError> {
        let tile = self.grid.tile(cell).ok_or(SetupError::OutOfBounds(cell))?;
        if tile.drive().is_some() {
            return Err(SetupError::TileOccupied(cell));
        }
        Ok(())
    }

    fn mark_goal(&mut self, cell: Coord) {
        if let Some(tile) = self.grid.tile_mut(cell) {
            tile.is_goal = true;
        }
        self.goals.push(cell);
        debug!(goal = %cell, "goal placed");
    }

    fn insert_player(&mut self, cell: Coord) -> DriveId {
        let id = self.insert_drive(cell, DriveRole::Player);
        self.player = Some(id);
        id
    }

    fn insert_drive(&mut self, cell: Coord, role: DriveRole) -> DriveId {
        let id = self.allocate_drive_id();
        if let Some(tile) = self.grid.tile_mut(cell) {
            tile.drive = Some(id);
        }
        let _ = self.drives.insert(id, DriveEntry::new(cell, role));
        debug!(drive = id.get(), ?role, %cell, "drive spawned");
        id
    }

    fn insert_pod(&mut self, cell: Coord) -> PodId {
        let id = self.pods.allocate_id();
        let target_goal = self
            .goals
            .iter()
            .copied()
            .find(|goal| !self.pods.is_goal_claimed(*goal));
        match target_goal {
            Some(goal) => info!(pod = id.get(), %goal, "pod assigned to goal"),
            None => warn!(pod = id.get(), "no goal left to assign; pod can never be delivered"),
        }

        self.pods.insert(Pod::new(id, cell, target_goal));
        let occupant = self.grid.tile_mut(cell).and_then(|tile| {
            tile.pod = Some(id);
            tile.drive
        });

        if let Some(drive) = occupant {
            let is_ai = self
                .drives
                .get(&drive)
                .is_some_and(|entry| entry.role == DriveRole::Ai);
            if is_ai && self.rng.gen_bool(self.pod_pickup_probability) {
                // Setup has no event stream; the pairing shows up in sensor carry pairs.
                let mut discarded = Vec::new();
                self.attach_pod(drive, id, cell, &mut discarded);
            }
        }
        id
    }

    fn full_ranges(&self) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        (0..=last_index(self.grid.columns()), 0..=last_index(self.grid.rows()))
    }

    fn central_ranges(&self) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let last_column = last_index(self.grid.columns());
        let last_row = last_index(self.grid.rows());
        (
            last_column / 4..=3 * last_column / 4,
            last_row / 4..=3 * last_row / 4,
        )
    }
}

fn last_index(extent: u32) -> i32 {
    i32::try_from(extent.saturating_sub(1)).unwrap_or(i32::MAX)
}

fn random_cell(
    rng: &mut ChaCha8Rng,
    columns: RangeInclusive<i32>,
    rows: RangeInclusive<i32>,
) -> Coord {
    let x = rng.gen_range(columns);
    let y = rng.gen_range(rows);
    Coord::new(x, y)
}

fn sample_until<F>(
    rng: &mut ChaCha8Rng,
    columns: RangeInclusive<i32>,
    rows: RangeInclusive<i32>,
    mut accept: F,
) -> Option<Coord>
where
    F: FnMut(Coord) -> bool,
{
    (0..MAX_PLACEMENT_ATTEMPTS)
        .map(|_| random_cell(rng, columns.clone(), rows.clone()))
        .find(|cell| accept(*cell))
}
