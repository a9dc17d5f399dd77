#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pathfinding drive strategy that collects pods and delivers them to goals.
//!
//! The [`Planner`] only reads the [`SensorSnapshot`] it is handed each tick.
//! It re-plans from scratch on every call, so the stored path is advisory.

mod search;

use std::collections::{BTreeSet, HashSet};

use podfield_core::{Coord, DriveId, DriveMove, DriveStrategy, PodId, PodSnapshot, SensorSnapshot};
use tracing::debug;

pub use search::{find_path, DEFAULT_EXPANSION_LIMIT};

/// Strategy that walks the shortest path to the nearest pod, lifts it and
/// carries it to its target goal.
#[derive(Clone, Debug)]
pub struct Planner {
    drive: DriveId,
    path: Vec<Coord>,
    target_pod: Option<PodId>,
    delivered: BTreeSet<PodId>,
    carrying: Option<PodId>,
    max_expansions: usize,
}

impl Planner {
    /// Creates a planner steering `drive`.
    #[must_use]
    pub fn new(drive: DriveId) -> Self {
        Self {
            drive,
            path: Vec::new(),
            target_pod: None,
            delivered: BTreeSet::new(),
            carrying: None,
            max_expansions: DEFAULT_EXPANSION_LIMIT,
        }
    }

    /// Overrides the number of nodes a single search may expand.
    #[must_use]
    pub fn with_expansion_limit(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Drive steered by this planner.
    #[must_use]
    pub const fn drive(&self) -> DriveId {
        self.drive
    }

    /// Path computed during the most recent call.
    #[must_use]
    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// Pod the planner is currently heading for or carrying.
    #[must_use]
    pub const fn target_pod(&self) -> Option<PodId> {
        self.target_pod
    }

    /// Pod carried according to the most recent snapshot.
    #[must_use]
    pub const fn carrying(&self) -> Option<PodId> {
        self.carrying
    }

    /// Pods this planner has dropped on their goals.
    #[must_use]
    pub fn delivered(&self) -> &BTreeSet<PodId> {
        &self.delivered
    }

    fn deliver(&mut self, snapshot: &SensorSnapshot, pod: PodId) -> DriveMove {
        self.target_pod = Some(pod);
        let Some(goal) = snapshot.pod(pod).and_then(|record| record.target_goal) else {
            debug!(drive = self.drive.get(), pod = pod.get(), "carried pod has no goal");
            self.path.clear();
            return DriveMove::None;
        };
        self.path = self.search(snapshot, &[goal], true);

        match self.path.len() {
            0 => DriveMove::None,
            _ if snapshot.location == goal => {
                let _ = self.delivered.insert(pod);
                DriveMove::DropPod
            }
            _ => self.step(snapshot.location),
        }
    }

    fn collect(&mut self, snapshot: &SensorSnapshot) -> DriveMove {
        let candidates: Vec<&PodSnapshot> = snapshot
            .pods
            .iter()
            .filter(|pod| self.is_collectable(snapshot, pod))
            .collect();
        if candidates.is_empty() {
            self.path.clear();
            self.target_pod = None;
            return DriveMove::None;
        }

        let targets: Vec<Coord> = candidates.iter().map(|pod| pod.location).collect();
        self.path = self.search(snapshot, &targets, false);
        self.target_pod = self.path.last().and_then(|end| {
            candidates
                .iter()
                .find(|pod| pod.location == *end)
                .map(|pod| pod.id)
        });

        match self.path.len() {
            0 => DriveMove::None,
            1 => DriveMove::LiftPod,
            _ => self.step(snapshot.location),
        }
    }

    fn is_collectable(&self, snapshot: &SensorSnapshot, pod: &PodSnapshot) -> bool {
        !pod.delivered
            && !self.delivered.contains(&pod.id)
            && pod.target_goal.is_some()
            && !snapshot.carry_pairs.iter().any(|pair| pair.pod == pod.id)
    }

    fn search(&self, snapshot: &SensorSnapshot, targets: &[Coord], carrying: bool) -> Vec<Coord> {
        let mut obstacles: HashSet<Coord> = snapshot
            .field_boundaries
            .iter()
            .chain(&snapshot.drive_locations)
            .copied()
            .collect();
        if carrying {
            obstacles.extend(snapshot.pod_locations.iter().copied());
        }

        let path = find_path(
            snapshot.location,
            targets,
            |cell| obstacles.contains(&cell),
            self.max_expansions,
        );
        if path.is_empty() {
            debug!(
                drive = self.drive.get(),
                location = %snapshot.location,
                targets = targets.len(),
                "no reachable target"
            );
        }
        path
    }

    fn step(&self, from: Coord) -> DriveMove {
        self.path
            .get(1)
            .and_then(|next| DriveMove::toward(from, *next))
            .unwrap_or(DriveMove::None)
    }
}

impl DriveStrategy for Planner {
    fn next_move(&mut self, snapshot: &SensorSnapshot) -> DriveMove {
        self.carrying = snapshot.carried_by(self.drive);
        match self.carrying {
            Some(pod) => self.deliver(snapshot, pod),
            None => self.collect(snapshot),
        }
    }
}
