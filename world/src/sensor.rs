//! Per-drive sensor projection.

use podfield_core::{Coord, DriveId, PodSnapshot, SensorSnapshot};

use crate::Field;

impl Field {
    /// Builds the read-only view perceived by `drive`.
    ///
    /// Returns `None` for unknown drives. When a sensor range is configured,
    /// boundaries, drives, pods and carry pairs are filtered to entries within
    /// that Manhattan radius of the requesting drive. Goals and the drive's own
    /// location are always reported.
    #[must_use]
    pub fn sensor_snapshot(&self, drive: DriveId) -> Option<SensorSnapshot> {
        let location = self.drives.get(&drive)?.state.cell();

        let drive_locations = self
            .drives
            .iter()
            .filter(|(id, entry)| **id != drive && !entry.crashed)
            .map(|(_, entry)| entry.state.cell())
            .collect();

        let pods: Vec<PodSnapshot> = self
            .pods
            .pods()
            .iter()
            .filter_map(|pod| {
                let location = self.pods.location(pod.id())?;
                Some(PodSnapshot {
                    id: pod.id(),
                    location,
                    target_goal: pod.target_goal(),
                    delivered: self.pods.is_delivered(pod.id()),
                })
            })
            .collect();

        let mut snapshot = SensorSnapshot {
            field_boundaries: self.boundaries.clone(),
            drive_locations,
            pod_locations: pods.iter().map(|pod| pod.location).collect(),
            carry_pairs: self.pods.carry_pairs().collect(),
            location,
            goal_locations: self.goals.clone(),
            pods,
        };

        if let Some(range) = self.sensor_range {
            self.restrict_to_range(&mut snapshot, range);
        }
        Some(snapshot)
    }

    fn restrict_to_range(&self, snapshot: &mut SensorSnapshot, range: u32) {
        let center = snapshot.location;
        let within = |cell: Coord| center.manhattan_distance(cell) <= range;

        snapshot.field_boundaries.retain(|cell| within(*cell));
        snapshot.drive_locations.retain(|cell| within(*cell));
        snapshot.pod_locations.retain(|cell| within(*cell));
        snapshot.pods.retain(|pod| within(pod.location));
        snapshot.carry_pairs.retain(|pair| {
            self.drives
                .get(&pair.drive)
                .is_some_and(|entry| within(entry.state.cell()))
        });
    }
}

#[cfg(test)]
mod tests {
    use podfield_core::{CarryPair, DriveMove, FieldConfig};

    use super::*;

    fn field() -> Field {
        Field::from_config(&FieldConfig {
            columns: 8,
            rows: 8,
            min_goal_distance: 2,
            pod_pickup_probability: 1.0,
            ..FieldConfig::default()
        })
        .expect("field")
    }

    #[test]
    fn snapshot_excludes_requesting_drive() {
        let mut field = field();
        field.place_goal(Coord::new(7, 7)).expect("goal");
        let player = field.spawn_player_at(Coord::new(1, 1)).expect("player");
        let ai = field.spawn_ai_drive_at(Coord::new(3, 3)).expect("ai");

        let snapshot = field.sensor_snapshot(player).expect("snapshot");
        assert_eq!(snapshot.location, Coord::new(1, 1));
        assert_eq!(snapshot.drive_locations, vec![Coord::new(3, 3)]);
        assert_eq!(snapshot.goal_locations, vec![Coord::new(7, 7)]);
        assert_eq!(snapshot.field_boundaries.len(), 36);

        let snapshot = field.sensor_snapshot(ai).expect("snapshot");
        assert_eq!(snapshot.location, Coord::new(3, 3));
        assert_eq!(snapshot.drive_locations, vec![Coord::new(1, 1)]);
    }

    #[test]
    fn snapshot_reports_carry_pairs_and_pod_records() {
        let mut field = field();
        field.place_goal(Coord::new(7, 7)).expect("goal");
        let ai = field.spawn_ai_drive_at(Coord::new(4, 4)).expect("ai");
        let pod = field.spawn_pod_at(Coord::new(4, 4)).expect("pod");
        let mut events = Vec::new();
        assert!(field.apply_move(ai, DriveMove::Up, &mut events));

        let snapshot = field.sensor_snapshot(ai).expect("snapshot");
        assert_eq!(snapshot.carry_pairs, vec![CarryPair { drive: ai, pod }]);
        assert_eq!(snapshot.carried_by(ai), Some(pod));
        assert_eq!(snapshot.pod_locations, vec![Coord::new(4, 5)]);
        let record = snapshot.pod(pod).expect("pod record");
        assert_eq!(record.target_goal, Some(Coord::new(7, 7)));
        assert!(!record.delivered);
    }

    #[test]
    fn range_filters_perceived_entities() {
        let mut field = field();
        field.place_goal(Coord::new(7, 7)).expect("goal");
        let player = field.spawn_player_at(Coord::new(0, 0)).expect("player");
        let ai = field.spawn_ai_drive_at(Coord::new(6, 6)).expect("ai");
        let _ = field.spawn_pod_at(Coord::new(6, 6)).expect("pod");
        field.set_sensor_range(Some(1));

        let snapshot = field.sensor_snapshot(player).expect("snapshot");
        assert_eq!(snapshot.location, Coord::new(0, 0));
        assert!(snapshot.drive_locations.is_empty());
        assert!(snapshot.pod_locations.is_empty());
        assert!(snapshot.pods.is_empty());
        assert!(snapshot.carry_pairs.is_empty());
        assert_eq!(snapshot.goal_locations, vec![Coord::new(7, 7)]);
        assert_eq!(
            snapshot.field_boundaries,
            vec![Coord::new(0, -1), Coord::new(-1, 0)]
        );

        let snapshot = field.sensor_snapshot(ai).expect("snapshot");
        assert_eq!(snapshot.carry_pairs.len(), 1);
        assert_eq!(snapshot.pods.len(), 1);
        assert_eq!(snapshot.goal_locations, vec![Coord::new(7, 7)]);
    }

    #[test]
    fn unknown_drive_has_no_snapshot() {
        let field = field();
        assert!(field.sensor_snapshot(DriveId::new(9)).is_none());
    }
}
