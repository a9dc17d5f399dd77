//! Pod bookkeeping: records, locations, carry pairing and deliveries.

use std::collections::{BTreeMap, BTreeSet};

use podfield_core::{CarryPair, Coord, DriveId, Pod, PodId};

/// Registry that stores pods and the relations that reference them.
///
/// The location index always holds the tile a pod currently occupies, so a
/// carried pod's entry must be moved together with its carrier.
#[derive(Debug, Default)]
pub(crate) struct PodRegistry {
    pods: Vec<Pod>,
    locations: BTreeMap<PodId, Coord>,
    carried: BTreeMap<DriveId, PodId>,
    delivered: BTreeSet<PodId>,
    next_pod_id: u32,
}

impl PodRegistry {
    pub(crate) fn allocate_id(&mut self) -> PodId {
        let id = PodId::new(self.next_pod_id);
        self.next_pod_id = self.next_pod_id.saturating_add(1);
        id
    }

    pub(crate) fn insert(&mut self, pod: Pod) {
        let _ = self.locations.insert(pod.id(), pod.origin());
        self.pods.push(pod);
    }

    pub(crate) fn pods(&self) -> &[Pod] {
        &self.pods
    }

    pub(crate) fn pod(&self, id: PodId) -> Option<&Pod> {
        self.pods.iter().find(|pod| pod.id() == id)
    }

    pub(crate) fn location(&self, id: PodId) -> Option<Coord> {
        self.locations.get(&id).copied()
    }

    pub(crate) fn relocate(&mut self, id: PodId, cell: Coord) {
        if let Some(location) = self.locations.get_mut(&id) {
            *location = cell;
        }
    }

    pub(crate) fn tracked_count(&self) -> usize {
        self.locations.len()
    }

    /// Reports whether any pod already targets `goal`.
    pub(crate) fn is_goal_claimed(&self, goal: Coord) -> bool {
        self.pods.iter().any(|pod| pod.target_goal() == Some(goal))
    }

    pub(crate) fn carried_by(&self, drive: DriveId) -> Option<PodId> {
        self.carried.get(&drive).copied()
    }

    pub(crate) fn is_carried(&self, id: PodId) -> bool {
        self.carried.values().any(|pod| *pod == id)
    }

    pub(crate) fn has_carried_pods(&self) -> bool {
        !self.carried.is_empty()
    }

    pub(crate) fn attach(&mut self, drive: DriveId, pod: PodId) {
        let _ = self.carried.insert(drive, pod);
    }

    /// Removes the carry entry for `drive`. This is the only way a pod is released.
    pub(crate) fn release(&mut self, drive: DriveId) -> Option<PodId> {
        self.carried.remove(&drive)
    }

    pub(crate) fn carry_pairs(&self) -> impl Iterator<Item = CarryPair> + '_ {
        self.carried
            .iter()
            .map(|(drive, pod)| CarryPair {
                drive: *drive,
                pod: *pod,
            })
    }

    pub(crate) fn mark_delivered(&mut self, id: PodId) {
        let _ = self.delivered.insert(id);
    }

    pub(crate) fn is_delivered(&self, id: PodId) -> bool {
        self.delivered.contains(&id)
    }

    pub(crate) fn delivered(&self) -> impl Iterator<Item = PodId> + '_ {
        self.delivered.iter().copied()
    }

    pub(crate) fn delivered_count(&self) -> usize {
        self.delivered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_the_only_way_to_drop_a_pairing() {
        let mut registry = PodRegistry::default();
        let id = registry.allocate_id();
        registry.insert(Pod::new(id, Coord::new(1, 1), None));
        let drive = DriveId::new(3);

        registry.attach(drive, id);
        assert!(registry.is_carried(id));
        registry.relocate(id, Coord::new(1, 2));
        assert_eq!(registry.location(id), Some(Coord::new(1, 2)));
        assert_eq!(registry.carried_by(drive), Some(id));

        assert_eq!(registry.release(drive), Some(id));
        assert!(!registry.has_carried_pods());
        assert_eq!(registry.location(id), Some(Coord::new(1, 2)));
    }

    #[test]
    fn claimed_goals_compare_structurally() {
        let mut registry = PodRegistry::default();
        let id = registry.allocate_id();
        registry.insert(Pod::new(id, Coord::new(0, 0), Some(Coord::new(4, 4))));

        assert!(registry.is_goal_claimed(Coord::new(4, 4)));
        assert!(!registry.is_goal_claimed(Coord::new(4, 3)));
    }
}
