//! Multi-target A* over the unit-cost four-neighbour grid.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

use podfield_core::{Coord, DriveMove};
use tracing::debug;

/// Default cap on node expansions performed by a single search.
pub const DEFAULT_EXPANSION_LIMIT: usize = 1 << 16;

/// Finds a shortest path from `start` to the nearest reachable target.
///
/// The returned sequence begins with `start` and ends with the reached target.
/// It has a single element when `start` already is a target, and it is empty
/// when no target is reachable or `max_expansions` nodes were expanded
/// without reaching one. `is_blocked` is never consulted for `start`.
///
/// Entries with equal estimated cost are expanded in discovery order.
pub fn find_path<F>(
    start: Coord,
    targets: &[Coord],
    is_blocked: F,
    max_expansions: usize,
) -> Vec<Coord>
where
    F: Fn(Coord) -> bool,
{
    if targets.is_empty() {
        return Vec::new();
    }
    let target_set: BTreeSet<Coord> = targets.iter().copied().collect();
    let heuristic = |cell: Coord| {
        target_set
            .iter()
            .map(|target| target.manhattan_distance(cell))
            .min()
            .unwrap_or(0)
    };

    let mut frontier = BinaryHeap::new();
    let mut best_cost: HashMap<Coord, u32> = HashMap::new();
    let mut parents: HashMap<Coord, Coord> = HashMap::new();
    let mut closed: HashSet<Coord> = HashSet::new();
    let mut sequence: u64 = 0;
    let mut expansions = 0_usize;

    let _ = best_cost.insert(start, 0);
    frontier.push(Reverse((heuristic(start), sequence, start)));

    while let Some(Reverse((_, _, cell))) = frontier.pop() {
        if !closed.insert(cell) {
            continue;
        }
        if target_set.contains(&cell) {
            return reconstruct(&parents, start, cell);
        }
        if expansions >= max_expansions {
            debug!(%start, expansions, "search expansion limit reached");
            return Vec::new();
        }
        expansions += 1;

        let cost = best_cost.get(&cell).copied().unwrap_or(0);
        for mv in DriveMove::DIRECTIONS {
            let next = cell.step(mv);
            if closed.contains(&next) || is_blocked(next) {
                continue;
            }
            let next_cost = cost + 1;
            if best_cost.get(&next).is_some_and(|known| *known <= next_cost) {
                continue;
            }
            let _ = best_cost.insert(next, next_cost);
            let _ = parents.insert(next, cell);
            sequence += 1;
            frontier.push(Reverse((next_cost + heuristic(next), sequence, next)));
        }
    }
    Vec::new()
}

fn reconstruct(parents: &HashMap<Coord, Coord>, start: Coord, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut cell = end;
    while cell != start {
        match parents.get(&cell) {
            Some(parent) => {
                cell = *parent;
                path.push(cell);
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(_: Coord) -> bool {
        false
    }

    #[test]
    fn start_on_target_yields_single_cell() {
        let start = Coord::new(2, 2);
        assert_eq!(find_path(start, &[start], open, 16), vec![start]);
    }

    #[test]
    fn no_targets_yields_empty_path() {
        assert!(find_path(Coord::new(0, 0), &[], open, 16).is_empty());
    }

    #[test]
    fn reaches_nearest_of_several_targets() {
        let start = Coord::new(0, 0);
        let targets = [Coord::new(5, 0), Coord::new(0, 2), Coord::new(-4, -4)];
        let path = find_path(start, &targets, open, 1_000);

        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&Coord::new(0, 2)));
    }

    #[test]
    fn path_steps_are_adjacent() {
        let wall: Vec<Coord> = (-1..4).map(|y| Coord::new(2, y)).collect();
        let blocked = |cell: Coord| wall.contains(&cell);
        let path = find_path(Coord::new(0, 0), &[Coord::new(4, 0)], blocked, 1_000);

        assert_eq!(path.len(), 9);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
            assert!(!blocked(pair[1]));
        }
    }

    #[test]
    fn enclosed_start_yields_empty_path() {
        let start = Coord::new(0, 0);
        let ring = [
            Coord::new(1, 0),
            Coord::new(-1, 0),
            Coord::new(0, 1),
            Coord::new(0, -1),
        ];
        let path = find_path(start, &[Coord::new(3, 3)], |cell| ring.contains(&cell), 1_000);
        assert!(path.is_empty());
    }

    #[test]
    fn unbounded_search_stops_at_expansion_limit() {
        let target = Coord::new(3, 3);
        let fence = |cell: Coord| cell.manhattan_distance(target) == 1;
        assert!(find_path(Coord::new(0, 0), &[target], fence, 500).is_empty());
    }
}
