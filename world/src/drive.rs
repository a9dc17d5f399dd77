//! Per-drive positional state.

use podfield_core::{Coord, DriveMove, Heading};

/// Role a drive plays within the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DriveRole {
    /// The single drive whose crash ends the round.
    Player,
    /// Any other drive. Crashing moves are discarded instead of applied.
    Ai,
}

/// Position and facing of a drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriveState {
    cell: Coord,
    heading: Heading,
}

impl DriveState {
    /// Creates a drive state at `cell` facing north.
    #[must_use]
    pub const fn new(cell: Coord) -> Self {
        Self {
            cell,
            heading: Heading::North,
        }
    }

    /// Tile the drive occupies.
    #[must_use]
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// Direction the drive last moved in.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Tile the drive would occupy after `mv`.
    #[must_use]
    pub fn next_cell(&self, mv: DriveMove) -> Coord {
        self.cell.step(mv)
    }

    pub(crate) fn advance(&mut self, mv: DriveMove) {
        self.cell = self.next_cell(mv);
        if let Some(heading) = mv.heading() {
            self.heading = heading;
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DriveEntry {
    pub(crate) state: DriveState,
    pub(crate) role: DriveRole,
    pub(crate) crashed: bool,
}

impl DriveEntry {
    pub(crate) const fn new(cell: Coord, role: DriveRole) -> Self {
        Self {
            state: DriveState::new(cell),
            role,
            crashed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_updates_cell_and_heading() {
        let mut state = DriveState::new(Coord::new(2, 2));
        state.advance(DriveMove::Left);
        assert_eq!(state.cell(), Coord::new(1, 2));
        assert_eq!(state.heading(), Heading::West);

        state.advance(DriveMove::LiftPod);
        assert_eq!(state.cell(), Coord::new(1, 2));
        assert_eq!(state.heading(), Heading::West);
    }
}
