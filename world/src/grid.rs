//! Dense tile storage backing the field.

use podfield_core::{Coord, DriveId, Heading, PodId};

/// Occupancy facts recorded for a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridTile {
    pub(crate) drive: Option<DriveId>,
    pub(crate) pod: Option<PodId>,
    pub(crate) is_goal: bool,
    pub(crate) is_crash: bool,
    pub(crate) drive_heading: Option<Heading>,
}

impl GridTile {
    /// Drive standing on the tile, if any.
    #[must_use]
    pub const fn drive(&self) -> Option<DriveId> {
        self.drive
    }

    /// Pod on the tile, if any. Carried pods are recorded on their carrier's tile.
    #[must_use]
    pub const fn pod(&self) -> Option<PodId> {
        self.pod
    }

    /// Reports whether the tile is a delivery goal.
    #[must_use]
    pub const fn is_goal(&self) -> bool {
        self.is_goal
    }

    /// Reports whether the player crashed while standing on the tile.
    #[must_use]
    pub const fn is_crash(&self) -> bool {
        self.is_crash
    }

    /// Heading of the last drive that moved onto the tile.
    #[must_use]
    pub const fn drive_heading(&self) -> Option<Heading> {
        self.drive_heading
    }
}

#[derive(Clone, Debug)]
pub(crate) struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<GridTile>,
}

impl TileGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![GridTile::default(); capacity],
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) fn tile(&self, cell: Coord) -> Option<&GridTile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tile_mut(&mut self, cell: Coord) -> Option<&mut GridTile> {
        self.index(cell).and_then(|index| self.tiles.get_mut(index))
    }

    /// Ring of cells immediately outside the grid: bottom edge, left edge,
    /// top edge, then right edge.
    pub(crate) fn boundary_cells(&self) -> Vec<Coord> {
        let width = i32::try_from(self.columns).unwrap_or(i32::MAX);
        let height = i32::try_from(self.rows).unwrap_or(i32::MAX);

        let bottom = (-1..=width).map(|x| Coord::new(x, -1));
        let left = (0..height).map(|y| Coord::new(-1, y));
        let top = (-1..=width).map(|x| Coord::new(x, height));
        let right = (0..height).map(|y| Coord::new(width, y));

        bottom.chain(left).chain(top).chain(right).collect()
    }

    fn index(&self, cell: Coord) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
