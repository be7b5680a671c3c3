#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

// ============================================================================
// Sides
// ============================================================================

// The six faces of a cell. North is +Y, East is +X, Top is the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum Side {
    North,
    South,
    East,
    West,
    Top,
    Bottom,
}

pub const NUM_SIDES: usize = 6;

impl Side {
    pub const ALL: [Self; NUM_SIDES] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Top,
        Self::Bottom,
    ];

    // Only these can be carved during generation
    pub const CARDINAL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        !matches!(self, Self::Top | Self::Bottom)
    }

    // Grid step (dx, dy) towards the neighbor on this side; zero for Top/Bottom.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Top | Self::Bottom => (0, 0),
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

// Index of a cell inside its grid's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

// Opaque texture slot, owned and interpreted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct TextureId(pub u32);

// ============================================================================
// Cell
// ============================================================================

// A unit square of the maze with up to six boundary walls. Neighbor links are
// indices into the owning grid; wall removal that must reach the neighbor
// lives on `Grid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    walls: [bool; NUM_SIDES],
    visited: bool,
    neighbors: [Option<CellId>; NUM_SIDES],
    textures: [TextureId; NUM_SIDES],
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            walls: [true; NUM_SIDES],
            visited: false,
            neighbors: [None; NUM_SIDES],
            textures: [TextureId(0); NUM_SIDES],
        }
    }

    pub const fn set_visited(&mut self, visited: bool) -> bool {
        self.visited = visited;
        visited
    }

    pub const fn set_texture(&mut self, side: Side, texture: TextureId) -> TextureId {
        self.textures[side.index()] = texture;
        texture
    }

    // Does not reciprocate; the grid builder links both directions.
    pub const fn set_neighbor(&mut self, side: Side, neighbor: Option<CellId>) -> Option<CellId> {
        self.neighbors[side.index()] = neighbor;
        neighbor
    }

    // Clear this cell's flag only. Use `Grid::remove_wall` to keep the neighbor in sync.
    pub(crate) const fn clear_wall(&mut self, side: Side) {
        self.walls[side.index()] = false;
    }

    #[must_use]
    pub const fn has_been_visited(&self) -> bool {
        self.visited
    }

    #[must_use]
    pub const fn has_wall_at(&self, side: Side) -> bool {
        self.walls[side.index()]
    }

    #[must_use]
    pub const fn has_neighbor_at(&self, side: Side) -> bool {
        self.neighbors[side.index()].is_some()
    }

    #[must_use]
    pub const fn neighbor_at(&self, side: Side) -> Option<CellId> {
        self.neighbors[side.index()]
    }

    #[must_use]
    pub const fn texture_at(&self, side: Side) -> TextureId {
        self.textures[side.index()]
    }

    #[must_use]
    pub const fn walls(&self) -> [bool; NUM_SIDES] {
        self.walls
    }

    #[must_use]
    pub const fn textures(&self) -> [TextureId; NUM_SIDES] {
        self.textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_closed_and_unlinked() {
        let cell = Cell::new();
        for side in Side::ALL {
            assert!(cell.has_wall_at(side));
            assert!(!cell.has_neighbor_at(side));
            assert_eq!(cell.texture_at(side), TextureId(0));
        }
        assert!(!cell.has_been_visited());
    }

    #[test]
    fn opposite_is_an_involution() {
        for side in Side::ALL {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn setters_return_the_new_value() {
        let mut cell = Cell::new();
        assert!(cell.set_visited(true));
        assert!(cell.has_been_visited());
        assert_eq!(cell.set_texture(Side::Top, TextureId(7)), TextureId(7));
        assert_eq!(cell.texture_at(Side::Top), TextureId(7));
        assert_eq!(cell.set_neighbor(Side::East, Some(CellId(3))), Some(CellId(3)));
        assert_eq!(cell.neighbor_at(Side::East), Some(CellId(3)));
        assert!(!cell.has_neighbor_at(Side::West));
    }

    #[test]
    fn clear_wall_touches_one_side() {
        let mut cell = Cell::new();
        cell.clear_wall(Side::North);
        assert!(!cell.has_wall_at(Side::North));
        assert!(cell.has_wall_at(Side::South));
    }
}
