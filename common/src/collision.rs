use crate::{
    cell::{Cell, Side},
    maze::Grid,
};

// ============================================================================
// Legality Oracle
// ============================================================================

// Answers whether a character of a given radius may stand at (x, y).
pub trait Terrain {
    fn is_legal_position(&self, x: f32, y: f32, radius: f32) -> bool;
}

// Whether a circle of `radius` at the in-cell offset crosses one of the cell's
// cardinal walls. Touching a wall counts as crossing it. Corners are not tested.
#[must_use]
pub fn crosses_wall(cell: &Cell, offset_x: f32, offset_y: f32, radius: f32) -> bool {
    (cell.has_wall_at(Side::North) && offset_y + radius >= 1.0)
        || (cell.has_wall_at(Side::South) && offset_y - radius <= 0.0)
        || (cell.has_wall_at(Side::East) && offset_x + radius >= 1.0)
        || (cell.has_wall_at(Side::West) && offset_x - radius <= 0.0)
}

impl Terrain for Grid {
    fn is_legal_position(&self, x: f32, y: f32, radius: f32) -> bool {
        let width = self.width() as f32;
        let height = self.height() as f32;

        // Written this way so NaN is rejected too
        if !(x >= 0.0 && x <= width && y >= 0.0 && y <= height) {
            return false;
        }

        let col = x.trunc();
        let row = y.trunc();
        let Some(cell) = self.cell_at(col as usize, row as usize) else {
            return false;
        };

        !crosses_wall(cell, x - col, y - row, radius)
    }
}
