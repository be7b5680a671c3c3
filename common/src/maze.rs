use rand::Rng;
use std::collections::VecDeque;
use tracing::debug;

use crate::cell::{Cell, CellId, Side, TextureId};

// ============================================================================
// Grid
// ============================================================================

// Row-major arena of cells, indexed by `x + y * width`. Row 0 is the south edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    // Allocate a closed grid (all walls present, nothing visited) and link neighbors.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::new(); width * height],
        };

        for y in 0..height {
            for x in 0..width {
                grid.assign_neighbors(x, y);
            }
        }

        grid
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn index(&self, x: usize, y: usize) -> Option<CellId> {
        if x < self.width && y < self.height {
            Some(CellId(x + y * self.width))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn coords(&self, id: CellId) -> (usize, usize) {
        if self.width == 0 {
            return (0, 0);
        }
        (id.0 % self.width, id.0 / self.width)
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    #[must_use]
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).and_then(|id| self.cell(id))
    }

    // Cell on the other side of `side`, if any.
    #[must_use]
    pub fn neighbor(&self, id: CellId, side: Side) -> Option<CellId> {
        self.cell(id).and_then(|cell| cell.neighbor_at(side))
    }

    // Link the cell at (x, y) to its existing cardinal neighbors. Returns the
    // number of links made, or `None` when (x, y) is outside the grid.
    pub fn assign_neighbors(&mut self, x: usize, y: usize) -> Option<usize> {
        let id = self.index(x, y)?;
        let mut linked = 0;

        for side in Side::CARDINAL {
            let (dx, dy) = side.offset();
            let neighbor = x
                .checked_add_signed(dx)
                .zip(y.checked_add_signed(dy))
                .and_then(|(nx, ny)| self.index(nx, ny));

            self.cells[id.0].set_neighbor(side, neighbor);
            if neighbor.is_some() {
                linked += 1;
            }
        }

        Some(linked)
    }

    pub fn set_texture(&mut self, id: CellId, side: Side, texture: TextureId) -> Option<TextureId> {
        self.cells.get_mut(id.0).map(|cell| cell.set_texture(side, texture))
    }

    // Clear the wall on `side` and the matching wall of the neighbor behind it.
    pub fn remove_wall(&mut self, id: CellId, side: Side) {
        let mut pending = Some((id, side));

        while let Some((id, side)) = pending.take() {
            let Some(cell) = self.cells.get_mut(id.0) else {
                break;
            };
            cell.clear_wall(side);
            let neighbor = cell.neighbor_at(side);

            let opposite = side.opposite();
            pending = neighbor
                .filter(|neighbor| self.cells[neighbor.0].has_wall_at(opposite))
                .map(|neighbor| (neighbor, opposite));
        }
    }

    // Carve towards a uniformly chosen unvisited cardinal neighbor still behind a wall.
    pub fn remove_random_wall<R: Rng + ?Sized>(&mut self, id: CellId, rng: &mut R) -> Option<Side> {
        let cell = self.cell(id)?;
        let candidates: Vec<Side> = Side::CARDINAL
            .into_iter()
            .filter(|&side| {
                cell.has_wall_at(side)
                    && cell
                        .neighbor_at(side)
                        .is_some_and(|neighbor| !self.cells[neighbor.0].has_been_visited())
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let side = candidates[rng.random_range(0..candidates.len())];
        self.remove_wall(id, side);
        Some(side)
    }

    // Randomized depth-first backtracker from (0, 0). Leaves a spanning tree of passages.
    pub fn carve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(origin) = self.index(0, 0) else {
            return;
        };

        self.cells[origin.0].set_visited(true);
        let mut stack = vec![origin];

        while let Some(&current) = stack.last() {
            match self.remove_random_wall(current, rng) {
                Some(side) => {
                    let Some(next) = self.neighbor(current, side) else {
                        continue;
                    };
                    self.cells[next.0].set_visited(true);
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    // Remove `side` from every cell (used for ceilings).
    pub fn remove_wall_everywhere(&mut self, side: Side) {
        for index in 0..self.cells.len() {
            self.remove_wall(CellId(index), side);
        }
    }

    // ========================================================================
    // Topology checks
    // ========================================================================

    // Number of open walls between adjacent cells, each counted once.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Side::North, Side::East]
                    .into_iter()
                    .filter(|&side| cell.has_neighbor_at(side) && !cell.has_wall_at(side))
                    .count()
            })
            .sum()
    }

    // Breadth-first flood fill through open walls; returns how many cells it reached.
    #[must_use]
    pub fn reachable_from(&self, start: CellId) -> usize {
        if self.cell(start).is_none() {
            return 0;
        }

        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([start]);
        visited[start.0] = true;
        let mut count = 1;

        while let Some(id) = queue.pop_front() {
            let cell = &self.cells[id.0];
            for side in Side::CARDINAL {
                if cell.has_wall_at(side) {
                    continue;
                }
                let Some(next) = cell.neighbor_at(side) else {
                    continue;
                };
                if !visited[next.0] {
                    visited[next.0] = true;
                    count += 1;
                    queue.push_back(next);
                }
            }
        }

        count
    }

    #[must_use]
    pub fn all_cells_reachable(&self) -> bool {
        self.is_empty() || self.reachable_from(CellId(0)) == self.cells.len()
    }

    // Connected with exactly `n - 1` passages, so there are no cycles.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.is_empty() || (self.all_cells_reachable() && self.passage_count() == self.cells.len() - 1)
    }

    // Every wall agrees with the wall on the far side of it.
    #[must_use]
    pub fn walls_reciprocal(&self) -> bool {
        self.cells.iter().all(|cell| {
            Side::ALL.into_iter().all(|side| {
                cell.neighbor_at(side)
                    .is_none_or(|neighbor| self.cells[neighbor.0].has_wall_at(side.opposite()) == cell.has_wall_at(side))
            })
        })
    }
}

// Build and carve a `width × height` maze.
pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::new(width, height);
    grid.carve(rng);
    debug!(
        "carved {}x{} maze with {} passages",
        width,
        height,
        grid.passage_count()
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn neighbors_are_reciprocal() {
        let grid = Grid::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                let id = grid.index(x, y).expect("in range");
                for side in Side::CARDINAL {
                    if let Some(neighbor) = grid.neighbor(id, side) {
                        assert_eq!(grid.neighbor(neighbor, side.opposite()), Some(id));
                    }
                }
            }
        }
    }

    #[test]
    fn boundary_cells_have_no_outer_neighbors() {
        let grid = Grid::new(3, 2);
        let corner = grid.cell_at(0, 0).expect("corner");
        assert!(!corner.has_neighbor_at(Side::South));
        assert!(!corner.has_neighbor_at(Side::West));
        assert_eq!(corner.neighbor_at(Side::North), grid.index(0, 1));
        assert_eq!(corner.neighbor_at(Side::East), grid.index(1, 0));
        assert!(!grid.cell_at(2, 1).expect("corner").has_neighbor_at(Side::North));
    }

    #[test]
    fn assign_neighbors_counts_links_and_rejects_out_of_range() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(grid.assign_neighbors(1, 1), Some(4));
        assert_eq!(grid.assign_neighbors(0, 0), Some(2));
        assert_eq!(grid.assign_neighbors(2, 1), Some(3));
        assert_eq!(grid.assign_neighbors(3, 0), None);
    }

    #[test]
    fn remove_wall_clears_both_sides() {
        let mut grid = Grid::new(2, 1);
        let west = grid.index(0, 0).expect("west");
        let east = grid.index(1, 0).expect("east");
        grid.remove_wall(west, Side::East);
        assert!(!grid.cell(west).expect("west").has_wall_at(Side::East));
        assert!(!grid.cell(east).expect("east").has_wall_at(Side::West));
        assert!(grid.walls_reciprocal());
    }

    #[test]
    fn remove_wall_on_boundary_only_touches_one_cell() {
        let mut grid = Grid::new(2, 1);
        let west = grid.index(0, 0).expect("west");
        grid.remove_wall(west, Side::South);
        assert!(!grid.cell(west).expect("west").has_wall_at(Side::South));
        assert!(grid.cell_at(1, 0).expect("east").has_wall_at(Side::South));
    }

    #[test]
    fn remove_random_wall_skips_visited_neighbors() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(2, 1);
        let west = grid.index(0, 0).expect("west");
        let east = grid.index(1, 0).expect("east");
        grid.cells[east.0].set_visited(true);
        assert_eq!(grid.remove_random_wall(west, &mut rng), None);

        grid.cells[east.0].set_visited(false);
        assert_eq!(grid.remove_random_wall(west, &mut rng), Some(Side::East));
        // Wall already open now, so nothing is left to carve
        assert_eq!(grid.remove_random_wall(west, &mut rng), None);
    }

    #[test]
    fn carve_visits_every_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = generate(7, 4, &mut rng);
        assert!(grid.cells().iter().all(Cell::has_been_visited));
        assert!(grid.is_perfect());
    }

    #[test]
    fn single_and_empty_grids_are_trivial() {
        let mut rng = StdRng::seed_from_u64(0);
        let single = generate(1, 1, &mut rng);
        assert!(single.cells()[0].has_been_visited());
        assert!(Side::ALL.iter().all(|&side| single.cells()[0].has_wall_at(side)));
        assert_eq!(single.passage_count(), 0);

        let empty = generate(0, 5, &mut rng);
        assert!(empty.is_empty());
        assert!(empty.is_perfect());
    }
}
