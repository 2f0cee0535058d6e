//! The `Path` value type.

use wh_core::Cell;

use crate::{PlanError, PlanResult};

/// An ordered, immutable sequence of cells from start to goal, both
/// inclusive.
///
/// Consecutive cells are either equal (a wait) or 4-adjacent (a move).
/// Entry `i` is where the worker stands `i` ticks after departure, so
/// `ticks() == len() - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// Validate and wrap a cell sequence.
    ///
    /// # Errors
    ///
    /// [`PlanError::MalformedPath`] if `cells` is empty or contains a jump.
    pub fn new(cells: Vec<Cell>) -> PlanResult<Path> {
        if cells.is_empty() {
            return Err(PlanError::MalformedPath("empty path".into()));
        }
        if let Some(w) = cells.windows(2).find(|w| w[0] != w[1] && !w[0].is_adjacent(w[1])) {
            return Err(PlanError::MalformedPath(format!("{} -> {} is not a single step", w[0], w[1])));
        }
        Ok(Path { cells })
    }

    /// The length-1 path for `start == goal`.
    pub fn trivial(cell: Cell) -> Path {
        Path { cells: vec![cell] }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<Cell> {
        self.cells.get(i).copied()
    }

    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    pub fn goal(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Number of cells (always ≥ 1).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Ticks needed to follow the path: moves plus waits.
    pub fn ticks(&self) -> usize {
        self.cells.len() - 1
    }

    /// Number of cell-changing steps.
    pub fn moves(&self) -> usize {
        self.cells.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Number of wait-in-place steps.
    pub fn waits(&self) -> usize {
        self.ticks() - self.moves()
    }

    /// `true` if start and goal coincide and no step is taken.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() == 1
    }
}
