//! Grid map representation and builder.
//!
//! # Data layout
//!
//! Cells are stored row-major in a flat `Vec<CellKind>`: the cell `(x, y)`
//! lives at index `y * width + x`.  A parallel `component` array labels every
//! walkable cell with its 4-connected component so that reachability checks
//! are O(1); non-walkable cells carry [`NO_COMPONENT`].

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use tracing::debug;

use wh_core::cell::NEIGHBOR_OFFSETS;
use wh_core::{Cell, ShelfId};

use crate::{GridError, GridResult};

/// Component label of non-walkable cells.
const NO_COMPONENT: u32 = u32::MAX;

// ── CellKind ──────────────────────────────────────────────────────────────────

/// The static state of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Free,
    Obstacle,
    /// A shelf pick face.  Walkable: workers stand here to pick.
    Shelf(ShelfId),
    /// A dock / packing station.  Walkable.
    Dock,
}

impl CellKind {
    #[inline]
    pub fn is_walkable(self) -> bool {
        !matches!(self, CellKind::Obstacle)
    }

    /// Single-character symbol used by the text map format.
    pub fn symbol(self) -> char {
        match self {
            CellKind::Free     => '.',
            CellKind::Obstacle => '#',
            CellKind::Shelf(_) => 'S',
            CellKind::Dock     => 'D',
        }
    }
}

// ── GridMap ───────────────────────────────────────────────────────────────────

/// A fixed-size 2-D walkability grid with named shelf and dock locations.
///
/// Do not construct directly; use [`GridMapBuilder`], [`crate::parse_map`],
/// [`GridMap::from_definition`](crate::MapDefinition) or
/// [`crate::standard_layout`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width:           u32,
    height:          u32,
    cells:           Vec<CellKind>,
    component:       Vec<u32>,
    component_count: u32,
    walkable_count:  usize,
    shelves:         BTreeMap<ShelfId, Cell>,
    docks:           Vec<Cell>,
}

impl GridMap {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.walkable_count
    }

    /// Number of 4-connected walkable components.
    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    #[inline]
    fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index % w) as i32, (index / w) as i32)
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    /// Kind of `cell`, or `None` if out of bounds.
    #[inline]
    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// `true` for in-bounds Free, Shelf and Dock cells.
    #[inline]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.kind(cell).is_some_and(CellKind::is_walkable)
    }

    /// Up to four walkable 4-connected neighbours of `cell`, always in
    /// [`NEIGHBOR_OFFSETS`] order so that search results are reproducible.
    #[inline]
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| cell.offset(dx, dy))
            .filter(move |&n| self.is_walkable(n))
    }

    /// Cost of moving between two adjacent cells.  Uniform.
    #[inline]
    pub fn cost(&self, from: Cell, to: Cell) -> u32 {
        debug_assert!(from == to || from.is_adjacent(to), "{from} -> {to} is not a single step");
        1
    }

    /// `true` if both cells are walkable and lie in the same component.
    #[inline]
    pub fn connected(&self, a: Cell, b: Cell) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    /// Component label of a walkable cell.
    #[inline]
    pub fn component_of(&self, cell: Cell) -> Option<u32> {
        self.index(cell)
            .map(|i| self.component[i])
            .filter(|&c| c != NO_COMPONENT)
    }

    /// Iterator over every walkable cell in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, k)| k.is_walkable())
            .map(|(i, _)| self.cell_at(i))
    }

    /// The walkable cell closest to `cell` by Manhattan distance (row-major
    /// first on ties).  `None` only if the map has no walkable cell.
    pub fn nearest_walkable(&self, cell: Cell) -> Option<Cell> {
        if self.is_walkable(cell) {
            return Some(cell);
        }
        self.walkable_cells().min_by_key(|c| c.manhattan(cell))
    }

    // ── Named locations ───────────────────────────────────────────────────

    pub fn shelf(&self, id: ShelfId) -> Option<Cell> {
        self.shelves.get(&id).copied()
    }

    /// All shelves in ascending `ShelfId` order.
    pub fn shelves(&self) -> impl Iterator<Item = (ShelfId, Cell)> + '_ {
        self.shelves.iter().map(|(&id, &c)| (id, c))
    }

    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// All dock cells in row-major order.
    pub fn docks(&self) -> &[Cell] {
        &self.docks
    }

    // ── Between-run mutation ──────────────────────────────────────────────

    /// Place (`blocked = true`) or remove an obstacle.
    ///
    /// Placing an obstacle over a shelf or dock removes that location;
    /// removing one leaves a Free cell.  Only valid between simulation runs:
    /// a running `Sim` hands out `&GridMap` exclusively.
    pub fn set_obstacle(&mut self, cell: Cell, blocked: bool) -> GridResult<()> {
        let i = self.index(cell).ok_or(GridError::OutOfBounds(cell))?;
        let new_kind = match (blocked, self.cells[i]) {
            (true, _)                 => CellKind::Obstacle,
            (false, CellKind::Obstacle) => CellKind::Free,
            (false, kind)             => kind,
        };
        if new_kind == self.cells[i] {
            return Ok(());
        }
        self.cells[i] = new_kind;
        self.reindex();
        Ok(())
    }

    /// Rebuild the shelf/dock indexes and component labels from `cells`.
    fn reindex(&mut self) {
        self.shelves.clear();
        self.docks.clear();
        for i in 0..self.cells.len() {
            let cell = self.cell_at(i);
            match self.cells[i] {
                CellKind::Shelf(id) => {
                    self.shelves.insert(id, cell);
                }
                CellKind::Dock => self.docks.push(cell),
                CellKind::Free | CellKind::Obstacle => {}
            }
        }
        self.walkable_count = self.cells.iter().filter(|k| k.is_walkable()).count();
        self.label_components();
    }

    /// Breadth-first flood fill over walkable cells, row-major seed order.
    fn label_components(&mut self) {
        self.component = vec![NO_COMPONENT; self.cells.len()];
        let mut next = 0u32;
        let mut queue = VecDeque::new();

        for seed in 0..self.cells.len() {
            if !self.cells[seed].is_walkable() || self.component[seed] != NO_COMPONENT {
                continue;
            }
            self.component[seed] = next;
            queue.push_back(seed);
            while let Some(i) = queue.pop_front() {
                let cell = self.cell_at(i);
                for (dx, dy) in NEIGHBOR_OFFSETS {
                    let Some(j) = self.index(cell.offset(dx, dy)) else { continue };
                    if self.cells[j].is_walkable() && self.component[j] == NO_COMPONENT {
                        self.component[j] = next;
                        queue.push_back(j);
                    }
                }
            }
            next += 1;
        }
        self.component_count = next;
    }
}

impl fmt::Display for GridMap {
    /// Renders the text map format accepted by [`crate::parse_map`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(|k| k.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// ── GridMapBuilder ────────────────────────────────────────────────────────────

/// Construct a [`GridMap`] incrementally, then call [`build`](Self::build).
///
/// Every cell starts Free.
///
/// # Example
///
/// ```
/// use wh_core::Cell;
/// use wh_grid::GridMapBuilder;
///
/// let mut b = GridMapBuilder::new(5, 5);
/// b.obstacle(Cell::new(2, 2)).unwrap();
/// let shelf = b.shelf(Cell::new(2, 1)).unwrap();
/// b.dock(Cell::new(0, 4)).unwrap();
/// let map = b.build().unwrap();
/// assert!(!map.is_walkable(Cell::new(2, 2)));
/// assert_eq!(map.shelf(shelf), Some(Cell::new(2, 1)));
/// ```
pub struct GridMapBuilder {
    width:      u32,
    height:     u32,
    cells:      Vec<CellKind>,
    next_shelf: u32,
}

impl GridMapBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Free; width as usize * height as usize],
            next_shelf: 0,
        }
    }

    fn index(&self, cell: Cell) -> GridResult<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x as u32 >= self.width || cell.y as u32 >= self.height {
            return Err(GridError::OutOfBounds(cell));
        }
        Ok(cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Overwrite the kind of one cell.
    pub fn set(&mut self, cell: Cell, kind: CellKind) -> GridResult<()> {
        let i = self.index(cell)?;
        self.cells[i] = kind;
        Ok(())
    }

    pub fn obstacle(&mut self, cell: Cell) -> GridResult<()> {
        self.set(cell, CellKind::Obstacle)
    }

    /// Mark every cell in the inclusive rectangle as an obstacle.
    pub fn obstacle_rect(&mut self, from: Cell, to: Cell) -> GridResult<()> {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.obstacle(Cell::new(x, y))?;
            }
        }
        Ok(())
    }

    /// Add a shelf pick face with the next sequential `ShelfId`.
    pub fn shelf(&mut self, cell: Cell) -> GridResult<ShelfId> {
        let id = ShelfId(self.next_shelf);
        self.shelf_with_id(cell, id)?;
        Ok(id)
    }

    /// Add a shelf pick face with an explicit id.  Duplicates are reported
    /// by [`build`](Self::build).
    pub fn shelf_with_id(&mut self, cell: Cell, id: ShelfId) -> GridResult<()> {
        self.set(cell, CellKind::Shelf(id))?;
        self.next_shelf = self.next_shelf.max(id.0.saturating_add(1));
        Ok(())
    }

    pub fn dock(&mut self, cell: Cell) -> GridResult<()> {
        self.set(cell, CellKind::Dock)
    }

    /// Validate and produce the [`GridMap`].
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyMap`] for a zero-area map.
    /// - [`GridError::DuplicateShelf`] if two cells share a `ShelfId`.
    pub fn build(self) -> GridResult<GridMap> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::EmptyMap { width: self.width, height: self.height });
        }

        let mut seen = std::collections::BTreeSet::new();
        for kind in &self.cells {
            if let CellKind::Shelf(id) = kind {
                if !seen.insert(*id) {
                    return Err(GridError::DuplicateShelf(*id));
                }
            }
        }

        let mut map = GridMap {
            width:           self.width,
            height:          self.height,
            cells:           self.cells,
            component:       Vec::new(),
            component_count: 0,
            walkable_count:  0,
            shelves:         BTreeMap::new(),
            docks:           Vec::new(),
        };
        map.reindex();

        debug!(
            width = map.width,
            height = map.height,
            walkable = map.walkable_count,
            components = map.component_count,
            shelves = map.shelves.len(),
            docks = map.docks.len(),
            "grid map built"
        );
        Ok(map)
    }
}
