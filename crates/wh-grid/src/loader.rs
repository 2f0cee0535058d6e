//! Map loading.
//!
//! # Text format
//!
//! One line per row, one symbol per cell.  Row 0 is `y = 0`.
//!
//! ```text
//! ..S..
//! .##..
//! ..S..
//! D....
//! ```
//!
//! | Symbol | Cell kind                                          |
//! |--------|----------------------------------------------------|
//! | `.`    | Free                                               |
//! | `#`    | Obstacle                                           |
//! | `S`    | Shelf — ids assigned in row-major order from 0     |
//! | `D`    | Dock                                               |
//!
//! Blank lines before the first and after the last row are ignored.  All
//! rows must have the same length.
//!
//! # Structured format
//!
//! [`MapDefinition`] carries the same information as coordinate lists and is
//! `serde`-serializable with the `serde` feature, so applications can keep
//! layouts in whatever config format they already use.

use std::path::Path;

use wh_core::{Cell, ShelfId};

use crate::{CellKind, GridError, GridMap, GridMapBuilder, GridResult};

// ── Text format ───────────────────────────────────────────────────────────────

/// Parse a map from its text representation.
pub fn parse_map(text: &str) -> GridResult<GridMap> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .enumerate()
        .collect();

    let first = lines.iter().position(|(_, l)| !l.trim().is_empty());
    let last = lines.iter().rposition(|(_, l)| !l.trim().is_empty());
    let rows = match (first, last) {
        (Some(a), Some(b)) => &lines[a..=b],
        _ => return Err(GridError::EmptyMap { width: 0, height: 0 }),
    };

    let width = rows[0].1.chars().count();
    let height = rows.len();
    let mut b = GridMapBuilder::new(width as u32, height as u32);

    for (y, &(line_no, row)) in rows.iter().enumerate() {
        let len = row.chars().count();
        if len != width {
            return Err(GridError::Parse {
                line: line_no + 1,
                msg:  format!("row has {len} cells, expected {width}"),
            });
        }
        for (x, symbol) in row.chars().enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            match symbol {
                '.' => {}
                '#' => b.obstacle(cell)?,
                'S' => {
                    b.shelf(cell)?;
                }
                'D' => b.dock(cell)?,
                other => {
                    return Err(GridError::Parse {
                        line: line_no + 1,
                        msg:  format!("unknown map symbol {other:?} at column {}", x + 1),
                    });
                }
            }
        }
    }

    b.build()
}

/// Read and parse a text map file.
pub fn load_map(path: &Path) -> GridResult<GridMap> {
    let text = std::fs::read_to_string(path)?;
    parse_map(&text)
}

// ── Structured format ─────────────────────────────────────────────────────────

/// Coordinate-list map definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDefinition {
    pub width:     u32,
    pub height:    u32,
    pub obstacles: Vec<Cell>,
    pub shelves:   Vec<(ShelfId, Cell)>,
    pub docks:     Vec<Cell>,
}

impl GridMap {
    /// Build a map from a [`MapDefinition`].
    pub fn from_definition(def: &MapDefinition) -> GridResult<GridMap> {
        let mut b = GridMapBuilder::new(def.width, def.height);
        for &cell in &def.obstacles {
            b.obstacle(cell)?;
        }
        for &(id, cell) in &def.shelves {
            b.shelf_with_id(cell, id)?;
        }
        for &cell in &def.docks {
            b.dock(cell)?;
        }
        b.build()
    }

    /// Export the map as a [`MapDefinition`] (row-major order).
    pub fn to_definition(&self) -> MapDefinition {
        let mut def = MapDefinition {
            width:  self.width(),
            height: self.height(),
            ..MapDefinition::default()
        };
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let cell = Cell::new(x, y);
                match self.kind(cell) {
                    Some(CellKind::Obstacle)  => def.obstacles.push(cell),
                    Some(CellKind::Shelf(id)) => def.shelves.push((id, cell)),
                    Some(CellKind::Dock)      => def.docks.push(cell),
                    Some(CellKind::Free) | None => {}
                }
            }
        }
        def
    }
}
