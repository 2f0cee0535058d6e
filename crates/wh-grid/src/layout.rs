//! Reference warehouse layout.
//!
//! ```text
//! ..........     x = 2, 5, 8, … : rack columns (obstacles)
//! ..#S.#S...     x = 3, 6, 9, … : shelf pick faces beside each rack
//! ..#S.#S...     every 4th row  : cross-aisle, no racks
//! ..#S.#S...
//! ..........
//! .D#S.#S...     (1, height-2)  : dock
//! ..........
//! ```

use wh_core::Cell;

use crate::{GridMap, GridMapBuilder, GridResult};

/// Build the reference layout: vertical rack columns every third column with
/// a pick face on their right, cross-aisles every fourth row, and a single
/// dock near the bottom-left corner.
pub fn standard_layout(width: u32, height: u32) -> GridResult<GridMap> {
    let mut b = GridMapBuilder::new(width, height);
    let (w, h) = (width as i32, height as i32);

    let mut x = 2;
    while x < w - 2 {
        for y in 1..h - 1 {
            if y % 4 == 0 {
                continue;
            }
            b.obstacle(Cell::new(x, y))?;
            b.shelf(Cell::new(x + 1, y))?;
        }
        x += 3;
    }

    if w > 1 && h > 1 {
        let dock = Cell::new(1, h - 2);
        b.dock(dock)?;
    }
    b.build()
}
