//! CSV order schedule loader.
//!
//! # CSV format
//!
//! One row per order, released into the dispatcher at `release_tick`.
//! `priority` may be left empty (defaults to 0).
//!
//! ```csv
//! release_tick,pickup_x,pickup_y,delivery_x,delivery_y,priority
//! 0,3,1,1,13,2
//! 0,6,5,1,13,
//! 12,9,2,1,13,1
//! ```
//!
//! Rows need not be sorted.  Cells are not validated here; the dispatcher
//! rejects bad ones at submission.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use wh_core::{Cell, Tick};

use crate::{OrderError, OrderRequest, OrderResult, ScheduledOrders};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OrderRecord {
    release_tick: u64,
    pickup_x:     i32,
    pickup_y:     i32,
    delivery_x:   i32,
    delivery_y:   i32,
    priority:     Option<i32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`ScheduledOrders`] source from a CSV file.
pub fn load_orders_csv(path: &Path) -> OrderResult<ScheduledOrders> {
    let file = std::fs::File::open(path).map_err(OrderError::Io)?;
    load_orders_reader(file)
}

/// Like [`load_orders_csv`] but accepts any `Read` source.
pub fn load_orders_reader<R: Read>(reader: R) -> OrderResult<ScheduledOrders> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut orders = ScheduledOrders::new();

    for result in csv_reader.deserialize::<OrderRecord>() {
        let row = result.map_err(|e| OrderError::Parse(e.to_string()))?;
        let request = OrderRequest {
            pickup:   Cell::new(row.pickup_x, row.pickup_y),
            delivery: Cell::new(row.delivery_x, row.delivery_y),
            priority: row.priority.unwrap_or(0),
        };
        orders.push(Tick(row.release_tick), request);
    }

    Ok(orders)
}
