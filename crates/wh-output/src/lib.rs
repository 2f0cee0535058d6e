//! `wh-output` — simulation output writers for the warehouse picking
//! simulator.
//!
//! | Backend | Files created                                                          |
//! |---------|------------------------------------------------------------------------|
//! | CSV     | `positions.csv`, `transitions.csv`, `worker_summary.csv`, `order_summary.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `wh_sim::SimObserver`.  A run is
//! deterministic, so two runs with the same inputs produce byte-identical
//! files.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wh_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{OrderSummaryRow, PositionRow, TransitionKind, TransitionRow, WorkerSummaryRow};
pub use writer::OutputWriter;
