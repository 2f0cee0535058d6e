//! `wh-sim` — the discrete-time stepper of the warehouse picking simulator.
//!
//! # Tick pipeline
//!
//! ```text
//! for tick in now..config.end_tick():
//!   ⓪ Orders    — poll the OrderSource; invalid requests are counted and
//!                 logged, valid ones become Pending.
//!   ① Arrivals  — workers on the last cell of their path pick (→ order
//!                 InProgress) or deliver (→ order Completed, worker Idle).
//!   ② Planning  — workers holding a leg without a path query the
//!                 PathPlanner against last tick's reservations (parallel
//!                 with the `parallel` feature).  Repeatedly blocked workers
//!                 discard their path first; idle workers asked to yield pick
//!                 a side step.
//!   ③ Requests  — every worker with a path requests its next cell.
//!   ④ Resolve   — one cell per worker, no swaps; lower id wins a contested
//!                 cell.
//!   ⑤ Commit    — granted moves and waits advance; refused movers block.
//!   ⑥ Dispatch  — Pending orders go to the nearest idle workers.
//!   ⑦ Reserve   — rebuild the reservation table from the committed state.
//! ```
//!
//! Workers are always processed in ascending [`WorkerId`](wh_core::WorkerId)
//! order, so a run is fully determined by its config, map, initial orders
//! and seed.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the planning phase on Rayon's thread pool.        |
//! | `fx-hash`  | FxHash maps in conflict resolution and reservations.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_core::{Cell, SimConfig};
//! use wh_grid::standard_layout;
//! use wh_order::OrderRequest;
//! use wh_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::astar(SimConfig::default(), standard_layout(20, 15)?)
//!     .workers(vec![Cell::new(0, 0), Cell::new(1, 0)])
//!     .orders(vec![OrderRequest::new(Cell::new(5, 3), Cell::new(0, 14))])
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod resolve;
pub mod sim;
pub mod state;
pub mod stop;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::{OrderSummary, RunOutcome, RunSummary, TickEvent, WorkerPosition, WorkerSummary};
pub use observer::{EventLog, NoopObserver, SimObserver};
pub use resolve::{MoveRequest, Refusal, Resolution, resolve_moves};
pub use sim::Sim;
pub use state::SimulationState;
pub use stop::StopHandle;

#[cfg(feature = "fx-hash")]
pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V>;
