//! `wh-worker` — the per-worker task state machine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`worker`] | `Worker`, `WorkerState`, `WorkerTransition`                |
//! | [`store`]  | `WorkerStore` — all workers of a run, id-indexed           |
//! | [`error`]  | `WorkerError`, `WorkerResult<T>`                           |
//!
//! Workers hold a lightweight [`wh_order::OrderRef`] to their active order;
//! the ledger in `wh-order` stays the only writer of order status.  Workers
//! never touch each other: the only shared coordination state is the
//! reservation table owned by the stepper.

pub mod error;
pub mod store;
pub mod worker;


pub use error::{WorkerError, WorkerResult};
pub use store::WorkerStore;
pub use worker::{Worker, WorkerState, WorkerTransition};
