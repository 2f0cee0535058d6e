//! `wh-order` — orders, the dispatcher, and order sources.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`order`]      | `Order`, `OrderStatus`, `OrderRequest`, `OrderRef`, `Leg`, `FailureReason`, `OrderTransition` |
//! | [`book`]       | `OrderBook` — append-only ledger indexed by `OrderId`      |
//! | [`dispatcher`] | `OrderDispatcher` — priority queue + nearest-idle dispatch |
//! | [`source`]     | `OrderSource` trait, `NoOrders`, `ScheduledOrders`, `RandomOrderSource` |
//! | [`loader`]     | `load_orders_csv`, `load_orders_reader`                    |
//! | [`error`]      | `OrderError`, `OrderResult<T>`                             |
//!
//! # Ownership
//!
//! The dispatcher's [`OrderBook`] owns every `Order` record for the whole
//! run.  A worker serving an order carries only an [`OrderRef`] and reports
//! progress back through the dispatcher's lifecycle methods, so there is a
//! single writer for order state.

pub mod book;
pub mod dispatcher;
pub mod error;
pub mod loader;
pub mod order;
pub mod source;


pub use book::OrderBook;
pub use dispatcher::OrderDispatcher;
pub use error::{InvalidCell, OrderError, OrderResult};
pub use loader::{load_orders_csv, load_orders_reader};
pub use order::{FailureReason, Leg, Order, OrderRef, OrderRequest, OrderStatus, OrderTransition};
pub use source::{NoOrders, OrderSource, RandomOrderConfig, RandomOrderSource, ScheduledOrders};
