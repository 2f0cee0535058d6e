//! `wh-core` — foundational types for the warehouse picking simulator.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no
//! `wh-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `WorkerId`, `OrderId`, `ShelfId`                      |
//! | [`cell`]    | `Cell`, Manhattan distance, 4-neighbour offsets       |
//! | [`time`]    | `Tick`, `SimClock`                                    |
//! | [`config`]  | `SimConfig`, `SearchLimits`                           |
//! | [`rng`]     | `SimRng` (seedable, deterministic)                    |
//! | [`error`]   | `WhError`, `WhResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::Cell;
pub use config::{SearchLimits, SimConfig};
pub use error::{WhError, WhResult};
pub use ids::{OrderId, ShelfId, WorkerId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
