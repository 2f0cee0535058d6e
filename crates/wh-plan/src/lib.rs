//! `wh-plan` — paths, reservations, and space-time A*.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`path`]        | `Path` — immutable start-to-goal cell sequence          |
//! | [`reservation`] | `ReservationTable` — `(Cell, Tick) → WorkerId` ledger   |
//! | [`planner`]     | `PathPlanner` trait, `PathQuery`, `AStarPlanner`        |
//! | [`error`]       | `PlanError`, `UnreachableReason`, `PlanResult<T>`       |
//!
//! # Pluggability
//!
//! `wh-sim` calls planning through the [`PathPlanner`] trait, so applications
//! can swap in another search (e.g. a cached or conflict-based planner)
//! without touching the stepper.  The default [`AStarPlanner`] searches the
//! space-time graph: a state is `(cell, tick)` and waiting in place is a
//! move with cost 1.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash maps for the reservation table and search sets.    |

pub mod error;
pub mod path;
pub mod planner;
pub mod reservation;


pub use error::{PlanError, PlanResult, UnreachableReason};
pub use path::Path;
pub use planner::{AStarPlanner, PathPlanner, PathQuery};
pub use reservation::ReservationTable;

#[cfg(feature = "fx-hash")]
pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(feature = "fx-hash")]
pub(crate) type HashSet<K> = rustc_hash::FxHashSet<K>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type HashSet<K> = std::collections::HashSet<K>;
