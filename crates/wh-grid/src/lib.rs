//! `wh-grid` — the static warehouse floor.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`map`]    | `GridMap`, `CellKind`, `GridMapBuilder`                      |
//! | [`loader`] | `parse_map`, `load_map`, `MapDefinition`                     |
//! | [`layout`] | `standard_layout` — rack aisles with a dock                  |
//! | [`error`]  | `GridError`, `GridResult<T>`                                 |
//!
//! # Movement model
//!
//! The floor is a 4-connected grid with unit edge cost.  Free, Shelf and
//! Dock cells are walkable; Obstacle cells and anything outside the map are
//! not.  A `GridMap` is immutable for the duration of a run; obstacles may
//! only be changed between runs via [`GridMap::set_obstacle`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `MapDefinition` and `CellKind`. |

pub mod error;
pub mod layout;
pub mod loader;
pub mod map;


pub use error::{GridError, GridResult};
pub use layout::standard_layout;
pub use loader::{MapDefinition, load_map, parse_map};
pub use map::{CellKind, GridMap, GridMapBuilder};
