//! Grid-subsystem error type.

use thiserror::Error;

use wh_core::{Cell, ShelfId};

/// Errors produced by `wh-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("map has zero area ({width}x{height})")]
    EmptyMap { width: u32, height: u32 },

    #[error("cell {0} is outside the map")]
    OutOfBounds(Cell),

    #[error("shelf {0} is defined more than once")]
    DuplicateShelf(ShelfId),

    #[error("map parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
