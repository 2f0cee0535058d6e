use std::fmt;

use thiserror::Error;

use wh_core::{Cell, OrderId};

use crate::OrderStatus;

/// Why a submitted pickup or delivery cell was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidCell {
    OutOfBounds,
    Obstacle,
}

impl fmt::Display for InvalidCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvalidCell::OutOfBounds => "outside the map",
            InvalidCell::Obstacle    => "an obstacle",
        })
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    /// Rejected at submission; the order never enters the queue.
    #[error("invalid order: {cell} is {reason}")]
    InvalidOrder { cell: Cell, reason: InvalidCell },

    #[error("unknown order {0}")]
    UnknownOrder(OrderId),

    #[error("{order} cannot move from {from} to {to}")]
    IllegalStatus {
        order: OrderId,
        from:  OrderStatus,
        to:    OrderStatus,
    },

    #[error("order schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OrderResult<T> = Result<T, OrderError>;
