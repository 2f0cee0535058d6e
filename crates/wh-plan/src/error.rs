//! Planning error type.

use std::fmt;

use thiserror::Error;

use wh_core::{Cell, Tick, WorkerId};

/// Why a search gave up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnreachableReason {
    /// Start and goal lie in different walkable components.
    Disconnected,
    StartNotWalkable,
    GoalNotWalkable,
    /// The expanded-node budget ran out.
    ExpansionLimit,
    /// Every remaining partial path reached the path-length horizon.
    HorizonLimit,
    /// Reservations closed off every continuation.
    Blocked,
}

impl fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnreachableReason::Disconnected     => "start and goal are disconnected",
            UnreachableReason::StartNotWalkable => "start cell is not walkable",
            UnreachableReason::GoalNotWalkable  => "goal cell is not walkable",
            UnreachableReason::ExpansionLimit   => "expansion limit reached",
            UnreachableReason::HorizonLimit     => "path-length horizon reached",
            UnreachableReason::Blocked          => "all continuations are reserved",
        };
        f.write_str(s)
    }
}

/// Errors produced by `wh-plan`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("no path from {from} to {to}: {reason}")]
    Unreachable {
        from:   Cell,
        to:     Cell,
        reason: UnreachableReason,
    },

    /// Not a fault: the stepper treats this as "someone else got there first".
    #[error("{cell} at {tick} is already reserved by {holder}")]
    ReservationConflict {
        cell:   Cell,
        tick:   Tick,
        holder: WorkerId,
    },

    #[error("malformed path: {0}")]
    MalformedPath(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
