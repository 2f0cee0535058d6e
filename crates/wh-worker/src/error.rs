use thiserror::Error;

use wh_core::{Cell, WorkerId};

use crate::WorkerState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The requested action is not defined for the worker's current state.
    #[error("{worker} cannot {action} while {from}")]
    IllegalTransition {
        worker: WorkerId,
        from:   WorkerState,
        action: &'static str,
    },

    #[error("{worker} stands on {position} but the path starts at {start}")]
    PathMismatch {
        worker:   WorkerId,
        position: Cell,
        start:    Cell,
    },

    #[error("unknown worker {0}")]
    UnknownWorker(WorkerId),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
