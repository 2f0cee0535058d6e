use thiserror::Error;

use wh_core::WhError;
use wh_grid::GridError;
use wh_order::OrderError;
use wh_plan::PlanError;
use wh_worker::WorkerError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Construction-time invariant violation; the simulation does not start.
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] WhError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("order error: {0}")]
    Order(#[from] OrderError),

    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("planning error: {0}")]
    Plan(#[from] PlanError),
}

pub type SimResult<T> = Result<T, SimError>;
