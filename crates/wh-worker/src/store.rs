//! `WorkerStore` — every worker of a run, indexed by `WorkerId`.

use wh_core::{Cell, WorkerId};

use crate::{Worker, WorkerError, WorkerResult};

/// Dense worker storage.  `WorkerId(i)` is the `i`-th start cell passed to
/// [`WorkerStore::new`]; workers are never added or removed during a run.
///
/// All iteration is in ascending id order, which the stepper relies on for
/// deterministic phase ordering.
#[derive(Debug, Clone, Default)]
pub struct WorkerStore {
    workers: Vec<Worker>,
}

impl WorkerStore {
    pub fn new(starts: &[Cell]) -> Self {
        let workers = starts
            .iter()
            .enumerate()
            .map(|(i, &c)| Worker::new(WorkerId::from_index(i), c))
            .collect();
        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    #[inline]
    pub fn get(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: WorkerId) -> WorkerResult<&mut Worker> {
        self.workers.get_mut(id.index()).ok_or(WorkerError::UnknownWorker(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Worker> {
        self.workers.iter_mut()
    }

    /// Idle workers with their positions, ascending id.
    pub fn idle(&self) -> Vec<(WorkerId, Cell)> {
        self.workers
            .iter()
            .filter(|w| w.state().is_idle())
            .map(|w| (w.id, w.position))
            .collect()
    }

    /// Every worker's position, ascending id.
    pub fn positions(&self) -> Vec<(WorkerId, Cell)> {
        self.workers.iter().map(|w| (w.id, w.position)).collect()
    }

    /// The worker standing on `cell`, if any.
    pub fn occupant(&self, cell: Cell) -> Option<WorkerId> {
        self.workers.iter().find(|w| w.position == cell).map(|w| w.id)
    }
}
