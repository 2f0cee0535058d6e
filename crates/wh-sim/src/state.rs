//! `SimulationState` — the mutable aggregate a run threads through its ticks.

use wh_core::{Cell, SimClock, Tick, WorkerId};
use wh_order::OrderDispatcher;
use wh_plan::ReservationTable;
use wh_worker::WorkerStore;

use crate::{OrderSummary, RunSummary, WorkerSummary};

/// Everything that changes during a run.
///
/// There is no global state: two `Sim`s in one process each own one of
/// these and never interfere.  It is created by
/// [`SimBuilder::build`](crate::SimBuilder::build) and only replaced by
/// building a new simulation.
#[derive(Debug)]
pub struct SimulationState {
    pub clock:        SimClock,
    pub workers:      WorkerStore,
    pub dispatcher:   OrderDispatcher,
    /// Reservations from the current tick onward, as committed at the end
    /// of the previous tick.
    pub reservations: ReservationTable,
}

impl SimulationState {
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Rebuild the reservation table from committed positions at time `at`.
    ///
    /// Reserves, in ascending worker id order:
    ///
    /// - every worker's position at `at`;
    /// - for a worker following a path, the rest of its path at `at + 1`,
    ///   `at + 2`, … up to the first cell someone else already holds;
    /// - for any other worker, its position for `hold` more ticks.
    pub fn rebuild_reservations(&mut self, at: Tick, hold: u64) {
        let table = &mut self.reservations;
        table.clear();

        for w in self.workers.iter() {
            // Positions are distinct, so this cannot conflict.
            let _ = table.try_reserve(w.position, at, w.id);
        }
        for w in self.workers.iter() {
            let rest = w.remaining_path();
            if rest.is_empty() {
                for k in 1..=hold {
                    if table.try_reserve(w.position, at + k, w.id).is_err() {
                        break;
                    }
                }
            } else {
                table.reserve_path(w.id, rest, at + 1);
            }
        }
    }

    /// Where an idle `worker` on `from` should step aside to, arriving at
    /// `at`.
    ///
    /// The first walkable neighbour that no other worker stands on and that
    /// is free at `at` and `at + 1`; failing that, the first one free at
    /// `at` alone.
    pub fn side_step(&self, grid: &wh_grid::GridMap, worker: WorkerId, from: Cell, at: Tick) -> Option<Cell> {
        let candidates: Vec<Cell> = grid
            .neighbors(from)
            .filter(|&n| {
                self.workers.occupant(n).is_none()
                    && self.reservations.is_free_for(n, at, worker)
                    && !self.reservations.is_swap_for(from, n, at, worker)
            })
            .collect();
        candidates
            .iter()
            .copied()
            .find(|&n| self.reservations.is_free_for(n, at + 1, worker))
            .or_else(|| candidates.first().copied())
    }

    /// Snapshot totals.
    pub fn summary(&self) -> RunSummary {
        let workers = self
            .workers
            .iter()
            .map(|w| WorkerSummary {
                id:                w.id,
                distance_traveled: w.distance_traveled,
                idle_ticks:        w.idle_ticks,
                orders_completed:  w.orders_completed,
            })
            .collect();
        let orders = self
            .dispatcher
            .book()
            .iter()
            .map(|o| OrderSummary {
                id:           o.id,
                status:       o.status,
                created_at:   o.created_at,
                completed_at: o.completed_at,
                failure:      o.failure,
            })
            .collect();
        RunSummary {
            final_tick: self.now(),
            workers,
            orders,
            rejected_orders: self.dispatcher.rejected_count(),
        }
    }
}
