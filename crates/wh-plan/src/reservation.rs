//! The reservation ledger.
//!
//! # Invariant
//!
//! At most one worker holds any `(Cell, Tick)` key.  [`ReservationTable::try_reserve`]
//! refuses a second holder with [`PlanError::ReservationConflict`], so the
//! invariant holds by construction no matter how callers use the table.
//!
//! # Lifecycle
//!
//! `wh-sim` clears and rebuilds the table at the end of every tick from the
//! committed worker positions and their remaining paths.  During the
//! planning phase it is shared read-only by every planner call.

use wh_core::{Cell, Tick, WorkerId};

use crate::{HashMap, PlanError, PlanResult};

/// Per-tick cell occupancy ledger used for collision avoidance.
#[derive(Debug, Default, Clone)]
pub struct ReservationTable {
    slots:  HashMap<(Cell, Tick), WorkerId>,
    latest: Option<Tick>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every reservation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.latest = None;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The latest tick carrying any reservation.  Beyond it the world is
    /// static as far as planners are concerned.
    pub fn latest_tick(&self) -> Option<Tick> {
        self.latest
    }

    /// Bind `cell` at `tick` to `worker`.
    ///
    /// Re-reserving a key the same worker already holds is a no-op.
    pub fn try_reserve(&mut self, cell: Cell, tick: Tick, worker: WorkerId) -> PlanResult<()> {
        match self.slots.get(&(cell, tick)) {
            Some(&holder) if holder != worker => {
                Err(PlanError::ReservationConflict { cell, tick, holder })
            }
            Some(_) => Ok(()),
            None => {
                self.slots.insert((cell, tick), worker);
                self.latest = Some(self.latest.map_or(tick, |t| t.max(tick)));
                Ok(())
            }
        }
    }

    /// Reserve `cells[i]` at `first + i` for each `i`, stopping at the first
    /// conflict.  Returns how many cells were reserved.
    ///
    /// A worker cannot rely on anything past a conflict, so the rest of its
    /// path is left unreserved.
    pub fn reserve_path(&mut self, worker: WorkerId, cells: &[Cell], first: Tick) -> usize {
        for (i, &cell) in cells.iter().enumerate() {
            if self.try_reserve(cell, first + i as u64, worker).is_err() {
                return i;
            }
        }
        cells.len()
    }

    /// The worker holding `cell` at `tick`, if any.
    #[inline]
    pub fn holder(&self, cell: Cell, tick: Tick) -> Option<WorkerId> {
        self.slots.get(&(cell, tick)).copied()
    }

    /// `true` if `cell` at `tick` is unreserved or held by `worker` itself.
    #[inline]
    pub fn is_free_for(&self, cell: Cell, tick: Tick, worker: WorkerId) -> bool {
        self.holder(cell, tick).is_none_or(|h| h == worker)
    }

    /// `true` if moving `from → to`, arriving at `arrive`, would swap cells
    /// with another worker that holds `to` just before and `from` at
    /// `arrive` (an edge conflict).
    pub fn is_swap_for(&self, from: Cell, to: Cell, arrive: Tick, worker: WorkerId) -> bool {
        if arrive.0 == 0 {
            return false;
        }
        let before = Tick(arrive.0 - 1);
        match (self.holder(to, before), self.holder(from, arrive)) {
            (Some(a), Some(b)) => a == b && a != worker,
            _ => false,
        }
    }

    /// Drop reservations strictly before `tick`.
    pub fn prune_before(&mut self, tick: Tick) {
        self.slots.retain(|&(_, t), _| t >= tick);
        if self.slots.is_empty() {
            self.latest = None;
        }
    }

    /// Every reservation, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Tick, WorkerId)> + '_ {
        self.slots.iter().map(|(&(c, t), &w)| (c, t, w))
    }
}
