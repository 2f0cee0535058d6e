//! `OrderDispatcher` — pending-order queue and greedy assignment.
//!
//! # Queue order
//!
//! Pending orders sit in a binary heap keyed by
//! `(priority desc, created_at asc, id asc)`.  Equal-priority orders are
//! therefore served strictly FIFO, so no reachable order can be overtaken
//! forever by later arrivals of the same priority.
//!
//! # Assignment
//!
//! [`OrderDispatcher::assign_pending`] pops the best order and binds it to
//! the idle worker nearest (Manhattan) to its pickup cell, lowest worker id
//! on ties, until orders or idle workers run out.  Greedy, not an optimal
//! matching.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

use wh_core::{Cell, OrderId, Tick, WorkerId};
use wh_grid::GridMap;

use crate::{
    FailureReason, InvalidCell, Order, OrderBook, OrderError, OrderRequest, OrderResult,
    OrderStatus, OrderTransition,
};

// ── Queue key ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct PendingKey {
    priority:   i32,
    created_at: Tick,
    id:         OrderId,
}

impl Ord for PendingKey {
    /// Greatest = served first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for PendingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── OrderDispatcher ───────────────────────────────────────────────────────────

/// Owns the order ledger and the pending queue.
///
/// Every status change is also appended to an internal transition buffer
/// that the stepper drains once per tick into its `TickEvent`.
#[derive(Debug, Default)]
pub struct OrderDispatcher {
    book:        OrderBook,
    pending:     BinaryHeap<PendingKey>,
    transitions: Vec<OrderTransition>,
    rejected:    usize,
}

impl OrderDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Submission ────────────────────────────────────────────────────────

    /// Validate and enqueue an order created at `now`.
    ///
    /// # Errors
    ///
    /// [`OrderError::InvalidOrder`] if the pickup or delivery cell is out of
    /// bounds or an obstacle.  The order is counted as rejected and never
    /// queued.
    pub fn submit(&mut self, request: OrderRequest, now: Tick, grid: &GridMap) -> OrderResult<OrderId> {
        for cell in [request.pickup, request.delivery] {
            if let Err(e) = validate_cell(grid, cell) {
                self.rejected += 1;
                warn!(pickup = %request.pickup, delivery = %request.delivery, "order rejected: {e}");
                return Err(e);
            }
        }

        let id = self.book.insert(request, now);
        self.pending.push(PendingKey { priority: request.priority, created_at: now, id });
        self.transitions.push(OrderTransition { tick: now, order: id, from: None, to: OrderStatus::Pending });
        debug!(order = %id, pickup = %request.pickup, delivery = %request.delivery,
               priority = request.priority, "order queued");
        Ok(id)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Bind queued orders to idle workers and mark them Assigned.
    ///
    /// `idle` lists every currently idle worker with its position.  Returns
    /// the bindings made, in the order they were made.
    pub fn assign_pending(&mut self, idle: &[(WorkerId, Cell)], now: Tick) -> Vec<(OrderId, WorkerId)> {
        let mut free: Vec<(WorkerId, Cell)> = idle.to_vec();
        let mut bound = Vec::new();

        while !free.is_empty() {
            let Some(key) = self.pending.pop() else { break };
            let Some(order) = self.book.get(key.id) else { continue };
            // Orders failed or otherwise resolved while queued are skipped.
            if order.status != OrderStatus::Pending {
                continue;
            }
            let pickup = order.pickup;

            let Some(slot) = nearest(&free, pickup) else { break };
            let (worker, at) = free.swap_remove(slot);

            if let Ok(order) = self.book.get_mut(key.id) {
                order.status = OrderStatus::Assigned;
                order.assigned_to = Some(worker);
            }
            self.record(now, key.id, OrderStatus::Pending, OrderStatus::Assigned);
            debug!(order = %key.id, %worker, from = %at, %pickup, "order assigned");
            bound.push((key.id, worker));
        }
        bound
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Assigned → InProgress (the worker reached the pickup cell).
    pub fn mark_in_progress(&mut self, id: OrderId, now: Tick) -> OrderResult<()> {
        self.advance(id, OrderStatus::InProgress, now)
    }

    /// InProgress → Completed (delivered).
    pub fn complete(&mut self, id: OrderId, now: Tick) -> OrderResult<()> {
        self.advance(id, OrderStatus::Completed, now)?;
        if let Ok(order) = self.book.get_mut(id) {
            order.completed_at = Some(now);
        }
        Ok(())
    }

    /// Any non-terminal status → Failed.
    pub fn fail(&mut self, id: OrderId, reason: FailureReason, now: Tick) -> OrderResult<()> {
        self.advance(id, OrderStatus::Failed, now)?;
        if let Ok(order) = self.book.get_mut(id) {
            order.failed_at = Some(now);
            order.failure = Some(reason);
        }
        warn!(order = %id, %reason, "order failed");
        Ok(())
    }

    fn advance(&mut self, id: OrderId, to: OrderStatus, now: Tick) -> OrderResult<()> {
        let order = self.book.get_mut(id)?;
        let from = order.status;
        if !from.can_become(to) {
            return Err(OrderError::IllegalStatus { order: id, from, to });
        }
        order.status = to;
        self.record(now, id, from, to);
        Ok(())
    }

    fn record(&mut self, tick: Tick, order: OrderId, from: OrderStatus, to: OrderStatus) {
        self.transitions.push(OrderTransition { tick, order, from: Some(from), to });
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Take every transition recorded since the last drain.
    pub fn drain_transitions(&mut self) -> Vec<OrderTransition> {
        std::mem::take(&mut self.transitions)
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.book.get(id)
    }

    /// Orders still waiting for a worker.
    pub fn pending_count(&self) -> usize {
        self.book.count(OrderStatus::Pending)
    }

    /// Requests refused by [`submit`](Self::submit).
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }
}

fn validate_cell(grid: &GridMap, cell: Cell) -> OrderResult<()> {
    if !grid.in_bounds(cell) {
        return Err(OrderError::InvalidOrder { cell, reason: InvalidCell::OutOfBounds });
    }
    if !grid.is_walkable(cell) {
        return Err(OrderError::InvalidOrder { cell, reason: InvalidCell::Obstacle });
    }
    Ok(())
}

/// Index into `free` of the worker closest to `target`, lowest id on ties.
fn nearest(free: &[(WorkerId, Cell)], target: Cell) -> Option<usize> {
    free.iter()
        .enumerate()
        .min_by_key(|(_, (id, at))| (at.manhattan(target), *id))
        .map(|(i, _)| i)
}
