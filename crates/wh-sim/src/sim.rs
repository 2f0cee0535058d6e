//! The `Sim` struct and its tick loop.

use tracing::{debug, info, trace, warn};

use wh_core::{OrderId, SimConfig, Tick, WorkerId};
use wh_grid::GridMap;
use wh_order::{FailureReason, Leg, NoOrders, Order, OrderDispatcher, OrderRequest, OrderSource};
use wh_plan::{Path, PathPlanner, PathQuery, PlanError, PlanResult, ReservationTable, UnreachableReason};
use wh_worker::{Worker, WorkerState, WorkerTransition};

use crate::resolve::{MoveRequest, resolve_moves};
use crate::{
    HashMap, RunOutcome, RunSummary, SimObserver, SimResult, SimulationState, StopHandle,
    TickEvent, WorkerPosition,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim<P, S>` owns the floor, the planner, the order source and the
/// [`SimulationState`], and drives the tick pipeline described in the crate
/// docs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: PathPlanner, S: OrderSource = NoOrders> {
    pub(crate) config:  SimConfig,
    pub(crate) grid:    GridMap,
    pub(crate) planner: P,
    pub(crate) source:  S,
    pub(crate) state:   SimulationState,
    pub(crate) stop:    StopHandle,
}

impl<P: PathPlanner, S: OrderSource> Sim<P, S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The floor.  Read-only for the lifetime of the run.
    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The next tick to be simulated.
    pub fn now(&self) -> Tick {
        self.state.now()
    }

    pub fn worker(&self, id: WorkerId) -> Option<&Worker> {
        self.state.workers.get(id)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.state.dispatcher.order(id)
    }

    /// A handle that stops [`run`](Self::run) before its next tick.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn summary(&self) -> RunSummary {
        self.state.summary()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Submit an order created at the current tick.  It is dispatched at the
    /// end of the next simulated tick at the earliest.
    ///
    /// # Errors
    ///
    /// [`OrderError::InvalidOrder`](wh_order::OrderError::InvalidOrder) if
    /// a cell is out of bounds or an obstacle.
    pub fn submit_order(&mut self, request: OrderRequest) -> SimResult<OrderId> {
        let now = self.now();
        Ok(self.state.dispatcher.submit(request, now, &self.grid)?)
    }

    /// Run from the current tick to `config.end_tick()`, or until a stop is
    /// requested.
    ///
    /// Calls observer hooks at every tick boundary and `on_sim_end` once at
    /// the end.  Use [`NoopObserver`][crate::NoopObserver] if you don't need
    /// callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunOutcome> {
        let start = self.now();
        let end = self.config.end_tick();
        info!(
            workers = self.state.workers.len(),
            from = %start,
            to = %end,
            "simulation started"
        );

        let mut stopped_early = false;
        while self.now() < end {
            if self.stop.is_requested() {
                stopped_early = true;
                break;
            }
            self.observed_tick(observer)?;
        }

        let summary = self.summary();
        observer.on_sim_end(&summary);
        info!(
            final_tick = %summary.final_tick,
            completed = summary.count(wh_order::OrderStatus::Completed),
            failed = summary.count(wh_order::OrderStatus::Failed),
            stopped_early,
            "simulation finished"
        );

        Ok(RunOutcome { ticks_run: self.now().since(start), final_tick: self.now(), stopped_early })
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`),
    /// stopping early only on a stop request.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<RunOutcome> {
        let start = self.now();
        let mut stopped_early = false;
        for _ in 0..n {
            if self.stop.is_requested() {
                stopped_early = true;
                break;
            }
            self.observed_tick(observer)?;
        }
        Ok(RunOutcome { ticks_run: self.now().since(start), final_tick: self.now(), stopped_early })
    }

    /// Simulate one tick and return its event.
    pub fn step(&mut self) -> SimResult<TickEvent> {
        let now = self.now();
        let event = self.process_tick(now)?;
        self.state.clock.advance();
        Ok(event)
    }

    fn observed_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.now();
        observer.on_tick_start(now);
        let event = self.process_tick(now)?;
        observer.on_tick_end(&event);
        self.state.clock.advance();
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<TickEvent> {
        let mut transitions: Vec<WorkerTransition> = Vec::new();

        // ── Phase 0: new orders ───────────────────────────────────────────
        self.poll_orders(now);

        // ── Phase 1: arrivals ─────────────────────────────────────────────
        //
        // Workers standing on the last cell of their path finish the leg:
        // pick (and head for delivery) or deliver (and go idle).
        self.arrivals(now, &mut transitions)?;

        // ── Phase 2: planning ─────────────────────────────────────────────
        //
        // Reads the reservation table committed at the end of the previous
        // tick; may run in parallel.
        self.plan(now, &mut transitions)?;

        // ── Phases 3–5: requests, conflict resolution, commit ─────────────
        self.movement(now, &mut transitions)?;

        // ── Phase 6: dispatch ─────────────────────────────────────────────
        //
        // Workers bound now plan their first leg next tick.
        self.dispatch(now, &mut transitions)?;

        // ── Phase 7: reservations for the next tick onward ────────────────
        self.state.rebuild_reservations(now.next(), self.config.reservation_hold);

        let positions = self
            .state
            .workers
            .iter()
            .map(|w| WorkerPosition { worker: w.id, cell: w.position, state: w.state() })
            .collect();
        let event = TickEvent {
            tick:               now,
            positions,
            order_transitions:  self.state.dispatcher.drain_transitions(),
            worker_transitions: transitions,
        };
        trace!(
            tick = %now,
            orders = event.order_transitions.len(),
            workers = event.worker_transitions.len(),
            reservations = self.state.reservations.len(),
            "tick committed"
        );
        Ok(event)
    }

    fn poll_orders(&mut self, now: Tick) {
        for request in self.source.poll(now, &self.grid) {
            // Rejections are logged and counted by the dispatcher.
            let _ = self.state.dispatcher.submit(request, now, &self.grid);
        }
    }

    fn arrivals(&mut self, now: Tick, out: &mut Vec<WorkerTransition>) -> SimResult<()> {
        let SimulationState { workers, dispatcher, .. } = &mut self.state;

        for w in workers.iter_mut() {
            if !w.path_exhausted() {
                continue;
            }
            let Some(order) = w.order().map(|o| o.id) else { continue };
            match w.state() {
                WorkerState::MovingToPickup => {
                    out.push(w.begin_picking()?);
                    dispatcher.mark_in_progress(order, now)?;
                    out.push(w.finish_picking()?);
                    debug!(worker = %w.id, %order, at = %w.position, tick = %now, "picked");
                }
                WorkerState::MovingToDelivery => {
                    out.push(w.begin_delivering()?);
                    dispatcher.complete(order, now)?;
                    out.push(w.finish_delivering()?);
                    debug!(worker = %w.id, %order, at = %w.position, tick = %now, "delivered");
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn plan(&mut self, now: Tick, out: &mut Vec<WorkerTransition>) -> SimResult<()> {
        let replan_after = self.config.replan_after_blocks;
        let max_replans = self.config.max_replans;

        // ── Repeatedly blocked workers drop their path ────────────────────
        {
            let SimulationState { workers, dispatcher, .. } = &mut self.state;
            for w in workers.iter_mut() {
                let WorkerState::Blocked { leg } = w.state() else { continue };
                if w.path().is_none() || w.consecutive_blocks < replan_after {
                    continue;
                }
                w.discard_path();
                debug!(worker = %w.id, replans = w.replans, "path discarded after repeated blocks");
                if w.replans > max_replans {
                    fail_order(w, dispatcher, FailureReason::ReplanBudgetExhausted { leg }, now, out)?;
                }
            }
        }

        // ── Leg paths ─────────────────────────────────────────────────────
        let queries: Vec<(Leg, PathQuery)> = self
            .state
            .workers
            .iter()
            .filter(|w| w.needs_path())
            .filter_map(|w| {
                let leg = w.state().leg()?;
                let goal = w.goal()?;
                Some((leg, PathQuery { worker: w.id, start: w.position, goal, depart: now }))
            })
            .collect();

        let results = compute_paths(&self.planner, &self.grid, &self.state.reservations, &queries);

        let SimulationState { workers, dispatcher, .. } = &mut self.state;
        for ((leg, query), result) in queries.into_iter().zip(results) {
            let w = workers.get_mut(query.worker)?;
            match result {
                Ok(path) => {
                    trace!(worker = %w.id, ticks = path.ticks(), waits = path.waits(), "path installed");
                    if let Some(t) = w.install_path(path)? {
                        out.push(t);
                    }
                }
                Err(PlanError::Unreachable { reason: UnreachableReason::Blocked, .. }) => {
                    // Boxed in by reservations for now; retry next tick.
                    w.discard_path();
                    w.stall();
                    debug!(worker = %w.id, replans = w.replans, "no free continuation, retrying");
                    if w.replans > max_replans {
                        fail_order(w, dispatcher, FailureReason::ReplanBudgetExhausted { leg }, now, out)?;
                    }
                }
                Err(PlanError::Unreachable { reason, .. }) => {
                    warn!(worker = %w.id, from = %query.start, to = %query.goal, %reason, "leg unreachable");
                    fail_order(w, dispatcher, FailureReason::Unreachable { leg }, now, out)?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // ── Idle side-steps ───────────────────────────────────────────────
        let yielders: Vec<WorkerId> = self
            .state
            .workers
            .iter()
            .filter(|w| w.yield_requested && w.state().is_idle() && w.path().is_none())
            .map(|w| w.id)
            .collect();
        for id in yielders {
            let Some(from) = self.state.workers.get(id).map(|w| w.position) else { continue };
            let target = self.state.side_step(&self.grid, id, from, now.next());
            let w = self.state.workers.get_mut(id)?;
            w.yield_requested = false;
            if let Some(to) = target {
                trace!(worker = %id, %from, %to, "stepping aside");
                w.install_path(Path::new(vec![from, to])?)?;
            }
        }
        Ok(())
    }

    fn movement(&mut self, now: Tick, out: &mut Vec<WorkerTransition>) -> SimResult<()> {
        let workers = &mut self.state.workers;
        let positions = workers.positions();

        let requests: Vec<MoveRequest> = workers
            .iter()
            .filter_map(|w| {
                let to = w.next_cell()?;
                (to != w.position).then_some(MoveRequest { worker: w.id, from: w.position, to })
            })
            .collect();
        let resolution = resolve_moves(&positions, &requests);
        let refused: HashMap<WorkerId, WorkerId> =
            resolution.refused.iter().map(|r| (r.worker, r.by)).collect();

        // Granted moves and planned waits advance; refused movers block.
        for w in workers.iter_mut() {
            if w.next_cell().is_none() {
                continue;
            }
            if refused.contains_key(&w.id) {
                if w.state().is_idle() {
                    w.cancel_yield();
                } else if let Some(t) = w.block()? {
                    out.push(t);
                }
            } else if let Some(t) = w.advance()? {
                out.push(t);
            }
        }

        // Idle workers in someone's way step aside next tick.
        for r in &resolution.refused {
            if resolution.granted.binary_search(&r.by).is_ok() {
                continue;
            }
            let blocker = workers.get_mut(r.by)?;
            if blocker.state().is_idle() && blocker.path().is_none() {
                blocker.yield_requested = true;
            }
        }

        trace!(
            tick = %now,
            moved = resolution.granted.len(),
            refused = resolution.refused.len(),
            "moves committed"
        );
        Ok(())
    }

    fn dispatch(&mut self, now: Tick, out: &mut Vec<WorkerTransition>) -> SimResult<()> {
        let SimulationState { workers, dispatcher, .. } = &mut self.state;
        let idle = workers.idle();
        if idle.is_empty() {
            return Ok(());
        }
        for (order, worker) in dispatcher.assign_pending(&idle, now) {
            let Some(handle) = dispatcher.order(order).map(Order::handle) else { continue };
            out.push(workers.get_mut(worker)?.assign(handle)?);
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fail_order(
    w:          &mut Worker,
    dispatcher: &mut OrderDispatcher,
    reason:     FailureReason,
    now:        Tick,
    out:        &mut Vec<WorkerTransition>,
) -> SimResult<()> {
    if let Some(order) = w.order().map(|o| o.id) {
        dispatcher.fail(order, reason, now)?;
    }
    out.push(w.fail()?);
    Ok(())
}

/// Run every planning query of one tick.
///
/// With the `parallel` Cargo feature the queries run on Rayon's thread
/// pool.  Results come back in query order either way, so applying them
/// stays deterministic.
fn compute_paths<P: PathPlanner>(
    planner: &P,
    grid:    &GridMap,
    table:   &ReservationTable,
    queries: &[(Leg, PathQuery)],
) -> Vec<PlanResult<Path>> {
    #[cfg(not(feature = "parallel"))]
    {
        queries.iter().map(|(_, q)| planner.find_path(grid, q, table)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        queries.par_iter().map(|(_, q)| planner.find_path(grid, q, table)).collect()
    }
}
