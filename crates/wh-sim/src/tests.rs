//! Integration tests for wh-sim.

use std::collections::HashSet;

use wh_core::{Cell, SimConfig, Tick, WorkerId};
use wh_grid::{GridMap, parse_map};
use wh_order::OrderRequest;
use wh_plan::AStarPlanner;

use crate::{EventLog, SimBuilder, TickEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn open(width: usize, height: usize) -> GridMap {
    let row = ".".repeat(width);
    let text: Vec<&str> = std::iter::repeat(row.as_str()).take(height).collect();
    parse_map(&text.join("\n")).unwrap()
}

/// ```text
/// ##.##
/// ##.##
/// .....
/// ##.##
/// ##.##
/// ```
fn plus() -> GridMap {
    parse_map("##.##\n##.##\n.....\n##.##\n##.##\n").unwrap()
}

fn req(p: (i32, i32), d: (i32, i32)) -> OrderRequest {
    OrderRequest::new(Cell::from(p), Cell::from(d))
}

fn cells(v: &[(i32, i32)]) -> Vec<Cell> {
    v.iter().map(|&c| Cell::from(c)).collect()
}

/// No shared cells, no jumps, no swaps, walkable positions only.
fn assert_collision_free(grid: &GridMap, events: &[TickEvent]) {
    for (k, e) in events.iter().enumerate() {
        let mut seen = HashSet::new();
        for p in &e.positions {
            assert!(grid.is_walkable(p.cell), "{} on non-walkable {} at {}", p.worker, p.cell, e.tick);
            assert!(seen.insert(p.cell), "two workers on {} at {}", p.cell, e.tick);
        }
        if k == 0 {
            continue;
        }
        let prev = &events[k - 1];
        for (a, b) in prev.positions.iter().zip(&e.positions) {
            assert!(a.cell.manhattan(b.cell) <= 1, "{} jumped at {}", a.worker, e.tick);
        }
        for (i, a0) in prev.positions.iter().enumerate() {
            for (j, b0) in prev.positions.iter().enumerate() {
                if i == j || a0.cell == e.positions[i].cell {
                    continue;
                }
                let swapped = e.positions[i].cell == b0.cell && e.positions[j].cell == a0.cell;
                assert!(!swapped, "{} and {} swapped at {}", a0.worker, b0.worker, e.tick);
            }
        }
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use wh_core::SearchLimits;
    use wh_order::{FailureReason, Leg, OrderError, OrderStatus};

    use super::*;
    use crate::SimError;

    fn builder(starts: Vec<Cell>) -> SimBuilder<AStarPlanner> {
        SimBuilder::new(SimConfig::with_ticks(10), open(5, 5), AStarPlanner::default()).workers(starts)
    }

    #[test]
    fn builds_and_reserves_start_cells() {
        let sim = builder(cells(&[(0, 0), (4, 4)])).build().unwrap();
        assert_eq!(sim.now(), Tick::ZERO);
        assert_eq!(sim.state().workers.len(), 2);
        let table = &sim.state().reservations;
        assert_eq!(table.holder(Cell::new(0, 0), Tick(0)), Some(WorkerId(0)));
        assert_eq!(table.holder(Cell::new(4, 4), Tick(1)), Some(WorkerId(1)));
    }

    #[test]
    fn no_workers_errors() {
        assert!(matches!(builder(Vec::new()).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn shared_start_errors() {
        let r = builder(cells(&[(1, 1), (1, 1)])).build();
        assert!(matches!(r, Err(SimError::Config(_))));
    }

    #[test]
    fn obstacle_start_errors() {
        let grid = parse_map("#..\n...\n").unwrap();
        let r = SimBuilder::new(SimConfig::default(), grid, AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .build();
        assert!(matches!(r, Err(SimError::Config(_))));
    }

    #[test]
    fn out_of_bounds_start_errors() {
        assert!(matches!(builder(cells(&[(5, 0)])).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn fully_blocked_map_errors() {
        let grid = parse_map("##\n##\n").unwrap();
        let r = SimBuilder::new(SimConfig::default(), grid, AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .build();
        assert!(matches!(r, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_config_errors() {
        let config = SimConfig { replan_after_blocks: 0, ..SimConfig::default() };
        let r = SimBuilder::new(config, open(3, 3), AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .build();
        assert!(matches!(r, Err(SimError::Config(_))));
    }

    #[test]
    fn astar_builder_applies_config_search_limits() {
        let config = SimConfig {
            search: SearchLimits { max_expansions: 1, max_path_len: 1 },
            ..SimConfig::with_ticks(5)
        };
        let mut sim = SimBuilder::astar(config, open(5, 5))
            .workers(cells(&[(0, 0)]))
            .orders(vec![req((4, 0), (4, 4))])
            .build()
            .unwrap();
        sim.run(&mut crate::NoopObserver).unwrap();

        let o = sim.order(wh_core::OrderId(0)).unwrap();
        assert_eq!(o.status, OrderStatus::Failed);
        assert_eq!(o.failure, Some(FailureReason::Unreachable { leg: Leg::Pickup }));
    }

    #[test]
    fn planner_limits_must_match_config() {
        let config = SimConfig {
            search: SearchLimits { max_expansions: 50, max_path_len: 8 },
            ..SimConfig::with_ticks(5)
        };
        let r = SimBuilder::new(config, open(5, 5), AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .build();
        assert!(matches!(r, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_initial_order_errors() {
        let r = builder(cells(&[(0, 0)])).orders(vec![req((0, 0), (9, 9))]).build();
        assert!(matches!(r, Err(SimError::Order(OrderError::InvalidOrder { .. }))));
    }
}

// ── Reference scenarios ───────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use wh_order::{Leg, OrderStatus};
    use wh_worker::WorkerState;

    use super::*;

    #[test]
    fn single_worker_pick_and_deliver() {
        let mut sim = SimBuilder::new(SimConfig::with_ticks(12), open(5, 5), AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .orders(vec![req((4, 0), (4, 4))])
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let w = WorkerId(0);
        let order = wh_core::OrderId(0);
        assert!(log.at(Tick(0)).unwrap().entered(w, WorkerState::Assigned));
        assert!(log.at(Tick(1)).unwrap().entered(w, WorkerState::MovingToPickup));
        assert_eq!(log.at(Tick(4)).unwrap().position_of(w), Some(Cell::new(4, 0)));

        let t5 = log.at(Tick(5)).unwrap();
        assert!(t5.entered(w, WorkerState::Picking));
        assert!(t5.entered(w, WorkerState::MovingToDelivery));
        assert!(t5.order_transitions.iter().any(|t| t.order == order && t.to == OrderStatus::InProgress));

        assert_eq!(log.at(Tick(8)).unwrap().position_of(w), Some(Cell::new(4, 4)));
        let t9 = log.at(Tick(9)).unwrap();
        assert!(t9.entered(w, WorkerState::Delivering));
        assert!(t9.entered(w, WorkerState::Idle));

        let o = sim.order(order).unwrap();
        assert_eq!(o.status, OrderStatus::Completed);
        assert_eq!(o.completed_at, Some(Tick(9)));
        assert_eq!(o.lead_time(), Some(9));

        let summary = log.summary.unwrap();
        assert_eq!(summary.workers[0].idle_ticks, 0);
        assert_eq!(summary.workers[0].distance_traveled, 8);
        assert_eq!(summary.workers[0].orders_completed, 1);
        assert_eq!(summary.count(OrderStatus::Completed), 1);
    }

    #[test]
    fn converging_workers_lower_id_proceeds() {
        let mut sim = SimBuilder::new(SimConfig::with_ticks(20), plus(), AStarPlanner::default())
            .workers(cells(&[(0, 2), (4, 2)]))
            .orders(vec![req((2, 0), (0, 2)), req((2, 4), (4, 2))])
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let (w0, w1) = (WorkerId(0), WorkerId(1));
        assert_eq!(sim.worker(w0).unwrap().orders_completed, 1);
        assert_eq!(sim.worker(w1).unwrap().orders_completed, 1);

        let t2 = log.at(Tick(2)).unwrap();
        assert_eq!(t2.position_of(w0), Some(Cell::new(2, 2)));
        assert_eq!(t2.position_of(w1), Some(Cell::new(3, 2)));
        assert!(t2.entered(w1, WorkerState::Blocked { leg: Leg::Pickup }));

        let t3 = log.at(Tick(3)).unwrap();
        assert!(t3.entered(w1, WorkerState::MovingToPickup));
        assert_eq!(t3.position_of(w1), Some(Cell::new(2, 2)));

        // Exactly one blocked tick between them, and one tick of delay.
        let blocked: usize = log
            .events
            .iter()
            .flat_map(|e| &e.positions)
            .filter(|p| matches!(p.state, WorkerState::Blocked { .. }))
            .count();
        assert_eq!(blocked, 1);
        assert!(log.at(Tick(5)).unwrap().entered(w0, WorkerState::Picking));
        assert!(log.at(Tick(6)).unwrap().entered(w1, WorkerState::Picking));
        assert_eq!(sim.worker(w0).unwrap().idle_ticks, 0);
        assert_eq!(sim.worker(w1).unwrap().idle_ticks, 1);

        assert_collision_free(sim.grid(), &log.events);
    }

    /// Two lanes, head-on in the bottom one.  w1 loses the first contest,
    /// then the pair deadlocks on a swap until w1 drops its path and goes
    /// around through the top lane.
    #[test]
    fn blocked_worker_detours_through_other_lane() {
        let grid = open(7, 2);
        let config = SimConfig::with_ticks(40);
        let replan_after = u64::from(config.replan_after_blocks);
        let mut sim = SimBuilder::astar(config, grid)
            .workers(cells(&[(0, 0), (6, 0)]))
            .orders(vec![req((6, 0), (0, 1)), req((0, 0), (6, 1))])
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let summary = log.summary.clone().unwrap();
        assert_eq!(summary.count(OrderStatus::Completed), 2);
        assert_eq!(summary.count(OrderStatus::Failed), 0);

        let (w0, w1) = (WorkerId(0), WorkerId(1));
        let blocked_ticks = |w: WorkerId| {
            log.events
                .iter()
                .filter(|e| {
                    e.positions
                        .iter()
                        .any(|p| p.worker == w && matches!(p.state, WorkerState::Blocked { .. }))
                })
                .count() as u64
        };
        assert_eq!(blocked_ticks(w1), replan_after);
        assert!(blocked_ticks(w0) < replan_after);
        assert_eq!(summary.workers[1].idle_ticks, replan_after);

        // After its last blocked tick w1 steps up into the free lane.
        let last_block = log
            .events
            .iter()
            .rposition(|e| e.positions.iter().any(|p| p.worker == w1 && matches!(p.state, WorkerState::Blocked { .. })))
            .unwrap();
        let detour = log.events[last_block + 1].position_of(w1).unwrap();
        assert_eq!(detour.y, 0);

        assert_collision_free(sim.grid(), &log.events);
    }
}

// ── Failure handling ──────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use wh_order::{FailureReason, Leg, OrderError, OrderStatus};
    use wh_worker::WorkerState;

    use super::*;
    use crate::{NoopObserver, SimError};

    #[test]
    fn disconnected_pickup_fails_order() {
        let grid = parse_map(".#.\n.#.\n").unwrap();
        let mut sim = SimBuilder::new(SimConfig::with_ticks(5), grid, AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .orders(vec![req((2, 0), (2, 1))])
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let o = sim.order(wh_core::OrderId(0)).unwrap();
        assert_eq!(o.status, OrderStatus::Failed);
        assert_eq!(o.failure, Some(FailureReason::Unreachable { leg: Leg::Pickup }));
        assert_eq!(o.failed_at, Some(Tick(1)));
        assert_eq!(sim.worker(WorkerId(0)).unwrap().state(), WorkerState::Idle);
    }

    #[test]
    fn head_on_in_corridor_exhausts_replans() {
        let grid = parse_map(".....\n").unwrap();
        let mut sim = SimBuilder::new(SimConfig::with_ticks(300), grid, AStarPlanner::default())
            .workers(cells(&[(0, 0), (4, 0)]))
            .orders(vec![req((4, 0), (0, 0)), req((0, 0), (4, 0))])
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let summary = log.summary.unwrap();
        assert_eq!(summary.count(OrderStatus::Failed), 2);
        for o in &summary.orders {
            assert_eq!(o.failure, Some(FailureReason::ReplanBudgetExhausted { leg: Leg::Delivery }));
        }
        assert_collision_free(sim.grid(), &log.events);
    }

    #[test]
    fn submit_rejects_invalid_order() {
        let mut sim = SimBuilder::new(SimConfig::with_ticks(5), plus(), AStarPlanner::default())
            .workers(cells(&[(2, 2)]))
            .build()
            .unwrap();
        let err = sim.submit_order(req((0, 0), (2, 0))).unwrap_err();
        assert!(matches!(err, SimError::Order(OrderError::InvalidOrder { .. })));
        assert_eq!(sim.summary().rejected_orders, 1);
        assert!(sim.summary().orders.is_empty());
    }
}

// ── Order sources and dispatch ────────────────────────────────────────────────

#[cfg(test)]
mod sources {
    use wh_order::{OrderStatus, ScheduledOrders};
    use wh_worker::WorkerState;

    use super::*;
    use crate::NoopObserver;

    #[test]
    fn scheduled_orders_released_on_time() {
        let mut schedule = ScheduledOrders::new();
        schedule.push(Tick(3), req((2, 0), (2, 2)));
        schedule.push(Tick(3), req((0, 2), (2, 2)));
        schedule.push(Tick(6), req((4, 4), (4, 0)));
        let mut sim = SimBuilder::new(SimConfig::with_ticks(4), open(5, 5), AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .order_source(schedule)
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let first = log.at(Tick(3)).unwrap();
        let created: Vec<_> = first.order_transitions.iter().filter(|t| t.from.is_none()).collect();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|t| t.tick == Tick(3)));
        // Dispatched in the same tick, to the only worker.
        assert!(first.entered(WorkerId(0), WorkerState::Assigned));
        assert_eq!(sim.summary().orders.len(), 2);
        assert_eq!(sim.summary().count(OrderStatus::Pending), 1);
    }

    #[test]
    fn manual_submission_dispatched_same_tick() {
        let mut sim = SimBuilder::new(SimConfig::with_ticks(10), open(4, 4), AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .build()
            .unwrap();
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        let id = sim.submit_order(req((3, 0), (3, 3))).unwrap();
        assert_eq!(sim.order(id).unwrap().created_at, Tick(2));
        let event = sim.step().unwrap();
        assert!(event.entered(WorkerId(0), WorkerState::Assigned));
        assert_eq!(sim.order(id).unwrap().status, OrderStatus::Assigned);
    }

    #[test]
    fn nearest_idle_worker_gets_order() {
        let mut sim = SimBuilder::new(SimConfig::with_ticks(1), open(6, 1), AStarPlanner::default())
            .workers(cells(&[(0, 0), (5, 0)]))
            .orders(vec![req((4, 0), (0, 0))])
            .build()
            .unwrap();
        let event = sim.step().unwrap();
        assert!(event.entered(WorkerId(1), WorkerState::Assigned));
        assert_eq!(sim.worker(WorkerId(0)).unwrap().state(), WorkerState::Idle);
    }
}

// ── Idle yielding ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod yielding {
    use wh_order::OrderStatus;

    use super::*;

    #[test]
    fn idle_worker_steps_aside() {
        // w1 idles in the only corridor leading to the delivery cell.
        let grid = parse_map(".....\n####.\n").unwrap();
        let mut sim = SimBuilder::new(SimConfig::with_ticks(30), grid, AStarPlanner::default())
            .workers(cells(&[(0, 0), (3, 0)]))
            .orders(vec![req((1, 0), (4, 0))])
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let summary = log.summary.unwrap();
        assert_eq!(summary.count(OrderStatus::Completed), 1);
        assert_eq!(summary.workers[0].orders_completed, 1);
        assert!(summary.workers[1].distance_traveled >= 1);
        assert_eq!(summary.workers[1].orders_completed, 0);
        assert_collision_free(sim.grid(), &log.events);
    }
}

// ── Run control ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_control {
    use super::*;
    use crate::{NoopObserver, RunSummary, SimObserver, StopHandle};

    struct StopAt {
        handle: StopHandle,
        at:     Tick,
        ended:  bool,
    }

    impl SimObserver for StopAt {
        fn on_tick_end(&mut self, event: &TickEvent) {
            if event.tick == self.at {
                self.handle.request_stop();
            }
        }

        fn on_sim_end(&mut self, _summary: &RunSummary) {
            self.ended = true;
        }
    }

    fn sim(ticks: u64) -> crate::Sim<AStarPlanner> {
        SimBuilder::new(SimConfig::with_ticks(ticks), open(4, 4), AStarPlanner::default())
            .workers(cells(&[(0, 0)]))
            .build()
            .unwrap()
    }

    #[test]
    fn runs_to_end_tick() {
        let mut sim = sim(7);
        let outcome = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(outcome.ticks_run, 7);
        assert_eq!(outcome.final_tick, Tick(7));
        assert!(!outcome.stopped_early);
        // Nothing left to do.
        assert_eq!(sim.run(&mut NoopObserver).unwrap().ticks_run, 0);
    }

    #[test]
    fn stop_between_ticks() {
        let mut sim = sim(100);
        let mut obs = StopAt { handle: sim.stop_handle(), at: Tick(4), ended: false };
        let outcome = sim.run(&mut obs).unwrap();
        assert!(outcome.stopped_early);
        assert_eq!(outcome.final_tick, Tick(5));
        assert!(obs.ended);

        sim.stop_handle().reset();
        let outcome = sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(outcome.final_tick, Tick(8));
    }

    #[test]
    fn stop_before_start_runs_nothing() {
        let mut sim = sim(10);
        sim.stop_handle().request_stop();
        let outcome = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(outcome.ticks_run, 0);
        assert!(outcome.stopped_early);
    }

    #[test]
    fn run_ticks_ignores_end_and_skips_sim_end() {
        let mut sim = sim(2);
        let mut log = EventLog::new();
        let outcome = sim.run_ticks(5, &mut log).unwrap();
        assert_eq!(outcome.ticks_run, 5);
        assert_eq!(log.events.len(), 5);
        assert!(log.summary.is_none());
    }
}

// ── Randomized properties ─────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use wh_grid::standard_layout;
    use wh_order::{OrderStatus, RandomOrderConfig, RandomOrderSource, ScheduledOrders};

    use super::*;

    fn random_starts(grid: &GridMap, n: usize, rng: &mut SmallRng) -> Vec<Cell> {
        let mut all: Vec<Cell> = grid.walkable_cells().collect();
        all.shuffle(rng);
        all.truncate(n);
        all
    }

    fn warehouse_run(seed: u64) -> (GridMap, EventLog) {
        let grid = standard_layout(20, 15).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let starts = random_starts(&grid, 6, &mut rng);
        let config = SimConfig { seed, ..SimConfig::with_ticks(300) };
        let source = RandomOrderSource::for_run(
            &config,
            RandomOrderConfig { arrival_probability: 0.3, ..RandomOrderConfig::default() },
        );
        let mut sim = SimBuilder::astar(config, grid.clone())
            .workers(starts)
            .order_source(source)
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();
        (grid, log)
    }

    #[test]
    fn never_collides_on_warehouse_floor() {
        for seed in [1, 2, 3] {
            let (grid, log) = warehouse_run(seed);
            assert_eq!(log.events.len(), 300);
            assert_collision_free(&grid, &log.events);
        }
    }

    #[test]
    fn identical_inputs_identical_events() {
        let (_, a) = warehouse_run(9);
        let (_, b) = warehouse_run(9);
        assert_eq!(a.events, b.events);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn every_order_settles_on_open_floor() {
        let mut rng = SmallRng::seed_from_u64(11);
        let grid = open(10, 10);
        let mut schedule = ScheduledOrders::new();
        let mut count = 0;
        for t in 0..100u64 {
            if rng.gen_bool(0.2) {
                let p = (rng.gen_range(0..10), rng.gen_range(0..10));
                let d = (rng.gen_range(0..10), rng.gen_range(0..10));
                schedule.push(Tick(t), req(p, d));
                count += 1;
            }
        }
        let starts = random_starts(&grid, 5, &mut rng);
        let mut sim = SimBuilder::new(SimConfig::with_ticks(600), grid, AStarPlanner::default())
            .workers(starts)
            .order_source(schedule)
            .build()
            .unwrap();
        let mut log = EventLog::new();
        sim.run(&mut log).unwrap();

        let summary = log.summary.unwrap();
        assert_eq!(summary.orders.len(), count);
        assert!(summary.orders.iter().all(|o| o.status.is_terminal()));
        assert_eq!(summary.count(OrderStatus::Completed), count);
        assert_collision_free(sim.grid(), &log.events);

        let delivered: u64 = summary.workers.iter().map(|w| w.orders_completed).sum();
        assert_eq!(delivered as usize, summary.count(OrderStatus::Completed));
    }
}

// ── Conflict resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod resolve {
    use super::*;
    use crate::{MoveRequest, Refusal, resolve_moves};

    fn mv(w: u32, from: (i32, i32), to: (i32, i32)) -> MoveRequest {
        MoveRequest { worker: WorkerId(w), from: Cell::from(from), to: Cell::from(to) }
    }

    fn at(w: u32, c: (i32, i32)) -> (WorkerId, Cell) {
        (WorkerId(w), Cell::from(c))
    }

    #[test]
    fn lower_id_claims_contested_cell() {
        let pos = [at(0, (0, 0)), at(1, (2, 0))];
        let r = resolve_moves(&pos, &[mv(1, (2, 0), (1, 0)), mv(0, (0, 0), (1, 0))]);
        assert_eq!(r.granted, vec![WorkerId(0)]);
        assert_eq!(r.refused, vec![Refusal { worker: WorkerId(1), by: WorkerId(0) }]);
    }

    #[test]
    fn swap_refused_both_ways() {
        let pos = [at(0, (0, 0)), at(1, (1, 0))];
        let r = resolve_moves(&pos, &[mv(0, (0, 0), (1, 0)), mv(1, (1, 0), (0, 0))]);
        assert!(r.granted.is_empty());
        assert_eq!(r.refused.len(), 2);
    }

    #[test]
    fn chain_follows_leader() {
        let pos = [at(0, (0, 0)), at(1, (1, 0))];
        let r = resolve_moves(&pos, &[mv(0, (0, 0), (1, 0)), mv(1, (1, 0), (2, 0))]);
        assert_eq!(r.granted, vec![WorkerId(0), WorkerId(1)]);
        assert!(r.refused.is_empty());
    }

    #[test]
    fn refusal_propagates_back_along_chain() {
        let pos = [at(0, (0, 0)), at(1, (1, 0)), at(2, (2, 0))];
        let r = resolve_moves(&pos, &[mv(0, (0, 0), (1, 0)), mv(1, (1, 0), (2, 0))]);
        assert!(r.granted.is_empty());
        assert_eq!(
            r.refused,
            vec![
                Refusal { worker: WorkerId(0), by: WorkerId(1) },
                Refusal { worker: WorkerId(1), by: WorkerId(2) },
            ]
        );
    }

    #[test]
    fn rotation_allowed() {
        let pos = [at(0, (0, 0)), at(1, (1, 0)), at(2, (1, 1)), at(3, (0, 1))];
        let reqs = [
            mv(0, (0, 0), (1, 0)),
            mv(1, (1, 0), (1, 1)),
            mv(2, (1, 1), (0, 1)),
            mv(3, (0, 1), (0, 0)),
        ];
        let r = resolve_moves(&pos, &reqs);
        assert_eq!(r.granted.len(), 4);
    }

    #[test]
    fn input_order_irrelevant() {
        let pos = [at(0, (0, 0)), at(1, (2, 0)), at(2, (1, 1))];
        let mut reqs = vec![mv(0, (0, 0), (1, 0)), mv(1, (2, 0), (1, 0)), mv(2, (1, 1), (1, 0))];
        let a = resolve_moves(&pos, &reqs);
        reqs.reverse();
        let b = resolve_moves(&pos, &reqs);
        assert_eq!(a, b);
        assert_eq!(a.granted, vec![WorkerId(0)]);
    }
}
