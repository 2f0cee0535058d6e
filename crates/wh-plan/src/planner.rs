//! Planning trait and the default space-time A* implementation.
//!
//! # Search space
//!
//! A search state is `(cell, g)` where `g` is the number of ticks since
//! departure.  Successors are the walkable 4-neighbours plus waiting in
//! place, each with cost 1.  A successor arriving at tick `depart + g + 1`
//! is rejected if the [`ReservationTable`] gives that cell to another worker
//! at that tick, or if the step would swap cells with another worker.
//!
//! Past the table's last reserved tick nothing can block a worker any more,
//! so states with larger `g` collapse onto `(cell, settle)` and the search
//! degenerates into plain A* on the static grid.  This keeps static queries
//! as cheap as a textbook A* and makes waiting pointless there.
//!
//! # Ordering
//!
//! The open set pops the lowest `f = g + h` first, then the higher `g` (the
//! deeper partial path), then the earliest insertion.  Together with the
//! fixed neighbour order of [`GridMap::neighbors`] this makes every query
//! fully deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use wh_core::{Cell, SearchLimits, Tick, WorkerId};
use wh_grid::GridMap;

use crate::{HashMap, HashSet, Path, PlanError, PlanResult, ReservationTable, UnreachableReason};

// ── PathQuery ─────────────────────────────────────────────────────────────────

/// One planning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathQuery {
    /// The worker the path is for; its own reservations never block it.
    pub worker: WorkerId,
    pub start:  Cell,
    pub goal:   Cell,
    /// Tick at which the worker stands on `start`.
    pub depart: Tick,
}

impl PathQuery {
    /// A query for a worker that departs at tick 0 and ignores nobody in
    /// particular.  Convenient for static queries.
    pub fn between(start: Cell, goal: Cell) -> Self {
        Self { worker: WorkerId::INVALID, start, goal, depart: Tick::ZERO }
    }
}

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable path planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: with the `parallel` feature the
/// stepper runs all planning calls of one tick on Rayon's thread pool.  The
/// grid and reservation table are shared read-only for the whole phase.
pub trait PathPlanner: Send + Sync {
    /// Find a path for `query`, avoiding cells other workers hold in
    /// `reservations`.
    ///
    /// `start == goal` yields the trivial path.  Identical inputs must
    /// always produce the identical path.
    fn find_path(
        &self,
        grid:         &GridMap,
        query:        &PathQuery,
        reservations: &ReservationTable,
    ) -> PlanResult<Path>;

    /// The search bounds this planner enforces, if it has any.  The stepper
    /// refuses to run a planner whose bounds disagree with its config.
    fn search_limits(&self) -> Option<SearchLimits> {
        None
    }
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// Space-time A* with a Manhattan heuristic, bounded by [`SearchLimits`].
///
/// Manhattan distance is admissible and consistent on a unit-cost
/// 4-connected grid, so returned paths are shortest in ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner {
    pub limits: SearchLimits,
}

impl AStarPlanner {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Plan on the bare grid with no reservations.
    pub fn plan_static(&self, grid: &GridMap, start: Cell, goal: Cell) -> PlanResult<Path> {
        self.find_path(grid, &PathQuery::between(start, goal), &ReservationTable::new())
    }
}

impl PathPlanner for AStarPlanner {
    fn find_path(
        &self,
        grid:         &GridMap,
        query:        &PathQuery,
        reservations: &ReservationTable,
    ) -> PlanResult<Path> {
        space_time_astar(grid, query, reservations, self.limits)
    }

    fn search_limits(&self) -> Option<SearchLimits> {
        Some(self.limits)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq)]
struct OpenEntry {
    f:    u32,
    g:    u32,
    seq:  u64,
    node: u32,
}

impl Ord for OpenEntry {
    /// `BinaryHeap` is a max-heap: lowest `f`, then highest `g`, then lowest
    /// `seq` must compare greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Arena entry; `parent == NO_PARENT` for the root.
struct SearchNode {
    cell:   Cell,
    g:      u32,
    parent: u32,
}

const NO_PARENT: u32 = u32::MAX;

fn unreachable(query: &PathQuery, reason: UnreachableReason) -> PlanError {
    PlanError::Unreachable { from: query.start, to: query.goal, reason }
}

fn space_time_astar(
    grid:   &GridMap,
    query:  &PathQuery,
    table:  &ReservationTable,
    limits: SearchLimits,
) -> PlanResult<Path> {
    let (start, goal) = (query.start, query.goal);

    if !grid.is_walkable(start) {
        return Err(unreachable(query, UnreachableReason::StartNotWalkable));
    }
    if !grid.is_walkable(goal) {
        return Err(unreachable(query, UnreachableReason::GoalNotWalkable));
    }
    if !grid.connected(start, goal) {
        return Err(unreachable(query, UnreachableReason::Disconnected));
    }
    if start == goal {
        return Ok(Path::trivial(start));
    }

    // Relative tick after which no reservation exists.
    let settle: u32 = match table.latest_tick() {
        Some(t) if t > query.depart => {
            u32::try_from(t - query.depart).unwrap_or(u32::MAX).min(limits.max_path_len)
        }
        _ => 0,
    };
    let key = |cell: Cell, g: u32| (cell, g.min(settle + 1));

    let mut nodes: Vec<SearchNode> = Vec::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut best_g: HashMap<(Cell, u32), u32> = HashMap::default();
    let mut closed: HashSet<(Cell, u32)> = HashSet::default();
    let mut seq: u64 = 0;
    let mut expansions: usize = 0;
    let mut hit_horizon = false;

    nodes.push(SearchNode { cell: start, g: 0, parent: NO_PARENT });
    best_g.insert(key(start, 0), 0);
    open.push(OpenEntry { f: start.manhattan(goal), g: 0, seq, node: 0 });

    while let Some(entry) = open.pop() {
        let (cell, g) = {
            let n = &nodes[entry.node as usize];
            (n.cell, n.g)
        };
        let k = key(cell, g);

        // Skip stale heap entries and already-expanded states.
        if best_g.get(&k).is_some_and(|&b| g > b) || !closed.insert(k) {
            continue;
        }

        expansions += 1;
        if expansions > limits.max_expansions {
            trace!(worker = %query.worker, %start, %goal, expansions, "search budget exhausted");
            return Err(unreachable(query, UnreachableReason::ExpansionLimit));
        }

        if cell == goal {
            trace!(worker = %query.worker, %start, %goal, expansions, ticks = g, "path found");
            return Path::new(reconstruct(&nodes, entry.node));
        }

        if g >= limits.max_path_len {
            hit_horizon = true;
            continue;
        }

        let arrive = query.depart + (g as u64 + 1);
        let successors = grid.neighbors(cell).chain(std::iter::once(cell));
        for next in successors {
            if !table.is_free_for(next, arrive, query.worker) {
                continue;
            }
            if next != cell && table.is_swap_for(cell, next, arrive, query.worker) {
                continue;
            }

            let g2 = g + grid.cost(cell, next);
            let k2 = key(next, g2);
            if closed.contains(&k2) || best_g.get(&k2).is_some_and(|&b| b <= g2) {
                continue;
            }
            best_g.insert(k2, g2);

            seq += 1;
            let idx = nodes.len() as u32;
            nodes.push(SearchNode { cell: next, g: g2, parent: entry.node });
            open.push(OpenEntry { f: g2 + next.manhattan(goal), g: g2, seq, node: idx });
        }
    }

    let reason = if hit_horizon {
        UnreachableReason::HorizonLimit
    } else {
        UnreachableReason::Blocked
    };
    trace!(worker = %query.worker, %start, %goal, expansions, %reason, "search failed");
    Err(unreachable(query, reason))
}

fn reconstruct(nodes: &[SearchNode], mut idx: u32) -> Vec<Cell> {
    let mut cells = Vec::new();
    while idx != NO_PARENT {
        let n = &nodes[idx as usize];
        cells.push(n.cell);
        idx = n.parent;
    }
    cells.reverse();
    cells
}
