//! Movement conflict resolution.
//!
//! # Rules
//!
//! Every worker either requests a move into an adjacent cell (a *mover*) or
//! stays where it is.  A mover is refused when
//!
//! 1. its target is occupied by a worker that stays,
//! 2. a lower-id mover already claimed the same target, or
//! 3. it would swap cells with another mover.
//!
//! A refused mover stays, which can in turn refuse movers that were
//! following it into its cell.  The check repeats until nothing changes;
//! the refused set only grows, so this takes at most one pass per mover.
//!
//! Chains and rotations of movers into each other's vacated cells are
//! allowed.  After committing the granted moves no two workers share a cell.

use wh_core::{Cell, WorkerId};

use crate::HashMap;

/// A requested single-cell move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub worker: WorkerId,
    pub from:   Cell,
    pub to:     Cell,
}

/// A refused move and the worker that caused the refusal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Refusal {
    pub worker: WorkerId,
    pub by:     WorkerId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Workers whose move is granted, ascending id.
    pub granted: Vec<WorkerId>,
    /// Refused movers, ascending id.
    pub refused: Vec<Refusal>,
}

/// Resolve `requests` against the current `positions` of all workers.
///
/// `positions` must list every worker once with distinct cells; `requests`
/// must have `from` equal to the worker's position and `to != from`.
/// Ordering of the inputs does not matter.
pub fn resolve_moves(positions: &[(WorkerId, Cell)], requests: &[MoveRequest]) -> Resolution {
    let mut reqs: Vec<MoveRequest> = requests.to_vec();
    reqs.sort_by_key(|r| r.worker);

    let moving: HashMap<WorkerId, usize> =
        reqs.iter().enumerate().map(|(i, r)| (r.worker, i)).collect();
    let occupant: HashMap<Cell, WorkerId> = positions.iter().map(|&(w, c)| (c, w)).collect();
    let mut refused_by: Vec<Option<WorkerId>> = vec![None; reqs.len()];

    // Cells whose occupant stays put.  Grows as movers are refused.
    let mut held: HashMap<Cell, WorkerId> = positions
        .iter()
        .filter(|(w, _)| !moving.contains_key(w))
        .map(|&(w, c)| (c, w))
        .collect();

    loop {
        let mut changed = false;
        let mut claimed: HashMap<Cell, WorkerId> = HashMap::default();

        for i in 0..reqs.len() {
            if refused_by[i].is_some() {
                continue;
            }
            let r = reqs[i];
            let blocker = if let Some(&s) = held.get(&r.to) {
                Some(s)
            } else if let Some(&c) = claimed.get(&r.to) {
                Some(c)
            } else {
                swap_partner(&reqs, &refused_by, &moving, &occupant, i)
            };

            match blocker {
                Some(by) => {
                    refused_by[i] = Some(by);
                    held.insert(r.from, r.worker);
                    changed = true;
                }
                None => {
                    claimed.insert(r.to, r.worker);
                }
            }
        }

        if !changed {
            break;
        }
    }

    let mut out = Resolution::default();
    for (r, by) in reqs.iter().zip(refused_by) {
        match by {
            None => out.granted.push(r.worker),
            Some(by) => out.refused.push(Refusal { worker: r.worker, by }),
        }
    }
    out
}

/// The still-unrefused mover that `reqs[i]` would swap cells with.
fn swap_partner(
    reqs:       &[MoveRequest],
    refused_by: &[Option<WorkerId>],
    moving:     &HashMap<WorkerId, usize>,
    occupant:   &HashMap<Cell, WorkerId>,
    i:          usize,
) -> Option<WorkerId> {
    let r = reqs[i];
    let &other = occupant.get(&r.to)?;
    let &j = moving.get(&other)?;
    (refused_by[j].is_none() && reqs[j].to == r.from).then_some(other)
}
