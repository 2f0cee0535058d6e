//! Run configuration.
//!
//! Typically built in code or deserialized (with the `serde` feature) by the
//! application and handed to `wh_sim::SimBuilder`.

use crate::{SimClock, Tick, WhError, WhResult};

// ── SearchLimits ──────────────────────────────────────────────────────────────

/// Bounds on a single path search.  Both must be non-zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Maximum number of nodes popped from the open set.
    pub max_expansions: usize,
    /// Maximum path length in ticks (moves + waits).
    pub max_path_len: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { max_expansions: 20_000, max_path_len: 512 }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Total ticks to simulate (`num_steps`).
    pub total_ticks: u64,

    /// Master seed, forwarded to seedable order sources.  The engine itself
    /// is deterministic without it.
    pub seed: u64,

    /// Simulated seconds per tick.  Output only.
    pub tick_duration_secs: u32,

    /// Consecutive blocked ticks after which a worker discards its path and
    /// requests a new one.
    pub replan_after_blocks: u32,

    /// Replans allowed on one leg before the order fails.
    pub max_replans: u32,

    /// Extra ticks a stationary worker keeps its cell reserved for planners.
    pub reservation_hold: u64,

    /// Per-query planner bounds.
    pub search: SearchLimits,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks:         1_000,
            seed:                42,
            tick_duration_secs:  1,
            replan_after_blocks: 3,
            max_replans:         5,
            reservation_hold:    1,
            search:              SearchLimits::default(),
        }
    }
}

impl SimConfig {
    /// Default configuration running for `total_ticks`.
    pub fn with_ticks(total_ticks: u64) -> Self {
        Self { total_ticks, ..Self::default() }
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> WhResult<()> {
        if self.tick_duration_secs == 0 {
            return Err(WhError::Config("tick_duration_secs must be > 0".into()));
        }
        if self.replan_after_blocks == 0 {
            return Err(WhError::Config("replan_after_blocks must be > 0".into()));
        }
        if self.search.max_expansions == 0 || self.search.max_path_len == 0 {
            return Err(WhError::Config("search limits must be > 0".into()));
        }
        Ok(())
    }
}
