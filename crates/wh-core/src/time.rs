//! Ticks and the tick clock.
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one
//! discrete step in which every worker moves at most one cell.  The mapping
//! to wall-clock time is held in `SimClock`:
//!
//!   elapsed_secs = tick * tick_duration_secs
//!
//! Only output code needs wall-clock seconds; the engine itself reasons in
//! ticks exclusively.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Discrete step counter; tick 0 is the first step of a run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// `self + n`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks from `earlier` up to `self`; `earlier` must not be later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to elapsed simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated seconds one tick represents.
    pub tick_duration_secs: u32,
    /// The current tick, advanced once per completed tick.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_secs: u32) -> Self {
        Self { tick_duration_secs, current_tick: Tick::ZERO }
    }

    /// Move on to the next tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.next();
    }

    /// Simulated seconds at the current tick.
    #[inline]
    pub fn elapsed_secs(&self) -> u64 {
        self.secs_at(self.current_tick)
    }

    /// Simulated seconds at an arbitrary tick.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> u64 {
        tick.0 * self.tick_duration_secs as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed_secs();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, secs / 3_600, (secs % 3_600) / 60, secs % 60)
    }
}
