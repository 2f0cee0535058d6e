//! Simulation observer trait for progress reporting and data collection.

use wh_core::Tick;

use crate::{RunSummary, TickEvent};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, event: &TickEvent) {
///         if event.tick.0 % self.interval == 0 {
///             println!("{}: {} order changes", event.tick, event.order_transitions.len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once the tick has been committed.
    fn on_tick_end(&mut self, _event: &TickEvent) {}

    /// Called once after the final tick, or after an early stop.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps every tick event and the final summary in memory.
///
/// Handy for tests and small runs; memory grows with ticks × workers.
#[derive(Default, Debug)]
pub struct EventLog {
    pub events:  Vec<TickEvent>,
    pub summary: Option<RunSummary>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The event recorded for `tick`, if any.
    pub fn at(&self, tick: Tick) -> Option<&TickEvent> {
        self.events.iter().find(|e| e.tick == tick)
    }
}

impl SimObserver for EventLog {
    fn on_tick_end(&mut self, event: &TickEvent) {
        self.events.push(event.clone());
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}
