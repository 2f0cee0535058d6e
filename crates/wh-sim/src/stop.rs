//! Cooperative early stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable, thread-safe stop flag.
///
/// The stepper checks it between ticks only, so a tick that has started
/// always commits in full.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running simulation to stop before its next tick.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear a previous request so that the simulation can be resumed.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}
