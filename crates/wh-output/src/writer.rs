//! The `OutputWriter` trait implemented by output backends.

use crate::{OrderSummaryRow, OutputResult, PositionRow, TransitionRow, WorkerSummaryRow};

/// Sink for the event stream and end-of-run summary.
///
/// Errors never reach the simulation: [`SimOutputObserver`][crate::SimOutputObserver]
/// stores them for [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write every worker's position for one tick.
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()>;

    /// Write the order and worker transitions of one tick.
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()>;

    fn write_worker_summary(&mut self, rows: &[WorkerSummaryRow]) -> OutputResult<()>;

    fn write_order_summary(&mut self, rows: &[OrderSummaryRow]) -> OutputResult<()>;

    /// Flush all underlying outputs.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
