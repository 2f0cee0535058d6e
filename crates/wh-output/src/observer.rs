//! Feeds tick events and the run summary into an [`OutputWriter`].

use tracing::warn;

use wh_core::SimConfig;
use wh_sim::{RunSummary, SimObserver, TickEvent};

use crate::row::{OrderSummaryRow, PositionRow, TransitionRow, WorkerSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Writes one position row per worker per tick, one transition row per
/// status change, and both summaries once the run ends.
///
/// Observer callbacks cannot fail, so the first write error is parked here
/// and later ones are dropped; collect it with
/// [`take_error`](Self::take_error) once `run` returns.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    tick_duration_secs: u32,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to convert
    /// lead times to simulated seconds.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self { writer, tick_duration_secs: config.tick_duration_secs, last_error: None }
    }

    /// The first write error of the run, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Hand back the writer, e.g. to read in-memory buffers.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed; further errors are dropped");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, event: &TickEvent) {
        let positions: Vec<PositionRow> =
            event.positions.iter().map(|p| PositionRow::new(event.tick, p)).collect();
        let result = self.writer.write_positions(&positions);
        self.store_err(result);

        let transitions: Vec<TransitionRow> = event
            .order_transitions
            .iter()
            .map(TransitionRow::order)
            .chain(event.worker_transitions.iter().map(|t| TransitionRow::worker(event.tick, t)))
            .collect();
        if !transitions.is_empty() {
            let result = self.writer.write_transitions(&transitions);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        let workers: Vec<WorkerSummaryRow> = summary.workers.iter().map(WorkerSummaryRow::from).collect();
        let result = self.writer.write_worker_summary(&workers);
        self.store_err(result);

        let orders: Vec<OrderSummaryRow> = summary
            .orders
            .iter()
            .map(|o| OrderSummaryRow::new(o, self.tick_duration_secs))
            .collect();
        let result = self.writer.write_order_summary(&orders);
        self.store_err(result);

        let result = self.writer.finish();
        self.store_err(result);
    }
}
