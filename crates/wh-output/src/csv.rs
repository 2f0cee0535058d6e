//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `positions.csv`       — `tick,worker_id,x,y,state`
//! - `transitions.csv`     — `tick,kind,id,from,to`
//! - `worker_summary.csv`  — written once at the end of the run
//! - `order_summary.csv`   — written once at the end of the run

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OrderSummaryRow, OutputError, OutputResult, PositionRow, TransitionRow, WorkerSummaryRow};

const POSITION_HEADER: [&str; 5] = ["tick", "worker_id", "x", "y", "state"];
const TRANSITION_HEADER: [&str; 5] = ["tick", "kind", "id", "from", "to"];
const WORKER_HEADER: [&str; 4] = ["worker_id", "distance_traveled", "idle_ticks", "orders_completed"];
const ORDER_HEADER: [&str; 6] =
    ["order_id", "status", "created_at", "completed_at", "lead_time_secs", "failure"];

/// Writes simulation output to four CSV streams.
///
/// `W` is `File` for [`CsvWriter::new`]; any `io::Write` works through
/// [`CsvWriter::from_writers`], e.g. `Vec<u8>` to capture a run in memory.
pub struct CsvWriter<W: Write = File> {
    positions:   Writer<W>,
    transitions: Writer<W>,
    workers:     Writer<W>,
    orders:      Writer<W>,
    finished:    bool,
}

impl CsvWriter<File> {
    /// Create the output directory if needed, open (or truncate) the four
    /// CSV files in it and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Self::from_writers(
            File::create(dir.join("positions.csv"))?,
            File::create(dir.join("transitions.csv"))?,
            File::create(dir.join("worker_summary.csv"))?,
            File::create(dir.join("order_summary.csv"))?,
        )
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap four sinks, in file order, and write the header rows.
    pub fn from_writers(positions: W, transitions: W, workers: W, orders: W) -> OutputResult<Self> {
        let mut positions = Writer::from_writer(positions);
        positions.write_record(POSITION_HEADER)?;

        let mut transitions = Writer::from_writer(transitions);
        transitions.write_record(TRANSITION_HEADER)?;

        let mut workers = Writer::from_writer(workers);
        workers.write_record(WORKER_HEADER)?;

        let mut orders = Writer::from_writer(orders);
        orders.write_record(ORDER_HEADER)?;

        Ok(Self { positions, transitions, workers, orders, finished: false })
    }

    /// Flush and hand back the four sinks in file order.
    pub fn into_inner(self) -> OutputResult<[W; 4]> {
        let take = |w: Writer<W>| w.into_inner().map_err(|e| OutputError::Io(e.into_error()));
        Ok([
            take(self.positions)?,
            take(self.transitions)?,
            take(self.workers)?,
            take(self.orders)?,
        ])
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

fn opt(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            self.positions.write_record(&[
                row.tick.to_string(),
                row.worker_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.state.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            self.transitions.write_record(&[
                row.tick.to_string(),
                row.kind.as_str().to_owned(),
                row.id.to_string(),
                row.from.to_owned(),
                row.to.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_worker_summary(&mut self, rows: &[WorkerSummaryRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            self.workers.write_record(&[
                row.worker_id.to_string(),
                row.distance_traveled.to_string(),
                row.idle_ticks.to_string(),
                row.orders_completed.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_order_summary(&mut self, rows: &[OrderSummaryRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            self.orders.write_record(&[
                row.order_id.to_string(),
                row.status.to_owned(),
                row.created_at.to_string(),
                opt(row.completed_at),
                opt(row.lead_time_secs),
                row.failure.clone().unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.transitions.flush()?;
        self.workers.flush()?;
        self.orders.flush()?;
        Ok(())
    }
}
