use crate::core::settlement::Settlement;
use crate::simulation::snapshot::LedgerSnapshot;
use crate::sink::{SinkError, StepSink};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the raw event stream inside the output directory.
pub const EVENTS_FILE: &str = "events.jsonl";

/// Writes the raw event stream and per-step snapshots as JSON.
///
/// - `events.jsonl`: one settlement object per line, chronological,
///   appended at each step boundary.
/// - `snapshot_NNN.json`: the cumulative ledger snapshot of step NNN.
///
/// Files are opened per flush; no handle stays open between steps.
#[derive(Debug, Clone)]
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    /// The directory must already exist. An existing event file is
    /// truncated so a run never appends to a previous run's events.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let sink = Self { dir: dir.into() };
        File::create(sink.events_path())?;
        Ok(sink)
    }

    pub fn events_path(&self) -> PathBuf {
        self.dir.join(EVENTS_FILE)
    }

    pub fn snapshot_path(&self, step: u32) -> PathBuf {
        self.dir.join(format!("snapshot_{:03}.json", step))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StepSink for JsonSink {
    fn on_snapshot(&mut self, snapshot: &LedgerSnapshot) -> Result<(), SinkError> {
        let path = self.snapshot_path(snapshot.step);
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut out, snapshot)?;
        out.flush()?;
        Ok(())
    }

    fn on_events(&mut self, step: u32, events: &[Settlement]) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.events_path())?;
        let mut out = BufWriter::new(file);
        for event in events {
            serde_json::to_writer(&mut out, event)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        debug!("step {}: appended {} events", step, events.len());
        Ok(())
    }
}

/// Read an event stream written by [`JsonSink`] back into settlements.
pub fn read_events(path: &Path) -> Result<Vec<Settlement>, SinkError> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(SinkError::from))
        .collect()
}
