//! Session recorder: appends every input event to a JSONL file so a live
//! session can be replayed later.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use turntable_common::error::{TurntableError, TurntableResult};
use turntable_model::event::{EventStreamHeader, InputEvent};

/// Flush after this many buffered events.
const FLUSH_EVERY: u64 = 256;

/// Writes events to a JSONL file, header first.
pub struct EventWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    events_written: u64,
}

impl EventWriter {
    /// Create (or truncate) `path` and write the header as a `#` comment line.
    pub fn create(path: impl Into<PathBuf>, header: &EventStreamHeader) -> TurntableResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| TurntableError::input(format!("Failed to write header: {e}")))?;

        tracing::debug!(path = %path.display(), "Recording session events");
        Ok(Self {
            writer,
            path,
            events_written: 0,
        })
    }

    /// Append one event.
    pub fn record(&mut self, event: &InputEvent) -> TurntableResult<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| TurntableError::input(format!("Failed to write event: {e}")))?;
        self.events_written += 1;

        if self.events_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> TurntableResult<()> {
        self.writer
            .flush()
            .map_err(|e| TurntableError::input(format!("Failed to flush events: {e}")))
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
