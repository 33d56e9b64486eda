//! JSON-lines recorder for generation snapshots.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::sink::{GenerationSnapshot, ResultSink, SinkError};
use crate::compute::evolution::Individual;
use crate::schema::Gene;

/// Configuration for snapshot recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Record every Nth generation (1 = every generation).
    pub every: usize,
    /// Maximum records to write (0 = unlimited).
    pub max_records: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            every: 1,
            max_records: 0,
        }
    }
}

/// Writes one [`GenerationSnapshot`] per line.
///
/// Usage:
/// ```ignore
/// let recorder = JsonLinesRecorder::create("run.jsonl", RecorderConfig::default())?;
/// let mut engine = EvolutionEngine::new(domain, config)?.with_sink(recorder);
/// engine.run();
/// ```
pub struct JsonLinesRecorder<W: Write = BufWriter<File>> {
    writer: W,
    config: RecorderConfig,
    records_written: u64,
}

impl JsonLinesRecorder<BufWriter<File>> {
    /// Create (or truncate) a file and record into it.
    pub fn create<P: AsRef<Path>>(path: P, config: RecorderConfig) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), config))
    }
}

impl<W: Write> JsonLinesRecorder<W> {
    pub fn new(writer: W, config: RecorderConfig) -> Self {
        Self {
            writer,
            config,
            records_written: 0,
        }
    }

    /// Record a snapshot.
    ///
    /// Returns true if the snapshot was actually written (generations may be
    /// skipped based on config).
    pub fn record(&mut self, snapshot: &GenerationSnapshot) -> Result<bool, SinkError> {
        if snapshot.generation % self.config.every.max(1) != 0 {
            return Ok(false);
        }
        if self.config.max_records > 0 && self.records_written >= self.config.max_records {
            return Ok(false);
        }

        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        self.records_written += 1;
        Ok(true)
    }

    /// Get number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<G: Gene, W: Write + Send> ResultSink<G> for JsonLinesRecorder<W> {
    fn publish(&mut self, generation: usize, top: &[Individual<G>]) -> Result<(), SinkError> {
        self.record(&GenerationSnapshot::new(generation, top))
            .map(|_| ())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        log::debug!("Recorder finished with {} records", self.records_written);
        Ok(())
    }
}
