//! Result sinks receiving the best individuals of each generation.

use std::io;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::compute::evolution::Individual;
use crate::schema::{Gene, format_genome};

/// Errors raised by result sinks.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Receives the top-ranked individuals after every generation.
pub trait ResultSink<G>: Send {
    /// Called once per generation with the best individuals, best first.
    fn publish(&mut self, generation: usize, top: &[Individual<G>]) -> Result<(), SinkError>;

    /// Called once after the last generation.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// One ranked genome inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub rank: usize,
    pub fitness: Option<f64>,
    /// Genome rendered as its symbol string.
    pub genome: String,
}

/// Top individuals of one generation, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    pub generation: usize,
    pub entries: Vec<SnapshotEntry>,
}

impl GenerationSnapshot {
    pub fn new<G: Gene>(generation: usize, top: &[Individual<G>]) -> Self {
        Self {
            generation,
            entries: top
                .iter()
                .enumerate()
                .map(|(rank, individual)| SnapshotEntry {
                    rank,
                    fitness: individual.fitness,
                    genome: format_genome(&individual.genome),
                })
                .collect(),
        }
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<G> ResultSink<G> for NullSink {
    fn publish(&mut self, _generation: usize, _top: &[Individual<G>]) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Logs the top genomes at `info` level.
#[derive(Debug, Clone)]
pub struct LogSink {
    /// Longest genome string printed before truncation.
    pub max_symbols: usize,
}

impl Default for LogSink {
    fn default() -> Self {
        Self { max_symbols: 60 }
    }
}

impl<G: Gene> ResultSink<G> for LogSink {
    fn publish(&mut self, generation: usize, top: &[Individual<G>]) -> Result<(), SinkError> {
        for (rank, individual) in top.iter().enumerate() {
            let mut genome: String = individual
                .genome
                .iter()
                .take(self.max_symbols)
                .map(|g| g.symbol())
                .collect();
            if individual.genome.len() > self.max_symbols {
                genome.push_str("...");
            }
            log::info!(
                "Generation {:03} | #{} fitness {:.4} len {} | {}",
                generation,
                rank + 1,
                individual.fitness.unwrap_or(f64::NAN),
                individual.genome.len(),
                genome
            );
        }
        Ok(())
    }
}

/// Collects snapshots in memory.
///
/// The sink moves into the engine; keep a [`MemorySinkHandle`] to read the
/// snapshots back.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Arc<Mutex<Vec<GenerationSnapshot>>>,
}

/// Read side of a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    snapshots: Arc<Mutex<Vec<GenerationSnapshot>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MemorySinkHandle {
        MemorySinkHandle {
            snapshots: Arc::clone(&self.snapshots),
        }
    }
}

impl MemorySinkHandle {
    /// Copy of everything published so far.
    pub fn snapshots(&self) -> Vec<GenerationSnapshot> {
        self.snapshots
            .lock()
            .map(|snapshots| snapshots.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<G: Gene> ResultSink<G> for MemorySink {
    fn publish(&mut self, generation: usize, top: &[Individual<G>]) -> Result<(), SinkError> {
        let snapshot = GenerationSnapshot::new(generation, top);
        self.snapshots
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".into()))?
            .push(snapshot);
        Ok(())
    }
}
