//! Reporting for evolution runs.
//!
//! The engine pushes the top-ranked individuals of every generation to a
//! [`ResultSink`]. Sinks are fire-and-forget: a failing sink is logged and
//! counted but never stops the run.
//!
//! # Sinks
//!
//! - [`NullSink`]: discards everything (the engine default)
//! - [`LogSink`]: logs the top genomes at `info` level
//! - [`MemorySink`]: collects snapshots in a shared buffer
//! - [`JsonLinesRecorder`]: writes one JSON object per generation
//!
//! ```text
//! {"generation":0,"entries":[{"rank":0,"fitness":61.3,"genome":"NNWW..."}]}
//! {"generation":1,"entries":[...]}
//! ```

mod recorder;
mod sink;

pub use recorder::{JsonLinesRecorder, RecorderConfig};
pub use sink::{
    GenerationSnapshot, LogSink, MemorySink, MemorySinkHandle, NullSink, ResultSink, SinkError,
    SnapshotEntry,
};
