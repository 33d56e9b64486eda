//! Compute module - Evolutionary search and the reference maze oracle.

pub mod evolution;
mod maze;

pub use maze::*;
