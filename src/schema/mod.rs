//! Schema module - Configuration, grid vocabulary and result types.

mod config;
mod evolution;
mod grid;

pub use config::*;
pub use evolution::*;
pub use grid::*;
