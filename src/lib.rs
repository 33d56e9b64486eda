//! evosearch - Generational evolutionary search over symbol genomes.
//!
//! This crate evolves populations of candidate solutions with selection,
//! crossover and mutation across discrete generations. Two problem domains
//! ship with it: direction strings walked through a grid maze, and
//! fixed-length bit strings encoding a point of a two-argument landscape.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Configuration, grid vocabulary and run records
//! - `compute`: Domains, genetic operators, the engine and the maze oracle
//! - `report`: Result sinks for per-generation top genomes
//!
//! # Example
//!
//! ```rust,no_run
//! use evosearch::{
//!     compute::evolution::{Codec, EvolutionEngine, FunctionDomain},
//!     schema::{EvolutionConfig, FunctionConfig},
//! };
//!
//! // Maximise Schaffer's F6 over 44-bit genomes
//! let domain = FunctionDomain::new(&FunctionConfig::default());
//! let mut engine = EvolutionEngine::new(domain, EvolutionConfig::bit_string()).unwrap();
//! let result = engine.run();
//!
//! let (x, y) = engine.domain().decode(&result.best_genome);
//! println!("f({x:.4}, {y:.4}) = {:.6}", result.best_fitness);
//! ```

pub mod compute;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::GridMaze;
pub use compute::evolution::{EvolutionEngine, FunctionDomain, Individual, PathDomain};
pub use schema::{EvolutionConfig, ExperimentConfig, ProblemConfig};
