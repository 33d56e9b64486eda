//! Evolutionary search over symbol-sequence genomes.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Domains** (`domain`, `path`, `numeric`): what a genome means and how it scores
//! - **Genome Operations** (`genome`): randomness, crossover and mutation
//! - **Selection** (`selection`): parent sampling over the ranked population
//! - **Search Loop** (`search`): the generational engine
//!
//! # Example
//!
//! ```rust,no_run
//! use evosearch::compute::GridMaze;
//! use evosearch::compute::evolution::{EvolutionEngine, PathDomain};
//! use evosearch::schema::{EvolutionConfig, MazeConfig};
//!
//! let maze_config = MazeConfig::default();
//! let maze = GridMaze::from_config(&maze_config);
//! let domain = PathDomain::new(maze, &maze_config);
//!
//! let mut engine = EvolutionEngine::new(domain, EvolutionConfig::default()).unwrap();
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.3}",
//!         progress.generation, progress.best_fitness);
//! });
//!
//! println!("Best path: {}", evosearch::schema::format_path(&result.best_genome));
//! ```
//!
//! # Selection Methods
//!
//! - `RouletteWheel`: fitness proportional (path default)
//! - `Uniform`: every pool member equally likely
//! - `Tournament`: best of `size` random draws
//! - `RankBased`: weight proportional to reversed rank (bit-string default)

mod domain;
mod genome;
mod numeric;
mod path;
mod search;
mod selection;

pub use domain::{Codec, Domain, evaluate};
pub use genome::{
    EditKind, GenomeRng, MIN_CROSSOVER_LENGTH, RandomSource, ScriptedRng, apply_edit,
    edit_mutation, mutate, point_flip, single_point_crossover, splice_two_point,
    two_point_crossover,
};
pub use numeric::{BinaryCodec, FunctionDomain, schaffer_f6};
pub use path::{ConnectivityOracle, PathDomain, WalkOutcome};
pub use search::{EvolutionEngine, Individual};
pub use selection::{MIN_PARENT_POOL, parent_pool_len, select_index, select_parents};
