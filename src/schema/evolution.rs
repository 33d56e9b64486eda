//! Run configuration and result types for the evolutionary loop.
//!
//! Everything an operator needs (rates, pool choices, repetition caps, the
//! fitness floor) is carried here; the operators themselves hold no defaults.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A genome symbol.
///
/// Genomes are plain `Vec`s of genes; the one-character symbol is used for
/// logging and for the JSON-lines recorder.
pub trait Gene: Copy + PartialEq + Debug + Send + Sync + Serialize {
    fn symbol(self) -> char;
}

impl Gene for bool {
    fn symbol(self) -> char {
        if self { '1' } else { '0' }
    }
}

/// Render any genome as its symbol string.
pub fn format_genome<G: Gene>(genome: &[G]) -> String {
    genome.iter().map(|g| g.symbol()).collect()
}

/// Top-level configuration of an evolutionary run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Population, survivor and generation counts.
    pub population: PopulationConfig,
    /// Genetic operator settings.
    pub algorithm: GeneticAlgorithmConfig,
    /// Minimum fitness any individual can receive.
    #[serde(default = "default_fitness_floor")]
    pub fitness_floor: f64,
    /// Reporting settings.
    #[serde(default)]
    pub report: ReportConfig,
    /// Evaluate individuals on the rayon thread pool.
    #[serde(default)]
    pub parallel_evaluation: bool,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            algorithm: GeneticAlgorithmConfig::default(),
            fitness_floor: default_fitness_floor(),
            report: ReportConfig::default(),
            parallel_evaluation: false,
            random_seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Settings for fixed-length bit-string genomes: one elite, rank-based
    /// parents from the whole population, single-point crossover and
    /// repeated single-bit flips.
    ///
    /// Each child gets about 2.4 flips on average (at most 4).
    pub fn bit_string() -> Self {
        Self {
            population: PopulationConfig {
                size: 100,
                survivors: 1,
                generations: 4000,
            },
            algorithm: GeneticAlgorithmConfig {
                selection: SelectionMethod::RankBased,
                parent_pool: ParentPool::Population,
                crossover: CrossoverMethod::SinglePoint,
                crossover_rate: 0.65,
                mutation: MutationMethod::PointFlip,
                mutation_rate: 0.8,
                mutation_schedule: MutationSchedule::Repeated { max_attempts: 4 },
            },
            ..Default::default()
        }
    }
}

fn default_fitness_floor() -> f64 {
    0.01
}

/// Population and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals (P), constant for the whole run.
    pub size: usize,
    /// Number of elites carried unchanged into the next generation (S < P).
    pub survivors: usize,
    /// Number of generations to run (G).
    pub generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 80,
            survivors: 40,
            generations: 30,
        }
    }
}

/// Genetic operator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// How parents are drawn from the parent pool.
    #[serde(default)]
    pub selection: SelectionMethod,
    /// Which individuals parents are drawn from.
    #[serde(default)]
    pub parent_pool: ParentPool,
    /// Recombination operator.
    #[serde(default)]
    pub crossover: CrossoverMethod,
    /// Probability that a parent pair is recombined (0.0-1.0).
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Mutation operator.
    #[serde(default)]
    pub mutation: MutationMethod,
    /// Probability of a mutation event (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// How often a mutation event may repeat on one child.
    #[serde(default)]
    pub mutation_schedule: MutationSchedule,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            selection: SelectionMethod::default(),
            parent_pool: ParentPool::default(),
            crossover: CrossoverMethod::default(),
            crossover_rate: default_crossover_rate(),
            mutation: MutationMethod::default(),
            mutation_rate: default_mutation_rate(),
            mutation_schedule: MutationSchedule::default(),
        }
    }
}

fn default_crossover_rate() -> f64 {
    1.0
}
fn default_mutation_rate() -> f64 {
    0.25
}

/// Parent sampling method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "method")]
pub enum SelectionMethod {
    /// Fitness-proportional sampling; weights are the floored fitness values.
    #[default]
    RouletteWheel,
    /// Every candidate in the pool is equally likely.
    Uniform,
    /// Best of `size` uniformly drawn candidates.
    Tournament {
        #[serde(default = "default_tournament_size")]
        size: usize,
    },
    /// Weight proportional to reversed rank in the (sorted) pool.
    RankBased,
}

fn default_tournament_size() -> usize {
    3
}

/// The set parents are drawn from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ParentPool {
    /// Only the elite survivors of truncation.
    #[default]
    Survivors,
    /// The whole ranked previous population.
    Population,
}

/// Recombination operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CrossoverMethod {
    /// One child `A[..c1] ++ B[c1..c2] ++ A[c2..]`.
    #[default]
    TwoPoint,
    /// Two complementary children around one cut point.
    SinglePoint,
}

/// Mutation operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MutationMethod {
    /// Replace, insert or delete one symbol (variable-length genomes only).
    #[default]
    Edit,
    /// Change exactly one symbol to a different one.
    PointFlip,
}

/// Repetition policy for mutation events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type")]
pub enum MutationSchedule {
    /// At most one mutation, applied with `mutation_rate`.
    #[default]
    Once,
    /// Mutate again while a `mutation_rate` draw succeeds, at most
    /// `max_attempts` times. The count follows a geometric distribution
    /// truncated at `max_attempts`.
    Repeated { max_attempts: usize },
}

/// Reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of top genomes pushed to the result sink every generation.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

// ============================================================================
// Records and results
// ============================================================================

/// Best genome of one completed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord<G> {
    /// Generation index, starting at 0.
    pub generation: usize,
    /// Genome of the best-ranked individual.
    pub best_genome: Vec<G>,
    /// Its fitness.
    pub best_fitness: f64,
    /// Mean fitness of the generation.
    pub mean_fitness: f64,
}

/// Append-only run history, one record per generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionHistory<G> {
    pub records: Vec<GenerationRecord<G>>,
}

impl<G> Default for EvolutionHistory<G> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<G> EvolutionHistory<G> {
    pub fn push(&mut self, record: GenerationRecord<G>) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&GenerationRecord<G>> {
        self.records.last()
    }

    /// Best fitness per generation, for plotting.
    pub fn best_fitness(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.best_fitness).collect()
    }

    /// Mean fitness per generation.
    pub fn mean_fitness(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.mean_fitness).collect()
    }
}

/// Lifecycle state of the generation loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Population built, nothing evaluated yet.
    #[default]
    Initialized,
    /// Fitness being computed.
    Evaluating,
    /// Population sorted and recorded.
    Ranked,
    /// Next population assembled.
    Bred,
    /// All generations completed.
    Terminated,
}

/// Progress update passed to run callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generation just ranked.
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Best fitness seen so far.
    pub best_fitness: f64,
    /// Best fitness of this generation.
    pub generation_best: f64,
    /// Mean fitness of this generation.
    pub mean_fitness: f64,
    /// Phase of the loop.
    pub phase: EvolutionPhase,
}

/// Counters for the local recovery paths of the loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepairStats {
    /// Crossovers skipped because a parent was too short.
    pub crossover_regenerations: u64,
    /// Empty genomes replaced after breeding.
    pub empty_genome_repairs: u64,
    /// Offspring drawn from the initializer because the parent pool was too small.
    pub degenerate_pool_fallbacks: u64,
    /// Failed pushes to the result sink.
    pub sink_failures: u64,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations completed.
    pub generations: usize,
    /// Fitness evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness achieved.
    pub best_fitness: f64,
    /// Mean fitness of the final population.
    pub final_mean_fitness: f64,
    /// Wall time in seconds.
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
    /// Seed the run's random source was created from, if known.
    pub seed: Option<u64>,
    /// Recovery counters.
    pub repairs: RepairStats,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult<G> {
    /// Best genome of the final population.
    pub best_genome: Vec<G>,
    /// Its fitness.
    pub best_fitness: f64,
    /// Final population genomes, best first.
    pub final_population: Vec<Vec<G>>,
    /// Per-generation history.
    pub history: EvolutionHistory<G>,
    /// Run statistics.
    pub stats: EvolutionStats,
}

// ============================================================================
// Validation
// ============================================================================

/// Run configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 1")]
    EmptyPopulation,
    #[error("Survivor count ({survivors}) must be below the population size ({size})")]
    TooManySurvivors { survivors: usize, size: usize },
    #[error("Generation count must be at least 1")]
    NoGenerations,
    #[error("Probability {name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Fitness floor must be a positive finite number, got {0}")]
    InvalidFitnessFloor(f64),
    #[error("Repeated mutation needs at least one attempt")]
    NoMutationAttempts,
    #[error("Tournament size must be at least 1")]
    EmptyTournament,
    #[error("Report top_k must be at least 1")]
    EmptyReport,
    #[error("Edit mutation changes genome length; genomes of this domain are fixed at {0} symbols")]
    EditOnFixedLength(usize),
    #[error("Problem config validation failed: {0}")]
    ProblemConfigError(#[from] ConfigError),
}

/// Errors surfaced by the engine and the path vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] EvolutionConfigError),
    #[error("Invalid direction symbol '{0}'")]
    InvalidSymbol(char),
}

impl EvolutionConfig {
    /// Validate run configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        let population = &self.population;
        if population.size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if population.survivors >= population.size {
            return Err(EvolutionConfigError::TooManySurvivors {
                survivors: population.survivors,
                size: population.size,
            });
        }
        if population.generations == 0 {
            return Err(EvolutionConfigError::NoGenerations);
        }

        let check_probability = |value: f64, name: &'static str| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EvolutionConfigError::InvalidProbability { name, value })
            }
        };
        check_probability(self.algorithm.crossover_rate, "crossover_rate")?;
        check_probability(self.algorithm.mutation_rate, "mutation_rate")?;

        if !self.fitness_floor.is_finite() || self.fitness_floor <= 0.0 {
            return Err(EvolutionConfigError::InvalidFitnessFloor(
                self.fitness_floor,
            ));
        }
        if let MutationSchedule::Repeated { max_attempts: 0 } = self.algorithm.mutation_schedule {
            return Err(EvolutionConfigError::NoMutationAttempts);
        }
        if let SelectionMethod::Tournament { size: 0 } = self.algorithm.selection {
            return Err(EvolutionConfigError::EmptyTournament);
        }
        if self.report.top_k == 0 {
            return Err(EvolutionConfigError::EmptyReport);
        }

        Ok(())
    }
}
