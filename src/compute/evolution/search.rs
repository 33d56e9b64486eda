//! The generational evolution loop.

use std::time::Instant;

use rayon::prelude::*;

use crate::report::{NullSink, ResultSink};
use crate::schema::{
    CrossoverMethod, EvolutionConfig, EvolutionConfigError, EvolutionError, EvolutionHistory,
    EvolutionPhase, EvolutionProgress, EvolutionResult, EvolutionStats, GenerationRecord,
    MutationMethod, RepairStats,
};

use super::domain::{Domain, evaluate};
use super::genome::{
    GenomeRng, RandomSource, mutate, single_point_crossover, two_point_crossover,
};
use super::selection::{parent_pool_len, select_parents};

/// A genome and its fitness for the current generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<G> {
    pub genome: Vec<G>,
    /// `None` until evaluated; cleared when carried into a new generation.
    pub fitness: Option<f64>,
}

impl<G> Individual<G> {
    pub fn new(genome: Vec<G>) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine<D: Domain, R: RandomSource = GenomeRng> {
    config: EvolutionConfig,
    domain: D,
    rng: R,
    seed: Option<u64>,
    sink: Box<dyn ResultSink<D::Gene>>,
    population: Vec<Individual<D::Gene>>,
    history: EvolutionHistory<D::Gene>,
    generation: usize,
    phase: EvolutionPhase,
    best_fitness: f64,
    total_evaluations: u64,
    repairs: RepairStats,
}

impl<D: Domain> EvolutionEngine<D, GenomeRng> {
    /// Create a new evolution engine.
    ///
    /// The random source is seeded from `config.random_seed`, or from entropy
    /// when no seed is given.
    pub fn new(domain: D, config: EvolutionConfig) -> Result<Self, EvolutionError> {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let rng = GenomeRng::new(seed);
        let mut engine = Self::with_rng(domain, config, rng)?;
        engine.seed = Some(seed);
        Ok(engine)
    }
}

impl<D: Domain, R: RandomSource> EvolutionEngine<D, R> {
    /// Create an engine drawing from the given random source.
    pub fn with_rng(domain: D, config: EvolutionConfig, rng: R) -> Result<Self, EvolutionError> {
        config.validate()?;
        if let Some(length) = domain.fixed_length()
            && config.algorithm.mutation == MutationMethod::Edit
        {
            return Err(EvolutionConfigError::EditOnFixedLength(length).into());
        }

        Ok(Self {
            config,
            domain,
            rng,
            seed: None,
            sink: Box::new(NullSink),
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            phase: EvolutionPhase::Initialized,
            best_fitness: f64::NEG_INFINITY,
            total_evaluations: 0,
            repairs: RepairStats::default(),
        })
    }

    /// Route per-generation top-K reports to `sink`.
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: ResultSink<D::Gene> + 'static,
    {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// Current population. Ranked best first once a generation has been
    /// evaluated and not yet bred.
    pub fn population(&self) -> &[Individual<D::Gene>] {
        &self.population
    }

    pub fn history(&self) -> &EvolutionHistory<D::Gene> {
        &self.history
    }

    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Index of the generation currently being processed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn repairs(&self) -> &RepairStats {
        &self.repairs
    }

    /// Initialize the population.
    pub fn initialize(&mut self) {
        self.generation = 0;
        self.best_fitness = f64::NEG_INFINITY;
        self.total_evaluations = 0;
        self.history = EvolutionHistory::default();
        self.repairs = RepairStats::default();

        let length = self.domain.initial_length();
        let mut population = Vec::with_capacity(self.config.population.size);
        for _ in 0..self.config.population.size {
            let mut genome = self.domain.random_genome(&mut self.rng, length);
            self.repair(&mut genome);
            population.push(Individual::new(genome));
        }
        self.population = population;
        self.phase = EvolutionPhase::Initialized;
    }

    /// Replace an empty genome by a fresh one of the repair length, or by a
    /// single random symbol if the domain cannot produce anything longer.
    fn repair(&mut self, genome: &mut Vec<D::Gene>) {
        if !genome.is_empty() {
            return;
        }
        self.repairs.empty_genome_repairs += 1;
        log::trace!("Repairing empty genome in generation {}", self.generation);

        *genome = self
            .domain
            .random_genome(&mut self.rng, self.domain.repair_length());
        if genome.is_empty() {
            let alphabet = self.domain.alphabet();
            if !alphabet.is_empty() {
                genome.push(alphabet[self.rng.below(alphabet.len())]);
            }
        }
    }

    /// Evaluate all individuals in the population.
    fn evaluate_population(&mut self) {
        self.phase = EvolutionPhase::Evaluating;
        let domain = &self.domain;
        let floor = self.config.fitness_floor;

        if self.config.parallel_evaluation {
            self.population.par_iter_mut().for_each(|individual| {
                individual.fitness = Some(evaluate(domain, &individual.genome, floor));
            });
        } else {
            for individual in &mut self.population {
                individual.fitness = Some(evaluate(domain, &individual.genome, floor));
            }
        }
        self.total_evaluations += self.population.len() as u64;
    }

    fn fitness_of(&self, individual: &Individual<D::Gene>) -> f64 {
        individual.fitness.unwrap_or(self.config.fitness_floor)
    }

    /// Sort by fitness (descending, stable), record the generation and
    /// report the leaders.
    fn rank(&mut self) {
        let floor = self.config.fitness_floor;
        self.population.sort_by(|a, b| {
            b.fitness
                .unwrap_or(floor)
                .total_cmp(&a.fitness.unwrap_or(floor))
        });

        let generation_best = self.population.first().map_or(floor, |i| self.fitness_of(i));
        let mean_fitness = self
            .population
            .iter()
            .map(|i| self.fitness_of(i))
            .sum::<f64>()
            / self.population.len().max(1) as f64;
        self.best_fitness = self.best_fitness.max(generation_best);

        self.history.push(GenerationRecord {
            generation: self.generation,
            best_genome: self
                .population
                .first()
                .map(|i| i.genome.clone())
                .unwrap_or_default(),
            best_fitness: generation_best,
            mean_fitness,
        });
        log::debug!(
            "Generation {:03} | best fitness: {:.4}",
            self.generation,
            generation_best
        );

        let top_k = self.config.report.top_k.min(self.population.len());
        if let Err(err) = self
            .sink
            .publish(self.generation, &self.population[..top_k])
        {
            self.repairs.sink_failures += 1;
            log::warn!(
                "Result sink failed in generation {}: {}",
                self.generation,
                err
            );
        }
        self.phase = EvolutionPhase::Ranked;
    }

    /// Build the next population: survivors first, then offspring.
    fn breed(&mut self) {
        let size = self.config.population.size;
        let survivors = self.config.population.survivors;
        let pool_len = parent_pool_len(self.config.algorithm.parent_pool, size, survivors);
        let pool_fitness: Vec<f64> = self.population[..pool_len.min(self.population.len())]
            .iter()
            .map(|i| self.fitness_of(i))
            .collect();

        let mut next: Vec<Individual<D::Gene>> = self.population[..survivors]
            .iter()
            .map(|elite| Individual::new(elite.genome.clone()))
            .collect();

        while next.len() < size {
            for mut child in self.offspring(&pool_fitness) {
                if next.len() == size {
                    break;
                }
                self.repair(&mut child);
                next.push(Individual::new(child));
            }
        }

        self.population = next;
        self.generation += 1;
        self.phase = EvolutionPhase::Bred;
    }

    /// One or two children from a freshly selected parent pair.
    fn offspring(&mut self, pool_fitness: &[f64]) -> Vec<Vec<D::Gene>> {
        let algorithm = &self.config.algorithm;

        let Some((first, second)) =
            select_parents(pool_fitness, &algorithm.selection, &mut self.rng)
        else {
            self.repairs.degenerate_pool_fallbacks += 1;
            log::trace!(
                "Parent pool of {} is too small, drawing a fresh genome",
                pool_fitness.len()
            );
            let length = self.domain.initial_length();
            return vec![self.domain.random_genome(&mut self.rng, length)];
        };
        let a = &self.population[first].genome;
        let b = &self.population[second].genome;

        let mut children = match algorithm.crossover {
            CrossoverMethod::TwoPoint => {
                if self.rng.chance(algorithm.crossover_rate) {
                    match two_point_crossover(a, b, &mut self.rng) {
                        Some(child) => vec![child],
                        None => {
                            self.repairs.crossover_regenerations += 1;
                            log::trace!(
                                "Parents of length {} and {} too short, regenerating",
                                a.len(),
                                b.len()
                            );
                            let length = a.len().max(b.len());
                            return vec![self.domain.random_genome(&mut self.rng, length)];
                        }
                    }
                } else {
                    vec![a.clone()]
                }
            }
            CrossoverMethod::SinglePoint => {
                if self.rng.chance(algorithm.crossover_rate) {
                    let (c, d) = single_point_crossover(a, b, &mut self.rng);
                    vec![c, d]
                } else {
                    vec![a.clone(), b.clone()]
                }
            }
        };

        for child in &mut children {
            mutate(
                child,
                self.domain.alphabet(),
                algorithm.mutation,
                algorithm.mutation_rate,
                algorithm.mutation_schedule,
                &mut self.rng,
            );
        }
        children
    }

    fn progress(&self) -> EvolutionProgress {
        let record = self.history.last();
        EvolutionProgress {
            generation: record.map_or(0, |r| r.generation),
            total_generations: self.config.population.generations,
            best_fitness: self.best_fitness,
            generation_best: record.map_or(f64::NEG_INFINITY, |r| r.best_fitness),
            mean_fitness: record.map_or(0.0, |r| r.mean_fitness),
            phase: self.phase,
        }
    }

    /// Run one generation: evaluate, rank, record, and breed the next
    /// population unless this was the last generation.
    pub fn step(&mut self) -> EvolutionProgress {
        if self.population.is_empty() {
            self.initialize();
        }

        self.evaluate_population();
        self.rank();

        if self.generation + 1 < self.config.population.generations {
            self.breed();
        } else {
            self.phase = EvolutionPhase::Terminated;
        }
        self.progress()
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> EvolutionResult<D::Gene>
    where
        F: FnMut(&EvolutionProgress),
    {
        let start_time = Instant::now();
        let population = &self.config.population;
        log::info!(
            "Starting evolution: {} individuals, {} survivors, {} generations (seed {:?})",
            population.size,
            population.survivors,
            population.generations,
            self.seed
        );

        self.initialize();
        for _ in 0..self.config.population.generations {
            let progress = self.step();
            callback(&progress);
        }

        if let Err(err) = self.sink.finish() {
            self.repairs.sink_failures += 1;
            log::warn!("Result sink failed to finish: {}", err);
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let final_mean_fitness = self.history.last().map_or(0.0, |r| r.mean_fitness);
        let (best_genome, best_fitness) = self
            .population
            .first()
            .map(|i| (i.genome.clone(), self.fitness_of(i)))
            .unwrap_or_default();

        log::info!(
            "Evolution finished: best fitness {:.4} after {} generations in {:.2}s",
            best_fitness,
            self.history.len(),
            elapsed
        );

        EvolutionResult {
            best_genome,
            best_fitness,
            final_population: self.population.iter().map(|i| i.genome.clone()).collect(),
            history: self.history.clone(),
            stats: EvolutionStats {
                generations: self.history.len(),
                total_evaluations: self.total_evaluations,
                best_fitness: self.best_fitness,
                final_mean_fitness,
                elapsed_seconds: elapsed,
                evaluations_per_second: if elapsed > 0.0 {
                    self.total_evaluations as f64 / elapsed
                } else {
                    0.0
                },
                seed: self.seed,
                repairs: self.repairs.clone(),
            },
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult<D::Gene> {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::GridMaze;
    use crate::compute::evolution::{
        Codec, ConnectivityOracle, FunctionDomain, PathDomain, ScriptedRng,
    };
    use crate::report::{MemorySink, SinkError};
    use crate::schema::{
        Direction, FunctionConfig, MazeConfig, MutationSchedule, ParentPool, PopulationConfig,
        Position, SelectionMethod, format_genome,
    };

    fn small_maze(seed: u64) -> (PathDomain<GridMaze>, EvolutionConfig) {
        let maze_config = MazeConfig {
            rows: 6,
            cols: 6,
            start: Position::new(6, 6),
            goal: Position::new(1, 1),
            max_walk_length: 72,
            ..Default::default()
        };
        let maze = GridMaze::generate(6, 6, 0, seed);
        let config = EvolutionConfig {
            population: PopulationConfig {
                size: 20,
                survivors: 10,
                generations: 8,
            },
            random_seed: Some(seed),
            ..Default::default()
        };
        (PathDomain::new(maze, &maze_config), config)
    }

    /// Every move is blocked, so random walks come out empty.
    struct Walled;

    impl ConnectivityOracle for Walled {
        fn is_legal_move(&self, _position: Position, _direction: Direction) -> bool {
            false
        }
    }

    struct FailingSink;

    impl ResultSink<Direction> for FailingSink {
        fn publish(
            &mut self,
            _generation: usize,
            _top: &[Individual<Direction>],
        ) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_evolution_engine_creation() {
        let (domain, config) = small_maze(1);
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        engine.initialize();

        assert_eq!(engine.population().len(), 20);
        assert_eq!(engine.phase(), EvolutionPhase::Initialized);
        assert!(engine.population().iter().all(|i| i.fitness.is_none()));
        assert!(engine.population().iter().all(|i| !i.genome.is_empty()));
    }

    #[test]
    fn test_population_size_constant() {
        let (domain, config) = small_maze(2);
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        engine.initialize();
        for _ in 0..8 {
            engine.step();
            assert_eq!(engine.population().len(), 20);
        }
        assert_eq!(engine.phase(), EvolutionPhase::Terminated);
    }

    #[test]
    fn test_evolution_run() {
        let (domain, config) = small_maze(3);
        let mut engine = EvolutionEngine::new(domain, config).unwrap();

        let mut phases = Vec::new();
        let result = engine.run_with_callback(|progress| phases.push(progress.phase));

        assert_eq!(result.stats.generations, 8);
        assert_eq!(result.history.len(), 8);
        assert_eq!(result.stats.total_evaluations, 8 * 20);
        assert_eq!(result.stats.seed, Some(3));
        assert_eq!(result.final_population.len(), 20);
        assert_eq!(phases.len(), 8);
        assert_eq!(phases.last(), Some(&EvolutionPhase::Terminated));
        assert!(phases[..7].iter().all(|p| *p == EvolutionPhase::Bred));
        for (i, record) in result.history.records.iter().enumerate() {
            assert_eq!(record.generation, i);
        }
    }

    #[test]
    fn test_best_fitness_monotonic() {
        let (domain, config) = small_maze(4);
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        let result = engine.run();

        let best = result.history.best_fitness();
        for pair in best.windows(2) {
            assert!(pair[1] >= pair[0], "best fitness dropped: {pair:?}");
        }
        assert_eq!(result.best_fitness, *best.last().unwrap());
    }

    #[test]
    fn test_fitness_floor_respected() {
        let (domain, mut config) = small_maze(5);
        config.fitness_floor = 25.0;
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        engine.step();
        assert!(
            engine
                .history()
                .records
                .iter()
                .all(|r| r.best_fitness >= 25.0 && r.mean_fitness >= 25.0)
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let (domain_a, config_a) = small_maze(6);
        let (domain_b, config_b) = small_maze(6);
        let a = EvolutionEngine::new(domain_a, config_a).unwrap().run();
        let b = EvolutionEngine::new(domain_b, config_b).unwrap().run();
        assert_eq!(a.best_genome, b.best_genome);
        assert_eq!(a.history.best_fitness(), b.history.best_fitness());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (domain_a, config_a) = small_maze(7);
        let (domain_b, mut config_b) = small_maze(7);
        config_b.parallel_evaluation = true;
        let a = EvolutionEngine::new(domain_a, config_a).unwrap().run();
        let b = EvolutionEngine::new(domain_b, config_b).unwrap().run();
        assert_eq!(a.history.best_fitness(), b.history.best_fitness());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (domain, mut config) = small_maze(1);
        config.population.survivors = 20;
        let err = EvolutionEngine::new(domain, config).err().unwrap();
        assert!(matches!(
            err,
            EvolutionError::InvalidConfiguration(EvolutionConfigError::TooManySurvivors { .. })
        ));
    }

    #[test]
    fn test_edit_mutation_rejected_on_fixed_length() {
        let domain = FunctionDomain::new(&FunctionConfig::default());
        let mut config = EvolutionConfig::bit_string();
        config.algorithm.mutation = MutationMethod::Edit;
        let err = EvolutionEngine::new(domain, config).err().unwrap();
        assert!(matches!(
            err,
            EvolutionError::InvalidConfiguration(EvolutionConfigError::EditOnFixedLength(44))
        ));
    }

    #[test]
    fn test_degenerate_pool_falls_back() {
        let (domain, mut config) = small_maze(8);
        config.population.survivors = 1;
        config.algorithm.parent_pool = ParentPool::Survivors;
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        let result = engine.run();

        assert_eq!(result.final_population.len(), 20);
        // 19 offspring per bred generation, 7 breeding steps
        assert_eq!(result.stats.repairs.degenerate_pool_fallbacks, 19 * 7);
    }

    #[test]
    fn test_failing_sink_not_fatal() {
        let (domain, config) = small_maze(9);
        let mut engine = EvolutionEngine::new(domain, config)
            .unwrap()
            .with_sink(FailingSink);
        let result = engine.run();
        assert_eq!(result.stats.generations, 8);
        assert_eq!(result.stats.repairs.sink_failures, 8);
    }

    #[test]
    fn test_sink_receives_top_k() {
        let (domain, mut config) = small_maze(10);
        config.report.top_k = 3;
        let sink = MemorySink::new();
        let handle = sink.handle();
        let mut engine = EvolutionEngine::new(domain, config).unwrap().with_sink(sink);
        engine.run();

        let snapshots = handle.snapshots();
        assert_eq!(snapshots.len(), 8);
        assert!(snapshots.iter().all(|s| s.entries.len() == 3));
        let first = &snapshots[0].entries;
        assert!(first[0].fitness >= first[1].fitness);
        assert!(first[1].fitness >= first[2].fitness);
    }

    #[test]
    fn test_no_empty_genomes_under_heavy_mutation() {
        let (domain, mut config) = small_maze(11);
        config.algorithm.mutation_rate = 1.0;
        config.algorithm.mutation_schedule = MutationSchedule::Repeated { max_attempts: 50 };
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        engine.initialize();
        for _ in 0..8 {
            engine.step();
            assert!(engine.population().iter().all(|i| !i.genome.is_empty()));
        }
    }

    #[test]
    fn test_empty_walks_repaired() {
        let (_, config) = small_maze(12);
        let maze_config = MazeConfig {
            rows: 6,
            cols: 6,
            start: Position::new(6, 6),
            goal: Position::new(1, 1),
            max_walk_length: 72,
            ..Default::default()
        };
        let domain = PathDomain::new(Walled, &maze_config);
        let mut engine = EvolutionEngine::new(domain, config).unwrap();

        engine.initialize();
        assert_eq!(engine.repairs().empty_genome_repairs, 20);
        assert!(engine.population().iter().all(|i| i.genome.len() == 1));

        for _ in 0..8 {
            engine.step();
            assert_eq!(engine.population().len(), 20);
            assert!(engine.population().iter().all(|i| !i.genome.is_empty()));
        }
        // Single-symbol parents cannot be crossed; their regenerated
        // children come out empty again and are repaired as well
        assert!(engine.repairs().crossover_regenerations > 0);
        assert!(engine.repairs().empty_genome_repairs > 20);
    }

    #[test]
    fn test_short_parents_regenerated() {
        let maze_config = MazeConfig {
            rows: 6,
            cols: 6,
            start: Position::new(6, 6),
            goal: Position::new(1, 1),
            max_walk_length: 1,
            ..Default::default()
        };
        let maze = GridMaze::generate(6, 6, 0, 13);
        let domain = PathDomain::new(maze, &maze_config);
        let (_, config) = small_maze(13);
        assert_eq!(config.algorithm.crossover_rate, 1.0);

        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        let result = engine.run();

        // 10 offspring per bred generation, 7 breeding steps, none crossable
        assert_eq!(result.stats.repairs.crossover_regenerations, 10 * 7);
        assert_eq!(result.stats.repairs.empty_genome_repairs, 0);
        assert!(result.final_population.iter().all(|g| g.len() == 1));
    }

    /// Breed one generation without crossover or mutation, so every child is
    /// a copy of its parent. Returns the ranked top two of the first
    /// generation and the bred population.
    fn copies_after_one_generation(pool: ParentPool) -> (Vec<String>, Vec<String>) {
        let domain = FunctionDomain::new(&FunctionConfig {
            bits_per_axis: 8,
            ..Default::default()
        });
        let mut config = EvolutionConfig::bit_string();
        config.population = PopulationConfig {
            size: 20,
            survivors: 2,
            generations: 2,
        };
        config.algorithm.selection = SelectionMethod::Uniform;
        config.algorithm.parent_pool = pool;
        config.algorithm.crossover_rate = 0.0;
        config.algorithm.mutation_rate = 0.0;
        config.report.top_k = 2;
        config.random_seed = Some(14);

        let sink = MemorySink::new();
        let handle = sink.handle();
        let mut engine = EvolutionEngine::new(domain, config).unwrap().with_sink(sink);
        engine.initialize();
        let initial: Vec<String> = engine
            .population()
            .iter()
            .map(|i| format_genome(&i.genome))
            .collect();
        engine.step();

        let top: Vec<String> = handle.snapshots()[0]
            .entries
            .iter()
            .map(|e| e.genome.clone())
            .collect();
        let next: Vec<String> = engine
            .population()
            .iter()
            .map(|i| format_genome(&i.genome))
            .collect();
        assert!(next.iter().all(|g| initial.contains(g)));
        (top, next)
    }

    #[test]
    fn test_survivor_pool_breeds_from_elites_only() {
        let (top, next) = copies_after_one_generation(ParentPool::Survivors);
        assert_eq!(next.len(), 20);
        assert!(next.iter().all(|g| top.contains(g)));
    }

    #[test]
    fn test_population_pool_breeds_from_everyone() {
        let (top, next) = copies_after_one_generation(ParentPool::Population);
        assert_eq!(next.len(), 20);
        assert_eq!(&next[..2], &top[..]);
        assert!(next.iter().any(|g| !top.contains(g)));
    }

    #[test]
    fn test_scripted_rng_engine() {
        let domain = FunctionDomain::new(&FunctionConfig {
            bits_per_axis: 4,
            ..Default::default()
        });
        let mut config = EvolutionConfig::bit_string();
        config.population = PopulationConfig {
            size: 4,
            survivors: 1,
            generations: 3,
        };
        // An exhausted script draws zeros: all-zero genomes, parents at index 0,
        // crossover and mutation always taken at point 1 / index 0.
        let mut engine = EvolutionEngine::with_rng(domain, config, ScriptedRng::default()).unwrap();
        let result = engine.run();
        assert_eq!(result.stats.seed, None);
        assert_eq!(result.final_population.len(), 4);
        assert!(result.final_population.iter().all(|g| g.len() == 8));
    }

    #[test]
    fn test_maze_scenario() {
        let maze_config = MazeConfig {
            maze_seed: Some(2024),
            ..Default::default()
        };
        let maze = GridMaze::from_config(&maze_config);
        let domain = PathDomain::new(maze, &maze_config);
        let config = EvolutionConfig {
            random_seed: Some(7),
            ..Default::default()
        };
        assert_eq!(config.population.size, 80);
        assert_eq!(config.population.survivors, 40);
        assert_eq!(config.population.generations, 30);

        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        let result = engine.run();
        let domain = engine.domain();

        let outcome = domain.walk(&result.best_genome);
        assert!(outcome.reached_goal, "best walk ended at {}", outcome.position);
        assert_eq!(outcome.position, Position::new(1, 1));
        assert_eq!(outcome.penalties, 0);

        let projected = domain.legal_moves(&result.best_genome);
        let clean = domain.walk(&projected);
        assert!(clean.reached_goal);
        assert_eq!(clean.position, Position::new(1, 1));
        assert_eq!(clean.penalties, 0);
    }

    #[test]
    fn test_f6_scenario() {
        // A run can still end on the first ring (about 0.9903), so the peak
        // is required from most seeds rather than from every one
        let seeds = [1, 2, 3, 7, 42, 99];
        let mut best = Vec::new();
        for seed in seeds {
            let domain = FunctionDomain::new(&FunctionConfig::default());
            let config = EvolutionConfig {
                random_seed: Some(seed),
                ..EvolutionConfig::bit_string()
            };
            let mut engine = EvolutionEngine::new(domain, config).unwrap();
            let result = engine.run();
            assert_eq!(result.best_genome.len(), 44);

            if (1.0 - result.best_fitness).abs() < 1e-3 {
                let (x, y) = engine.domain().decode(&result.best_genome);
                assert!(x.hypot(y) < 0.05, "seed {seed}: peak at ({x}, {y})");
            }
            best.push(result.best_fitness);
        }

        assert!(best.iter().all(|b| *b > 0.96), "best fitness {best:?}");
        let at_peak = best.iter().filter(|b| (1.0 - **b).abs() < 1e-3).count();
        assert!(
            at_peak >= 4,
            "{at_peak} of {} runs reached the peak: {best:?}",
            seeds.len()
        );
    }
}
