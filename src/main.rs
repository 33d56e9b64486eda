//! evosearch CLI - Run evolutionary searches from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use evosearch::{
    compute::{
        GridMaze,
        evolution::{Codec, Domain, EvolutionEngine, FunctionDomain, PathDomain},
    },
    report::{JsonLinesRecorder, LogSink, RecorderConfig},
    schema::{
        EvolutionProgress, EvolutionResult, ExperimentConfig, ProblemConfig, format_genome,
        format_path,
    },
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <experiment.json> [records.jsonl]", args[0]);
        eprintln!();
        eprintln!("Run an evolutionary search from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  experiment.json  Path to experiment configuration file");
        eprintln!("  records.jsonl    Optional file receiving per-generation top genomes");
        eprintln!();
        eprintln!("Example configuration is generated with --example [maze|function].");
        process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config(args.get(2).map(String::as_str));
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let records_path = args.get(2).map(PathBuf::from);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        process::exit(1);
    });

    let config: ExperimentConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    }

    println!("evosearch");
    println!("=========");
    let population = &config.evolution.population;
    println!(
        "Population: {} ({} survivors), {} generations",
        population.size, population.survivors, population.generations
    );

    match &config.problem {
        ProblemConfig::Maze(maze_config) => {
            let maze = GridMaze::from_config(maze_config);
            println!(
                "Maze: {}x{} (seed {}, loops {}%), {} -> {}",
                maze_config.rows,
                maze_config.cols,
                maze.seed(),
                maze_config.loop_percent,
                maze_config.start,
                maze_config.goal
            );
            println!();

            let domain = PathDomain::new(maze, maze_config);
            let (engine, result) = run(domain, &config, records_path.as_deref());
            let domain = engine.domain();

            let outcome = domain.walk(&result.best_genome);
            let moves = domain.legal_moves(&result.best_genome);
            println!("Best genome ({} symbols):", result.best_genome.len());
            println!("  {}", format_path(&result.best_genome));
            println!("Legal moves ({}):", moves.len());
            println!("  {}", format_path(&moves));
            println!(
                "Walk: reached goal = {}, end = {}, steps = {}, penalties = {}",
                outcome.reached_goal, outcome.position, outcome.steps, outcome.penalties
            );
            match domain
                .oracle()
                .shortest_path(maze_config.start, maze_config.goal)
            {
                Some(path) => println!("Shortest path (BFS): {} steps", path.len()),
                None => println!("Shortest path (BFS): goal unreachable"),
            }
        }
        ProblemConfig::Function(function_config) => {
            println!(
                "Function: {:?}, {} bits per axis, bounds [{}, {}]",
                function_config.landscape,
                function_config.bits_per_axis,
                function_config.bounds.0,
                function_config.bounds.1
            );
            println!();

            let domain = FunctionDomain::new(function_config);
            let (engine, result) = run(domain, &config, records_path.as_deref());
            let (x, y) = engine.domain().decode(&result.best_genome);

            println!("Best genome: {}", format_genome(&result.best_genome));
            println!("Decoded: x = {:.6}, y = {:.6}", x, y);
        }
    }
}

/// Build the engine, attach a sink and run to completion, printing progress
/// every 10% of the generations.
fn run<D>(
    domain: D,
    config: &ExperimentConfig,
    records_path: Option<&Path>,
) -> (EvolutionEngine<D>, EvolutionResult<D::Gene>)
where
    D: Domain,
{
    let engine = EvolutionEngine::new(domain, config.evolution.clone()).unwrap_or_else(|e| {
        eprintln!("Error creating engine: {}", e);
        process::exit(1);
    });

    let mut engine = match records_path {
        Some(path) => {
            let recorder = JsonLinesRecorder::create(path, RecorderConfig::default())
                .unwrap_or_else(|e| {
                    eprintln!("Error creating records file: {}", e);
                    process::exit(1);
                });
            engine.with_sink(recorder)
        }
        None => engine.with_sink(LogSink::default()),
    };

    println!("Running evolution...");
    let report_every = (config.evolution.population.generations / 10).max(1);
    let result = engine.run_with_callback(|progress: &EvolutionProgress| {
        let done = progress.generation + 1;
        if done % report_every == 0 {
            println!(
                "  Generation {}/{}: best={:.4}, mean={:.4}",
                done, progress.total_generations, progress.best_fitness, progress.mean_fitness
            );
        }
    });

    let stats = &result.stats;
    println!();
    println!("Best fitness: {:.6}", result.best_fitness);
    println!(
        "Time: {:.2}s ({} evaluations, {:.0} evals/s)",
        stats.elapsed_seconds, stats.total_evaluations, stats.evaluations_per_second
    );
    if let Some(seed) = stats.seed {
        println!("Seed: {}", seed);
    }
    let repairs = &stats.repairs;
    if repairs.crossover_regenerations
        + repairs.empty_genome_repairs
        + repairs.degenerate_pool_fallbacks
        + repairs.sink_failures
        > 0
    {
        println!("Repairs: {:?}", repairs);
    }
    println!();

    (engine, result)
}

fn print_example_config(problem: Option<&str>) {
    let config = match problem {
        None | Some("maze") => ExperimentConfig::maze(),
        Some("function") => ExperimentConfig::function(),
        Some(other) => {
            eprintln!("Unknown example '{}', expected 'maze' or 'function'", other);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing example: {}", e);
            process::exit(1);
        }
    }
}
