//! Quick evolution performance test

use evosearch::{
    EvolutionConfig, EvolutionEngine,
    compute::{
        GridMaze,
        evolution::{FunctionDomain, PathDomain},
    },
    schema::{FunctionConfig, MazeConfig, PopulationConfig, Position, SelectionMethod},
};
use std::time::Instant;

fn main() {
    println!("=== Maze Evolution Performance Test ===\n");

    // Test different maze sizes
    for grid_size in [10usize, 20, 40] {
        println!("Maze size: {}x{}", grid_size, grid_size);

        let maze_config = MazeConfig {
            rows: grid_size,
            cols: grid_size,
            start: Position::new(grid_size as i32, grid_size as i32),
            goal: Position::new(1, 1),
            maze_seed: Some(42),
            max_walk_length: 2 * grid_size * grid_size,
            ..Default::default()
        };
        let maze = GridMaze::from_config(&maze_config);
        let domain = PathDomain::new(maze, &maze_config);

        let config = EvolutionConfig {
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(domain, config).unwrap();
        let result = engine.run();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();
        let outcome = engine.domain().walk(&result.best_genome);

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best fitness:   {:.4}", result.stats.best_fitness);
        println!("  Reached goal:   {}", outcome.reached_goal);
        println!();
    }

    println!("=== Scalability Test (Schaffer F6, 200 generations) ===\n");

    // Test different population sizes, sequential vs parallel evaluation
    for pop_size in [50, 100, 200, 400] {
        for parallel in [false, true] {
            let mut config = EvolutionConfig {
                population: PopulationConfig {
                    size: pop_size,
                    survivors: 1,
                    generations: 200,
                },
                parallel_evaluation: parallel,
                random_seed: Some(42),
                ..EvolutionConfig::bit_string()
            };
            config.algorithm.selection = SelectionMethod::Tournament { size: 3 };

            let domain = FunctionDomain::new(&FunctionConfig::default());
            let start = Instant::now();
            let mut engine = EvolutionEngine::new(domain, config).unwrap();
            let result = engine.run();
            let elapsed = start.elapsed();

            let total_evals = result.stats.total_evaluations;
            let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

            println!(
                "Population {} ({}): {} evals in {:.2}s ({:.1} evals/sec), best {:.6}",
                pop_size,
                if parallel { "parallel" } else { "sequential" },
                total_evals,
                elapsed.as_secs_f64(),
                evals_per_sec,
                result.best_fitness
            );
        }
    }
}
