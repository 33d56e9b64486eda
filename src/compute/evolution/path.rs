//! Path domain: genomes are direction strings walked through a grid.

use crate::schema::{Direction, DistanceMetric, MazeConfig, PathScoring, Position};

use super::domain::{Codec, Domain};
use super::genome::RandomSource;

/// Answers whether a single move out of a cell is allowed.
pub trait ConnectivityOracle: Send + Sync {
    fn is_legal_move(&self, position: Position, direction: Direction) -> bool;

    /// Cell reached by a legal move.
    fn neighbor(&self, position: Position, direction: Direction) -> Position {
        position.step(direction)
    }
}

/// Where a walk ended and what it cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Final cell.
    pub position: Position,
    /// Legal moves taken.
    pub steps: usize,
    /// Illegal moves attempted (the walker stays put).
    pub penalties: usize,
    /// Whether the goal was reached.
    pub reached_goal: bool,
    /// Symbols read before the walk stopped.
    pub consumed: usize,
}

/// Path search between two cells of a maze.
pub struct PathDomain<O> {
    oracle: O,
    start: Position,
    goal: Position,
    metric: DistanceMetric,
    max_walk_length: usize,
    repair_length: usize,
    scoring: PathScoring,
}

impl<O: ConnectivityOracle> PathDomain<O> {
    pub fn new(oracle: O, config: &MazeConfig) -> Self {
        Self {
            oracle,
            start: config.start,
            goal: config.goal,
            metric: config.metric,
            max_walk_length: config.max_walk_length,
            repair_length: config.repair_length(),
            scoring: config.scoring.clone(),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Simulate a genome from the start cell.
    ///
    /// The walk stops as soon as the goal is entered; illegal moves leave
    /// the walker in place and count as penalties.
    pub fn walk(&self, genome: &[Direction]) -> WalkOutcome {
        let mut outcome = WalkOutcome {
            position: self.start,
            steps: 0,
            penalties: 0,
            reached_goal: self.start == self.goal,
            consumed: 0,
        };
        if outcome.reached_goal {
            return outcome;
        }

        for &direction in genome {
            outcome.consumed += 1;
            if self.oracle.is_legal_move(outcome.position, direction) {
                outcome.position = self.oracle.neighbor(outcome.position, direction);
                outcome.steps += 1;
                if outcome.position == self.goal {
                    outcome.reached_goal = true;
                    break;
                }
            } else {
                outcome.penalties += 1;
            }
        }
        outcome
    }

    /// Raw fitness of a finished walk.
    pub fn score_outcome(&self, outcome: &WalkOutcome) -> f64 {
        let s = &self.scoring;
        let steps = outcome.steps as f64;
        let penalties = outcome.penalties as f64;

        if outcome.reached_goal {
            let efficiency = (s.efficiency_budget - s.step_cost * steps).max(0.0);
            let penalty_factor = (1.0 - s.penalty_rate * penalties).max(s.min_penalty_factor);
            (s.success_bonus + efficiency) * penalty_factor
        } else {
            let distance = self.metric.distance(outcome.position, self.goal);
            s.proximity_scale / (1.0 + distance) - s.penalty_weight * penalties - s.step_weight * steps
        }
    }

    /// The moves of `genome` that actually happen: illegal symbols are
    /// dropped and the walk is cut at the goal.
    pub fn legal_moves(&self, genome: &[Direction]) -> Vec<Direction> {
        let mut moves = Vec::new();
        let mut position = self.start;
        if position == self.goal {
            return moves;
        }
        for &direction in genome {
            if !self.oracle.is_legal_move(position, direction) {
                continue;
            }
            moves.push(direction);
            position = self.oracle.neighbor(position, direction);
            if position == self.goal {
                break;
            }
        }
        moves
    }

    /// Constrained random walk from the start cell.
    ///
    /// Only legal moves are taken. The walk never doubles back unless it is
    /// in a dead end, and keeps its heading with probability one half.
    pub fn random_walk(&self, rng: &mut dyn RandomSource, max_length: usize) -> Vec<Direction> {
        let cap = max_length.max(1);
        let length = rng.between((cap / 2).max(1), cap);

        let mut path = Vec::with_capacity(length);
        let mut position = self.start;
        let mut previous: Option<Direction> = None;

        for _ in 0..length {
            let mut legal: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| self.oracle.is_legal_move(position, *d))
                .collect();
            if legal.is_empty() {
                break;
            }
            if legal.len() > 1
                && let Some(prev) = previous
            {
                legal.retain(|d| *d != prev.reverse());
            }

            let next = match previous {
                Some(prev) if legal.contains(&prev) && rng.chance(0.5) => prev,
                _ => legal[rng.below(legal.len())],
            };
            path.push(next);
            position = self.oracle.neighbor(position, next);
            previous = Some(next);
        }
        path
    }
}

impl<O: ConnectivityOracle> Domain for PathDomain<O> {
    type Gene = Direction;

    fn alphabet(&self) -> &[Direction] {
        &Direction::ALL
    }

    fn initial_length(&self) -> usize {
        self.max_walk_length
    }

    fn repair_length(&self) -> usize {
        self.repair_length
    }

    fn random_genome(&self, rng: &mut dyn RandomSource, length: usize) -> Vec<Direction> {
        self.random_walk(rng, length)
    }

    fn score(&self, genome: &[Direction]) -> f64 {
        self.score_outcome(&self.walk(genome))
    }
}

impl<O: ConnectivityOracle> Codec for PathDomain<O> {
    /// Cells visited by legal moves, starting with the start cell.
    type Value = Vec<Position>;

    fn decode(&self, genome: &[Direction]) -> Vec<Position> {
        let mut cells = vec![self.start];
        let mut position = self.start;
        for direction in self.legal_moves(genome) {
            position = self.oracle.neighbor(position, direction);
            cells.push(position);
        }
        cells
    }

    /// Directions between consecutive cells; non-adjacent pairs are skipped.
    fn encode(&self, route: &Vec<Position>) -> Vec<Direction> {
        route
            .windows(2)
            .filter_map(|pair| {
                Direction::ALL
                    .into_iter()
                    .find(|d| pair[0].step(*d) == pair[1])
            })
            .collect()
    }
}
