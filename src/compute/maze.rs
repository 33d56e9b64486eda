//! Rectangular grid maze used as the reference connectivity oracle.

use std::collections::VecDeque;

use rand::prelude::*;

use super::evolution::ConnectivityOracle;
use crate::schema::{Direction, MazeConfig, Position};

/// A `rows x cols` maze storing the open passages of every cell.
///
/// Passages are symmetric: if a cell opens East, its eastern neighbor opens
/// West.
#[derive(Debug, Clone)]
pub struct GridMaze {
    rows: usize,
    cols: usize,
    seed: u64,
    /// Open passages per cell, indexed by `Direction::index`.
    cells: Vec<[bool; 4]>,
}

impl GridMaze {
    /// Carve a maze.
    ///
    /// A randomized depth-first search from the bottom-right cell yields a
    /// perfect maze; `loop_percent` percent of the walls it left closed are
    /// then opened.
    pub fn generate(rows: usize, cols: usize, loop_percent: u32, seed: u64) -> Self {
        let mut maze = Self {
            rows,
            cols,
            seed,
            cells: vec![[false; 4]; rows * cols],
        };
        if rows == 0 || cols == 0 {
            return maze;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        maze.carve(&mut rng);
        maze.open_loops(loop_percent.min(100), &mut rng);
        log::debug!(
            "Generated {}x{} maze (seed {}, loops {}%, {} passages)",
            rows,
            cols,
            seed,
            loop_percent,
            maze.passage_count()
        );
        maze
    }

    /// Build the maze described by a configuration. A missing seed is drawn
    /// from entropy.
    pub fn from_config(config: &MazeConfig) -> Self {
        let seed = config.maze_seed.unwrap_or_else(rand::random);
        Self::generate(config.rows, config.cols, config.loop_percent, seed)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Seed the maze was carved from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row >= 1
            && position.col >= 1
            && position.row as usize <= self.rows
            && position.col as usize <= self.cols
    }

    fn index(&self, position: Position) -> usize {
        (position.row as usize - 1) * self.cols + (position.col as usize - 1)
    }

    fn position(&self, index: usize) -> Position {
        Position::new((index / self.cols) as i32 + 1, (index % self.cols) as i32 + 1)
    }

    /// Whether the wall between `position` and its neighbor is open.
    pub fn is_open(&self, position: Position, direction: Direction) -> bool {
        self.contains(position) && self.cells[self.index(position)][direction.index()]
    }

    fn open(&mut self, position: Position, direction: Direction) {
        let neighbor = position.step(direction);
        let (a, b) = (self.index(position), self.index(neighbor));
        self.cells[a][direction.index()] = true;
        self.cells[b][direction.reverse().index()] = true;
    }

    fn carve(&mut self, rng: &mut StdRng) {
        let mut visited = vec![false; self.cells.len()];
        let origin = Position::new(self.rows as i32, self.cols as i32);
        visited[self.index(origin)] = true;
        let mut stack = vec![origin];

        while let Some(&current) = stack.last() {
            let unvisited: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| {
                    let next = current.step(*d);
                    self.contains(next) && !visited[self.index(next)]
                })
                .collect();

            match unvisited.choose(rng) {
                Some(&direction) => {
                    let next = current.step(direction);
                    self.open(current, direction);
                    visited[self.index(next)] = true;
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    fn open_loops(&mut self, loop_percent: u32, rng: &mut StdRng) {
        if loop_percent == 0 {
            return;
        }
        // Each interior wall once, from its north-west side
        let mut closed: Vec<(Position, Direction)> = Vec::new();
        for index in 0..self.cells.len() {
            let position = self.position(index);
            for direction in [Direction::South, Direction::East] {
                if self.contains(position.step(direction)) && !self.is_open(position, direction) {
                    closed.push((position, direction));
                }
            }
        }
        closed.shuffle(rng);
        let count = closed.len() * loop_percent as usize / 100;
        for &(position, direction) in &closed[..count] {
            self.open(position, direction);
        }
    }

    /// Number of open passages between cell pairs.
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.iter().filter(|open| **open).count())
            .sum::<usize>()
            / 2
    }

    /// Breadth-first shortest route from `start` to `goal`, as directions.
    ///
    /// Returns `None` if either cell is off the grid or the goal is
    /// unreachable.
    pub fn shortest_path(&self, start: Position, goal: Position) -> Option<Vec<Direction>> {
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }

        let mut came_from: Vec<Option<(usize, Direction)>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let start_index = self.index(start);
        let goal_index = self.index(goal);
        seen[start_index] = true;

        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == goal {
                break;
            }
            for direction in Direction::ALL {
                if !self.is_open(current, direction) {
                    continue;
                }
                let next = current.step(direction);
                let next_index = self.index(next);
                if !seen[next_index] {
                    seen[next_index] = true;
                    came_from[next_index] = Some((self.index(current), direction));
                    queue.push_back(next);
                }
            }
        }

        if !seen[goal_index] {
            return None;
        }

        let mut path = Vec::new();
        let mut index = goal_index;
        while let Some((previous, direction)) = came_from[index] {
            path.push(direction);
            index = previous;
        }
        path.reverse();
        Some(path)
    }
}

impl ConnectivityOracle for GridMaze {
    fn is_legal_move(&self, position: Position, direction: Direction) -> bool {
        self.is_open(position, direction)
    }
}
