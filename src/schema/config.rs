//! Configuration types for the problems the engine can search.

use serde::{Deserialize, Serialize};

use super::{DistanceMetric, EvolutionConfig, EvolutionConfigError, Position};

/// A complete experiment: what to search and how to search it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Problem definition.
    pub problem: ProblemConfig,
    /// Run configuration for the evolutionary loop.
    pub evolution: EvolutionConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::maze()
    }
}

impl ExperimentConfig {
    /// Path search through a 20x20 maze with the path-domain operators.
    pub fn maze() -> Self {
        Self {
            problem: ProblemConfig::Maze(MazeConfig::default()),
            evolution: EvolutionConfig::default(),
        }
    }

    /// Schaffer F6 maximisation over 44-bit genomes.
    pub fn function() -> Self {
        Self {
            problem: ProblemConfig::Function(FunctionConfig::default()),
            evolution: EvolutionConfig::bit_string(),
        }
    }

    /// Validate both layers of the experiment.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.problem.validate()?;
        self.evolution.validate()
    }
}

/// Problem selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProblemConfig {
    /// Evolve direction strings that walk a maze from start to goal.
    Maze(MazeConfig),
    /// Evolve bit strings encoding an (x, y) point of a landscape.
    Function(FunctionConfig),
}

impl ProblemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ProblemConfig::Maze(maze) => maze.validate(),
            ProblemConfig::Function(function) => function.validate(),
        }
    }
}

/// Maze layout and path-domain parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Cell every walk starts from.
    pub start: Position,
    /// Cell the walks try to reach.
    pub goal: Position,
    /// Percentage of leftover walls opened after carving (0 = perfect maze).
    #[serde(default)]
    pub loop_percent: u32,
    /// Seed for maze carving. `None` draws one from entropy.
    #[serde(default)]
    pub maze_seed: Option<u64>,
    /// Distance used to reward walks that stop short of the goal.
    #[serde(default)]
    pub metric: DistanceMetric,
    /// Upper bound on the length of initial random walks.
    ///
    /// The default of 800 is `2 * rows * cols` for the 20x20 maze rather than
    /// the perimeter-sized `2 * (rows + cols)` = 80. Walks capped at 80
    /// symbols rarely reach the far corner of a perfect 20x20 maze.
    pub max_walk_length: usize,
    /// Path fitness constants.
    #[serde(default)]
    pub scoring: PathScoring,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            start: Position::new(20, 20),
            goal: Position::new(1, 1),
            loop_percent: 0,
            maze_seed: None,
            metric: DistanceMetric::Euclidean,
            max_walk_length: 800,
            scoring: PathScoring::default(),
        }
    }
}

impl MazeConfig {
    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Walk length used to regenerate a genome that became empty.
    #[inline]
    pub fn repair_length(&self) -> usize {
        ((self.rows + self.cols) / 2).max(1)
    }

    /// Whether `position` lies on the grid.
    pub fn contains(&self, position: Position) -> bool {
        position.row >= 1
            && position.col >= 1
            && position.row as usize <= self.rows
            && position.col as usize <= self.cols
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if i32::try_from(self.rows).is_err() || i32::try_from(self.cols).is_err() {
            return Err(ConfigError::InvalidDimensions);
        }
        if !self.contains(self.start) {
            return Err(ConfigError::PositionOutOfBounds {
                name: "start",
                position: self.start,
            });
        }
        if !self.contains(self.goal) {
            return Err(ConfigError::PositionOutOfBounds {
                name: "goal",
                position: self.goal,
            });
        }
        if self.loop_percent > 100 {
            return Err(ConfigError::InvalidLoopPercent(self.loop_percent));
        }
        if self.max_walk_length == 0 {
            return Err(ConfigError::InvalidWalkLength);
        }
        self.scoring.validate()
    }
}

/// Constants of the path fitness function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathScoring {
    /// Reward for reaching the goal.
    #[serde(default = "default_success_bonus")]
    pub success_bonus: f64,
    /// Extra reward available to short successful walks.
    #[serde(default = "default_efficiency_budget")]
    pub efficiency_budget: f64,
    /// Efficiency lost per step taken.
    #[serde(default = "default_step_cost")]
    pub step_cost: f64,
    /// Fraction of a successful score lost per illegal move.
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: f64,
    /// Lower bound of the success penalty factor.
    #[serde(default = "default_min_penalty_factor")]
    pub min_penalty_factor: f64,
    /// Numerator of the proximity reward for unsuccessful walks.
    #[serde(default = "default_proximity_scale")]
    pub proximity_scale: f64,
    /// Score lost per illegal move by unsuccessful walks.
    #[serde(default = "default_penalty_weight")]
    pub penalty_weight: f64,
    /// Score lost per step by unsuccessful walks.
    #[serde(default)]
    pub step_weight: f64,
}

impl Default for PathScoring {
    fn default() -> Self {
        Self {
            success_bonus: default_success_bonus(),
            efficiency_budget: default_efficiency_budget(),
            step_cost: default_step_cost(),
            penalty_rate: default_penalty_rate(),
            min_penalty_factor: default_min_penalty_factor(),
            proximity_scale: default_proximity_scale(),
            penalty_weight: default_penalty_weight(),
            step_weight: 0.0,
        }
    }
}

fn default_success_bonus() -> f64 {
    1000.0
}
fn default_efficiency_budget() -> f64 {
    500.0
}
fn default_step_cost() -> f64 {
    5.0
}
fn default_penalty_rate() -> f64 {
    0.1
}
fn default_min_penalty_factor() -> f64 {
    0.1
}
fn default_proximity_scale() -> f64 {
    200.0
}
fn default_penalty_weight() -> f64 {
    2.0
}

impl PathScoring {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("success_bonus", self.success_bonus),
            ("efficiency_budget", self.efficiency_budget),
            ("step_cost", self.step_cost),
            ("penalty_rate", self.penalty_rate),
            ("min_penalty_factor", self.min_penalty_factor),
            ("proximity_scale", self.proximity_scale),
            ("penalty_weight", self.penalty_weight),
            ("step_weight", self.step_weight),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScoring { name, value });
            }
        }
        if self.min_penalty_factor == 0.0 {
            return Err(ConfigError::InvalidScoring {
                name: "min_penalty_factor",
                value: self.min_penalty_factor,
            });
        }
        Ok(())
    }
}

/// Numeric landscape over bit-string encoded coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Function to maximise.
    #[serde(default)]
    pub landscape: Landscape,
    /// Bits used to encode each coordinate.
    #[serde(default = "default_bits_per_axis")]
    pub bits_per_axis: u32,
    /// Inclusive range both coordinates are mapped into.
    #[serde(default = "default_bounds")]
    pub bounds: (f64, f64),
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            landscape: Landscape::default(),
            bits_per_axis: default_bits_per_axis(),
            bounds: default_bounds(),
        }
    }
}

fn default_bits_per_axis() -> u32 {
    22
}
fn default_bounds() -> (f64, f64) {
    (-100.0, 100.0)
}

impl FunctionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bits_per_axis == 0 || self.bits_per_axis > 32 {
            return Err(ConfigError::InvalidBitWidth(self.bits_per_axis));
        }
        let (lo, hi) = self.bounds;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ConfigError::InvalidBounds { min: lo, max: hi });
        }
        Ok(())
    }
}

/// Two-argument functions available to the numeric domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Landscape {
    /// Schaffer's F6: concentric ridges, global maximum 1.0 at the origin.
    #[default]
    SchafferF6,
    /// `1 / (1 + x^2 + y^2)`, a single smooth peak at the origin.
    InvertedSphere,
}

/// Problem configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (rows, cols) must be non-zero and fit in i32")]
    InvalidDimensions,
    #[error("The {name} position {position} lies outside the grid")]
    PositionOutOfBounds {
        name: &'static str,
        position: Position,
    },
    #[error("Loop percent must be at most 100, got {0}")]
    InvalidLoopPercent(u32),
    #[error("Maximum walk length must be non-zero")]
    InvalidWalkLength,
    #[error("Bits per axis must be between 1 and 32, got {0}")]
    InvalidBitWidth(u32),
    #[error("Invalid bounds: min ({min}) must be below max ({max})")]
    InvalidBounds { min: f64, max: f64 },
    #[error("Scoring constant {name} must be a non-negative finite number, got {value}")]
    InvalidScoring { name: &'static str, value: f64 },
}
