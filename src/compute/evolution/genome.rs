//! Genome manipulation utilities for evolutionary search.
//!
//! Provides the randomness capability plus crossover and mutation operators
//! over plain symbol sequences.

use std::collections::VecDeque;

use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;

use crate::schema::{Gene, MutationMethod, MutationSchedule};

/// Source of randomness for the genetic operators.
///
/// Operators only ever ask for bounded indices and unit draws, which keeps
/// them replayable from a fixed script in tests.
pub trait RandomSource {
    /// Uniform index in `[0, upper)`. Returns 0 when `upper == 0`.
    fn below(&mut self, upper: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]` (inclusive). Returns `lo` if `hi < lo`.
    fn between(&mut self, lo: usize, hi: usize) -> usize {
        if hi < lo {
            return lo;
        }
        lo + self.below(hi - lo + 1)
    }

    /// `true` with probability `p`. Certain and impossible events consume
    /// no randomness.
    fn chance(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            true
        } else if p > 0.0 {
            self.unit() < p
        } else {
            false
        }
    }

    /// Index drawn proportionally to `weights`. Falls back to a uniform draw
    /// when no weight is positive.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights
            .iter()
            .filter(|w| w.is_finite() && **w > 0.0)
            .sum();
        if total <= 0.0 {
            return self.below(weights.len());
        }
        let mut target = self.unit() * total;
        let mut last_positive = 0;
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w <= 0.0 {
                continue;
            }
            if target < w {
                return i;
            }
            target -= w;
            last_positive = i;
        }
        last_positive
    }
}

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for GenomeRng {
    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            self.rng.gen_range(0..upper)
        }
    }

    fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn weighted(&mut self, weights: &[f64]) -> usize {
        match WeightedIndex::new(weights) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => self.below(weights.len()),
        }
    }
}

/// Replays a fixed script of draws.
///
/// `below(n)` pops the next index and reduces it modulo `n`; `unit()` pops
/// the next float. An exhausted script yields zeros.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    indices: VecDeque<usize>,
    units: VecDeque<f64>,
}

impl ScriptedRng {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            units: VecDeque::new(),
        }
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units = units.into_iter().collect();
        self
    }

    /// Draws not yet consumed, as `(indices, units)`.
    pub fn remaining(&self) -> (usize, usize) {
        (self.indices.len(), self.units.len())
    }
}

impl RandomSource for ScriptedRng {
    fn below(&mut self, upper: usize) -> usize {
        let value = self.indices.pop_front().unwrap_or(0);
        if upper == 0 { 0 } else { value % upper }
    }

    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }
}

/// Parents shorter than this are not recombined.
pub const MIN_CROSSOVER_LENGTH: usize = 2;

/// `a[..cut1] ++ b[cut1..cut2] ++ a[cut2..]`.
///
/// Cut points must satisfy `cut1 <= cut2 <= min(|a|, |b|)`; the child has
/// the length of `a`.
pub fn splice_two_point<G: Gene>(a: &[G], b: &[G], cut1: usize, cut2: usize) -> Vec<G> {
    let mut child = Vec::with_capacity(a.len());
    child.extend_from_slice(&a[..cut1]);
    child.extend_from_slice(&b[cut1..cut2]);
    child.extend_from_slice(&a[cut2..]);
    child
}

/// Two-point crossover producing one child.
///
/// `cut1` is drawn from `[0, m/2]` and `cut2` from `[cut1, m]` with
/// `m = min(|a|, |b|)`. Returns `None` when either parent is shorter than
/// [`MIN_CROSSOVER_LENGTH`]; the caller regenerates the child instead.
pub fn two_point_crossover<G, R>(a: &[G], b: &[G], rng: &mut R) -> Option<Vec<G>>
where
    G: Gene,
    R: RandomSource + ?Sized,
{
    if a.len() < MIN_CROSSOVER_LENGTH || b.len() < MIN_CROSSOVER_LENGTH {
        return None;
    }
    let m = a.len().min(b.len());
    let cut1 = rng.between(0, m / 2);
    let cut2 = rng.between(cut1, m);
    Some(splice_two_point(a, b, cut1, cut2))
}

/// Single-point crossover producing two complementary children.
///
/// The point is drawn from `[1, m]`. Parents with no common prefix to cut
/// pass through unchanged.
pub fn single_point_crossover<G, R>(a: &[G], b: &[G], rng: &mut R) -> (Vec<G>, Vec<G>)
where
    G: Gene,
    R: RandomSource + ?Sized,
{
    let m = a.len().min(b.len());
    if m == 0 {
        return (a.to_vec(), b.to_vec());
    }
    let point = rng.between(1, m);
    let first = a[..point].iter().chain(&b[point..]).copied().collect();
    let second = b[..point].iter().chain(&a[point..]).copied().collect();
    (first, second)
}

/// Kinds of edit mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Replace,
    Insert,
    Delete,
}

impl EditKind {
    pub const ALL: [EditKind; 3] = [EditKind::Replace, EditKind::Insert, EditKind::Delete];
}

/// Apply one edit of the given kind.
///
/// Replace is a no-op on an empty genome; Delete only removes when more
/// than one symbol remains.
pub fn apply_edit<G, R>(genome: &mut Vec<G>, alphabet: &[G], kind: EditKind, rng: &mut R)
where
    G: Gene,
    R: RandomSource + ?Sized,
{
    if alphabet.is_empty() {
        return;
    }
    match kind {
        EditKind::Replace => {
            if genome.is_empty() {
                return;
            }
            let index = rng.below(genome.len());
            genome[index] = alphabet[rng.below(alphabet.len())];
        }
        EditKind::Insert => {
            let index = rng.below(genome.len() + 1);
            let symbol = alphabet[rng.below(alphabet.len())];
            genome.insert(index, symbol);
        }
        EditKind::Delete => {
            if genome.len() > 1 {
                let index = rng.below(genome.len());
                genome.remove(index);
            }
        }
    }
}

/// Replace, insert or delete one symbol, chosen uniformly.
pub fn edit_mutation<G, R>(genome: &mut Vec<G>, alphabet: &[G], rng: &mut R)
where
    G: Gene,
    R: RandomSource + ?Sized,
{
    let kind = EditKind::ALL[rng.below(EditKind::ALL.len())];
    apply_edit(genome, alphabet, kind, rng);
}

/// Replace one random symbol with a different symbol of the alphabet.
pub fn point_flip<G, R>(genome: &mut [G], alphabet: &[G], rng: &mut R)
where
    G: Gene,
    R: RandomSource + ?Sized,
{
    if genome.is_empty() || alphabet.len() < 2 {
        return;
    }
    let index = rng.below(genome.len());
    let current = genome[index];
    let others: Vec<G> = alphabet.iter().copied().filter(|s| *s != current).collect();
    if others.is_empty() {
        return;
    }
    genome[index] = others[rng.below(others.len())];
}

/// Mutate a genome according to the method and schedule.
///
/// Returns the number of mutation events applied.
pub fn mutate<G, R>(
    genome: &mut Vec<G>,
    alphabet: &[G],
    method: MutationMethod,
    rate: f64,
    schedule: MutationSchedule,
    rng: &mut R,
) -> usize
where
    G: Gene,
    R: RandomSource + ?Sized,
{
    let max_events = match schedule {
        MutationSchedule::Once => 1,
        MutationSchedule::Repeated { max_attempts } => max_attempts,
    };

    let mut applied = 0;
    while applied < max_events && rng.chance(rate) {
        match method {
            MutationMethod::Edit => edit_mutation(genome, alphabet, rng),
            MutationMethod::PointFlip => point_flip(genome, alphabet, rng),
        }
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Direction, format_path, parse_path};
    use proptest::prelude::*;

    fn path(s: &str) -> Vec<Direction> {
        parse_path(s).unwrap()
    }

    #[test]
    fn test_splice_two_point() {
        let child = splice_two_point(&path("NNEE"), &path("SSWW"), 1, 3);
        assert_eq!(format_path(&child), "NSWE");
    }

    #[test]
    fn test_two_point_crossover_scripted() {
        // cut1 = between(0, 2) -> below(3) = 1
        // cut2 = between(1, 4) -> 1 + below(4) = 3
        let mut rng = ScriptedRng::new([1, 2]);
        let child = two_point_crossover(&path("NNEE"), &path("SSWW"), &mut rng).unwrap();
        assert_eq!(format_path(&child), "NSWE");
        assert_eq!(rng.remaining(), (0, 0));
    }

    #[test]
    fn test_two_point_crossover_short_parent() {
        let mut rng = GenomeRng::new(42);
        assert!(two_point_crossover(&path("N"), &path("SSWW"), &mut rng).is_none());
        assert!(two_point_crossover(&path("NNEE"), &[], &mut rng).is_none());
    }

    #[test]
    fn test_single_point_crossover() {
        let a = vec![true; 6];
        let b = vec![false; 6];
        let mut rng = ScriptedRng::new([3]);
        let (c, d) = single_point_crossover(&a, &b, &mut rng);
        // point = 1 + 3 % 6 = 4
        assert_eq!(c, vec![true, true, true, true, false, false]);
        assert_eq!(d, vec![false, false, false, false, true, true]);
    }

    #[test]
    fn test_delete_first() {
        let mut genome = path("NE");
        let mut rng = ScriptedRng::new([0]);
        apply_edit(&mut genome, &Direction::ALL, EditKind::Delete, &mut rng);
        assert_eq!(format_path(&genome), "E");
    }

    #[test]
    fn test_delete_keeps_last_symbol() {
        let mut genome = path("W");
        let mut rng = GenomeRng::new(7);
        apply_edit(&mut genome, &Direction::ALL, EditKind::Delete, &mut rng);
        assert_eq!(format_path(&genome), "W");
    }

    #[test]
    fn test_edit_on_empty_genome() {
        let mut genome: Vec<Direction> = Vec::new();
        let mut rng = GenomeRng::new(7);
        apply_edit(&mut genome, &Direction::ALL, EditKind::Replace, &mut rng);
        assert!(genome.is_empty());
        apply_edit(&mut genome, &Direction::ALL, EditKind::Insert, &mut rng);
        assert_eq!(genome.len(), 1);
    }

    #[test]
    fn test_point_flip_changes_one_bit() {
        let mut rng = GenomeRng::new(42);
        let original = vec![false; 44];
        let mut genome = original.clone();
        point_flip(&mut genome, &[false, true], &mut rng);
        let changed = genome
            .iter()
            .zip(&original)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_repeated_mutation_bounded() {
        let mut rng = GenomeRng::new(3);
        let mut genome = path("NNNN");
        let applied = mutate(
            &mut genome,
            &Direction::ALL,
            MutationMethod::Edit,
            1.0,
            MutationSchedule::Repeated { max_attempts: 5 },
            &mut rng,
        );
        assert_eq!(applied, 5);

        let applied = mutate(
            &mut genome,
            &Direction::ALL,
            MutationMethod::Edit,
            0.0,
            MutationSchedule::Repeated { max_attempts: 5 },
            &mut rng,
        );
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_repeated_mutation_stops_on_failed_draw() {
        // chance(0.5): 0.1 hit, 0.2 hit, 0.9 miss
        let mut rng = ScriptedRng::default().with_units([0.1, 0.2, 0.9]);
        let mut genome = vec![true, false, true];
        let applied = mutate(
            &mut genome,
            &[false, true],
            MutationMethod::PointFlip,
            0.5,
            MutationSchedule::Repeated { max_attempts: 10 },
            &mut rng,
        );
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_weighted_default_cumulative() {
        let mut rng = ScriptedRng::default().with_units([0.0, 0.5, 0.99]);
        let weights = [1.0, 0.0, 3.0];
        assert_eq!(rng.weighted(&weights), 0);
        assert_eq!(rng.weighted(&weights), 2);
        assert_eq!(rng.weighted(&weights), 2);
    }

    #[test]
    fn test_weighted_falls_back_to_uniform() {
        let mut rng = GenomeRng::new(1);
        for _ in 0..20 {
            assert!(rng.weighted(&[0.0, 0.0, 0.0]) < 3);
        }
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_two_point_child_length(
            a in prop::collection::vec(direction(), 2..40),
            b in prop::collection::vec(direction(), 2..40),
            seed in any::<u64>(),
        ) {
            let mut rng = GenomeRng::new(seed);
            let child = two_point_crossover(&a, &b, &mut rng).unwrap();
            prop_assert_eq!(child.len(), a.len());
            prop_assert!(child.len() >= a.len().min(b.len()));
            prop_assert!(child.len() <= a.len().max(b.len()));
            prop_assert!(!child.is_empty());
        }

        #[test]
        fn test_between_inclusive(lo in 0usize..50, span in 0usize..50, seed in any::<u64>()) {
            let mut rng = GenomeRng::new(seed);
            let value = rng.between(lo, lo + span);
            prop_assert!(value >= lo && value <= lo + span);
        }
    }
}
