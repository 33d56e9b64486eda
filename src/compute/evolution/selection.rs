//! Parent selection over a ranked population.
//!
//! All functions take the fitness values of the parent pool in ranked order
//! (best first) and return indices into that slice.

use crate::schema::{ParentPool, SelectionMethod};

use super::genome::RandomSource;

/// Smallest pool parents can be drawn from.
pub const MIN_PARENT_POOL: usize = 2;

/// Number of ranked individuals parents are drawn from.
pub fn parent_pool_len(pool: ParentPool, population: usize, survivors: usize) -> usize {
    match pool {
        ParentPool::Survivors => survivors.min(population),
        ParentPool::Population => population,
    }
}

/// Draw one index from `fitness` using `method`.
///
/// `fitness` must not be empty.
pub fn select_index<R>(fitness: &[f64], method: &SelectionMethod, rng: &mut R) -> usize
where
    R: RandomSource + ?Sized,
{
    match method {
        SelectionMethod::RouletteWheel => rng.weighted(fitness),
        SelectionMethod::Uniform => rng.below(fitness.len()),
        SelectionMethod::Tournament { size } => {
            let mut best = rng.below(fitness.len());
            for _ in 1..(*size).max(1) {
                let candidate = rng.below(fitness.len());
                if fitness[candidate] > fitness[best] {
                    best = candidate;
                }
            }
            best
        }
        SelectionMethod::RankBased => {
            // Rank 1 gets weight n, rank n gets weight 1
            let n = fitness.len();
            let weights: Vec<f64> = (0..n).map(|i| (n - i) as f64).collect();
            rng.weighted(&weights)
        }
    }
}

/// Draw two parents with replacement.
///
/// Returns `None` for pools smaller than [`MIN_PARENT_POOL`].
pub fn select_parents<R>(
    fitness: &[f64],
    method: &SelectionMethod,
    rng: &mut R,
) -> Option<(usize, usize)>
where
    R: RandomSource + ?Sized,
{
    if fitness.len() < MIN_PARENT_POOL {
        return None;
    }
    let first = select_index(fitness, method, rng);
    let second = select_index(fitness, method, rng);
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::{GenomeRng, ScriptedRng};

    #[test]
    fn test_parent_pool_len() {
        assert_eq!(parent_pool_len(ParentPool::Survivors, 80, 40), 40);
        assert_eq!(parent_pool_len(ParentPool::Population, 100, 1), 100);
    }

    #[test]
    fn test_degenerate_pool() {
        let mut rng = GenomeRng::new(42);
        assert!(select_parents(&[1.0], &SelectionMethod::RouletteWheel, &mut rng).is_none());
        assert!(select_parents(&[], &SelectionMethod::Uniform, &mut rng).is_none());
        assert!(select_parents(&[1.0, 0.5], &SelectionMethod::Uniform, &mut rng).is_some());
    }

    #[test]
    fn test_roulette_uses_raw_weights() {
        let fitness = [3.0, 1.0];
        let mut rng = ScriptedRng::default().with_units([0.5, 0.8]);
        // 0.5 * 4 = 2.0 lands in the first slot, 0.8 * 4 = 3.2 in the second
        assert_eq!(
            select_index(&fitness, &SelectionMethod::RouletteWheel, &mut rng),
            0
        );
        assert_eq!(
            select_index(&fitness, &SelectionMethod::RouletteWheel, &mut rng),
            1
        );
    }

    #[test]
    fn test_roulette_prefers_fitter() {
        let fitness = [100.0, 1.0, 1.0, 1.0];
        let mut rng = GenomeRng::new(9);
        let hits = (0..1000)
            .filter(|_| select_index(&fitness, &SelectionMethod::RouletteWheel, &mut rng) == 0)
            .count();
        assert!(hits > 900, "best drawn {hits} times");
    }

    #[test]
    fn test_tournament_keeps_best_drawn() {
        let fitness = [5.0, 4.0, 3.0, 2.0];
        let mut rng = ScriptedRng::new([3, 1, 2]);
        let picked = select_index(&fitness, &SelectionMethod::Tournament { size: 3 }, &mut rng);
        assert_eq!(picked, 1);
    }

    #[test]
    fn test_rank_based_in_range() {
        let fitness = [0.9, 0.5, 0.2, 0.1, 0.01];
        let mut rng = GenomeRng::new(1);
        let mut counts = [0usize; 5];
        for _ in 0..5000 {
            counts[select_index(&fitness, &SelectionMethod::RankBased, &mut rng)] += 1;
        }
        assert!(counts[0] > counts[4]);
    }

    #[test]
    fn test_uniform_covers_pool() {
        let fitness = [1.0; 4];
        let mut rng = GenomeRng::new(5);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[select_index(&fitness, &SelectionMethod::Uniform, &mut rng)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
