//! Problem domains plug into the engine through these traits.

use crate::schema::Gene;

use super::genome::RandomSource;

/// A search problem: its symbol alphabet, how to draw random genomes and
/// how to score them.
pub trait Domain: Send + Sync {
    type Gene: Gene;

    /// Every symbol a genome may contain.
    fn alphabet(&self) -> &[Self::Gene];

    /// Length hint for genomes of the first generation.
    fn initial_length(&self) -> usize;

    /// Length hint used when an empty genome has to be regenerated.
    fn repair_length(&self) -> usize;

    /// `Some(n)` when every genome has exactly `n` symbols.
    fn fixed_length(&self) -> Option<usize> {
        None
    }

    /// Draw a random genome. `length` is a hint; domains with a fixed
    /// length ignore it.
    fn random_genome(&self, rng: &mut dyn RandomSource, length: usize) -> Vec<Self::Gene>;

    /// Raw score of a genome. Higher is better; may fall below the floor.
    fn score(&self, genome: &[Self::Gene]) -> f64;
}

/// Domains whose genomes decode into a problem-level value.
pub trait Codec: Domain {
    type Value;

    fn decode(&self, genome: &[Self::Gene]) -> Self::Value;

    fn encode(&self, value: &Self::Value) -> Vec<Self::Gene>;
}

/// Score a genome, floored so every individual stays selectable.
#[inline]
pub fn evaluate<D: Domain + ?Sized>(domain: &D, genome: &[D::Gene], floor: f64) -> f64 {
    let score = domain.score(genome);
    if score.is_nan() { floor } else { score.max(floor) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::GenomeRng;

    struct CountOnes;

    impl Domain for CountOnes {
        type Gene = bool;

        fn alphabet(&self) -> &[bool] {
            &[false, true]
        }

        fn initial_length(&self) -> usize {
            8
        }

        fn repair_length(&self) -> usize {
            8
        }

        fn random_genome(&self, rng: &mut dyn RandomSource, length: usize) -> Vec<bool> {
            (0..length).map(|_| rng.chance(0.5)).collect()
        }

        fn score(&self, genome: &[bool]) -> f64 {
            genome.iter().filter(|b| **b).count() as f64 - 4.0
        }
    }

    #[test]
    fn test_evaluate_floors_score() {
        assert_eq!(evaluate(&CountOnes, &[false; 8], 0.01), 0.01);
        assert_eq!(evaluate(&CountOnes, &[true; 8], 0.01), 4.0);
    }

    #[test]
    fn test_random_genome_through_dyn_source() {
        let mut rng = GenomeRng::new(11);
        let genome = CountOnes.random_genome(&mut rng, 8);
        assert_eq!(genome.len(), 8);
        assert!(evaluate(&CountOnes, &genome, 0.01) >= 0.01);
    }
}
