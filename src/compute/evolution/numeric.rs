//! Numeric domain: fixed-length bit strings encoding an `(x, y)` point.

use crate::schema::{FunctionConfig, Landscape};

use super::domain::{Codec, Domain};
use super::genome::RandomSource;

/// Schaffer's F6 function. Global maximum 1.0 at the origin.
pub fn schaffer_f6(x: f64, y: f64) -> f64 {
    let r2 = x * x + y * y;
    let numerator = r2.sqrt().sin().powi(2) - 0.5;
    let denominator = (1.0 + 0.001 * r2).powi(2);
    0.5 - numerator / denominator
}

impl Landscape {
    pub fn evaluate(self, x: f64, y: f64) -> f64 {
        match self {
            Landscape::SchafferF6 => schaffer_f6(x, y),
            Landscape::InvertedSphere => 1.0 / (1.0 + x * x + y * y),
        }
    }
}

/// Maps unsigned big-endian integers onto a closed real interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryCodec {
    bits_per_axis: u32,
    bounds: (f64, f64),
}

impl BinaryCodec {
    pub fn new(bits_per_axis: u32, bounds: (f64, f64)) -> Self {
        Self {
            bits_per_axis,
            bounds,
        }
    }

    /// Total genome length, two axes.
    pub fn genome_length(&self) -> usize {
        2 * self.bits_per_axis as usize
    }

    fn max_level(&self) -> u64 {
        (1u64 << self.bits_per_axis) - 1
    }

    /// Distance between adjacent representable values.
    pub fn resolution(&self) -> f64 {
        (self.bounds.1 - self.bounds.0) / self.max_level() as f64
    }

    fn decode_axis(&self, bits: &[bool]) -> f64 {
        let level = bits
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit));
        self.bounds.0 + level as f64 * self.resolution()
    }

    fn encode_axis(&self, value: f64, out: &mut Vec<bool>) {
        let (lo, hi) = self.bounds;
        let clamped = value.clamp(lo, hi);
        let level = ((clamped - lo) / self.resolution()).round() as u64;
        let level = level.min(self.max_level());
        for shift in (0..self.bits_per_axis).rev() {
            out.push((level >> shift) & 1 == 1);
        }
    }

    /// Decode a genome into `(x, y)`. Genomes of the wrong length are read
    /// as far as they go, missing bits count as zero.
    pub fn decode(&self, genome: &[bool]) -> (f64, f64) {
        let bits = self.bits_per_axis as usize;
        let mut padded = genome.to_vec();
        padded.resize(2 * bits, false);
        (
            self.decode_axis(&padded[..bits]),
            self.decode_axis(&padded[bits..2 * bits]),
        )
    }

    /// Encode `(x, y)`, clamped into the bounds and rounded to the nearest level.
    pub fn encode(&self, (x, y): (f64, f64)) -> Vec<bool> {
        let mut genome = Vec::with_capacity(self.genome_length());
        self.encode_axis(x, &mut genome);
        self.encode_axis(y, &mut genome);
        genome
    }
}

/// Maximise a landscape over a bit-string encoded point.
#[derive(Debug, Clone)]
pub struct FunctionDomain {
    landscape: Landscape,
    codec: BinaryCodec,
}

impl FunctionDomain {
    pub fn new(config: &FunctionConfig) -> Self {
        Self {
            landscape: config.landscape,
            codec: BinaryCodec::new(config.bits_per_axis, config.bounds),
        }
    }

    pub fn codec(&self) -> &BinaryCodec {
        &self.codec
    }

    pub fn landscape(&self) -> Landscape {
        self.landscape
    }
}

impl Domain for FunctionDomain {
    type Gene = bool;

    fn alphabet(&self) -> &[bool] {
        &[false, true]
    }

    fn initial_length(&self) -> usize {
        self.codec.genome_length()
    }

    fn repair_length(&self) -> usize {
        self.codec.genome_length()
    }

    fn fixed_length(&self) -> Option<usize> {
        Some(self.codec.genome_length())
    }

    fn random_genome(&self, rng: &mut dyn RandomSource, _length: usize) -> Vec<bool> {
        (0..self.codec.genome_length())
            .map(|_| rng.below(2) == 1)
            .collect()
    }

    fn score(&self, genome: &[bool]) -> f64 {
        let (x, y) = self.codec.decode(genome);
        self.landscape.evaluate(x, y)
    }
}

impl Codec for FunctionDomain {
    type Value = (f64, f64);

    fn decode(&self, genome: &[bool]) -> (f64, f64) {
        self.codec.decode(genome)
    }

    fn encode(&self, value: &(f64, f64)) -> Vec<bool> {
        self.codec.encode(*value)
    }
}
