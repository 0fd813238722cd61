//! Real-valued layout chromosome.
//!
//! # Encoding
//!
//! A flat vector of genes in [0, 1], three per asset instance
//! (normalized x, normalized y, normalized rotation). The gene vector is
//! the single source of truth for a candidate layout: placements are
//! always re-derived from it by the codec, never stored alongside it.
//!
//! Evaluation results (fitness, scores, violations, validity) are cached
//! on the chromosome and reset whenever new gene material is produced.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::models::ObjectiveScores;
use crate::models::Violation;

/// One candidate layout in the population.
///
/// Higher fitness = better layout (maximization convention).
#[derive(Debug, Clone)]
pub struct LayoutChromosome {
    /// Gene vector, each value in [0, 1].
    pub genes: Vec<f64>,
    /// Fitness value (higher = better). 0 until evaluated.
    pub fitness: f64,
    /// Per-objective scores from the last evaluation.
    pub objective_scores: ObjectiveScores,
    /// Constraint violations from the last evaluation.
    pub violations: Vec<Violation>,
    /// Whether the decoded layout has no error-severity violations.
    pub is_valid: bool,
}

impl LayoutChromosome {
    /// Wraps a gene vector with unevaluated state.
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: 0.0,
            objective_scores: ObjectiveScores::default(),
            violations: Vec::new(),
            is_valid: false,
        }
    }

    /// Creates a chromosome with uniform-random genes in [0, 1).
    pub fn random<R: Rng>(gene_length: usize, rng: &mut R) -> Self {
        let genes = (0..gene_length).map(|_| rng.random::<f64>()).collect();
        Self::new(genes)
    }

    /// Coarse gene-pattern fingerprint for layout deduplication.
    ///
    /// Genes scaled by 10 and rounded, so layouts differing by less than
    /// half a decile in every gene collapse to the same pattern.
    pub fn fingerprint(&self) -> Vec<i64> {
        self.genes.iter().map(|g| (g * 10.0).round() as i64).collect()
    }
}

/// Two-point crossover on the gene vectors.
///
/// Two distinct cut points are chosen uniformly; the middle segment is
/// swapped between the children. Children carry unevaluated state.
pub fn two_point_crossover<R: Rng>(
    p1: &LayoutChromosome,
    p2: &LayoutChromosome,
    rng: &mut R,
) -> (LayoutChromosome, LayoutChromosome) {
    let len = p1.genes.len();
    if len < 2 {
        return (
            LayoutChromosome::new(p1.genes.clone()),
            LayoutChromosome::new(p2.genes.clone()),
        );
    }

    let picked = rand::seq::index::sample(rng, len, 2);
    let (a, b) = (
        picked.index(0).min(picked.index(1)),
        picked.index(0).max(picked.index(1)),
    );

    let mut child1 = p1.genes.clone();
    let mut child2 = p2.genes.clone();
    child1[a..b].copy_from_slice(&p2.genes[a..b]);
    child2[a..b].copy_from_slice(&p1.genes[a..b]);

    (LayoutChromosome::new(child1), LayoutChromosome::new(child2))
}

/// Per-gene Gaussian mutation.
///
/// Each gene mutates with probability `rate`, adding noise drawn from
/// N(0, sigma²) and clamping back into [0, 1].
pub fn gaussian_mutation<R: Rng>(
    chromosome: &mut LayoutChromosome,
    rate: f64,
    sigma: f64,
    rng: &mut R,
) {
    let normal = Normal::new(0.0, sigma).unwrap();
    for gene in chromosome.genes.iter_mut() {
        if rng.random::<f64>() < rate {
            *gene = (*gene + normal.sample(rng)).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_chromosome() {
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = LayoutChromosome::random(12, &mut rng);

        assert_eq!(ch.genes.len(), 12);
        assert!(ch.genes.iter().all(|g| (0.0..=1.0).contains(g)));
        assert_eq!(ch.fitness, 0.0);
        assert!(!ch.is_valid);
        assert!(ch.violations.is_empty());
    }

    #[test]
    fn test_two_point_crossover_swaps_segment() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = LayoutChromosome::new(vec![0.0; 10]);
        let p2 = LayoutChromosome::new(vec![1.0; 10]);

        let (c1, c2) = two_point_crossover(&p1, &p2, &mut rng);

        assert_eq!(c1.genes.len(), 10);
        assert_eq!(c2.genes.len(), 10);
        // Children are complementary at every position
        for i in 0..10 {
            assert!(c1.genes[i] == 0.0 || c1.genes[i] == 1.0);
            assert!((c1.genes[i] + c2.genes[i] - 1.0).abs() < 1e-12);
        }
        // The swapped segment is non-empty
        assert!(c1.genes.iter().any(|&g| g == 1.0));
    }

    #[test]
    fn test_crossover_short_vector() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = LayoutChromosome::new(vec![0.3]);
        let p2 = LayoutChromosome::new(vec![0.7]);
        let (c1, c2) = two_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(c1.genes, vec![0.3]);
        assert_eq!(c2.genes, vec![0.7]);
    }

    #[test]
    fn test_gaussian_mutation_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = LayoutChromosome::new(vec![0.5; 100]);

        gaussian_mutation(&mut ch, 1.0, 0.1, &mut rng);

        assert!(ch.genes.iter().all(|g| (0.0..=1.0).contains(g)));
        assert!(ch.genes.iter().any(|&g| g != 0.5));
    }

    #[test]
    fn test_mutation_zero_rate_is_identity() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = LayoutChromosome::new(vec![0.25, 0.5, 0.75]);
        gaussian_mutation(&mut ch, 0.0, 0.1, &mut rng);
        assert_eq!(ch.genes, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_fingerprint_rounding() {
        let a = LayoutChromosome::new(vec![0.12, 0.58, 0.91]);
        let b = LayoutChromosome::new(vec![0.13, 0.62, 0.91]);
        let c = LayoutChromosome::new(vec![0.52, 0.58, 0.91]);

        assert_eq!(a.fingerprint(), vec![1, 6, 9]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
