//! Evolutionary search engine.
//!
//! Owns the population and runs the generational loop: tournament
//! selection, two-point crossover, Gaussian mutation, evaluation, and
//! elitist survivor selection, with stagnation and convergence-window
//! termination. Emits the best layout plus a set of diverse alternative
//! solutions.
//!
//! All randomness flows through a single seeded RNG owned by the engine,
//! so a fixed seed reproduces the exact convergence history. Fitness
//! evaluation within a generation is side-effect free per individual and
//! may run on worker threads; results do not depend on scheduling order.

use std::collections::HashSet;
use std::time::Instant;

use rand::prelude::IndexedRandom;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{LayoutError, Result};
use crate::ga::chromosome::{gaussian_mutation, two_point_crossover, LayoutChromosome};
use crate::ga::codec::LayoutCodec;
use crate::ga::constraints::{is_layout_valid, ConstraintChecker};
use crate::ga::objectives::ObjectiveEvaluator;
use crate::models::{
    AssetDefinition, LayoutSolution, ObjectiveScores, OptimizationConfig, OptimizationResult,
    SiteContext,
};
use crate::validation::{validate_assets, validate_site};

/// Individuals competing in one tournament draw.
const TOURNAMENT_SIZE: usize = 3;

/// Standard deviation of Gaussian mutation noise.
const MUTATION_SIGMA: f64 = 0.1;

/// Trailing best-fitness window inspected for convergence.
const CONVERGENCE_WINDOW: usize = 10;

/// Genetic-algorithm optimizer for asset placement.
///
/// # Example
/// ```no_run
/// use site_layout::geometry::Polygon;
/// use site_layout::ga::GeneticEngine;
/// use site_layout::models::{default_site_assets, OptimizationConfig, SiteContext};
///
/// let site = SiteContext::new(Polygon::rectangle(0.0, 0.0, 500.0, 500.0));
/// let config = OptimizationConfig::default().with_seed(42);
/// let mut engine = GeneticEngine::new(site, default_site_assets(), config).unwrap();
/// let result = engine.optimize();
/// println!("best fitness: {}", result.best_solution.fitness_score);
/// ```
pub struct GeneticEngine {
    site: SiteContext,
    codec: LayoutCodec,
    config: OptimizationConfig,
    rng: SmallRng,
}

impl GeneticEngine {
    /// Creates an engine after validating the site geometry, the asset
    /// catalog, and the configuration.
    ///
    /// Validation failures are input errors; an asset mix that cannot
    /// physically fit the site is *not* — the search still runs and
    /// reports its best (possibly invalid) layout.
    pub fn new(
        site: SiteContext,
        assets: Vec<AssetDefinition>,
        config: OptimizationConfig,
    ) -> Result<Self> {
        validate_site(site.boundary(), site.exclusion_zones())
            .map_err(LayoutError::InvalidGeometry)?;
        validate_assets(&assets).map_err(LayoutError::InvalidAssets)?;
        config.validate().map_err(LayoutError::InvalidConfig)?;

        let rng = match config.random_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let codec = LayoutCodec::new(&site, &assets);

        Ok(Self {
            site,
            codec,
            config,
            rng,
        })
    }

    /// Runs the evolutionary search to completion.
    pub fn optimize(&mut self) -> OptimizationResult {
        let start = Instant::now();

        if self.codec.total_assets() == 0 {
            return self.empty_result(start);
        }

        let evaluation = Evaluation {
            codec: &self.codec,
            checker: ConstraintChecker::new(&self.site),
            objectives: ObjectiveEvaluator::new(&self.site, &self.config),
            parallel: self.config.parallel_workers > 1,
        };

        let mut population =
            initialize_population(&self.codec, self.config.population_size, &mut self.rng);
        evaluation.evaluate_all(&mut population);

        let mut history = vec![best_fitness(&population)];
        let mut best_ever = best_of(&population).clone();
        let mut best_generation = 0usize;
        let mut stagnation = 0usize;
        let mut generations_run = 0usize;

        for generation in 0..self.config.generations {
            generations_run = generation + 1;

            let parents = select_parents(&population, &mut self.rng);
            let mut offspring =
                make_offspring(&parents, self.config.crossover_rate, &mut self.rng);
            for child in offspring.iter_mut() {
                gaussian_mutation(child, self.config.mutation_rate, MUTATION_SIGMA, &mut self.rng);
            }
            evaluation.evaluate_all(&mut offspring);

            population = select_survivors(
                population,
                offspring,
                self.config.population_size,
                self.config.elite_size,
                &mut self.rng,
            );

            let current_best = best_of(&population);
            history.push(current_best.fitness);

            if current_best.fitness > best_ever.fitness {
                best_ever = current_best.clone();
                best_generation = generations_run;
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            debug!(
                "generation {generations_run}: best {:.4}, stagnation {stagnation}",
                best_ever.fitness
            );

            if stagnation >= self.config.max_stagnation {
                debug!("stopping: {stagnation} generations without improvement");
                break;
            }
            if converged(&history, self.config.convergence_threshold) {
                debug!("stopping: best fitness converged");
                break;
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let best_solution = self.to_solution(&best_ever, best_generation, elapsed_ms);
        let alternatives = self.extract_alternatives(&population, generations_run);

        info!(
            "optimization finished: {generations_run} generations, best fitness {:.4}, valid: {}",
            best_ever.fitness, best_ever.is_valid
        );

        OptimizationResult {
            best_solution,
            alternative_solutions: alternatives,
            convergence_history: history,
            total_generations: generations_run,
            total_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            config: self.config.clone(),
        }
    }

    /// Decodes a chromosome into a solution snapshot.
    fn to_solution(
        &self,
        chromosome: &LayoutChromosome,
        generation: usize,
        computation_time_ms: f64,
    ) -> LayoutSolution {
        LayoutSolution::new(
            self.codec.decode(&chromosome.genes),
            chromosome.fitness,
            chromosome.objective_scores,
            chromosome.violations.clone(),
            chromosome.is_valid,
            generation,
            computation_time_ms,
        )
    }

    /// Picks up to `generate_alternatives` diverse runner-up layouts from
    /// the final population: sorted by fitness, best excluded, and
    /// deduplicated by the coarse gene fingerprint.
    fn extract_alternatives(
        &self,
        population: &[LayoutChromosome],
        generation: usize,
    ) -> Vec<LayoutSolution> {
        let mut sorted: Vec<&LayoutChromosome> = population.iter().collect();
        sorted.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));

        let mut alternatives = Vec::new();
        let mut seen_patterns: HashSet<Vec<i64>> = HashSet::new();

        for chromosome in sorted.into_iter().skip(1) {
            if alternatives.len() >= self.config.generate_alternatives {
                break;
            }
            if seen_patterns.insert(chromosome.fingerprint()) {
                alternatives.push(self.to_solution(chromosome, generation, 0.0));
            }
        }

        alternatives
    }

    /// Result for a run with nothing to place: an empty, trivially valid
    /// layout, without touching the population machinery.
    fn empty_result(&self, start: Instant) -> OptimizationResult {
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        OptimizationResult {
            best_solution: LayoutSolution::new(
                Vec::new(),
                0.0,
                ObjectiveScores::default(),
                Vec::new(),
                true,
                0,
                elapsed_ms,
            ),
            alternative_solutions: Vec::new(),
            convergence_history: Vec::new(),
            total_generations: 0,
            total_time_ms: elapsed_ms,
            config: self.config.clone(),
        }
    }
}

/// Shared per-generation evaluation context.
///
/// Evaluation reads only the site snapshot and the chromosome being
/// scored, so individuals can be evaluated concurrently.
struct Evaluation<'a> {
    codec: &'a LayoutCodec,
    checker: ConstraintChecker<'a>,
    objectives: ObjectiveEvaluator<'a>,
    parallel: bool,
}

impl Evaluation<'_> {
    fn evaluate_all(&self, population: &mut [LayoutChromosome]) {
        if self.parallel {
            population.par_iter_mut().for_each(|ind| self.evaluate(ind));
        } else {
            population.iter_mut().for_each(|ind| self.evaluate(ind));
        }
    }

    fn evaluate(&self, individual: &mut LayoutChromosome) {
        let placements = self.codec.decode(&individual.genes);
        let violations = self.checker.check(&placements);

        individual.is_valid = is_layout_valid(&violations);
        individual.objective_scores = self.objectives.score(&placements);
        individual.fitness = self.objectives.fitness(
            &individual.objective_scores,
            &violations,
            individual.is_valid,
        );
        individual.violations = violations;
    }
}

/// Hybrid population seeding: uniform-random individuals plus one
/// center-biased and one grid-spread heuristic individual. Pure-random
/// populations converge slowly on feasible non-overlapping layouts.
fn initialize_population<R: Rng>(
    codec: &LayoutCodec,
    size: usize,
    rng: &mut R,
) -> Vec<LayoutChromosome> {
    let gene_length = codec.gene_length();
    let mut population: Vec<LayoutChromosome> = (0..size.saturating_sub(2))
        .map(|_| LayoutChromosome::random(gene_length, rng))
        .collect();

    population.push(LayoutChromosome::new(codec.center_seed(rng)));
    population.push(LayoutChromosome::new(codec.grid_seed()));
    population
}

/// Tournament selection: `population.len()` draws with replacement, each
/// the best of three distinct individuals.
fn select_parents<R: Rng>(
    population: &[LayoutChromosome],
    rng: &mut R,
) -> Vec<LayoutChromosome> {
    (0..population.len())
        .map(|_| tournament_winner(population, rng).clone())
        .collect()
}

/// Best of `TOURNAMENT_SIZE` distinct individuals drawn from `pool`.
/// `pool` must be non-empty.
fn tournament_winner<'a, R: Rng>(
    pool: &'a [LayoutChromosome],
    rng: &mut R,
) -> &'a LayoutChromosome {
    let mut winner: Option<&LayoutChromosome> = None;
    for contender in pool.choose_multiple(rng, TOURNAMENT_SIZE.min(pool.len())) {
        match winner {
            Some(best) if best.fitness >= contender.fitness => {}
            _ => winner = Some(contender),
        }
    }
    winner.unwrap_or(&pool[0])
}

/// Pairs consecutive parents; each pair crosses over with the configured
/// probability, otherwise the children are plain copies.
fn make_offspring<R: Rng>(
    parents: &[LayoutChromosome],
    crossover_rate: f64,
    rng: &mut R,
) -> Vec<LayoutChromosome> {
    let mut offspring = Vec::with_capacity(parents.len());
    let mut i = 0;
    while i + 1 < parents.len() {
        let (p1, p2) = (&parents[i], &parents[i + 1]);
        let (c1, c2) = if rng.random::<f64>() < crossover_rate {
            two_point_crossover(p1, p2, rng)
        } else {
            (
                LayoutChromosome::new(p1.genes.clone()),
                LayoutChromosome::new(p2.genes.clone()),
            )
        };
        offspring.push(c1);
        offspring.push(c2);
        i += 2;
    }
    offspring
}

/// Elitist survivor selection over parents ∪ offspring: the top
/// `elite_size` pass unconditionally, the rest of the next population is
/// tournament-filled (with replacement) from the non-elite remainder.
fn select_survivors<R: Rng>(
    population: Vec<LayoutChromosome>,
    offspring: Vec<LayoutChromosome>,
    population_size: usize,
    elite_size: usize,
    rng: &mut R,
) -> Vec<LayoutChromosome> {
    let mut combined = population;
    combined.extend(offspring);
    combined.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));

    let elite_size = elite_size.min(combined.len());
    let mut survivors: Vec<LayoutChromosome> = combined[..elite_size].to_vec();
    let remainder = &combined[elite_size..];

    while survivors.len() < population_size {
        if remainder.is_empty() {
            survivors.push(combined[0].clone());
            continue;
        }
        survivors.push(tournament_winner(remainder, rng).clone());
    }

    survivors.truncate(population_size);
    survivors
}

/// Highest-fitness individual. `population` must be non-empty.
fn best_of(population: &[LayoutChromosome]) -> &LayoutChromosome {
    let mut best = &population[0];
    for individual in &population[1..] {
        if individual.fitness > best.fitness {
            best = individual;
        }
    }
    best
}

fn best_fitness(population: &[LayoutChromosome]) -> f64 {
    best_of(population).fitness
}

/// Whether the best fitness has flattened: range of the trailing window
/// below the threshold, once more than a full window is recorded.
fn converged(history: &[f64], threshold: f64) -> bool {
    if history.len() <= CONVERGENCE_WINDOW {
        return false;
    }
    let recent = &history[history.len() - CONVERGENCE_WINDOW..];
    let min = recent.iter().fold(f64::INFINITY, |m, &v| m.min(v));
    let max = recent.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    max - min < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polygon};
    use crate::models::{
        AssetConstraints, AssetDimensions, AssetType, RuleKind, Severity, Violation,
    };

    fn site_200() -> SiteContext {
        SiteContext::new(Polygon::rectangle(0.0, 0.0, 200.0, 200.0))
    }

    fn substation() -> AssetDefinition {
        AssetDefinition::new(
            AssetType::Substation,
            "Electrical Substation",
            AssetDimensions::new(40.0, 60.0, 8.0),
        )
        .with_constraints(AssetConstraints::new(50.0, 1.0).with_road_access(true, 20.0))
        .with_priority(9)
    }

    fn bess() -> AssetDefinition {
        AssetDefinition::new(
            AssetType::Bess,
            "Battery Energy Storage System",
            AssetDimensions::new(50.0, 80.0, 3.0),
        )
        .with_constraints(AssetConstraints::new(30.0, 2.0).with_road_access(true, 30.0))
        .with_priority(10)
    }

    fn quick_config(seed: u64) -> OptimizationConfig {
        OptimizationConfig::default()
            .with_population_size(20)
            .with_generations(15)
            .with_seed(seed)
    }

    #[test]
    fn test_invalid_geometry_fails_fast() {
        let bowtie = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        ]);
        let site = SiteContext::new(bowtie);
        let result = GeneticEngine::new(site, vec![bess()], quick_config(1));
        assert!(matches!(result, Err(LayoutError::InvalidGeometry(_))));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = OptimizationConfig::default().with_population_size(5);
        let result = GeneticEngine::new(site_200(), vec![bess()], config);
        assert!(matches!(result, Err(LayoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_catalog_short_circuits() {
        let mut engine = GeneticEngine::new(site_200(), vec![], quick_config(1)).unwrap();
        let result = engine.optimize();

        assert!(result.best_solution.placed_assets.is_empty());
        assert!(result.best_solution.is_valid);
        assert!(result.best_solution.violations.is_empty());
        assert_eq!(result.total_generations, 0);
        assert!(result.convergence_history.is_empty());
        assert!(result.alternative_solutions.is_empty());
    }

    #[test]
    fn test_determinism_same_seed_same_history() {
        let run = |seed| {
            let mut engine =
                GeneticEngine::new(site_200(), vec![substation(), bess()], quick_config(seed))
                    .unwrap();
            engine.optimize()
        };

        let a = run(42);
        let b = run(42);
        assert_eq!(a.convergence_history, b.convergence_history);
        assert_eq!(a.total_generations, b.total_generations);
        assert_eq!(
            a.best_solution.fitness_score,
            b.best_solution.fitness_score
        );
    }

    #[test]
    fn test_elitism_history_monotonic() {
        let mut engine =
            GeneticEngine::new(site_200(), vec![substation(), bess()], quick_config(7)).unwrap();
        let result = engine.optimize();

        for window in result.convergence_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best fitness regressed: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_two_asset_site_scenario() {
        // 200 m × 200 m site, one substation + one battery bank
        let config = OptimizationConfig::default()
            .with_population_size(30)
            .with_generations(50)
            .with_seed(42);
        let mut engine =
            GeneticEngine::new(site_200(), vec![substation(), bess()], config).unwrap();
        let result = engine.optimize();

        let best = &result.best_solution;
        assert!(best.is_valid, "violations: {:?}", best.violation_messages());
        assert_eq!(best.placed_assets.len(), 2);

        let fp0 = best.placed_assets[0].footprint();
        let fp1 = best.placed_assets[1].footprint();
        assert!(!fp0.intersects(fp1));
        for fp in [fp0, fp1] {
            let (min, max) = fp.aabb();
            assert!(min.x >= -1e-9 && min.y >= -1e-9);
            assert!(max.x <= 200.0 + 1e-9 && max.y <= 200.0 + 1e-9);
        }
    }

    #[test]
    fn test_oversized_asset_never_valid() {
        // An asset that engulfs the site from every position
        let oversized = AssetDefinition::new(
            AssetType::Laydown,
            "Construction Laydown",
            AssetDimensions::new(600.0, 600.0, 0.0).fixed_orientation(),
        )
        .with_constraints(AssetConstraints::new(10.0, 3.0).with_road_access(false, 100.0));

        let mut engine =
            GeneticEngine::new(site_200(), vec![oversized], quick_config(1)).unwrap();
        let result = engine.optimize();

        let best = &result.best_solution;
        assert!(!best.is_valid);
        assert!(best.violations.iter().any(|v| {
            v.rule == RuleKind::BoundaryContainment && v.severity == Severity::Error
        }));
    }

    #[test]
    fn test_validity_matches_error_violations() {
        let mut engine =
            GeneticEngine::new(site_200(), vec![substation(), bess()], quick_config(3)).unwrap();
        let result = engine.optimize();

        let mut solutions = vec![&result.best_solution];
        solutions.extend(result.alternative_solutions.iter());
        for solution in solutions {
            let has_errors = solution.violations.iter().any(Violation::is_error);
            assert_eq!(solution.is_valid, !has_errors);
        }
    }

    #[test]
    fn test_alternatives_capped_by_config() {
        let config = quick_config(5).with_alternatives(3);
        let mut engine =
            GeneticEngine::new(site_200(), vec![substation(), bess()], config).unwrap();
        let result = engine.optimize();

        assert!(result.alternative_solutions.len() <= 3);
    }

    #[test]
    fn test_alternatives_deduplicated_by_fingerprint() {
        let config = quick_config(5).with_alternatives(5);
        let engine = GeneticEngine::new(site_200(), vec![bess()], config).unwrap();

        let chrom = |genes: Vec<f64>, fitness: f64| {
            let mut c = LayoutChromosome::new(genes);
            c.fitness = fitness;
            c
        };
        // Three near-duplicates of the best layout plus two distinct ones
        let population = vec![
            chrom(vec![0.50, 0.50, 0.0], 0.9),
            chrom(vec![0.51, 0.49, 0.0], 0.8), // same fingerprint as best
            chrom(vec![0.52, 0.51, 0.0], 0.7), // same fingerprint again
            chrom(vec![0.10, 0.10, 0.0], 0.6),
            chrom(vec![0.90, 0.90, 0.0], 0.5),
        ];

        let alternatives = engine.extract_alternatives(&population, 10);
        // Best is excluded; its twins collapse into one; two distinct remain
        assert_eq!(alternatives.len(), 3);
        assert!((alternatives[0].fitness_score - 0.8).abs() < 1e-12);
        assert!((alternatives[1].fitness_score - 0.6).abs() < 1e-12);
        assert!((alternatives[2].fitness_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_result_echoes_config() {
        let config = quick_config(9).with_alternatives(2);
        let mut engine = GeneticEngine::new(site_200(), vec![bess()], config.clone()).unwrap();
        let result = engine.optimize();

        assert_eq!(result.config, config);
        assert!(result.total_generations >= 1);
        assert!(result.total_time_ms >= 0.0);
        // History records the initial population plus one entry per generation
        assert_eq!(result.convergence_history.len(), result.total_generations + 1);
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let serial = {
            let mut config = quick_config(11);
            config.parallel_workers = 1;
            let mut engine =
                GeneticEngine::new(site_200(), vec![substation(), bess()], config).unwrap();
            engine.optimize()
        };
        let parallel = {
            let mut config = quick_config(11);
            config.parallel_workers = 4;
            let mut engine =
                GeneticEngine::new(site_200(), vec![substation(), bess()], config).unwrap();
            engine.optimize()
        };

        assert_eq!(serial.convergence_history, parallel.convergence_history);
    }
}
