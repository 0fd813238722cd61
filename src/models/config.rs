//! Optimizer configuration.
//!
//! The objective selects how the five sub-scores combine into a single
//! fitness value; the remaining knobs parameterize the evolutionary
//! search itself.

use serde::{Deserialize, Serialize};

/// Which blend of objectives the search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationObjective {
    /// Minimize grading/earthwork (slope proxy).
    MinEarthwork,
    /// Maximize the fraction of assets inside the buildable area.
    MaxCapacity,
    /// Minimize electrical cable runs to the substation.
    MinCableLength,
    /// Minimize access-road length from the entry point.
    MinRoadLength,
    /// Weighted blend of all objectives.
    #[default]
    Balanced,
}

/// Weights for the balanced objective. Cost-type scores (earthwork,
/// cable, road) are inverted before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub earthwork: f64,
    pub cable_length: f64,
    pub road_length: f64,
    pub compactness: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            earthwork: 0.4,
            cable_length: 0.3,
            road_length: 0.2,
            compactness: 0.1,
        }
    }
}

/// Configuration for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Objective to optimize.
    pub objective: OptimizationObjective,
    /// Weights used by the balanced objective.
    pub objective_weights: ObjectiveWeights,
    /// Population size. Valid range [10, 500].
    pub population_size: usize,
    /// Generation cap. Valid range [10, 1000].
    pub generations: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Per-pair crossover probability.
    pub crossover_rate: f64,
    /// Individuals carried unconditionally into the next generation.
    pub elite_size: usize,
    /// Best-fitness range over the last 10 generations below which the
    /// search is considered converged.
    pub convergence_threshold: f64,
    /// Generations without a new best before the search stops.
    pub max_stagnation: usize,
    /// Seed for the run's RNG. `None` seeds from the OS.
    pub random_seed: Option<u64>,
    /// Worker threads for fitness evaluation. 1 disables parallelism;
    /// results are identical either way.
    pub parallel_workers: usize,
    /// Number of alternative solutions to extract. Valid range [0, 10].
    pub generate_alternatives: usize,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            objective: OptimizationObjective::Balanced,
            objective_weights: ObjectiveWeights::default(),
            population_size: 100,
            generations: 200,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            elite_size: 10,
            convergence_threshold: 0.001,
            max_stagnation: 30,
            random_seed: None,
            parallel_workers: 4,
            generate_alternatives: 3,
        }
    }
}

impl OptimizationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: OptimizationObjective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the balanced-objective weights.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.objective_weights = weights;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation cap.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the elite size.
    pub fn with_elite_size(mut self, size: usize) -> Self {
        self.elite_size = size;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the number of alternatives to extract.
    pub fn with_alternatives(mut self, count: usize) -> Self {
        self.generate_alternatives = count;
        self
    }

    /// Checks all parameter ranges.
    ///
    /// Returns the first problem found, as a human-readable message.
    pub fn validate(&self) -> Result<(), String> {
        if !(10..=500).contains(&self.population_size) {
            return Err(format!(
                "population_size {} outside [10, 500]",
                self.population_size
            ));
        }
        if !(10..=1000).contains(&self.generations) {
            return Err(format!("generations {} outside [10, 1000]", self.generations));
        }
        if self.generate_alternatives > 10 {
            return Err(format!(
                "generate_alternatives {} outside [0, 10]",
                self.generate_alternatives
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!("mutation_rate {} outside [0, 1]", self.mutation_rate));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(format!(
                "crossover_rate {} outside [0, 1]",
                self.crossover_rate
            ));
        }
        if self.elite_size >= self.population_size {
            return Err(format!(
                "elite_size {} must be smaller than population_size {}",
                self.elite_size, self.population_size
            ));
        }
        if self.max_stagnation == 0 {
            return Err("max_stagnation must be at least 1".to_string());
        }
        Ok(())
    }
}
