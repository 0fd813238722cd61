//! Genetic-algorithm asset-placement optimization.
//!
//! Implements the evolutionary search over candidate layouts: a
//! real-valued gene encoding, constraint and objective evaluation, and
//! the generational loop with elitist survivor selection.
//!
//! # Encoding
//!
//! Each asset instance consumes three genes in [0, 1]: normalized x,
//! normalized y, and normalized rotation. Positions map onto the site
//! boundary's bounding box; rotations quantize to the asset's allowed
//! angles. The gene vector is the only persistent representation of a
//! layout — placements are re-derived on every evaluation.
//!
//! # Submodules
//!
//! - [`chromosome`]: gene vector, crossover, and mutation operators
//! - [`codec`]: gene ↔ placement decoding and heuristic seeds
//! - [`constraints`]: placement rule checking
//! - [`objectives`]: sub-score computation and fitness combination
//! - [`engine`]: the generational search loop
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Bean (1994), "Genetic algorithms and random keys for sequencing
//!   and optimization"

pub mod chromosome;
pub mod codec;
pub mod constraints;
pub mod engine;
pub mod objectives;

pub use chromosome::{gaussian_mutation, two_point_crossover, LayoutChromosome};
pub use codec::{LayoutCodec, GENES_PER_ASSET};
pub use constraints::{is_layout_valid, ConstraintChecker};
pub use engine::GeneticEngine;
pub use objectives::ObjectiveEvaluator;
