//! Layout solution models.
//!
//! Output snapshots of the optimizer: structured constraint violations,
//! per-objective scores, a single decoded layout, and the full
//! optimization result bundle.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::{OptimizationConfig, PlacedAsset};

/// Violation severity. Errors invalidate a layout; warnings only
/// degrade its fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("ERROR"),
            Severity::Warning => f.write_str("WARNING"),
        }
    }
}

/// Which placement rule a violation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Footprint outside, or partially outside, the site boundary.
    BoundaryContainment,
    /// Footprint centroid closer to the boundary than the minimum setback.
    Setback,
    /// Footprint intersects an exclusion zone.
    ExclusionOverlap,
    /// Terrain slope at the position exceeds the asset's maximum.
    Slope,
    /// Two same-type instances closer than their minimum spacing.
    SameTypeSpacing,
    /// Two footprints intersect.
    Overlap,
}

/// A structured constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Hard (`Error`) or soft (`Warning`).
    pub severity: Severity,
    /// The rule that was broken.
    pub rule: RuleKind,
    /// Ids of the placements involved.
    pub subject_ids: Vec<String>,
    /// Human-readable description (no severity prefix).
    pub detail: String,
}

impl Violation {
    /// Footprint entirely off the site.
    pub fn outside_boundary(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            severity: Severity::Error,
            rule: RuleKind::BoundaryContainment,
            detail: format!("{id} is outside site boundary"),
            subject_ids: vec![id],
        }
    }

    /// Footprint straddling the boundary.
    pub fn partial_exit(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            severity: Severity::Warning,
            rule: RuleKind::BoundaryContainment,
            detail: format!("{id} partially outside boundary"),
            subject_ids: vec![id],
        }
    }

    /// Centroid setback below the required minimum.
    pub fn setback(id: impl Into<String>, actual_m: f64, required_m: f64) -> Self {
        let id = id.into();
        Self {
            severity: Severity::Error,
            rule: RuleKind::Setback,
            detail: format!("{id} setback {actual_m:.1}m < {required_m}m required"),
            subject_ids: vec![id],
        }
    }

    /// Footprint intersecting an exclusion zone.
    pub fn exclusion_overlap(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            severity: Severity::Error,
            rule: RuleKind::ExclusionOverlap,
            detail: format!("{id} overlaps exclusion zone"),
            subject_ids: vec![id],
        }
    }

    /// Slope above the asset's tolerance.
    pub fn steep_slope(id: impl Into<String>, slope_deg: f64, max_deg: f64) -> Self {
        let id = id.into();
        Self {
            severity: Severity::Warning,
            rule: RuleKind::Slope,
            detail: format!("{id} slope {slope_deg:.1}° > {max_deg}° max"),
            subject_ids: vec![id],
        }
    }

    /// Two same-type instances too close together.
    pub fn spacing(
        id1: impl Into<String>,
        id2: impl Into<String>,
        distance_m: f64,
        min_m: f64,
    ) -> Self {
        let id1 = id1.into();
        let id2 = id2.into();
        Self {
            severity: Severity::Warning,
            rule: RuleKind::SameTypeSpacing,
            detail: format!("{id1} and {id2} too close ({distance_m:.1}m < {min_m}m)"),
            subject_ids: vec![id1, id2],
        }
    }

    /// Two footprints intersecting.
    pub fn overlap(id1: impl Into<String>, id2: impl Into<String>) -> Self {
        let id1 = id1.into();
        let id2 = id2.into();
        Self {
            severity: Severity::Error,
            rule: RuleKind::Overlap,
            detail: format!("{id1} overlaps with {id2}"),
            subject_ids: vec![id1, id2],
        }
    }

    /// Whether this violation invalidates the layout.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.detail)
    }
}

/// Normalized per-objective scores, each in [0, 1].
///
/// Lower is better for `earthwork`, `cable_length`, and `road_length`
/// (costs); higher is better for `compactness` and `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScores {
    pub earthwork: f64,
    pub cable_length: f64,
    pub road_length: f64,
    pub compactness: f64,
    pub capacity: f64,
}

impl Default for ObjectiveScores {
    /// Scores of an empty layout: neutral costs, vacuous compactness,
    /// zero capacity.
    fn default() -> Self {
        Self {
            earthwork: 0.5,
            cable_length: 0.5,
            road_length: 0.5,
            compactness: 1.0,
            capacity: 0.0,
        }
    }
}

/// One complete decoded layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSolution {
    /// Unique solution identifier.
    pub solution_id: String,
    /// The placed assets.
    pub placed_assets: Vec<PlacedAsset>,
    /// Scalar fitness of the layout.
    pub fitness_score: f64,
    /// Per-objective scores.
    pub objective_scores: ObjectiveScores,
    /// Constraint violations found in the layout.
    pub violations: Vec<Violation>,
    /// True iff no error-severity violations exist.
    pub is_valid: bool,
    /// Generation in which this layout was found.
    pub generation: usize,
    /// Time spent producing it, in milliseconds.
    pub computation_time_ms: f64,
}

impl LayoutSolution {
    /// Creates a solution snapshot with a fresh id.
    pub fn new(
        placed_assets: Vec<PlacedAsset>,
        fitness_score: f64,
        objective_scores: ObjectiveScores,
        violations: Vec<Violation>,
        is_valid: bool,
        generation: usize,
        computation_time_ms: f64,
    ) -> Self {
        Self {
            solution_id: Uuid::new_v4().to_string(),
            placed_assets,
            fitness_score,
            objective_scores,
            violations,
            is_valid,
            generation,
            computation_time_ms,
        }
    }

    /// Total area occupied by placed assets (sum of footprint areas;
    /// overlapping footprints count twice, but valid layouts have none).
    pub fn total_asset_area(&self) -> f64 {
        self.placed_assets
            .iter()
            .map(|a| a.footprint().area())
            .sum()
    }

    /// Violations rendered as display strings (severity-prefixed).
    pub fn violation_messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}

/// The full result of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// The best layout found.
    pub best_solution: LayoutSolution,
    /// Diverse runner-up layouts.
    pub alternative_solutions: Vec<LayoutSolution>,
    /// Best population fitness per generation (index 0 = initial
    /// population). Non-decreasing under elitism.
    pub convergence_history: Vec<f64>,
    /// Generations actually executed.
    pub total_generations: usize,
    /// Total wall-clock time in milliseconds.
    pub total_time_ms: f64,
    /// The configuration the run used.
    pub config: OptimizationConfig,
}
