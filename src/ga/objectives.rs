//! Objective scoring.
//!
//! Computes the five normalized sub-scores for a decoded layout and
//! combines them into a single fitness value according to the configured
//! objective. Missing optional data (no slope raster, no entry point)
//! degrades to a neutral 0.5 rather than failing, and every
//! normalization denominator is guarded against zero.

use crate::geometry::Point;
use crate::models::{
    AssetType, ObjectiveScores, OptimizationConfig, OptimizationObjective, PlacedAsset,
    SiteContext, Violation,
};

/// Slope (degrees) at which the earthwork score saturates at 1.
const EARTHWORK_SLOPE_CEILING: f64 = 15.0;

/// Fitness penalty per constraint violation.
const VIOLATION_PENALTY: f64 = 0.1;

/// Fitness bonus for a fully valid layout.
const VALIDITY_BONUS: f64 = 0.2;

/// Scores decoded layouts for one site and configuration.
#[derive(Debug, Clone)]
pub struct ObjectiveEvaluator<'a> {
    site: &'a SiteContext,
    objective: OptimizationObjective,
    weights: crate::models::ObjectiveWeights,
    diagonal: f64,
    centroid: Point,
    entry: Point,
}

impl<'a> ObjectiveEvaluator<'a> {
    /// Creates an evaluator, precomputing the site's normalization
    /// scales.
    pub fn new(site: &'a SiteContext, config: &OptimizationConfig) -> Self {
        Self {
            site,
            objective: config.objective,
            weights: config.objective_weights,
            diagonal: site.diagonal(),
            centroid: site.centroid(),
            entry: site.entry_point(),
        }
    }

    /// Computes all five sub-scores for a layout.
    pub fn score(&self, placements: &[PlacedAsset]) -> ObjectiveScores {
        ObjectiveScores {
            earthwork: self.earthwork_score(placements),
            cable_length: self.cable_length_score(placements),
            road_length: self.road_length_score(placements),
            compactness: self.compactness_score(placements),
            capacity: self.capacity_score(placements),
        }
    }

    /// Combines sub-scores per the configured objective and applies the
    /// violation penalty and validity bonus.
    pub fn fitness(&self, scores: &ObjectiveScores, violations: &[Violation], is_valid: bool) -> f64 {
        let combined = match self.objective {
            OptimizationObjective::MinEarthwork => 1.0 - scores.earthwork,
            OptimizationObjective::MaxCapacity => scores.capacity,
            OptimizationObjective::MinCableLength => 1.0 - scores.cable_length,
            OptimizationObjective::MinRoadLength => 1.0 - scores.road_length,
            OptimizationObjective::Balanced => {
                let w = &self.weights;
                w.earthwork * (1.0 - scores.earthwork)
                    + w.cable_length * (1.0 - scores.cable_length)
                    + w.road_length * (1.0 - scores.road_length)
                    + w.compactness * scores.compactness
            }
        };

        let penalized = (combined - VIOLATION_PENALTY * violations.len() as f64).max(0.0);
        if is_valid {
            penalized + VALIDITY_BONUS
        } else {
            penalized
        }
    }

    /// Earthwork proxy: average slope at the placement positions,
    /// normalized against a 15° ceiling. Neutral 0.5 without slope data.
    fn earthwork_score(&self, placements: &[PlacedAsset]) -> f64 {
        if !self.site.has_slope_data() {
            return 0.5;
        }

        let mut total = 0.0;
        let mut count = 0usize;
        for p in placements {
            if let Some(slope) = self.site.slope_at(p.position()) {
                total += slope;
                count += 1;
            }
        }
        if count == 0 {
            return 0.5;
        }

        (total / count as f64 / EARTHWORK_SLOPE_CEILING).min(1.0)
    }

    /// Cable proxy: total distance from every non-substation asset to
    /// the substation (or the site centroid when none is placed),
    /// normalized by site diagonal × asset count.
    fn cable_length_score(&self, placements: &[PlacedAsset]) -> f64 {
        if placements.is_empty() {
            return 0.5;
        }

        let reference = placements
            .iter()
            .find(|p| p.asset_type() == AssetType::Substation)
            .map(|p| p.position())
            .unwrap_or(self.centroid);

        let total: f64 = placements
            .iter()
            .filter(|p| p.asset_type() != AssetType::Substation)
            .map(|p| reference.distance_to(p.position()))
            .sum();

        let max_distance = self.diagonal * placements.len() as f64;
        if max_distance > 0.0 {
            (total / max_distance).min(1.0)
        } else {
            0.5
        }
    }

    /// Road proxy: total distance from the entry point to every asset
    /// requiring road access, normalized like the cable score.
    fn road_length_score(&self, placements: &[PlacedAsset]) -> f64 {
        if placements.is_empty() {
            return 0.5;
        }

        let total: f64 = placements
            .iter()
            .filter(|p| p.definition().constraints.requires_road_access)
            .map(|p| self.entry.distance_to(p.position()))
            .sum();

        let max_distance = self.diagonal * placements.len() as f64;
        if max_distance > 0.0 {
            (total / max_distance).min(1.0)
        } else {
            0.5
        }
    }

    /// Compactness: 1 − mean distance of assets from their shared
    /// centroid, normalized by half the site diagonal. Layouts with
    /// fewer than two assets score 1.
    fn compactness_score(&self, placements: &[PlacedAsset]) -> f64 {
        if placements.len() < 2 {
            return 1.0;
        }

        let n = placements.len() as f64;
        let (sx, sy) = placements
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.position().x, sy + p.position().y));
        let cluster_centroid = Point::new(sx / n, sy / n);

        let avg_distance: f64 = placements
            .iter()
            .map(|p| cluster_centroid.distance_to(p.position()))
            .sum::<f64>()
            / n;

        let max_distance = self.diagonal / 2.0;
        if max_distance > 0.0 {
            1.0 - (avg_distance / max_distance).min(1.0)
        } else {
            0.5
        }
    }

    /// Capacity: fraction of assets whose footprint lies fully in the
    /// buildable area.
    fn capacity_score(&self, placements: &[PlacedAsset]) -> f64 {
        if placements.is_empty() {
            return 0.0;
        }
        let inside = placements
            .iter()
            .filter(|p| self.site.in_buildable_area(p.footprint()))
            .count();
        inside as f64 / placements.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::models::{AssetConstraints, AssetDefinition, AssetDimensions, SlopeGrid};
    use ndarray::Array2;

    fn site_200() -> SiteContext {
        SiteContext::new(Polygon::rectangle(0.0, 0.0, 200.0, 200.0))
    }

    fn asset(asset_type: AssetType, road: bool) -> AssetDefinition {
        AssetDefinition::new(asset_type, "asset", AssetDimensions::new(10.0, 10.0, 0.0))
            .with_constraints(AssetConstraints::new(10.0, 3.0).with_road_access(road, 50.0))
    }

    fn place(def: AssetDefinition, x: f64, y: f64) -> PlacedAsset {
        PlacedAsset::new(def, 0, Point::new(x, y), 0.0)
    }

    #[test]
    fn test_earthwork_neutral_without_slope_data() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let placements = vec![place(asset(AssetType::Bess, true), 100.0, 100.0)];
        assert_eq!(evaluator.earthwork_score(&placements), 0.5);
    }

    #[test]
    fn test_earthwork_normalized_against_ceiling() {
        let grid = SlopeGrid::new(Array2::from_elem((20, 20), 7.5), 10.0);
        let site = site_200().with_slope_grid(grid);
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let placements = vec![place(asset(AssetType::Bess, true), 100.0, 100.0)];

        // 7.5° / 15° ceiling = 0.5
        assert!((evaluator.earthwork_score(&placements) - 0.5).abs() < 1e-12);

        let steep = SlopeGrid::new(Array2::from_elem((20, 20), 45.0), 10.0);
        let steep_site = site_200().with_slope_grid(steep);
        let steep_eval = ObjectiveEvaluator::new(&steep_site, &OptimizationConfig::default());
        assert_eq!(steep_eval.earthwork_score(&placements), 1.0);
    }

    #[test]
    fn test_cable_uses_substation_as_reference() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let placements = vec![
            place(asset(AssetType::Substation, true), 100.0, 100.0),
            place(asset(AssetType::Bess, true), 100.0, 160.0),
        ];

        // One 60 m run, normalized by diagonal × 2 placements
        let expected = 60.0 / (site.diagonal() * 2.0);
        assert!((evaluator.cable_length_score(&placements) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cable_falls_back_to_centroid() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        // No substation placed: distance measured from the site centroid
        let placements = vec![place(asset(AssetType::Bess, true), 100.0, 160.0)];

        let expected = 60.0 / site.diagonal();
        assert!((evaluator.cable_length_score(&placements) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_road_counts_only_road_assets() {
        let site = site_200().with_entry_points(vec![Point::new(0.0, 100.0)]);
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let placements = vec![
            place(asset(AssetType::OAndM, true), 50.0, 100.0),
            place(asset(AssetType::InverterPad, false), 150.0, 100.0),
        ];

        // Only the O&M building needs road access: one 50 m run
        let expected = 50.0 / (site.diagonal() * 2.0);
        assert!((evaluator.road_length_score(&placements) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_compactness_single_asset() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let placements = vec![place(asset(AssetType::Bess, true), 10.0, 190.0)];
        assert_eq!(evaluator.compactness_score(&placements), 1.0);
    }

    #[test]
    fn test_compactness_prefers_clusters() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());

        let tight = vec![
            place(asset(AssetType::Bess, true), 95.0, 100.0),
            place(asset(AssetType::OAndM, true), 105.0, 100.0),
        ];
        let spread = vec![
            place(asset(AssetType::Bess, true), 10.0, 10.0),
            place(asset(AssetType::OAndM, true), 190.0, 190.0),
        ];

        assert!(
            evaluator.compactness_score(&tight) > evaluator.compactness_score(&spread)
        );
    }

    #[test]
    fn test_capacity_fraction() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let placements = vec![
            place(asset(AssetType::Bess, true), 100.0, 100.0), // inside
            place(asset(AssetType::OAndM, true), 2.0, 2.0),    // straddles corner
        ];

        assert!((evaluator.capacity_score(&placements) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fitness_single_objectives() {
        let site = site_200();
        let scores = ObjectiveScores {
            earthwork: 0.3,
            cable_length: 0.2,
            road_length: 0.4,
            compactness: 0.8,
            capacity: 0.9,
        };

        let cases = [
            (OptimizationObjective::MinEarthwork, 0.7),
            (OptimizationObjective::MaxCapacity, 0.9),
            (OptimizationObjective::MinCableLength, 0.8),
            (OptimizationObjective::MinRoadLength, 0.6),
        ];
        for (objective, expected) in cases {
            let config = OptimizationConfig::default().with_objective(objective);
            let evaluator = ObjectiveEvaluator::new(&site, &config);
            let fitness = evaluator.fitness(&scores, &[], false);
            assert!(
                (fitness - expected).abs() < 1e-12,
                "{objective:?}: {fitness} != {expected}"
            );
        }
    }

    #[test]
    fn test_fitness_balanced_weighting() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let scores = ObjectiveScores {
            earthwork: 0.5,
            cable_length: 0.5,
            road_length: 0.5,
            compactness: 0.5,
            capacity: 0.0,
        };

        // All sub-terms at 0.5 with default weights sum to 0.5
        let fitness = evaluator.fitness(&scores, &[], false);
        assert!((fitness - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fitness_penalty_and_bonus() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let scores = ObjectiveScores {
            earthwork: 0.5,
            cable_length: 0.5,
            road_length: 0.5,
            compactness: 0.5,
            capacity: 0.5,
        };

        let violations = vec![
            Violation::partial_exit("bess_0"),
            Violation::steep_slope("bess_0", 9.0, 2.0),
        ];

        // 0.5 − 2×0.1, still valid (warnings only) → +0.2
        let fitness = evaluator.fitness(&scores, &violations, true);
        assert!((fitness - 0.5).abs() < 1e-12);

        // Invalid: no bonus
        let invalid = evaluator.fitness(&scores, &violations, false);
        assert!((invalid - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_fitness_floored_at_zero() {
        let site = site_200();
        let evaluator = ObjectiveEvaluator::new(&site, &OptimizationConfig::default());
        let scores = ObjectiveScores::default();

        let many: Vec<Violation> = (0..20)
            .map(|i| Violation::overlap(format!("a_{i}"), format!("b_{i}")))
            .collect();
        let fitness = evaluator.fitness(&scores, &many, false);
        assert_eq!(fitness, 0.0);
    }
}
