//! Layout constraint checking.
//!
//! Evaluates a decoded layout against the placement rules, producing a
//! structured violation list. Per-placement rules run first (boundary
//! containment, setback, exclusion zones, slope), then pairwise rules
//! (same-type spacing, footprint overlap).
//!
//! A layout is valid iff no error-severity violation exists. Note the
//! deliberate asymmetry: a footprint *partially* leaving the boundary is
//! only a warning and does not invalidate the layout, while footprint
//! overlap always does.

use crate::models::{PlacedAsset, SiteContext, Violation};

/// Checks decoded layouts against one site's placement rules.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintChecker<'a> {
    site: &'a SiteContext,
}

impl<'a> ConstraintChecker<'a> {
    /// Creates a checker for the given site.
    pub fn new(site: &'a SiteContext) -> Self {
        Self { site }
    }

    /// Runs all placement rules and returns the violations found.
    pub fn check(&self, placements: &[PlacedAsset]) -> Vec<Violation> {
        let mut violations = Vec::new();

        for placement in placements {
            self.check_boundary(placement, &mut violations);
            self.check_setback(placement, &mut violations);
            self.check_exclusions(placement, &mut violations);
            self.check_slope(placement, &mut violations);
        }

        for (i, p1) in placements.iter().enumerate() {
            for p2 in placements.iter().skip(i + 1) {
                self.check_pair(p1, p2, &mut violations);
            }
        }

        violations
    }

    /// Boundary containment.
    ///
    /// A contained footprint passes. A footprint with an edge crossing
    /// the boundary, or a corner on the site, is partially on-site
    /// (warning). A footprint with no corner or edge on the site has no
    /// anchored part there — fully off-site or engulfing the entire
    /// boundary — and errors.
    fn check_boundary(&self, placement: &PlacedAsset, violations: &mut Vec<Violation>) {
        let boundary = self.site.boundary();
        let footprint = placement.footprint();

        if boundary.contains_polygon(footprint) {
            return;
        }

        let partially_on_site = boundary.crosses(footprint)
            || footprint.vertices().iter().any(|&v| boundary.contains_point(v));
        if partially_on_site {
            violations.push(Violation::partial_exit(placement.id()));
        } else {
            violations.push(Violation::outside_boundary(placement.id()));
        }
    }

    fn check_setback(&self, placement: &PlacedAsset, violations: &mut Vec<Violation>) {
        let required = placement.definition().constraints.min_setback;
        let centroid = placement.footprint().centroid();
        let distance = self.site.boundary().distance_to_point(centroid);
        if distance < required {
            violations.push(Violation::setback(placement.id(), distance, required));
        }
    }

    fn check_exclusions(&self, placement: &PlacedAsset, violations: &mut Vec<Violation>) {
        if !placement.definition().constraints.avoid_exclusion_zones {
            return;
        }
        let footprint = placement.footprint();
        if self
            .site
            .exclusion_zones()
            .iter()
            .any(|zone| zone.intersects(footprint))
        {
            violations.push(Violation::exclusion_overlap(placement.id()));
        }
    }

    fn check_slope(&self, placement: &PlacedAsset, violations: &mut Vec<Violation>) {
        let max_slope = placement.definition().constraints.max_slope;
        if let Some(slope) = self.site.slope_at(placement.position()) {
            if slope > max_slope {
                violations.push(Violation::steep_slope(placement.id(), slope, max_slope));
            }
        }
    }

    fn check_pair(&self, p1: &PlacedAsset, p2: &PlacedAsset, violations: &mut Vec<Violation>) {
        if p1.asset_type() == p2.asset_type() {
            let min_distance = p1.definition().constraints.min_distance_to_same;
            if min_distance > 0.0 {
                let distance = p1.footprint().distance_to_polygon(p2.footprint());
                if distance < min_distance {
                    violations.push(Violation::spacing(p1.id(), p2.id(), distance, min_distance));
                }
            }
        }

        if p1.footprint().intersects(p2.footprint()) {
            violations.push(Violation::overlap(p1.id(), p2.id()));
        }
    }
}

/// Whether a violation list leaves the layout valid (no errors).
pub fn is_layout_valid(violations: &[Violation]) -> bool {
    !violations.iter().any(Violation::is_error)
}
