//! Input validation for placement problems.
//!
//! Checks site geometry and the asset catalog before any population is
//! created. Detects:
//! - Degenerate boundaries (too few vertices, zero area)
//! - Self-intersecting boundaries
//! - Degenerate exclusion zones
//! - Non-positive asset dimensions or quantities
//! - Rotation steps that do not divide 360
//!
//! Unsatisfiable constraint *combinations* are deliberately not checked
//! here: infeasibility is a search result, not an input error.

use crate::geometry::Polygon;
use crate::models::AssetDefinition;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Boundary has fewer than three vertices.
    DegenerateBoundary,
    /// Boundary area is zero (or numerically indistinguishable from it).
    ZeroAreaBoundary,
    /// Boundary edges cross each other.
    SelfIntersectingBoundary,
    /// An exclusion zone is degenerate or self-intersecting.
    InvalidExclusionZone,
    /// An asset has a non-positive width or length.
    InvalidDimensions,
    /// An asset has quantity zero.
    InvalidQuantity,
    /// A rotation step that does not evenly divide 360.
    InvalidRotationStep,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates site geometry.
///
/// Checks:
/// 1. The boundary is a polygon (≥ 3 vertices)
/// 2. The boundary has positive area
/// 3. The boundary does not self-intersect
/// 4. Every exclusion zone is itself a simple polygon with positive area
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_site(boundary: &Polygon, exclusion_zones: &[Polygon]) -> ValidationResult {
    let mut errors = Vec::new();

    if boundary.vertex_count() < 3 {
        errors.push(ValidationError::new(
            ValidationErrorKind::DegenerateBoundary,
            format!(
                "Boundary has {} vertices; a polygon needs at least 3",
                boundary.vertex_count()
            ),
        ));
    } else {
        if boundary.area() <= f64::EPSILON {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroAreaBoundary,
                "Boundary area is zero",
            ));
        }
        if boundary.is_self_intersecting() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfIntersectingBoundary,
                "Boundary polygon self-intersects",
            ));
        }
    }

    for (i, zone) in exclusion_zones.iter().enumerate() {
        if zone.vertex_count() < 3 || zone.area() <= f64::EPSILON {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidExclusionZone,
                format!("Exclusion zone {i} is degenerate"),
            ));
        } else if zone.is_self_intersecting() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidExclusionZone,
                format!("Exclusion zone {i} self-intersects"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the asset catalog.
///
/// Checks positive dimensions, non-zero quantities, and that rotation
/// steps evenly divide 360 where rotation is allowed.
pub fn validate_assets(assets: &[AssetDefinition]) -> ValidationResult {
    let mut errors = Vec::new();

    for asset in assets {
        let dims = &asset.dimensions;
        if dims.width <= 0.0 || dims.length <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDimensions,
                format!(
                    "Asset '{}' has non-positive dimensions {}x{}",
                    asset.asset_type, dims.width, dims.length
                ),
            ));
        }
        if asset.quantity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidQuantity,
                format!("Asset '{}' has quantity 0", asset.asset_type),
            ));
        }
        if dims.rotation_allowed {
            let step = dims.rotation_step;
            if step <= 0.0 || (360.0 / step).fract().abs() > 1e-9 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRotationStep,
                    format!(
                        "Asset '{}' rotation step {step}° does not divide 360",
                        asset.asset_type
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
