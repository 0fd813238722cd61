//! Crate error type.
//!
//! Two user-visible failure classes: invalid input (bad geometry or an
//! out-of-range configuration — a client error at the API boundary) and
//! internal computation failure. Infeasible constraint combinations are
//! *not* errors; the optimizer returns its best attempt with
//! `is_valid = false` instead.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias for site-layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors produced by the layout optimizer.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Site geometry failed validation (degenerate or self-intersecting
    /// polygons, bad exclusion zones).
    #[error("invalid site geometry: {}", format_validation_errors(.0))]
    InvalidGeometry(Vec<ValidationError>),

    /// Asset catalog failed validation.
    #[error("invalid asset catalog: {}", format_validation_errors(.0))]
    InvalidAssets(Vec<ValidationError>),

    /// Optimization configuration outside its documented ranges.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal failure during evaluation. Never wraps a partial result.
    #[error("computation failed: {0}")]
    Computation(String),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_error_display() {
        let err = LayoutError::InvalidGeometry(vec![ValidationError {
            kind: ValidationErrorKind::ZeroAreaBoundary,
            message: "Boundary area is zero".to_string(),
        }]);
        assert_eq!(
            err.to_string(),
            "invalid site geometry: Boundary area is zero"
        );

        let cfg = LayoutError::InvalidConfig("population_size 5 outside [10, 500]".to_string());
        assert!(cfg.to_string().starts_with("invalid configuration"));
    }
}
