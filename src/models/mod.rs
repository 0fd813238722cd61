//! Site-layout domain models.
//!
//! Provides the core data types for representing asset-placement
//! problems and solutions: the asset catalog, the immutable site
//! snapshot, placed assets with derived footprints, and the optimizer's
//! configuration and output shapes.

mod asset;
mod config;
mod placement;
mod site;
mod solution;

pub use asset::{
    catalog_with_quantities, default_catalog, default_site_assets, AssetConstraints,
    AssetDefinition, AssetDimensions, AssetType,
};
pub use config::{ObjectiveWeights, OptimizationConfig, OptimizationObjective};
pub use placement::PlacedAsset;
pub use site::{SiteContext, SlopeGrid};
pub use solution::{
    LayoutSolution, ObjectiveScores, OptimizationResult, RuleKind, Severity, Violation,
};
