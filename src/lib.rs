//! Site-layout optimization for utility-scale solar projects.
//!
//! Places a catalog of site infrastructure assets (battery storage,
//! substation, O&M building, parking, ...) onto an irregular polygonal
//! site, searching for placements that balance earthwork, cable runs,
//! road access, compactness, and capacity under geometric, terrain, and
//! regulatory constraints.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `AssetDefinition`, `SiteContext`,
//!   `PlacedAsset`, `OptimizationConfig`, `LayoutSolution`, `Violation`
//! - **`geometry`**: Polygon predicates and footprint construction
//! - **`ga`**: The genetic-algorithm optimizer
//! - **`validation`**: Fail-fast input checks (degenerate geometry,
//!   bad catalogs)
//! - **`error`**: The crate error type
//!
//! # Usage
//!
//! ```no_run
//! use site_layout::geometry::Polygon;
//! use site_layout::ga::GeneticEngine;
//! use site_layout::models::{default_site_assets, OptimizationConfig, SiteContext};
//!
//! let boundary = Polygon::rectangle(0.0, 0.0, 800.0, 600.0);
//! let site = SiteContext::new(boundary);
//! let config = OptimizationConfig::default().with_seed(42);
//!
//! let mut engine = GeneticEngine::new(site, default_site_assets(), config)?;
//! let result = engine.optimize();
//! for asset in &result.best_solution.placed_assets {
//!     println!("{} at {:?}", asset.id(), asset.position());
//! }
//! # Ok::<(), site_layout::error::LayoutError>(())
//! ```
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Michalewicz & Fogel (2004), "How to Solve It: Modern Heuristics"

pub mod error;
pub mod ga;
pub mod geometry;
pub mod models;
pub mod validation;
