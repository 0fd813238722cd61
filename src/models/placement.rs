//! Placed-asset model.
//!
//! A `PlacedAsset` is one instantiated catalog entry at a concrete
//! position and rotation. Its footprint is derived from position and
//! rotation at construction and can never drift from them: there is no
//! way to set the footprint independently, and repositioning produces
//! a new value with a freshly computed footprint.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};
use crate::models::AssetDefinition;

/// One instantiated asset in a candidate layout.
///
/// Created fresh on every chromosome decode; the gene vector remains the
/// single source of truth for a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedAsset {
    id: String,
    definition: AssetDefinition,
    position: Point,
    rotation_deg: f64,
    footprint: Polygon,
}

impl PlacedAsset {
    /// Creates a placement, deriving the footprint from the definition's
    /// dimensions, the position, and the rotation.
    ///
    /// The id is `{type}_{instance}`, stable across decodes of the same
    /// gene vector.
    pub fn new(
        definition: AssetDefinition,
        instance: u32,
        position: Point,
        rotation_deg: f64,
    ) -> Self {
        let id = format!("{}_{}", definition.asset_type, instance);
        let footprint = Polygon::oriented_rect(
            position,
            definition.dimensions.width,
            definition.dimensions.length,
            rotation_deg,
        );
        Self {
            id,
            definition,
            position,
            rotation_deg,
            footprint,
        }
    }

    /// Returns a copy at a new position/rotation with the footprint
    /// recomputed.
    pub fn moved_to(&self, position: Point, rotation_deg: f64) -> Self {
        Self::new(self.definition.clone(), self.instance_index(), position, rotation_deg)
    }

    /// Stable placement id (`{type}_{instance}`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The asset type of this placement.
    pub fn asset_type(&self) -> crate::models::AssetType {
        self.definition.asset_type
    }

    /// The catalog entry this placement instantiates.
    pub fn definition(&self) -> &AssetDefinition {
        &self.definition
    }

    /// Center position in site coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rotation in degrees.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// The oriented-rectangle footprint in site coordinates.
    pub fn footprint(&self) -> &Polygon {
        &self.footprint
    }

    fn instance_index(&self) -> u32 {
        self.id
            .rsplit('_')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}
