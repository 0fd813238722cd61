//! Chromosome ↔ layout codec.
//!
//! Maps a flat gene vector to a list of placed assets. Each asset
//! instance consumes three genes: normalized x, normalized y, and
//! normalized rotation. Positions map onto the boundary's axis-aligned
//! bounding box — not the polygon itself — so decoded placements can
//! legitimately fall outside the boundary; rejecting those is the
//! constraint checker's job, not the codec's.
//!
//! Decoding is pure: the same gene vector always yields bit-identical
//! placements.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::geometry::Point;
use crate::models::{AssetDefinition, PlacedAsset, SiteContext};

/// Genes consumed per asset instance (x, y, rotation).
pub const GENES_PER_ASSET: usize = 3;

/// Standard deviation of the center-seed position noise.
const CENTER_SEED_SIGMA: f64 = 0.1;

/// Decodes gene vectors into asset placements for one site.
#[derive(Debug, Clone)]
pub struct LayoutCodec {
    /// Asset instances in decode order: (instance index, definition).
    expanded: Vec<(u32, AssetDefinition)>,
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
}

impl LayoutCodec {
    /// Builds a codec for the given site and asset catalog.
    ///
    /// Definitions are expanded by their quantities and ordered by
    /// descending priority (stable, so equal priorities keep their
    /// declaration order). The gene-index → instance mapping is therefore
    /// deterministic for a given catalog.
    pub fn new(site: &SiteContext, assets: &[AssetDefinition]) -> Self {
        let mut ordered = assets.to_vec();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut expanded = Vec::new();
        for def in &ordered {
            for instance in 0..def.quantity {
                expanded.push((instance, def.clone()));
            }
        }

        let (min, max) = site.bounding_box();
        Self {
            expanded,
            min_x: min.x,
            min_y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    /// Total asset instances to place.
    pub fn total_assets(&self) -> usize {
        self.expanded.len()
    }

    /// Gene vector length (three genes per instance).
    pub fn gene_length(&self) -> usize {
        self.expanded.len() * GENES_PER_ASSET
    }

    /// Decodes a gene vector into placements.
    ///
    /// `genes` must have length [`LayoutCodec::gene_length`].
    pub fn decode(&self, genes: &[f64]) -> Vec<PlacedAsset> {
        debug_assert_eq!(genes.len(), self.gene_length());

        self.expanded
            .iter()
            .enumerate()
            .map(|(i, (instance, def))| {
                let base = i * GENES_PER_ASSET;
                let x = self.min_x + genes[base] * self.width;
                let y = self.min_y + genes[base + 1] * self.height;
                let rotation = self.decode_rotation(genes[base + 2], def);
                PlacedAsset::new(def.clone(), *instance, Point::new(x, y), rotation)
            })
            .collect()
    }

    /// Quantizes a rotation gene to the asset's allowed angles.
    ///
    /// Rotation is always discrete: `floor(gene × steps) mod steps`
    /// selects one of `360 / rotation_step` angles. Assets with a locked
    /// orientation always decode to 0°.
    fn decode_rotation(&self, gene: f64, def: &AssetDefinition) -> f64 {
        if !def.dimensions.rotation_allowed {
            return 0.0;
        }
        let step = def.dimensions.rotation_step;
        let steps = (360.0 / step) as usize;
        let index = (gene * steps as f64) as usize % steps;
        index as f64 * step
    }

    /// Seed genes biasing every asset toward the bounding-box center.
    ///
    /// Positions are 0.5 plus Gaussian noise, clipped to [0, 1];
    /// rotations are 0.
    pub fn center_seed<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let normal = Normal::new(0.0, CENTER_SEED_SIGMA).unwrap();
        let mut genes = vec![0.0; self.gene_length()];
        for i in 0..self.total_assets() {
            let base = i * GENES_PER_ASSET;
            genes[base] = (0.5 + normal.sample(rng)).clamp(0.0, 1.0);
            genes[base + 1] = (0.5 + normal.sample(rng)).clamp(0.0, 1.0);
        }
        genes
    }

    /// Seed genes spreading assets over a `⌈√n⌉`-cell grid covering the
    /// unit square, guaranteeing a geometrically spread starting point.
    pub fn grid_seed(&self) -> Vec<f64> {
        let total = self.total_assets();
        let mut genes = vec![0.0; self.gene_length()];
        if total == 0 {
            return genes;
        }

        let grid_size = (total as f64).sqrt().ceil() as usize;
        for i in 0..total {
            let row = i / grid_size;
            let col = i % grid_size;
            let base = i * GENES_PER_ASSET;
            genes[base] = (col as f64 + 0.5) / grid_size as f64;
            genes[base + 1] = (row as f64 + 0.5) / grid_size as f64;
        }
        genes
    }
}
