//! Site context model.
//!
//! An immutable per-run snapshot of the site: boundary polygon, exclusion
//! zones, optional slope raster, and entry points, with derived buildable
//! area queries. Created once per optimization run; read-only thereafter.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};

/// A slope raster in degrees, aligned to the top-left of the site
/// boundary's bounding box (row 0 = northernmost cells).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeGrid {
    data: Array2<f64>,
    resolution_m: f64,
}

impl SlopeGrid {
    /// Creates a slope grid with the given cell resolution in meters.
    pub fn new(data: Array2<f64>, resolution_m: f64) -> Self {
        Self { data, resolution_m }
    }

    /// Grid dimensions as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Cell resolution in meters.
    pub fn resolution_m(&self) -> f64 {
        self.resolution_m
    }

    /// Slope in degrees at (row, col), if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }
}

/// Immutable site snapshot for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContext {
    boundary: Polygon,
    exclusion_zones: Vec<Polygon>,
    slope: Option<SlopeGrid>,
    entry_points: Vec<Point>,
    crs: String,
}

impl SiteContext {
    /// Creates a context for the given boundary.
    ///
    /// Degenerate boundaries (zero area, self-intersections) must be
    /// rejected by the caller first; see [`crate::validation::validate_site`].
    pub fn new(boundary: Polygon) -> Self {
        Self {
            boundary,
            exclusion_zones: Vec::new(),
            slope: None,
            entry_points: Vec::new(),
            crs: "EPSG:4326".to_string(),
        }
    }

    /// Sets the exclusion zones.
    pub fn with_exclusion_zones(mut self, zones: Vec<Polygon>) -> Self {
        self.exclusion_zones = zones;
        self
    }

    /// Attaches a slope raster.
    pub fn with_slope_grid(mut self, grid: SlopeGrid) -> Self {
        self.slope = Some(grid);
        self
    }

    /// Sets the site entry points.
    pub fn with_entry_points(mut self, points: Vec<Point>) -> Self {
        self.entry_points = points;
        self
    }

    /// Sets the coordinate reference system label.
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    /// The site boundary polygon.
    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    /// The exclusion zones.
    pub fn exclusion_zones(&self) -> &[Polygon] {
        &self.exclusion_zones
    }

    /// The configured entry points.
    pub fn entry_points(&self) -> &[Point] {
        &self.entry_points
    }

    /// Coordinate reference system label.
    pub fn crs(&self) -> &str {
        &self.crs
    }

    /// Whether slope data is available.
    pub fn has_slope_data(&self) -> bool {
        self.slope.is_some()
    }

    /// Total site area in square meters.
    pub fn area_sqm(&self) -> f64 {
        self.boundary.area()
    }

    /// Buildable area figure: boundary area minus exclusion areas,
    /// clamped at zero. Assumes exclusions lie within the boundary and
    /// do not overlap each other.
    pub fn buildable_area_sqm(&self) -> f64 {
        let excluded: f64 = self.exclusion_zones.iter().map(Polygon::area).sum();
        (self.boundary.area() - excluded).max(0.0)
    }

    /// Boundary bounding box as (min corner, max corner).
    pub fn bounding_box(&self) -> (Point, Point) {
        self.boundary.aabb()
    }

    /// Diagonal length of the bounding box (normalization scale).
    pub fn diagonal(&self) -> f64 {
        let (min, max) = self.bounding_box();
        min.distance_to(max)
    }

    /// Boundary centroid.
    pub fn centroid(&self) -> Point {
        self.boundary.centroid()
    }

    /// The road entry point: first configured entry point, else the
    /// site centroid.
    pub fn entry_point(&self) -> Point {
        self.entry_points
            .first()
            .copied()
            .unwrap_or_else(|| self.centroid())
    }

    /// Whether a footprint lies fully in the buildable area: inside the
    /// boundary and clear of every exclusion zone.
    pub fn in_buildable_area(&self, footprint: &Polygon) -> bool {
        self.boundary.contains_polygon(footprint)
            && self
                .exclusion_zones
                .iter()
                .all(|zone| !zone.intersects(footprint))
    }

    /// Slope in degrees sampled at a site coordinate, if slope data
    /// exists and the point falls inside the grid.
    pub fn slope_at(&self, p: Point) -> Option<f64> {
        let grid = self.slope.as_ref()?;
        let (min, max) = self.bounding_box();

        let col = (p.x - min.x) / grid.resolution_m();
        let row = (max.y - p.y) / grid.resolution_m();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        grid.get(row as usize, col as usize)
    }
}
