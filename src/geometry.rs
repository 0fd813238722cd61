//! Planar geometry primitives for site layout.
//!
//! Provides the polygon predicates the optimizer needs: containment,
//! intersection, and distance queries against a site boundary and
//! exclusion zones, plus oriented-rectangle footprint construction.
//!
//! All coordinates are in site units (meters). Polygons are simple
//! closed rings stored without a repeated closing vertex.
//!
//! # Reference
//! - O'Rourke (1998), "Computational Geometry in C", Ch. 1, 7
//! - Shamos & Hoey (1976), geometric intersection problems

use serde::{Deserialize, Serialize};

/// Tolerance for degenerate-case comparisons (coordinates are meters).
const EPS: f64 = 1e-9;

/// A point in site coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A simple polygon (closed ring, vertices in order, no repeated last vertex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from a vertex ring.
    ///
    /// A duplicated closing vertex (GeoJSON-style ring) is dropped.
    pub fn new(mut vertices: Vec<Point>) -> Self {
        if vertices.len() > 1 {
            let first = vertices[0];
            let last = vertices[vertices.len() - 1];
            if first.distance_to(last) < EPS {
                vertices.pop();
            }
        }
        Self { vertices }
    }

    /// Axis-aligned rectangle from corner (x, y) with the given extents.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Rectangle of `width` × `length` centered at `center`, rotated by
    /// `rotation_deg` counterclockwise.
    pub fn oriented_rect(center: Point, width: f64, length: f64, rotation_deg: f64) -> Self {
        let hw = width / 2.0;
        let hl = length / 2.0;
        let corners = [
            (-hw, -hl),
            (hw, -hl),
            (hw, hl),
            (-hw, hl),
        ];

        let (sin_a, cos_a) = rotation_deg.to_radians().sin_cos();
        let vertices = corners
            .iter()
            .map(|&(x, y)| {
                Point::new(
                    center.x + x * cos_a - y * sin_a,
                    center.y + x * sin_a + y * cos_a,
                )
            })
            .collect();

        Self { vertices }
    }

    /// The vertex ring.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Absolute area (shoelace formula).
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for (a, b) in self.edges() {
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Area-weighted centroid. Falls back to the vertex mean for
    /// degenerate (near-zero-area) rings.
    pub fn centroid(&self) -> Point {
        let signed = self.signed_area();
        if signed.abs() < EPS {
            let n = self.vertices.len().max(1) as f64;
            let (sx, sy) = self
                .vertices
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return Point::new(sx / n, sy / n);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in self.edges() {
            let w = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * w;
            cy += (a.y + b.y) * w;
        }
        Point::new(cx / (6.0 * signed), cy / (6.0 * signed))
    }

    /// Axis-aligned bounding box as (min corner, max corner).
    pub fn aabb(&self) -> (Point, Point) {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }

    /// Whether the point lies inside or on the ring (ray casting).
    pub fn contains_point(&self, p: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        // On-edge counts as inside
        for (a, b) in self.edges() {
            if point_segment_distance(p, a, b) < EPS {
                return true;
            }
        }

        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > p.y) != (vj.y > p.y) {
                let x_int = vj.x + (p.y - vj.y) * (vi.x - vj.x) / (vi.y - vj.y);
                if p.x < x_int {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Whether `other` lies entirely within this polygon.
    ///
    /// True iff every vertex of `other` is inside and no edges cross.
    pub fn contains_polygon(&self, other: &Polygon) -> bool {
        if other.vertices.len() < 3 {
            return false;
        }
        if !other.vertices.iter().all(|&v| self.contains_point(v)) {
            return false;
        }
        !self.edges_cross(other)
    }

    /// Whether any edge of this polygon intersects an edge of `other`.
    ///
    /// False when one polygon lies strictly inside the other; use
    /// [`Polygon::intersects`] for the full area test.
    pub fn crosses(&self, other: &Polygon) -> bool {
        self.edges_cross(other)
    }

    /// Whether this polygon and `other` share any area or touch.
    pub fn intersects(&self, other: &Polygon) -> bool {
        if self.vertices.len() < 3 || other.vertices.len() < 3 {
            return false;
        }
        self.edges_cross(other)
            || self.contains_point(other.vertices[0])
            || other.contains_point(self.vertices[0])
    }

    /// Minimum distance from a point to the polygon's exterior ring.
    ///
    /// Measured to the ring itself, so points inside the polygon get the
    /// distance to the nearest edge (setback semantics).
    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.edges()
            .map(|(a, b)| point_segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Minimum distance between two polygons (0 when they intersect).
    pub fn distance_to_polygon(&self, other: &Polygon) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        let d1 = other
            .vertices
            .iter()
            .map(|&v| self.distance_to_point(v))
            .fold(f64::INFINITY, f64::min);
        let d2 = self
            .vertices
            .iter()
            .map(|&v| other.distance_to_point(v))
            .fold(f64::INFINITY, f64::min);
        d1.min(d2)
    }

    /// Whether any two non-adjacent edges cross (degenerate ring check).
    pub fn is_self_intersecting(&self) -> bool {
        let n = self.vertices.len();
        if n < 4 {
            return false;
        }
        for i in 0..n {
            for j in (i + 1)..n {
                // Skip adjacent edges (they share a vertex)
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                let (a1, a2) = (self.vertices[i], self.vertices[(i + 1) % n]);
                let (b1, b2) = (self.vertices[j], self.vertices[(j + 1) % n]);
                if segments_cross_properly(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn edges_cross(&self, other: &Polygon) -> bool {
        for (a1, a2) in self.edges() {
            for (b1, b2) in other.edges() {
                if segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }
}

/// Cross product of (a − o) × (b − o).
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Whether `p` lies on segment [a, b], assuming collinearity.
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}

/// Segment intersection test including collinear overlap and endpoint touch.
fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);

    if ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
    {
        return true;
    }

    (d1.abs() < EPS && on_segment(p3, p4, p1))
        || (d2.abs() < EPS && on_segment(p3, p4, p2))
        || (d3.abs() < EPS && on_segment(p1, p2, p3))
        || (d4.abs() < EPS && on_segment(p1, p2, p4))
}

/// Strict crossing test (excludes shared endpoints and collinear touch).
fn segments_cross_properly(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);

    ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
}

/// Distance from point `p` to segment [a, b].
fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < EPS {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::rectangle(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_area_and_centroid() {
        let sq = Polygon::rectangle(0.0, 0.0, 2.0, 4.0);
        assert!((sq.area() - 8.0).abs() < 1e-12);
        let c = sq.centroid();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_closing_vertex_dropped() {
        let p = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ]);
        assert_eq!(p.vertex_count(), 4);
        assert!((p.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_contains_point() {
        let sq = unit_square();
        assert!(sq.contains_point(Point::new(0.5, 0.5)));
        assert!(sq.contains_point(Point::new(0.0, 0.5))); // on edge
        assert!(!sq.contains_point(Point::new(1.5, 0.5)));
        assert!(!sq.contains_point(Point::new(-0.1, -0.1)));
    }

    #[test]
    fn test_contains_polygon() {
        let outer = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        let inner = Polygon::rectangle(2.0, 2.0, 3.0, 3.0);
        let straddling = Polygon::rectangle(8.0, 8.0, 5.0, 5.0);

        assert!(outer.contains_polygon(&inner));
        assert!(!inner.contains_polygon(&outer));
        assert!(!outer.contains_polygon(&straddling));
    }

    #[test]
    fn test_intersects() {
        let a = Polygon::rectangle(0.0, 0.0, 4.0, 4.0);
        let b = Polygon::rectangle(2.0, 2.0, 4.0, 4.0); // overlaps a
        let c = Polygon::rectangle(10.0, 10.0, 2.0, 2.0); // disjoint
        let d = Polygon::rectangle(1.0, 1.0, 2.0, 2.0); // inside a

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&d)); // containment counts as intersection
    }

    #[test]
    fn test_distance_to_point() {
        let sq = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        // Interior point: distance to nearest edge
        assert!((sq.distance_to_point(Point::new(3.0, 5.0)) - 3.0).abs() < 1e-9);
        // Exterior point
        assert!((sq.distance_to_point(Point::new(13.0, 5.0)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_polygon() {
        let a = Polygon::rectangle(0.0, 0.0, 2.0, 2.0);
        let b = Polygon::rectangle(5.0, 0.0, 2.0, 2.0);
        let c = Polygon::rectangle(1.0, 1.0, 2.0, 2.0);

        assert!((a.distance_to_polygon(&b) - 3.0).abs() < 1e-9);
        assert_eq!(a.distance_to_polygon(&c), 0.0);
    }

    #[test]
    fn test_oriented_rect_rotation() {
        let r0 = Polygon::oriented_rect(Point::new(0.0, 0.0), 4.0, 2.0, 0.0);
        let (min0, max0) = r0.aabb();
        assert!((max0.x - min0.x - 4.0).abs() < 1e-9);
        assert!((max0.y - min0.y - 2.0).abs() < 1e-9);

        // Rotating 90° swaps the extents
        let r90 = Polygon::oriented_rect(Point::new(0.0, 0.0), 4.0, 2.0, 90.0);
        let (min90, max90) = r90.aabb();
        assert!((max90.x - min90.x - 2.0).abs() < 1e-9);
        assert!((max90.y - min90.y - 4.0).abs() < 1e-9);

        // Area is rotation-invariant
        assert!((r90.area() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_intersection() {
        let bowtie = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        ]);
        assert!(bowtie.is_self_intersecting());
        assert!(!unit_square().is_self_intersecting());
    }

    #[test]
    fn test_degenerate_polygon() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(line.area(), 0.0);
        assert!(!line.contains_point(Point::new(0.5, 0.5)));
    }
}
