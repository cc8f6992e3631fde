//! Convex polygon primitives shared by triangle and rectangle geometry and
//! the hit tester.
//!
//! A rounded convex polygon is modelled as its *core* (the outline pushed
//! inward by the corner radius) grown by a disk of that radius. Every test
//! below is then a closed-form distance computation against the core.

use super::Point;

/// Areas at or below this are treated as collapsed polygons.
const AREA_EPSILON: f64 = 1e-9;
const LENGTH_EPSILON: f64 = 1e-12;
/// Line segments used per rounded corner when building outlines.
const ARC_STEPS: usize = 8;

/// Convex polygon with vertices in positive (counter-clockwise in a y-up
/// frame) winding. A collapsed polygon still answers distance queries
/// through its edges.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConvexPolygon {
    points: Vec<Point>,
    degenerate: bool,
}

impl ConvexPolygon {
    pub fn new(mut points: Vec<Point>) -> Self {
        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        let area = signed_area(&points);
        if area < 0.0 {
            points.reverse();
        }
        Self {
            degenerate: area.abs() <= AREA_EPSILON,
            points,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance_to(&b)).sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed distance from each edge line, positive on the inner side.
    fn inward_distances(&self, p: Point) -> impl Iterator<Item = f64> + '_ {
        self.edges().filter_map(move |(a, b)| {
            let d = b - a;
            let len = d.length();
            (len > LENGTH_EPSILON).then(|| d.cross(p - a) / len)
        })
    }

    /// Inclusive containment. A collapsed polygon contains nothing.
    pub fn contains(&self, p: Point) -> bool {
        !self.degenerate && self.inward_distances(p).all(|d| d >= 0.0)
    }

    /// True when `p` lies strictly inside the polygon shrunk by `inset`.
    pub fn contains_inset(&self, p: Point, inset: f64) -> bool {
        !self.degenerate && self.inward_distances(p).all(|d| d > inset)
    }

    /// Euclidean distance from `p` to the polygon, zero inside.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        if self.contains(p) {
            return 0.0;
        }
        self.edges()
            .map(|(a, b)| segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Euclidean distance to another convex polygon, zero when they overlap.
    pub fn distance_to_polygon(&self, other: &[Point]) -> f64 {
        if sat_overlap(&self.points, other) {
            return 0.0;
        }
        let n = other.len();
        let to_self = other
            .iter()
            .flat_map(|p| self.edges().map(move |(a, b)| segment_distance(*p, a, b)));
        let to_other = self.points.iter().flat_map(|p| {
            (0..n).map(move |i| segment_distance(*p, other[i], other[(i + 1) % n]))
        });
        to_self.chain(to_other).fold(f64::INFINITY, f64::min)
    }

    /// Largest radius that can be cut into every corner.
    pub fn max_inset(&self) -> f64 {
        if self.degenerate {
            return 0.0;
        }
        if self.points.len() == 3 {
            // Inradius.
            return 2.0 * self.area() / self.perimeter();
        }
        self.edges()
            .filter_map(|(a, b)| {
                let d = b - a;
                let len = d.length();
                (len > LENGTH_EPSILON).then(|| {
                    self.points
                        .iter()
                        .map(|p| d.cross(*p - a) / len)
                        .fold(0.0, f64::max)
                })
            })
            .fold(f64::INFINITY, f64::min)
            * 0.5
    }

    /// Vertices of the polygon with every edge pushed inward by `inset`.
    /// Vertex `i` sits where the shifted edges `i - 1` and `i` meet.
    pub fn inset_points(&self, inset: f64) -> Vec<Point> {
        let n = self.points.len();
        let shifted: Vec<(Point, Point)> = self
            .edges()
            .map(|(a, b)| {
                let d = b - a;
                let len = d.length();
                let normal = if len > LENGTH_EPSILON {
                    d.perp() * (1.0 / len)
                } else {
                    Point::ZERO
                };
                (a + normal * inset, d)
            })
            .collect();
        (0..n)
            .map(|i| {
                let (p1, d1) = shifted[(i + n - 1) % n];
                let (p2, d2) = shifted[i];
                let denom = d1.cross(d2);
                if denom.abs() <= LENGTH_EPSILON {
                    p2
                } else {
                    p1 + d1 * ((p2 - p1).cross(d2) / denom)
                }
            })
            .collect()
    }
}

/// Convex polygon with rounded corners: the core grown by `radius`.
#[derive(Debug, Clone)]
pub(crate) struct RoundedPolygon {
    pub outline: ConvexPolygon,
    pub core: ConvexPolygon,
    core_points: Vec<Point>,
    pub radius: f64,
}

impl RoundedPolygon {
    pub fn new(vertices: Vec<Point>, corner_round: f64) -> Self {
        let outline = ConvexPolygon::new(vertices);
        let radius = corner_round.max(0.0).min(outline.max_inset());
        let core_points = if radius > 0.0 {
            outline.inset_points(radius)
        } else {
            outline.points().to_vec()
        };
        Self {
            core: ConvexPolygon::new(core_points.clone()),
            core_points,
            outline,
            radius,
        }
    }

    /// True when `p` is within `grow` of the rounded outline's interior.
    pub fn contains_grown(&self, p: Point, grow: f64) -> bool {
        self.core.distance_to_point(p) <= self.radius + grow
    }

    /// True when `p` is strictly inside the rounded outline shrunk by
    /// `shrink`.
    pub fn contains_shrunk(&self, p: Point, shrink: f64) -> bool {
        if self.radius > shrink {
            self.core.distance_to_point(p) < self.radius - shrink
        } else {
            self.outline.contains_inset(p, shrink)
        }
    }

    /// Sampled boundary, arcs approximated by short segments.
    pub fn boundary(&self) -> Vec<Point> {
        if self.radius <= 0.0 || self.outline.is_degenerate() {
            return self.outline.points().to_vec();
        }
        let outward: Vec<Point> = self
            .outline
            .edges()
            .map(|(a, b)| {
                let d = b - a;
                let len = d.length();
                if len > LENGTH_EPSILON {
                    -d.perp() * (1.0 / len)
                } else {
                    Point::ZERO
                }
            })
            .collect();
        let n = outward.len();
        let mut points = Vec::with_capacity(n * (ARC_STEPS + 1));
        for i in 0..n {
            let center = self.core_points[i];
            let from = outward[(i + n - 1) % n];
            let to = outward[i];
            let start = from.y.atan2(from.x);
            let mut sweep = to.y.atan2(to.x) - start;
            while sweep <= -std::f64::consts::PI {
                sweep += std::f64::consts::TAU;
            }
            while sweep > std::f64::consts::PI {
                sweep -= std::f64::consts::TAU;
            }
            for step in 0..=ARC_STEPS {
                let a = start + sweep * step as f64 / ARC_STEPS as f64;
                points.push(center + Point::new(a.cos(), a.sin()) * self.radius);
            }
        }
        points
    }
}

fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].cross(points[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Distance from `p` to the segment `a`-`b`.
pub(crate) fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len2 = d.dot(d);
    if len2 == 0.0 {
        return p.distance_to(&a);
    }
    let t = ((p - a).dot(d) / len2).clamp(0.0, 1.0);
    p.distance_to(&(a + d * t))
}

/// Separating-axis overlap test for two convex point sets. Touching counts
/// as overlap. The canvas axes are always tried, so collapsed inputs
/// (points, segments) are handled.
pub(crate) fn sat_overlap(a: &[Point], b: &[Point]) -> bool {
    let canvas_axes = [Point::new(1.0, 0.0), Point::new(0.0, 1.0)];
    let axes = canvas_axes
        .into_iter()
        .chain(edge_normals(a))
        .chain(edge_normals(b));
    for axis in axes {
        let (a_min, a_max) = project(a, axis);
        let (b_min, b_max) = project(b, axis);
        if a_max < b_min || b_max < a_min {
            return false;
        }
    }
    true
}

fn edge_normals(points: &[Point]) -> impl Iterator<Item = Point> + '_ {
    let n = points.len();
    (0..n).filter_map(move |i| {
        let d = points[(i + 1) % n] - points[i];
        (d.length() > LENGTH_EPSILON).then(|| d.perp())
    })
}

fn project(points: &[Point], axis: Point) -> (f64, f64) {
    points
        .iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}
