use lyon::path::Path;

use super::{sign_or_one, snap_45, Corner, Point, Rect};

/// Freehand path stored as offsets from the reference point. The path is
/// never empty; a freshly created one holds the single point `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Freeform {
    points: Vec<Point>,
}

impl Freeform {
    pub fn new() -> Self {
        Self {
            points: vec![Point::ZERO],
        }
    }

    /// Builds a path from stored offsets. `None` when `points` is empty.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn end(&self) -> Point {
        self.points.last().copied().unwrap_or(Point::ZERO)
    }

    /// Appends an offset unless it repeats the last one.
    pub fn push(&mut self, offset: Point) {
        if self.points.last() != Some(&offset) {
            self.points.push(offset);
        }
    }

    pub fn world_points(&self, reference: Point) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(move |p| reference + *p)
    }

    /// Grows the path toward `to`. With `constrain` the new stretch is
    /// snapped to a 45 degree multiple.
    pub fn layout_new(&mut self, reference: Point, to: Point, constrain: bool) {
        let last = self.end();
        let mut step = to - reference - last;
        if constrain {
            step = snap_45(step);
        }
        self.push(last + step);
    }

    /// Stretches the prior path so its bounding box follows the dragged
    /// corner while the opposite corner stays put. `constrain` keeps the
    /// aspect ratio.
    pub fn layout(
        &mut self,
        reference: &mut Point,
        prior_ref: Point,
        prior: &Freeform,
        delta: Point,
        corner: Corner,
        constrain: bool,
    ) {
        let bounds = prior.bounds(prior_ref);
        let dragged = bounds.corner(corner);
        let fixed = bounds.corner(corner.opposite());

        let ratio = |moved: f64, span: f64| if span == 0.0 { 1.0 } else { moved / span };
        let mut factors = Point::new(
            ratio(dragged.x + delta.x - fixed.x, dragged.x - fixed.x),
            ratio(dragged.y + delta.y - fixed.y, dragged.y - fixed.y),
        );
        if constrain {
            let m = factors.x.abs().max(factors.y.abs());
            factors = Point::new(sign_or_one(factors.x) * m, sign_or_one(factors.y) * m);
        }

        *reference = fixed + (prior_ref - fixed).scale_by(factors);
        self.points = prior.points.iter().map(|p| p.scale_by(factors)).collect();
    }

    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.points {
            *p = *p * factor;
        }
    }

    pub fn bounds(&self, reference: Point) -> Rect {
        Rect::bounding(self.world_points(reference)).unwrap_or(Rect::at(reference))
    }

    pub fn corners(&self, reference: Point) -> Vec<(Corner, Point)> {
        let bounds = self.bounds(reference);
        [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomLeft,
            Corner::BottomRight,
        ]
        .into_iter()
        .map(|c| (c, bounds.corner(c)))
        .collect()
    }

    pub fn outline(&self, reference: Point) -> Path {
        let mut builder = Path::builder();
        let mut points = self.world_points(reference);
        if let Some(first) = points.next() {
            builder.begin(first.to_lyon());
            for p in points {
                builder.line_to(p.to_lyon());
            }
            builder.end(false);
        }
        builder.build()
    }
}

impl Default for Freeform {
    fn default() -> Self {
        Self::new()
    }
}
