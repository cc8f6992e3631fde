use lyon::math::{point, Box2D, Transform};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};

use super::{square, Corner, Point, Rect, StyleParams};

/// Box geometry shared by rectangles and ovals: the offset from the
/// reference point to the opposite corner. Signed, so any drag direction
/// is representable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxShape {
    pub end: Point,
}

impl BoxShape {
    pub fn new(end: Point) -> Self {
        Self { end }
    }

    pub fn frame(&self, reference: Point, rotation: f64) -> BoxFrame {
        BoxFrame::new(reference, self.end, rotation)
    }

    /// With `constrain` the box becomes a square.
    pub fn layout_new(&mut self, reference: Point, to: Point, constrain: bool) {
        let v = to - reference;
        self.end = if constrain { square(v) } else { v };
    }

    #[allow(clippy::too_many_arguments)]
    pub fn layout(
        &mut self,
        reference: &mut Point,
        prior_ref: Point,
        prior: &BoxShape,
        rotation: f64,
        delta: Point,
        corner: Corner,
        constrain: bool,
    ) {
        let (r, end) = prior.frame(prior_ref, rotation).drag_corner(corner, delta, constrain);
        *reference = r;
        self.end = end;
    }

    pub fn scale(&mut self, factor: f64) {
        self.end = self.end * factor;
    }
}

/// A box placed on the canvas: centre, non-negative half extents and a
/// rotation in degrees about the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFrame {
    pub center: Point,
    pub half: Point,
    pub rotation: f64,
}

impl BoxFrame {
    pub fn new(reference: Point, end: Point, rotation: f64) -> Self {
        Self {
            center: reference + end * 0.5,
            half: Point::new(end.x.abs() * 0.5, end.y.abs() * 0.5),
            rotation,
        }
    }

    pub fn to_world(&self, local: Point) -> Point {
        self.center + local.rotated(self.rotation)
    }

    pub fn to_local(&self, world: Point) -> Point {
        (world - self.center).rotated(-self.rotation)
    }

    /// Unrotated offset of a corner from the centre.
    pub fn local_corner(&self, corner: Corner) -> Point {
        let (hx, hy) = (self.half.x, self.half.y);
        match corner {
            Corner::TopLeft => Point::new(-hx, -hy),
            Corner::TopRight => Point::new(hx, -hy),
            Corner::BottomLeft => Point::new(-hx, hy),
            Corner::BottomRight => Point::new(hx, hy),
            other => panic!("boxes have no {other:?} handle"),
        }
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.to_world(self.local_corner(corner))
    }

    /// World corners in winding order.
    pub fn polygon(&self) -> Vec<Point> {
        [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomRight,
            Corner::BottomLeft,
        ]
        .into_iter()
        .map(|c| self.corner(c))
        .collect()
    }

    pub fn handles(&self) -> Vec<(Corner, Point)> {
        [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomLeft,
            Corner::BottomRight,
        ]
        .into_iter()
        .map(|c| (c, self.corner(c)))
        .collect()
    }

    pub fn bounds(&self) -> Rect {
        Rect::bounding(self.polygon()).unwrap_or(Rect::at(self.center))
    }

    /// Drags `corner` by `delta` keeping the opposite corner fixed on the
    /// canvas. Returns the new `(reference, end)` pair.
    pub fn drag_corner(&self, corner: Corner, delta: Point, constrain: bool) -> (Point, Point) {
        let fixed = self.corner(corner.opposite());
        let moved = self.corner(corner) + delta;
        let mut diagonal = (moved - fixed).rotated(-self.rotation);
        if constrain {
            diagonal = square(diagonal);
        }
        let center = fixed + diagonal.rotated(self.rotation) * 0.5;
        (center - diagonal * 0.5, diagonal)
    }

    /// Rotation about the centre followed by translation to it.
    pub(crate) fn transform(&self) -> Transform {
        let mut transform = Transform::identity();
        if self.rotation.abs() > 1e-9 {
            transform = transform
                .then_rotate(lyon::math::Angle::radians(self.rotation.to_radians() as f32));
        }
        transform.then_translate(lyon::math::vector(
            self.center.x as f32,
            self.center.y as f32,
        ))
    }
}

/// Effective corner radius: never more than half the shorter side.
pub(crate) fn clamp_round(frame: &BoxFrame, corner_round: f64) -> f64 {
    corner_round.max(0.0).min(frame.half.x.min(frame.half.y))
}

pub(crate) fn outline(frame: BoxFrame, params: &StyleParams) -> Path {
    let (hx, hy) = (frame.half.x as f32, frame.half.y as f32);
    let rect = Box2D::new(point(-hx, -hy), point(hx, hy));
    let radius = clamp_round(&frame, params.corner_round);

    let mut builder = Path::builder();
    if radius > 0.0 {
        builder.add_rounded_rectangle(&rect, &BorderRadii::new(radius as f32), Winding::Positive);
    } else {
        builder.add_rectangle(&rect, Winding::Positive);
    }
    builder.build().transformed(&frame.transform())
}
