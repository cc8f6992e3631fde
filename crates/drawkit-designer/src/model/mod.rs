//! Shape model.
//!
//! A [`Shape`] is a reference point, a kind-specific [`Geometry`] and a set of
//! [`StyleParams`]. Geometry is always stored as offsets from the reference
//! point so that translating a shape only touches one field.
//!
//! Shapes are shared between history snapshots through `Rc`; the only way to
//! obtain a mutable shape is [`clone_if_shared`].

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::rc::Rc;

use lyon::path::Path;

mod freeform;
mod line;
mod oval;
pub(crate) mod polygon;
pub(crate) mod rectangle;
mod style;
mod text;
mod triangle;

pub use freeform::Freeform;
pub use line::Segment;
pub use rectangle::{BoxFrame, BoxShape};
pub use style::{FontSpec, ParamKind, StyleParam, StyleParams, DEFAULT_FONT};
pub use text::Text;
pub use triangle::Triangle;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3-D cross product.
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Vector rotated a quarter turn, `(-y, x)`.
    pub fn perp(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Rotates about the origin by `degrees`.
    pub fn rotated(&self, degrees: f64) -> Point {
        if degrees == 0.0 {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn rotate_about(&self, pivot: Point, degrees: f64) -> Point {
        pivot + (*self - pivot).rotated(degrees)
    }

    /// Component-wise product.
    pub fn scale_by(&self, factors: Point) -> Point {
        Point::new(self.x * factors.x, self.y * factors.y)
    }

    pub(crate) fn to_lyon(self) -> lyon::math::Point {
        lyon::math::point(self.x as f32, self.y as f32)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle, always normalized so that `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Zero-area rectangle at `p`.
    pub fn at(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest rectangle containing every point, `None` for an empty set.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::at(first), |r, p| r.union(&Rect::at(p))))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Inclusive overlap; touching edges count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::from_points(
            self.min - Point::new(amount, amount),
            self.max + Point::new(amount, amount),
        )
    }

    /// True when the rectangle has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// True when the rectangle collapses to a single point.
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Corner positions, walking min, (max.x, min.y), max, (min.x, max.y).
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub(crate) fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.min,
            Corner::TopRight => Point::new(self.max.x, self.min.y),
            Corner::BottomLeft => Point::new(self.min.x, self.max.y),
            Corner::BottomRight => self.max,
            Corner::Start | Corner::End => {
                panic!("{corner:?} is not a box corner")
            }
        }
    }
}

/// Shape kinds with their persistence tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Freeform,
    Line,
    Arrow,
    Triangle,
    Rectangle,
    Oval,
    Text,
}

impl ShapeType {
    pub const ALL: [ShapeType; 7] = [
        ShapeType::Freeform,
        ShapeType::Line,
        ShapeType::Arrow,
        ShapeType::Triangle,
        ShapeType::Rectangle,
        ShapeType::Oval,
        ShapeType::Text,
    ];

    pub fn tag(self) -> u8 {
        match self {
            ShapeType::Freeform => 0,
            ShapeType::Line => 1,
            ShapeType::Arrow => 2,
            ShapeType::Triangle => 3,
            ShapeType::Rectangle => 4,
            ShapeType::Oval => 5,
            ShapeType::Text => 6,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Kinds with an interior that can be filled.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            ShapeType::Triangle | ShapeType::Rectangle | ShapeType::Oval
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Freeform => "freeform",
            ShapeType::Line => "line",
            ShapeType::Arrow => "arrow",
            ShapeType::Triangle => "triangle",
            ShapeType::Rectangle => "rectangle",
            ShapeType::Oval => "oval",
            ShapeType::Text => "text",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resize handle identifiers.
///
/// Box corners are named for an unrotated, unflipped box. Lines and
/// triangles expose `Start` (the reference point) and `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Start,
    End,
}

impl Corner {
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
            Corner::Start => Corner::End,
            Corner::End => Corner::Start,
        }
    }
}

/// Kind-specific geometry, stored relative to the shape's reference point.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Freeform(Freeform),
    Line(Segment),
    Arrow(Segment),
    Triangle(Triangle),
    Rectangle(BoxShape),
    Oval(BoxShape),
    Text(Text),
}

impl Geometry {
    /// Zero-sized geometry of the given kind.
    pub fn new(shape_type: ShapeType) -> Self {
        Self::from_end(shape_type, Point::ZERO)
    }

    /// Geometry described by a single end offset. A freeform path built this
    /// way runs from the reference point to `end`.
    pub fn from_end(shape_type: ShapeType, end: Point) -> Self {
        match shape_type {
            ShapeType::Freeform => {
                let mut path = Freeform::new();
                path.push(end);
                Geometry::Freeform(path)
            }
            ShapeType::Line => Geometry::Line(Segment::new(end)),
            ShapeType::Arrow => Geometry::Arrow(Segment::new(end)),
            ShapeType::Triangle => Geometry::Triangle(Triangle::new(end)),
            ShapeType::Rectangle => Geometry::Rectangle(BoxShape::new(end)),
            ShapeType::Oval => Geometry::Oval(BoxShape::new(end)),
            ShapeType::Text => Geometry::Text(Text::new(end)),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Geometry::Freeform(_) => ShapeType::Freeform,
            Geometry::Line(_) => ShapeType::Line,
            Geometry::Arrow(_) => ShapeType::Arrow,
            Geometry::Triangle(_) => ShapeType::Triangle,
            Geometry::Rectangle(_) => ShapeType::Rectangle,
            Geometry::Oval(_) => ShapeType::Oval,
            Geometry::Text(_) => ShapeType::Text,
        }
    }

    /// Terminal offset: the last path point for freeform, the anchor for text.
    pub fn end(&self) -> Point {
        match self {
            Geometry::Freeform(f) => f.end(),
            Geometry::Line(s) | Geometry::Arrow(s) => s.end,
            Geometry::Triangle(t) => t.end,
            Geometry::Rectangle(b) | Geometry::Oval(b) => b.end,
            Geometry::Text(t) => t.anchor,
        }
    }

    fn scale(&mut self, factor: f64) {
        match self {
            Geometry::Freeform(f) => f.scale(factor),
            Geometry::Line(s) | Geometry::Arrow(s) => s.scale(factor),
            Geometry::Triangle(t) => t.scale(factor),
            Geometry::Rectangle(b) | Geometry::Oval(b) => b.scale(factor),
            Geometry::Text(t) => t.scale(factor),
        }
    }
}

/// A drawable shape: reference point, geometry and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    reference: Point,
    geometry: Geometry,
    params: StyleParams,
}

impl Shape {
    /// New zero-sized shape anchored at `reference`.
    pub fn create(shape_type: ShapeType, reference: Point, params: StyleParams) -> Self {
        Self {
            reference,
            geometry: Geometry::new(shape_type),
            params,
        }
    }

    pub fn from_parts(reference: Point, geometry: Geometry, params: StyleParams) -> Self {
        Self {
            reference,
            geometry,
            params,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.geometry.shape_type()
    }

    pub fn reference(&self) -> Point {
        self.reference
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn params(&self) -> &StyleParams {
        &self.params
    }

    pub fn end(&self) -> Point {
        self.geometry.end()
    }

    pub fn set_param(&mut self, param: StyleParam) {
        self.params.set(param);
    }

    /// True for closed kinds with a non-transparent fill.
    pub fn is_filled(&self) -> bool {
        self.shape_type().is_closed() && !self.params.fill_color.is_transparent()
    }

    /// Updates the terminal geometry during interactive creation.
    ///
    /// `to` is an absolute canvas position. Freeform paths grow by one point
    /// instead of moving an endpoint.
    pub fn layout_new(&mut self, to: Point, constrain: bool) {
        let reference = self.reference;
        match &mut self.geometry {
            Geometry::Freeform(f) => f.layout_new(reference, to, constrain),
            Geometry::Line(s) | Geometry::Arrow(s) => s.layout_new(reference, to, constrain),
            Geometry::Triangle(t) => t.layout_new(reference, to, constrain),
            Geometry::Rectangle(b) | Geometry::Oval(b) => b.layout_new(reference, to, constrain),
            Geometry::Text(t) => t.layout_new(reference, to),
        }
    }

    /// Resizes from `corner`, recomputed from the pre-drag shape `prior`
    /// plus the total pointer delta since the drag started.
    ///
    /// # Panics
    ///
    /// Panics if `prior` is a different kind of shape or `corner` is not one
    /// of this kind's handles.
    pub fn layout(&mut self, prior: &Shape, delta: Point, corner: Corner, constrain: bool) {
        let rotation = prior.params.angle;
        let prior_ref = prior.reference;
        let reference = &mut self.reference;
        match (&mut self.geometry, &prior.geometry) {
            (Geometry::Freeform(f), Geometry::Freeform(p)) => {
                f.layout(reference, prior_ref, p, delta, corner, constrain)
            }
            (Geometry::Line(s), Geometry::Line(p)) | (Geometry::Arrow(s), Geometry::Arrow(p)) => {
                s.layout(reference, prior_ref, p, delta, corner, constrain)
            }
            (Geometry::Triangle(t), Geometry::Triangle(p)) => {
                t.layout(reference, prior_ref, p, delta, corner, constrain)
            }
            (Geometry::Rectangle(b), Geometry::Rectangle(p))
            | (Geometry::Oval(b), Geometry::Oval(p)) => {
                b.layout(reference, prior_ref, p, rotation, delta, corner, constrain)
            }
            (Geometry::Text(_), Geometry::Text(_)) => {
                panic!("text shapes have no resize handles")
            }
            (own, other) => panic!(
                "cannot lay out a {} from a {}",
                own.shape_type(),
                other.shape_type()
            ),
        }
    }

    /// Translates to `prior`'s position plus `delta`.
    pub fn move_from(&mut self, prior: &Shape, delta: Point) {
        assert_eq!(
            self.shape_type(),
            prior.shape_type(),
            "cannot move a shape from a different kind"
        );
        self.reference = prior.reference + delta;
    }

    pub fn translate(&mut self, delta: Point) {
        self.reference += delta;
    }

    /// Scales every coordinate, the stroke thickness, the corner rounding and
    /// the font size by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.reference = self.reference * factor;
        self.geometry.scale(factor);
        self.params.scale(factor);
    }

    /// Geometric bounds, ignoring stroke thickness.
    pub fn bounds(&self) -> Rect {
        let r = self.reference;
        match &self.geometry {
            Geometry::Freeform(f) => f.bounds(r),
            Geometry::Line(s) | Geometry::Arrow(s) => s.bounds(r),
            Geometry::Triangle(t) => t.bounds(r, &self.params),
            Geometry::Rectangle(b) | Geometry::Oval(b) => b.frame(r, self.params.angle).bounds(),
            Geometry::Text(t) => t.bounds(r, &self.params),
        }
    }

    /// Resize handles and their canvas positions.
    pub fn corners(&self) -> Vec<(Corner, Point)> {
        let r = self.reference;
        match &self.geometry {
            Geometry::Freeform(f) => f.corners(r),
            Geometry::Line(s) | Geometry::Arrow(s) => s.corners(r),
            Geometry::Triangle(t) => t.corners(r),
            Geometry::Rectangle(b) | Geometry::Oval(b) => b.frame(r, self.params.angle).handles(),
            Geometry::Text(_) => Vec::new(),
        }
    }

    /// Outline in canvas coordinates.
    pub fn outline(&self) -> Path {
        let r = self.reference;
        match &self.geometry {
            Geometry::Freeform(f) => f.outline(r),
            Geometry::Line(s) => s.outline(r, &self.params, false),
            Geometry::Arrow(s) => s.outline(r, &self.params, true),
            Geometry::Triangle(t) => t.outline(r, &self.params),
            Geometry::Rectangle(b) => rectangle::outline(b.frame(r, self.params.angle), &self.params),
            Geometry::Oval(b) => oval::outline(b.frame(r, self.params.angle)),
            Geometry::Text(t) => t.outline(r, &self.params),
        }
    }
}

/// Returns an exclusively owned shape, cloning it first if any other
/// snapshot still holds a reference.
pub fn clone_if_shared(shape: &mut Rc<Shape>) -> &mut Shape {
    if Rc::strong_count(shape) > 1 {
        tracing::trace!(
            "Cloning shared {} shape ({} refs)",
            shape.shape_type(),
            Rc::strong_count(shape)
        );
    }
    Rc::make_mut(shape)
}

/// Snaps a vector to the nearest multiple of 45 degrees, keeping its length.
pub(crate) fn snap_45(v: Point) -> Point {
    let length = v.length();
    if length == 0.0 {
        return v;
    }
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let directions = [
        Point::new(1.0, 0.0),
        Point::new(s, s),
        Point::new(0.0, 1.0),
        Point::new(-s, s),
        Point::new(-1.0, 0.0),
        Point::new(-s, -s),
        Point::new(0.0, -1.0),
        Point::new(s, -s),
    ];
    let octant = (v.y.atan2(v.x) / std::f64::consts::FRAC_PI_4).round() as i64;
    directions[octant.rem_euclid(8) as usize] * length
}

/// Forces equal magnitudes on both axes, keeping each axis' direction.
pub(crate) fn square(v: Point) -> Point {
    let m = v.x.abs().max(v.y.abs());
    Point::new(sign_or_one(v.x) * m, sign_or_one(v.y) * m)
}

pub(crate) fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
