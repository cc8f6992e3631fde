use lyon::path::Path;

use super::polygon::RoundedPolygon;
use super::{snap_45, Corner, Point, Rect, StyleParams};

/// Opening half-angle limits in degrees. Outside them the base width
/// degenerates or explodes.
const MIN_HALF_ANGLE: f64 = 1.0;
const MAX_HALF_ANGLE: f64 = 89.0;

/// Triangle with its base centre at the reference point and its apex at
/// `reference + end`.
///
/// The style's `angle` is the opening half-angle at the apex and
/// `corner_round` bevels every corner. With the orientation flag set the
/// triangle is right-angled instead: the right angle sits at the reference
/// point, one leg runs to the apex and the other runs along the base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangle {
    pub end: Point,
}

impl Triangle {
    pub fn new(end: Point) -> Self {
        Self { end }
    }

    pub fn vertices(&self, reference: Point, params: &StyleParams) -> [Point; 3] {
        let height = self.end.length();
        if height == 0.0 {
            return [reference; 3];
        }
        let across = (self.end * (1.0 / height)).perp();
        let half_angle = params.angle.clamp(MIN_HALF_ANGLE, MAX_HALF_ANGLE);
        let half_base = height * half_angle.to_radians().tan();
        let apex = reference + self.end;
        if params.orientation {
            [reference, apex, reference + across * (2.0 * half_base)]
        } else {
            [reference + across * half_base, apex, reference - across * half_base]
        }
    }

    pub(crate) fn rounded(&self, reference: Point, params: &StyleParams) -> RoundedPolygon {
        RoundedPolygon::new(self.vertices(reference, params).to_vec(), params.corner_round)
    }

    /// With `constrain` the axis snaps to a 45 degree multiple.
    pub fn layout_new(&mut self, reference: Point, to: Point, constrain: bool) {
        let v = to - reference;
        self.end = if constrain { snap_45(v) } else { v };
    }

    /// `Start` moves the base, `End` moves the apex.
    pub fn layout(
        &mut self,
        reference: &mut Point,
        prior_ref: Point,
        prior: &Triangle,
        delta: Point,
        corner: Corner,
        constrain: bool,
    ) {
        let apex = prior_ref + prior.end;
        let snap = |v: Point| if constrain { snap_45(v) } else { v };
        match corner {
            Corner::Start => {
                let v = snap(apex - (prior_ref + delta));
                *reference = apex - v;
                self.end = v;
            }
            Corner::End => {
                *reference = prior_ref;
                self.end = snap(prior.end + delta);
            }
            other => panic!("triangles have no {other:?} handle"),
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.end = self.end * factor;
    }

    pub fn bounds(&self, reference: Point, params: &StyleParams) -> Rect {
        Rect::bounding(self.vertices(reference, params)).unwrap_or(Rect::at(reference))
    }

    pub fn corners(&self, reference: Point) -> Vec<(Corner, Point)> {
        vec![(Corner::Start, reference), (Corner::End, reference + self.end)]
    }

    pub fn outline(&self, reference: Point, params: &StyleParams) -> Path {
        let mut builder = Path::builder();
        let mut points = self.rounded(reference, params).boundary().into_iter();
        if let Some(first) = points.next() {
            builder.begin(first.to_lyon());
            for p in points {
                builder.line_to(p.to_lyon());
            }
            builder.close();
        }
        builder.build()
    }
}
