use lyon::path::Path;

use super::{snap_45, Corner, Point, Rect, StyleParams};

/// Arrow head half-opening angle, degrees.
const ARROW_HEAD_ANGLE: f64 = 25.0;
const ARROW_HEAD_MIN_LENGTH: f64 = 8.0;

/// A straight segment from the reference point to `reference + end`.
/// Used by both lines and arrows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub end: Point,
}

impl Segment {
    pub fn new(end: Point) -> Self {
        Self { end }
    }

    /// Canvas-space endpoints.
    pub fn endpoints(&self, reference: Point) -> (Point, Point) {
        (reference, reference + self.end)
    }

    pub fn layout_new(&mut self, reference: Point, to: Point, constrain: bool) {
        let v = to - reference;
        self.end = if constrain { snap_45(v) } else { v };
    }

    /// Moves one endpoint; the other stays where it was before the drag.
    pub fn layout(
        &mut self,
        reference: &mut Point,
        prior_ref: Point,
        prior: &Segment,
        delta: Point,
        corner: Corner,
        constrain: bool,
    ) {
        let (start, end) = prior.endpoints(prior_ref);
        match corner {
            Corner::Start => {
                let mut v = end - (start + delta);
                if constrain {
                    v = snap_45(v);
                }
                *reference = end - v;
                self.end = v;
            }
            Corner::End => {
                let mut v = end + delta - start;
                if constrain {
                    v = snap_45(v);
                }
                *reference = start;
                self.end = v;
            }
            other => panic!("segments have no {other:?} handle"),
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.end = self.end * factor;
    }

    pub fn bounds(&self, reference: Point) -> Rect {
        let (a, b) = self.endpoints(reference);
        Rect::from_points(a, b)
    }

    pub fn corners(&self, reference: Point) -> Vec<(Corner, Point)> {
        let (a, b) = self.endpoints(reference);
        vec![(Corner::Start, a), (Corner::End, b)]
    }

    pub fn outline(&self, reference: Point, params: &StyleParams, arrow: bool) -> Path {
        let (a, b) = self.endpoints(reference);
        let mut builder = Path::builder();
        builder.begin(a.to_lyon());
        builder.line_to(b.to_lyon());
        builder.end(false);

        if arrow {
            let mut heads = vec![arrow_head(a, b, params.thickness)];
            if params.orientation {
                heads.push(arrow_head(b, a, params.thickness));
            }
            for [left, tip, right] in heads.into_iter().flatten() {
                builder.begin(left.to_lyon());
                builder.line_to(tip.to_lyon());
                builder.line_to(right.to_lyon());
                builder.end(false);
            }
        }
        builder.build()
    }
}

/// Arrow head at `tip` for a shaft coming from `tail`, as
/// `[left wing, tip, right wing]`. `None` for a zero-length shaft.
pub(crate) fn arrow_head(tail: Point, tip: Point, thickness: f64) -> Option<[Point; 3]> {
    let shaft = tip - tail;
    let length = shaft.length();
    if length == 0.0 {
        return None;
    }
    let back = shaft * (-(thickness * 4.0).max(ARROW_HEAD_MIN_LENGTH) / length);
    Some([
        tip + back.rotated(ARROW_HEAD_ANGLE),
        tip,
        tip + back.rotated(-ARROW_HEAD_ANGLE),
    ])
}
