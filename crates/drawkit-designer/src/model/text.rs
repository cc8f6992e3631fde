use lyon::math::{point, Box2D};
use lyon::path::{Path, Winding};

use super::{Point, Rect, StyleParams};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f64 = 0.6;
const LINE_HEIGHT_EM: f64 = 1.2;

/// Text block whose top-left corner sits at `reference + anchor`.
///
/// Glyph layout is left to the renderer; the box used for hit testing and
/// the background fill is estimated from the font size and the character
/// count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub anchor: Point,
}

impl Text {
    pub fn new(anchor: Point) -> Self {
        Self { anchor }
    }

    pub fn origin(&self, reference: Point) -> Point {
        reference + self.anchor
    }

    pub fn layout_new(&mut self, reference: Point, to: Point) {
        self.anchor = to - reference;
    }

    pub fn scale(&mut self, factor: f64) {
        self.anchor = self.anchor * factor;
    }

    pub fn bounds(&self, reference: Point, params: &StyleParams) -> Rect {
        let size = params.font().size;
        let text = params.text.as_deref().unwrap_or("");
        let columns = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let rows = text.lines().count().max(1);
        let origin = self.origin(reference);
        Rect::from_points(
            origin,
            origin
                + Point::new(
                    columns as f64 * size * CHAR_WIDTH_EM,
                    rows as f64 * size * LINE_HEIGHT_EM,
                ),
        )
    }

    pub fn outline(&self, reference: Point, params: &StyleParams) -> Path {
        let bounds = self.bounds(reference, params);
        let mut builder = Path::builder();
        builder.add_rectangle(
            &Box2D::new(
                point(bounds.min.x as f32, bounds.min.y as f32),
                point(bounds.max.x as f32, bounds.max.y as f32),
            ),
            Winding::Positive,
        );
        builder.build()
    }
}
