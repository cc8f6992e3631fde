//! Rendering of snapshots onto drawing surfaces.
//!
//! [`render_snapshot`] walks a snapshot back to front and issues drawing
//! calls in canvas coordinates; the [`RenderSurface`] applies the zoom.
//! [`PixmapSurface`] is the built-in surface, backed by tiny-skia.

use drawkit_core::Color;
use lyon::path::{Event, Path};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::history::Snapshot;
use crate::model::{FontSpec, Geometry, Point, Rect, Shape};
use crate::raster::RasterImage;

/// Drawing backend. All coordinates are canvas units.
pub trait RenderSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Draws `image` with its top-left corner at `at`.
    fn draw_image(&mut self, image: &RasterImage, at: Point);
    fn fill_path(&mut self, path: &Path, color: Color);
    fn stroke_path(&mut self, path: &Path, color: Color, width: f64);
    fn draw_text(&mut self, origin: Point, text: &str, font: &FontSpec, color: Color);
}

/// Draws the background, the base raster and every shape of `snapshot`.
pub fn render_snapshot(snapshot: &Snapshot, surface: &mut dyn RenderSurface) {
    let canvas = Rect::from_points(
        Point::ZERO,
        Point::new(snapshot.width() as f64, snapshot.height() as f64),
    );
    surface.fill_rect(canvas, snapshot.background());
    if let Some(image) = snapshot.image() {
        surface.draw_image(image, snapshot.reference());
    }
    for shape in snapshot.shapes() {
        render_shape(shape, surface);
    }
}

/// Draws one shape.
pub fn render_shape(shape: &Shape, surface: &mut dyn RenderSurface) {
    let params = shape.params();
    match shape.geometry() {
        Geometry::Text(text) => {
            let bounds = shape.bounds();
            if !params.text_background.is_transparent() {
                surface.fill_rect(bounds, params.text_background);
            }
            if let Some(content) = params.text.as_deref().filter(|s| !s.is_empty()) {
                surface.draw_text(
                    text.origin(shape.reference()),
                    content,
                    &params.font(),
                    params.text_color,
                );
            }
        }
        Geometry::Freeform(path) if path.points().len() == 1 => {
            let half = (params.thickness / 2.0).max(0.5);
            surface.fill_rect(Rect::at(shape.reference()).inflate(half), params.stroke_color);
        }
        _ => {
            let outline = shape.outline();
            if shape.is_filled() {
                surface.fill_path(&outline, params.fill_color);
            }
            if params.thickness > 0.0 && !params.stroke_color.is_transparent() {
                surface.stroke_path(&outline, params.stroke_color, params.thickness);
            }
        }
    }
}

/// [`RenderSurface`] drawing into a tiny-skia pixmap without anti-aliasing.
pub struct PixmapSurface {
    pixmap: Pixmap,
    zoom: f64,
}

impl PixmapSurface {
    /// Surface of `width`×`height` pixels. `None` if either side is zero.
    pub fn new(width: u32, height: u32, zoom: f64) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            zoom,
        })
    }

    /// Surface sized to show the whole canvas of `snapshot` at `zoom`.
    pub fn for_snapshot(snapshot: &Snapshot, zoom: f64) -> Option<Self> {
        let side = |v: u32| ((v as f64 * zoom).round() as u32).max(1);
        Self::new(side(snapshot.width()), side(snapshot.height()), zoom)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Copies the pixels out as a premultiplied BGRA raster.
    pub fn to_raster(&self) -> RasterImage {
        let mut data = self.pixmap.data().to_vec();
        for px in data.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        let width = self.pixmap.width();
        // Pixmap rows are tightly packed.
        match RasterImage::from_raw(width, self.pixmap.height(), width * 4, data) {
            Ok(raster) => raster,
            Err(_) => RasterImage::new(width, self.pixmap.height()),
        }
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.zoom as f32, self.zoom as f32)
    }

    fn paint(color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;
        paint
    }
}

impl RenderSurface for PixmapSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = tiny_skia::Rect::from_ltrb(
            rect.min.x as f32,
            rect.min.y as f32,
            rect.max.x as f32,
            rect.max.y as f32,
        ) else {
            return;
        };
        let transform = self.transform();
        self.pixmap
            .fill_rect(r, &Self::paint(color), transform, None);
    }

    fn draw_image(&mut self, image: &RasterImage, at: Point) {
        let mut data = Vec::with_capacity(image.width() as usize * image.height() as usize * 4);
        for y in 0..image.height() {
            for x in 0..image.width() {
                let [b, g, r, a] = image.pixel(x, y);
                data.extend_from_slice(&[r, g, b, a]);
            }
        }
        let Some(size) = tiny_skia::IntSize::from_wh(image.width(), image.height()) else {
            return;
        };
        let Some(source) = Pixmap::from_vec(data, size) else {
            tracing::warn!("Skipping {}x{} image that tiny-skia rejected", image.width(), image.height());
            return;
        };
        let transform = self
            .transform()
            .pre_translate(at.x as f32, at.y as f32);
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            transform,
            None,
        );
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let transform = self.transform();
        self.pixmap
            .fill_path(&path, &Self::paint(color), FillRule::Winding, transform, None);
    }

    fn stroke_path(&mut self, path: &Path, color: Color, width: f64) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let stroke = Stroke {
            width: width as f32,
            ..Default::default()
        };
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &Self::paint(color), &stroke, transform, None);
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: &FontSpec, _color: Color) {
        // No glyph rasterizer; the text box background is all that is drawn.
        tracing::debug!(
            "Skipping glyphs for {:?} in {} at ({:.1}, {:.1})",
            text,
            font,
            origin.x,
            origin.y
        );
    }
}

/// Converts a lyon path into a tiny-skia path. `None` for an empty path.
fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            Event::Begin { at } => pb.move_to(at.x, at.y),
            Event::Line { to, .. } => pb.line_to(to.x, to.y),
            Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}
