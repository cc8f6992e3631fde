use std::rc::Rc;

use drawkit_core::Color;

use crate::model::{Point, Shape};
use crate::raster::RasterImage;

/// One retained document state.
///
/// Shapes and the base raster are shared with neighbouring snapshots
/// through `Rc`. Only the newest snapshot is ever written to, and only
/// while its step is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: u64,
    width: u32,
    height: u32,
    reference: Point,
    background: Color,
    image: Option<Rc<RasterImage>>,
    pub(crate) shapes: Vec<Rc<Shape>>,
}

impl Snapshot {
    /// Empty canvas.
    pub fn new(id: u64, width: u32, height: u32, background: Color) -> Self {
        Self {
            id,
            width,
            height,
            reference: Point::ZERO,
            background,
            image: None,
            shapes: Vec::new(),
        }
    }

    /// Canvas sized to `image`, with the image as its base raster.
    pub fn with_image(id: u64, image: RasterImage, background: Color) -> Self {
        let mut snapshot = Self::new(id, image.width(), image.height(), background);
        snapshot.image = Some(Rc::new(image));
        snapshot
    }

    /// Copy sharing the raster and every shape, stamped with `id`.
    pub fn fork(&self, id: u64) -> Self {
        Self {
            id,
            image: self.image.clone(),
            shapes: self.shapes.clone(),
            ..*self
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Offset of the base raster from the canvas origin.
    pub fn reference(&self) -> Point {
        self.reference
    }

    pub fn set_reference(&mut self, reference: Point) {
        self.reference = reference;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn image(&self) -> Option<&Rc<RasterImage>> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<RasterImage>) {
        self.image = image.map(Rc::new);
    }

    pub fn shapes(&self) -> &[Rc<Shape>] {
        &self.shapes
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index).map(|s| s.as_ref())
    }

    pub fn push_shape(&mut self, shape: Shape) {
        self.shapes.push(Rc::new(shape));
    }

    /// Equal content, ignoring the id.
    pub fn same_content(&self, other: &Snapshot) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.reference == other.reference
            && self.background == other.background
            && self.image == other.image
            && self.shapes == other.shapes
    }
}
