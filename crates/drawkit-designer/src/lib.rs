//! # Drawkit Designer
//!
//! Document model for an interactive 2-D drawing editor: a canvas with an
//! optional base raster and a stack of vector shapes, edited through pointer
//! gestures with full undo/redo.
//!
//! ## Core Components
//!
//! - **Shapes**: freeform paths, lines, arrows, triangles, rectangles, ovals
//!   and text, shared between snapshots and cloned on first write
//! - **Hit testing**: closed-form point, marquee and resize-handle queries
//! - **Selection**: indices into the visible snapshot
//! - **History**: bounded ring of snapshots with edit coalescing
//! - **Serialization**: gzip-wrapped binary document files
//! - **Rendering**: snapshot drawing onto a tiny-skia pixmap
//!
//! ## Architecture
//!
//! ```text
//! Document (gestures, file identity)
//!   └── DocumentHistory (undo ring, edit categories)
//!         ├── Snapshot (canvas, raster, Rc<Shape> list)
//!         └── SelectionSet
//!
//! hit_test ── pure queries over Shape geometry
//! render   ── Snapshot -> RenderSurface
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use drawkit_designer::{Document, Point, ShapeType};
//! use drawkit_settings::Config;
//!
//! let mut doc = Document::new(&Config::default());
//! doc.add_shape(ShapeType::Rectangle, Point::new(10.0, 10.0), None, false);
//! doc.drag_to(Point::new(50.0, 50.0), false);
//! doc.end_drag();
//! assert!(doc.is_modified());
//! doc.undo();
//! assert!(!doc.is_modified());
//! ```

pub mod document;
pub mod history;
pub mod model;
pub mod raster;
pub mod render;
pub mod selection;
pub mod serialization;

pub use document::{Document, Hit, HitMode};
pub use history::{DocumentHistory, EditCategory, EditTarget, HistoryRing, Snapshot};
pub use model::{
    clone_if_shared, Corner, FontSpec, Geometry, ParamKind, Point, Rect, Shape, ShapeType,
    StyleParam, StyleParams,
};
pub use raster::{ImageCodec, RasterCodec, RasterFormat, RasterImage};
pub use render::{render_snapshot, PixmapSurface, RenderSurface};
pub use selection::SelectionSet;
