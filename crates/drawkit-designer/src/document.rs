//! Document facade used by the editor UI.
//!
//! [`Document`] ties a [`DocumentHistory`] to a file path and to the pointer
//! gesture in progress. A gesture starts with [`Document::hit_test`] or
//! [`Document::add_shape`], continues with any number of
//! [`Document::drag_to`] calls carrying absolute canvas positions, and ends
//! with [`Document::end_drag`]. Every drag update is computed from the
//! gesture's start point, so one gesture coalesces into one undo step.

use std::path::{Path, PathBuf};

use drawkit_core::{Color, Result};
use drawkit_settings::{Config, StyleDefaults};

use crate::hit_test;
use crate::history::{DocumentHistory, EditCategory, Snapshot};
use crate::model::{Corner, Point, Rect, Shape, ShapeType, StyleParam, StyleParams};
use crate::raster::{RasterCodec, RasterFormat, RasterImage};
use crate::render::{render_snapshot, PixmapSurface, RenderSurface};
use crate::selection::SelectionSet;
use crate::serialization;

/// Modifiers for [`Document::hit_test`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitMode {
    /// Add to the selection instead of replacing it.
    pub extend: bool,
    /// Start a rectangular marquee instead of picking a shape.
    pub marquee: bool,
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A resize handle of the shape at the index.
    Handle(usize, Corner),
    /// The body of the shape at the index.
    Shape(usize),
    /// A marquee selection was started.
    Marquee,
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Creating,
    Resizing { corner: Corner, start: Point },
    Moving { start: Point },
    Marquee { start: Point, base: SelectionSet },
}

/// An open drawing document.
#[derive(Debug)]
pub struct Document {
    history: DocumentHistory,
    path: Option<PathBuf>,
    gesture: Gesture,
    handle_tolerance_px: f64,
    style_defaults: StyleDefaults,
}

impl Document {
    /// Empty canvas sized and colored from `config`.
    pub fn new(config: &Config) -> Self {
        let history = DocumentHistory::new(
            config.history.capacity.max(2),
            config.canvas.width,
            config.canvas.height,
            config.canvas.background,
        );
        Self::with_history(history, None, config)
    }

    /// Opens a document file.
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = serialization::load_from_file(path)?;
        let history = DocumentHistory::from_snapshot(config.history.capacity.max(2), snapshot);
        tracing::info!("Opened {}", path.display());
        Ok(Self::with_history(history, Some(path.to_path_buf()), config))
    }

    /// New document whose base raster is the image at `path`. The document
    /// itself has no file path until it is saved.
    pub fn import_image(
        path: impl AsRef<Path>,
        codec: &dyn RasterCodec,
        config: &Config,
    ) -> Result<Self> {
        let image = codec.decode(path.as_ref())?;
        let snapshot = Snapshot::with_image(0, image, config.canvas.background);
        let history = DocumentHistory::from_snapshot(config.history.capacity.max(2), snapshot);
        Ok(Self::with_history(history, None, config))
    }

    fn with_history(history: DocumentHistory, path: Option<PathBuf>, config: &Config) -> Self {
        Self {
            history,
            path,
            gesture: Gesture::Idle,
            handle_tolerance_px: config.input.handle_tolerance_px,
            style_defaults: config.style.clone(),
        }
    }

    /// Writes the visible snapshot to `path` and marks it saved.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        serialization::save_to_file(self.history.current(), path)?;
        self.history.mark_saved();
        self.path = Some(path.to_path_buf());
        tracing::info!("Saved {}", path.display());
        Ok(())
    }

    /// Renders the visible snapshot at `zoom` and writes it with `codec`.
    pub fn export_image(
        &self,
        path: impl AsRef<Path>,
        codec: &dyn RasterCodec,
        format: RasterFormat,
        zoom: f64,
    ) -> Result<()> {
        let raster = self.render_image(zoom);
        codec.encode(&raster, path.as_ref(), format)?;
        Ok(())
    }

    pub fn history(&self) -> &DocumentHistory {
        &self.history
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name for window titles, `"Untitled"` before the first save.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn style_defaults(&self) -> &StyleDefaults {
        &self.style_defaults
    }

    pub fn background(&self) -> Color {
        self.history.current().background()
    }

    pub fn set_background(&mut self, color: Color) -> bool {
        self.gesture = Gesture::Idle;
        self.history.set_background(color)
    }

    /// Adds a shape of `shape_type` anchored at `at` and starts a creation
    /// gesture for it. Without `style` the configured defaults apply.
    pub fn add_shape(
        &mut self,
        shape_type: ShapeType,
        at: Point,
        style: Option<StyleParams>,
        at_back: bool,
    ) -> usize {
        let params =
            style.unwrap_or_else(|| StyleParams::from_defaults(&self.style_defaults, shape_type));
        let index = self
            .history
            .add_shape(Shape::create(shape_type, at, params), at_back);
        self.gesture = Gesture::Creating;
        tracing::debug!("Added {} at index {}", shape_type, index);
        index
    }

    /// Resolves a pointer-down at `point` and starts the matching gesture.
    ///
    /// Resize handles of the current shape, then of the selected shapes,
    /// take priority over shape bodies.
    pub fn hit_test(&mut self, point: Point, zoom: f64, mode: HitMode) -> Hit {
        self.history.end_edit();
        if let Some((index, corner)) = self.handle_at(point, zoom) {
            self.history.set_current_shape(Some(index));
            self.gesture = Gesture::Resizing {
                corner,
                start: point,
            };
            return Hit::Handle(index, corner);
        }

        if mode.marquee {
            let base = if mode.extend {
                self.history.selection().clone()
            } else {
                self.history.clear_selection();
                SelectionSet::new()
            };
            self.history.set_current_shape(None);
            self.gesture = Gesture::Marquee { start: point, base };
            return Hit::Marquee;
        }

        match hit_test::topmost_at(self.history.current().shapes(), point) {
            Some(index) => {
                let selected = if mode.extend {
                    self.history.toggle_selection(index)
                } else {
                    if !self.history.selection().contains(index) {
                        self.history.select_only(index);
                    }
                    true
                };
                if selected {
                    self.history.set_current_shape(Some(index));
                    self.gesture = Gesture::Moving { start: point };
                } else {
                    self.history.set_current_shape(None);
                    self.gesture = Gesture::Idle;
                }
                Hit::Shape(index)
            }
            None => {
                if !mode.extend {
                    self.history.clear_selection();
                }
                self.history.set_current_shape(None);
                self.gesture = Gesture::Idle;
                Hit::Nothing
            }
        }
    }

    fn handle_at(&self, point: Point, zoom: f64) -> Option<(usize, Corner)> {
        let shapes = self.history.current().shapes();
        let current = self.history.current_shape();
        let selected = self.history.selection().iter().rev();
        current
            .into_iter()
            .chain(selected.filter(|&i| Some(i) != current))
            .find_map(|index| {
                let shape = shapes.get(index)?;
                hit_test::corner_at(shape, point, self.handle_tolerance_px, zoom)
                    .map(|corner| (index, corner))
            })
    }

    /// Continues the gesture in progress toward `point`. Returns false when
    /// there is no gesture or nothing changed.
    pub fn drag_to(&mut self, point: Point, constrain: bool) -> bool {
        match &self.gesture {
            Gesture::Idle => false,
            Gesture::Creating => {
                let creating = self.step_open(EditCategory::CreateBegin)
                    || self.step_open(EditCategory::CreateDrag);
                if !creating {
                    self.gesture = Gesture::Idle;
                    return false;
                }
                self.history.layout_current_shape(point, constrain);
                true
            }
            Gesture::Resizing { corner, start } => {
                let delta = point - *start;
                if !self.step_open(EditCategory::CornerDrag) && delta == Point::ZERO {
                    return false;
                }
                self.history.resize_current_shape(*corner, delta, constrain);
                true
            }
            Gesture::Moving { start } => {
                let delta = point - *start;
                if !self.step_open(EditCategory::SelectionDrag) && delta == Point::ZERO {
                    return false;
                }
                self.history.move_selection(delta, constrain)
            }
            Gesture::Marquee { start, base } => {
                let rect = Rect::from_points(*start, point);
                let hits = hit_test::all_in_rect(self.history.current().shapes(), rect);
                let selection: Vec<usize> = base.iter().chain(hits).collect();
                self.history.replace_selection(selection);
                true
            }
        }
    }

    fn step_open(&self, category: EditCategory) -> bool {
        self.history.active_category() == Some(category)
    }

    /// Finishes the gesture in progress; the next edit opens a new step.
    pub fn end_drag(&mut self) {
        self.gesture = Gesture::Idle;
        self.history.end_edit();
    }

    pub fn selection(&self) -> &SelectionSet {
        self.history.selection()
    }

    /// Applies a style parameter to the selection. Repeated changes of the
    /// same parameter fold into one undo step.
    pub fn set_style(&mut self, param: StyleParam) -> bool {
        self.gesture = Gesture::Idle;
        self.history.set_style_on_selection(param)
    }

    pub fn delete_selection(&mut self) -> usize {
        self.gesture = Gesture::Idle;
        self.history.delete_selection()
    }

    pub fn clear_selection(&mut self) {
        self.gesture = Gesture::Idle;
        self.history.clear_selection();
        self.history.set_current_shape(None);
    }

    pub fn scale(&mut self, factor: f64) -> bool {
        self.gesture = Gesture::Idle;
        self.history.scale(factor)
    }

    pub fn resize_canvas(&mut self, width: u32, height: u32, anchor_x: f64, anchor_y: f64) -> bool {
        self.gesture = Gesture::Idle;
        self.history.resize_canvas(width, height, anchor_x, anchor_y)
    }

    pub fn raise_current(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        self.history.raise_current()
    }

    pub fn sink_current(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        self.history.sink_current()
    }

    pub fn undo(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn is_modified(&self) -> bool {
        self.history.is_modified()
    }

    /// Draws the visible snapshot onto `surface`.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        render_snapshot(self.history.current(), surface);
    }

    /// Renders the visible snapshot into a new raster at `zoom`.
    pub fn render_image(&self, zoom: f64) -> RasterImage {
        let snapshot = self.history.current();
        match PixmapSurface::for_snapshot(snapshot, zoom) {
            Some(mut surface) => {
                render_snapshot(snapshot, &mut surface);
                surface.to_raster()
            }
            None => RasterImage::new(0, 0),
        }
    }
}
