//! Undo history.
//!
//! [`DocumentHistory`] keeps a bounded ring of [`Snapshot`]s. Every edit is
//! tagged with an [`EditCategory`]; consecutive edits of the same category
//! mutate the newest snapshot in place, anything else opens a new step.
//! Opening a step forks the current snapshot, sharing every shape, and then
//! clones only the shapes the category is about to modify.

mod category;
mod ring;
mod snapshot;

use std::rc::Rc;

use drawkit_core::Color;

pub use category::{EditCategory, EditTarget};
pub use ring::HistoryRing;
pub use snapshot::Snapshot;

use crate::model::{clone_if_shared, Corner, Point, Shape, StyleParam};
use crate::selection::SelectionSet;

/// Snapshot history with edit coalescing, selection and save tracking.
#[derive(Debug)]
pub struct DocumentHistory {
    ring: HistoryRing<Snapshot>,
    /// Category of the open step; `None` once the step is closed.
    active: Option<EditCategory>,
    next_id: u64,
    saved_id: u64,
    selection: SelectionSet,
    current_shape: Option<usize>,
}

impl DocumentHistory {
    /// History holding one empty canvas.
    pub fn new(capacity: usize, width: u32, height: u32, background: Color) -> Self {
        Self::from_snapshot(capacity, Snapshot::new(0, width, height, background))
    }

    /// History starting from a loaded snapshot, which counts as saved.
    pub fn from_snapshot(capacity: usize, mut snapshot: Snapshot) -> Self {
        snapshot.set_id(0);
        Self {
            ring: HistoryRing::new(capacity, snapshot),
            active: None,
            next_id: 1,
            saved_id: 0,
            selection: SelectionSet::new(),
            current_shape: None,
        }
    }

    pub fn current(&self) -> &Snapshot {
        self.ring.current()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Index of the shape being created or resized.
    pub fn current_shape(&self) -> Option<usize> {
        self.current_shape
    }

    pub fn active_category(&self) -> Option<EditCategory> {
        self.active
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Id of the oldest retained snapshot.
    pub fn oldest_id(&self) -> u64 {
        self.ring.oldest().id()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.ring.iter()
    }

    pub fn can_undo(&self) -> bool {
        self.ring.position() > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.ring.is_at_tip()
    }

    /// Returns the snapshot an edit of `category` should write to.
    ///
    /// If the newest snapshot is current and its open step has a category
    /// this one continues, that snapshot is returned as is. Otherwise a new
    /// step is opened: the redo branch is dropped, the oldest step is
    /// evicted if the ring is full, the current snapshot is forked and the
    /// shapes targeted by `category` are made exclusively owned.
    ///
    /// # Panics
    ///
    /// Panics if the category targets the current shape and there is none,
    /// or a selected index is out of range.
    pub fn resolve_for_edit(&mut self, category: EditCategory) -> &mut Snapshot {
        let continues = self.active.is_some_and(|active| category.continues(active));
        if !(continues && self.ring.is_at_tip()) {
            self.open_step(category);
        }
        self.ring.current_mut()
    }

    fn open_step(&mut self, category: EditCategory) {
        let id = self.next_id;
        self.next_id += 1;
        let fork = self.ring.current().fork(id);
        if let Some(evicted) = self.ring.push(fork) {
            tracing::debug!(
                "History full, evicted step {} ({} shapes)",
                evicted.id(),
                evicted.shapes().len()
            );
        }

        let snapshot = self.ring.current_mut();
        match category.target() {
            EditTarget::None => {}
            EditTarget::CurrentShape => {
                let Some(index) = self.current_shape else {
                    panic!("{category:?} edit without a current shape");
                };
                clone_if_shared(shape_slot(snapshot, index));
            }
            EditTarget::Selection => {
                for index in self.selection.iter() {
                    clone_if_shared(shape_slot(snapshot, index));
                }
            }
            EditTarget::AllShapes => {
                for shape in &mut snapshot.shapes {
                    clone_if_shared(shape);
                }
            }
        }
        self.active = Some(category);
        tracing::debug!("Opened history step {} for {:?}", id, category);
    }

    /// Closes the open step so the next edit starts a new one.
    pub fn end_edit(&mut self) {
        self.active = None;
    }

    /// Steps back one snapshot. Selection and current shape are cleared.
    pub fn undo(&mut self) -> bool {
        if !self.ring.step_back() {
            return false;
        }
        self.after_jump();
        true
    }

    /// Steps forward one snapshot. Selection and current shape are cleared.
    pub fn redo(&mut self) -> bool {
        if !self.ring.step_forward() {
            return false;
        }
        self.after_jump();
        true
    }

    fn after_jump(&mut self) {
        self.selection.clear();
        self.current_shape = None;
        self.active = None;
        tracing::debug!("Now at history step {}", self.current().id());
    }

    /// Adds `shape` on top, or at the bottom with `at_back`, in a new step.
    /// The shape becomes current and the only selected one. Returns its
    /// index.
    pub fn add_shape(&mut self, shape: Shape, at_back: bool) -> usize {
        let snapshot = self.resolve_for_edit(EditCategory::CreateBegin);
        let index = if at_back {
            snapshot.shapes.insert(0, Rc::new(shape));
            0
        } else {
            snapshot.shapes.push(Rc::new(shape));
            snapshot.shapes.len() - 1
        };
        self.selection.clear();
        self.selection.insert(index);
        self.current_shape = Some(index);
        index
    }

    /// Lays out the shape under creation toward `to`.
    ///
    /// # Panics
    ///
    /// Panics unless the open step was started by [`add_shape`](Self::add_shape).
    pub fn layout_current_shape(&mut self, to: Point, constrain: bool) {
        assert!(
            matches!(
                self.active,
                Some(EditCategory::CreateBegin | EditCategory::CreateDrag)
            ),
            "creation drag without an open creation step"
        );
        let index = self.require_current_shape();
        let snapshot = self.resolve_for_edit(EditCategory::CreateDrag);
        clone_if_shared(shape_slot(snapshot, index)).layout_new(to, constrain);
    }

    /// Resizes the current shape from `corner` by the total drag `delta`.
    pub fn resize_current_shape(&mut self, corner: Corner, delta: Point, constrain: bool) {
        let index = self.require_current_shape();
        self.resolve_for_edit(EditCategory::CornerDrag);
        let prior = self.prior_shape(index);
        let snapshot = self.ring.current_mut();
        clone_if_shared(shape_slot(snapshot, index)).layout(&prior, delta, corner, constrain);
    }

    /// Moves every selected shape by the total drag `delta`. With
    /// `constrain` the motion is locked to the dominant axis. Returns false
    /// when nothing is selected.
    pub fn move_selection(&mut self, delta: Point, constrain: bool) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let delta = if constrain {
            if delta.x.abs() >= delta.y.abs() {
                Point::new(delta.x, 0.0)
            } else {
                Point::new(0.0, delta.y)
            }
        } else {
            delta
        };
        self.resolve_for_edit(EditCategory::SelectionDrag);
        let indices: Vec<usize> = self.selection.iter().collect();
        for index in indices {
            let prior = self.prior_shape(index);
            let snapshot = self.ring.current_mut();
            clone_if_shared(shape_slot(snapshot, index)).move_from(&prior, delta);
        }
        true
    }

    /// Applies `param` to every selected shape. Returns false when nothing
    /// is selected.
    pub fn set_style_on_selection(&mut self, param: StyleParam) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let indices: Vec<usize> = self.selection.iter().collect();
        let snapshot = self.resolve_for_edit(EditCategory::StyleEdit(param.kind()));
        for index in indices {
            clone_if_shared(shape_slot(snapshot, index)).set_param(param.clone());
        }
        true
    }

    /// Removes the selected shapes in one step. Deleting an empty selection
    /// does nothing. Returns the number of shapes removed.
    pub fn delete_selection(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let selection = std::mem::take(&mut self.selection);
        let snapshot = self.resolve_for_edit(EditCategory::Delete);
        let before = snapshot.shapes.len();
        if let Some(last) = selection.last() {
            assert!(last < before, "selected index {last} out of range ({before} shapes)");
        }
        let mut index = 0;
        snapshot.shapes.retain(|_| {
            let keep = !selection.contains(index);
            index += 1;
            keep
        });
        let removed = before - snapshot.shapes.len();
        self.current_shape = None;
        tracing::debug!("Deleted {} shape(s)", removed);
        removed
    }

    /// Moves the current shape to the top of the stack.
    pub fn raise_current(&mut self) -> bool {
        let Some(index) = self.current_shape else {
            return false;
        };
        let top = self.current().shapes().len().saturating_sub(1);
        self.move_current(index, top)
    }

    /// Moves the current shape to the bottom of the stack.
    pub fn sink_current(&mut self) -> bool {
        let Some(index) = self.current_shape else {
            return false;
        };
        self.move_current(index, 0)
    }

    fn move_current(&mut self, from: usize, to: usize) -> bool {
        let len = self.current().shapes().len();
        assert!(from < len, "current shape {from} out of range ({len} shapes)");
        if from == to {
            return false;
        }
        let snapshot = self.resolve_for_edit(EditCategory::ZOrder);
        let shape = snapshot.shapes.remove(from);
        snapshot.shapes.insert(to, shape);
        self.selection.move_index(from, to);
        self.current_shape = Some(to);
        true
    }

    pub fn set_background(&mut self, color: Color) -> bool {
        if self.current().background() == color {
            return false;
        }
        self.resolve_for_edit(EditCategory::Background)
            .set_background(color);
        true
    }

    /// Scales the whole document, base raster included, by `factor`.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not a positive finite number.
    pub fn scale(&mut self, factor: f64) -> bool {
        assert!(
            factor.is_finite() && factor > 0.0,
            "scale factor must be positive, got {factor}"
        );
        if factor == 1.0 {
            return false;
        }
        let scaled = |v: u32| ((v as f64 * factor).round() as u32).max(1);
        let snapshot = self.resolve_for_edit(EditCategory::Scale);
        snapshot.set_size(scaled(snapshot.width()), scaled(snapshot.height()));
        snapshot.set_reference(snapshot.reference() * factor);
        let image = snapshot
            .image()
            .map(|image| image.resized(scaled(image.width()), scaled(image.height())));
        if image.is_some() {
            snapshot.set_image(image);
        }
        for shape in &mut snapshot.shapes {
            clone_if_shared(shape).scale(factor);
        }
        true
    }

    /// Resizes the canvas. The content shifts by the size change times the
    /// anchor factors, so `(0, 0)` grows right and down, `(0.5, 0.5)` grows
    /// evenly and `(1, 1)` grows left and up.
    ///
    /// # Panics
    ///
    /// Panics on a zero width or height.
    pub fn resize_canvas(&mut self, width: u32, height: u32, anchor_x: f64, anchor_y: f64) -> bool {
        assert!(width > 0 && height > 0, "canvas must be at least 1x1");
        let current = self.current();
        if current.width() == width && current.height() == height {
            return false;
        }
        let shift = Point::new(
            (width as f64 - current.width() as f64) * anchor_x,
            (height as f64 - current.height() as f64) * anchor_y,
        );
        let snapshot = self.resolve_for_edit(EditCategory::ResizeCanvas);
        snapshot.set_size(width, height);
        snapshot.set_reference(snapshot.reference() + shift);
        for shape in &mut snapshot.shapes {
            clone_if_shared(shape).translate(shift);
        }
        true
    }

    /// Adds `index` to the selection.
    pub fn select(&mut self, index: usize) {
        self.check_index(index);
        self.selection.insert(index);
        self.active = None;
    }

    /// Flips `index` in the selection; returns whether it is now selected.
    pub fn toggle_selection(&mut self, index: usize) -> bool {
        self.check_index(index);
        self.active = None;
        self.selection.toggle(index)
    }

    pub fn select_only(&mut self, index: usize) {
        self.check_index(index);
        self.selection.clear();
        self.selection.insert(index);
        self.active = None;
    }

    pub fn replace_selection(&mut self, indices: impl IntoIterator<Item = usize>) {
        let selection: SelectionSet = indices.into_iter().collect();
        if let Some(last) = selection.last() {
            self.check_index(last);
        }
        self.selection = selection;
        self.active = None;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.active = None;
    }

    pub fn set_current_shape(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            self.check_index(index);
        }
        self.current_shape = index;
    }

    pub fn mark_saved(&mut self) {
        self.saved_id = self.current().id();
    }

    /// True when the visible snapshot differs from the last saved one.
    pub fn is_modified(&self) -> bool {
        self.current().id() != self.saved_id
    }

    fn require_current_shape(&self) -> usize {
        let Some(index) = self.current_shape else {
            panic!("no current shape");
        };
        self.check_index(index);
        index
    }

    fn check_index(&self, index: usize) {
        let len = self.current().shapes().len();
        assert!(index < len, "shape index {index} out of range ({len} shapes)");
    }

    /// Shape at `index` in the snapshot the open drag started from.
    fn prior_shape(&self, index: usize) -> Rc<Shape> {
        let Some(prior) = self.ring.previous() else {
            panic!("drag step has no prior snapshot");
        };
        let Some(shape) = prior.shapes().get(index) else {
            panic!("shape index {index} missing from prior snapshot");
        };
        Rc::clone(shape)
    }
}

fn shape_slot(snapshot: &mut Snapshot, index: usize) -> &mut Rc<Shape> {
    let len = snapshot.shapes.len();
    let Some(slot) = snapshot.shapes.get_mut(index) else {
        panic!("shape index {index} out of range ({len} shapes)");
    };
    slot
}
