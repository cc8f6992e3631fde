use crate::model::ParamKind;

/// Kind of modification an undo step holds.
///
/// Consecutive edits of a category that [continues](EditCategory::continues)
/// the active one are folded into the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCategory {
    /// A shape was added.
    CreateBegin,
    /// The shape being created follows the pointer.
    CreateDrag,
    /// A resize handle is being dragged.
    CornerDrag,
    /// The selection is being dragged.
    SelectionDrag,
    /// One style parameter changed on the selection.
    StyleEdit(ParamKind),
    Delete,
    Background,
    Scale,
    ResizeCanvas,
    ZOrder,
}

/// Shapes an edit category will mutate, cloned eagerly when a step opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    None,
    CurrentShape,
    Selection,
    AllShapes,
}

impl EditCategory {
    /// True if an edit of this category may be folded into the open step of
    /// category `active`. Every shape addition opens its own step.
    pub fn continues(self, active: EditCategory) -> bool {
        match (self, active) {
            (EditCategory::CreateBegin, _) => false,
            (EditCategory::CreateDrag, EditCategory::CreateBegin) => true,
            (category, active) => category == active,
        }
    }

    pub fn target(self) -> EditTarget {
        match self {
            // Deletion and z-order moves only rearrange references.
            EditCategory::CreateBegin
            | EditCategory::Background
            | EditCategory::Delete
            | EditCategory::ZOrder => EditTarget::None,
            EditCategory::CreateDrag | EditCategory::CornerDrag => EditTarget::CurrentShape,
            EditCategory::SelectionDrag | EditCategory::StyleEdit(_) => EditTarget::Selection,
            EditCategory::Scale | EditCategory::ResizeCanvas => EditTarget::AllShapes,
        }
    }
}
