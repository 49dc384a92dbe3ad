mod list;

pub use gpui_dnd_core::{DragStart, DropResult};
pub use list::{DndList, DndListRowState, DndListState, dnd_list};
