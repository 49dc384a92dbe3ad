//! Drag state and geometry for a vertically reorderable list.
//!
//! [`DragSession`] tracks one pick-up/move/release gesture. The pure
//! functions in [`layout`] turn the gesture's displacement and the measured
//! row heights into a target index and per-row offsets.

mod error;
pub mod layout;
mod pointer;
mod reorder;
mod session;

pub use error::DndError;
pub use layout::{ItemOffset, Placement, item_offset, target_index};
pub use pointer::{PointerId, PointerInput, PointerSample, TouchPoint};
pub use reorder::{reorder, reordered, revert_order};
pub use session::{DragSession, DragStart, DropResult, Gesture, Heights, MeasureTicket};
