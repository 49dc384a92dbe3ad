use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    DndError, ItemOffset, Placement, PointerId, PointerInput, PointerSample, item_offset, reordered,
};

/// Emitted when a gesture picks up an item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragStart<T> {
    pub item: T,
    pub original_index: usize,
}

/// Emitted exactly once when a gesture is released.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropResult<T> {
    pub original_index: usize,
    pub new_index: usize,
    /// The full list with the move already applied.
    pub items: Vec<T>,
}

impl<T> DropResult<T> {
    /// `original_index - new_index`; negative when the item moved down.
    pub fn index_delta(&self) -> isize {
        self.original_index as isize - self.new_index as isize
    }

    pub fn is_noop(&self) -> bool {
        self.original_index == self.new_index
    }
}

/// Correlates an asynchronous height query with the gesture that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeasureTicket(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Heights {
    #[default]
    Pending,
    Ready(Vec<f32>),
    Failed,
}

impl Heights {
    /// Pending and failed queries read as an empty list, which means "no movement".
    pub fn as_slice(&self) -> &[f32] {
        match self {
            Self::Ready(heights) => heights.as_slice(),
            Self::Pending | Self::Failed => &[],
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// An in-progress gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct Gesture {
    pub original_index: usize,
    pub pointer: PointerId,
    pub start_offset: f32,
    pub current_offset: f32,
    item_count: usize,
    heights: Heights,
    ticket: MeasureTicket,
}

impl Gesture {
    pub fn displacement(&self) -> f32 {
        self.current_offset - self.start_offset
    }

    pub fn heights(&self) -> &Heights {
        &self.heights
    }

    pub fn placement(&self) -> Placement {
        Placement::resolve(
            self.original_index,
            self.displacement(),
            self.heights.as_slice(),
        )
    }
}

/// Drag state for one list. At most one gesture is active at a time.
#[derive(Debug, Default)]
pub struct DragSession {
    gesture: Option<Gesture>,
    next_ticket: u64,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn original_index(&self) -> Option<usize> {
        self.gesture.as_ref().map(|g| g.original_index)
    }

    pub fn pointer(&self) -> Option<PointerId> {
        self.gesture.as_ref().map(|g| g.pointer)
    }

    pub fn start_offset(&self) -> f32 {
        self.gesture.as_ref().map_or(0., |g| g.start_offset)
    }

    pub fn current_offset(&self) -> f32 {
        self.gesture.as_ref().map_or(0., |g| g.current_offset)
    }

    pub fn displacement(&self) -> f32 {
        self.gesture.as_ref().map_or(0., Gesture::displacement)
    }

    pub fn heights(&self) -> &[f32] {
        self.gesture
            .as_ref()
            .map(|g| g.heights.as_slice())
            .unwrap_or_default()
    }

    pub fn heights_pending(&self) -> bool {
        self.gesture
            .as_ref()
            .is_some_and(|g| g.heights.is_pending())
    }

    pub fn placement(&self) -> Option<Placement> {
        self.gesture.as_ref().map(Gesture::placement)
    }

    pub fn target_index(&self) -> Option<usize> {
        self.placement().map(|p| p.target_index)
    }

    pub fn item_offset(&self, item_index: usize) -> ItemOffset {
        item_offset(item_index, self.placement().as_ref(), self.heights())
    }

    /// Offsets for every item, computed against a single placement.
    pub fn offsets(&self, item_count: usize) -> Vec<ItemOffset> {
        let placement = self.placement();
        let heights = self.heights();
        (0..item_count)
            .map(|ix| item_offset(ix, placement.as_ref(), heights))
            .collect()
    }

    /// Pick up `item`, resolved to its first occurrence in `items`.
    ///
    /// Returns `Ok(None)` when a gesture is already active or `item` is not
    /// in the list. On success the
    /// caller must run the height query and hand the result to
    /// [`DragSession::resolve_heights`] with the returned ticket.
    pub fn start<T: PartialEq>(
        &mut self,
        items: &[T],
        item: &T,
        sample: PointerSample,
    ) -> Result<Option<MeasureTicket>, DndError> {
        if self.is_active() {
            trace!("ignoring drag start while a gesture is active");
            return Ok(None);
        }
        let Some(index) = items.iter().position(|candidate| candidate == item) else {
            trace!("ignoring drag start for an item outside the list");
            return Ok(None);
        };
        self.start_at(index, items.len(), sample)
    }

    /// Pick up the item at `index` of a list with `item_count` items.
    ///
    /// An `index` past the end is a caller bug and fails with
    /// [`DndError::ItemNotFound`].
    pub fn start_at(
        &mut self,
        index: usize,
        item_count: usize,
        sample: PointerSample,
    ) -> Result<Option<MeasureTicket>, DndError> {
        if self.is_active() {
            trace!("ignoring drag start while a gesture is active");
            return Ok(None);
        }
        if index >= item_count {
            return Err(DndError::ItemNotFound);
        }

        let ticket = MeasureTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.gesture = Some(Gesture {
            original_index: index,
            pointer: sample.pointer,
            start_offset: sample.position,
            current_offset: sample.position,
            item_count,
            heights: Heights::Pending,
            ticket,
        });
        debug!(index, pointer = ?sample.pointer, position = sample.position, "drag started");
        Ok(Some(ticket))
    }

    /// Complete the height query issued by the gesture that owns `ticket`.
    ///
    /// Returns `Ok(false)` when that gesture has already ended. A failed query
    /// leaves the gesture active with no heights; it is not retried.
    pub fn resolve_heights(
        &mut self,
        ticket: MeasureTicket,
        result: Result<Vec<f32>, DndError>,
    ) -> Result<bool, DndError> {
        let Some(gesture) = self.gesture.as_mut().filter(|g| g.ticket == ticket) else {
            trace!(?ticket, "discarding heights for a finished gesture");
            return Ok(false);
        };

        let result = result.and_then(|heights| {
            if heights.len() == gesture.item_count {
                Ok(heights)
            } else {
                Err(DndError::HeightCountMismatch {
                    expected: gesture.item_count,
                    actual: heights.len(),
                })
            }
        });

        match result {
            Ok(heights) => {
                gesture.heights = Heights::Ready(heights);
                Ok(true)
            }
            Err(err) => {
                warn!(%err, "height query failed; dragging without movement");
                gesture.heights = Heights::Failed;
                Err(err)
            }
        }
    }

    fn matching(&mut self, sample: &PointerSample) -> Option<&mut Gesture> {
        match self.gesture.as_mut() {
            Some(gesture) if gesture.pointer == sample.pointer => Some(gesture),
            Some(gesture) => {
                trace!(active = ?gesture.pointer, got = ?sample.pointer, "ignoring foreign pointer");
                None
            }
            None => None,
        }
    }

    /// Track pointer movement. Returns whether the sample belonged to the gesture.
    pub fn update(&mut self, sample: PointerSample) -> bool {
        match self.matching(&sample) {
            Some(gesture) => {
                gesture.current_offset = sample.position;
                true
            }
            None => false,
        }
    }

    pub fn update_input(&mut self, input: &PointerInput) -> bool {
        match self.pointer().and_then(|pointer| input.sample_for(pointer)) {
            Some(sample) => self.update(sample),
            None => false,
        }
    }

    /// Release the gesture and produce the drop.
    ///
    /// The session is reset before the result is handed back, so whatever the
    /// caller does with it cannot leave a gesture behind.
    pub fn end<T: Clone>(&mut self, items: &[T], sample: PointerSample) -> Option<DropResult<T>> {
        let gesture = self.matching(&sample)?;
        gesture.current_offset = sample.position;
        let placement = gesture.placement();
        self.gesture = None;

        debug!(
            from = placement.original_index,
            to = placement.target_index,
            "drag ended"
        );
        Some(DropResult {
            original_index: placement.original_index,
            new_index: placement.target_index,
            items: reordered(items, placement.original_index, placement.target_index),
        })
    }

    pub fn end_input<T: Clone>(
        &mut self,
        items: &[T],
        input: &PointerInput,
    ) -> Option<DropResult<T>> {
        let sample = self.pointer().and_then(|pointer| input.sample_for(pointer))?;
        self.end(items, sample)
    }

    /// Abandon the active gesture without producing a drop.
    pub fn cancel(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                debug!(index = gesture.original_index, "drag cancelled");
                true
            }
            None => false,
        }
    }
}
