use serde::{Deserialize, Serialize};

/// Resolve the index the dragged item would occupy after moving `displacement`
/// pixels away from `original_index`.
///
/// The item overtakes a sibling once it has crossed half of that sibling's
/// height. An empty or stale height list, or a non-finite displacement,
/// yields `original_index`.
pub fn target_index(original_index: usize, displacement: f32, heights: &[f32]) -> usize {
    if !displacement.is_finite() {
        return original_index;
    }

    let mut index = original_index;
    let mut remaining = displacement;

    if remaining < 0. {
        while index > 0 {
            let Some(&above) = heights.get(index - 1) else {
                break;
            };
            if remaining >= -above / 2. {
                break;
            }
            index -= 1;
            remaining += above;
        }
    } else {
        while index + 1 < heights.len() {
            let below = heights[index + 1];
            if remaining <= below / 2. {
                break;
            }
            index += 1;
            remaining -= below;
        }
    }

    index
}

/// Where the dragged item currently sits relative to where it started.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub original_index: usize,
    pub target_index: usize,
    pub displacement: f32,
}

impl Placement {
    pub fn resolve(original_index: usize, displacement: f32, heights: &[f32]) -> Self {
        Self {
            original_index,
            target_index: target_index(original_index, displacement, heights),
            displacement,
        }
    }

    /// Offset of the item rendered at `item_index`.
    ///
    /// The dragged item follows the pointer; items strictly between the
    /// original and target positions move by the dragged item's height in the
    /// opposite direction; everything else stays put.
    pub fn offset_for(&self, item_index: usize, heights: &[f32]) -> ItemOffset {
        let Self {
            original_index: from,
            target_index: to,
            displacement,
        } = *self;

        if item_index == from {
            return ItemOffset::active(displacement);
        }

        let dragged_height = heights.get(from).copied().unwrap_or(0.);
        if from < to && from < item_index && to >= item_index {
            ItemOffset::shifted(-dragged_height)
        } else if from > to && from > item_index && to <= item_index {
            ItemOffset::shifted(dragged_height)
        } else {
            ItemOffset::default()
        }
    }
}

/// Vertical offset for one rendered item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemOffset {
    pub offset: f32,
    /// Set for the dragged item, which is stacked above its siblings.
    pub active: bool,
}

impl ItemOffset {
    fn active(offset: f32) -> Self {
        Self {
            offset,
            active: true,
        }
    }

    fn shifted(offset: f32) -> Self {
        Self {
            offset,
            active: false,
        }
    }
}

/// Offset for `item_index`; neutral when no gesture is active.
pub fn item_offset(item_index: usize, placement: Option<&Placement>, heights: &[f32]) -> ItemOffset {
    placement
        .map(|placement| placement.offset_for(item_index, heights))
        .unwrap_or_default()
}
