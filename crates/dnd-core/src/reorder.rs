/// Move the item at `from` so that it ends up at `to`.
///
/// # Panics
///
/// Panics if `from` or `to` is out of bounds.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Undo a [`reorder`] with the same indices.
///
/// # Panics
///
/// Panics if `from` or `to` is out of bounds.
pub fn revert_order<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(to);
    items.insert(from, item);
}

/// A copy of `items` with the item at `from` moved to `to`.
///
/// Out-of-range indices never panic: an unknown `from` leaves the copy
/// unchanged, and `to` is clamped to the last position.
pub fn reordered<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut items = items.to_vec();
    if from < items.len() {
        let to = to.min(items.len() - 1);
        reorder(&mut items, from, to);
    }
    items
}
