/// Source of uniform random choices, swappable for a deterministic one in tests.
pub trait RandomSource: Send + Sync {
    /// Index in `0..len`. Never called with `len == 0`.
    fn next_index(&self, len: usize) -> usize;
}

/// Pick one item, or `None` when `items` is empty.
pub fn choose<'a, T>(random: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    // Clamp so a misbehaving source can't index out of bounds.
    let index = random.next_index(items.len()).min(items.len() - 1);
    items.get(index)
}
