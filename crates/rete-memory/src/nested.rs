use std::collections::HashMap;
use std::hash::Hash;

/// Two-level map whose inner maps exist only while they are non-empty.
///
/// Every mutation goes through `insert`/`remove`, which create inner maps on
/// first use and drop them with their last entry. Callers can therefore treat
/// "no inner map" and "empty inner map" as the same state.
#[derive(Debug)]
pub(crate) struct NestedMap<O, I, V> {
    outer: HashMap<O, HashMap<I, V>>,
}

impl<O, I, V> Default for NestedMap<O, I, V> {
    fn default() -> Self {
        Self {
            outer: HashMap::new(),
        }
    }
}

impl<O: Eq + Hash, I: Eq + Hash, V> NestedMap<O, I, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outer: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, outer: &O, inner: &I) -> Option<&V> {
        self.outer.get(outer)?.get(inner)
    }

    pub fn inner(&self, outer: &O) -> Option<&HashMap<I, V>> {
        self.outer.get(outer)
    }

    pub fn contains_outer(&self, outer: &O) -> bool {
        self.outer.contains_key(outer)
    }

    /// Insert or replace. Returns the replaced value and whether the inner map
    /// had to be created.
    pub fn insert(&mut self, outer: O, inner: I, value: V) -> (Option<V>, bool) {
        let mut created = false;
        let previous = self
            .outer
            .entry(outer)
            .or_insert_with(|| {
                created = true;
                HashMap::new()
            })
            .insert(inner, value);
        (previous, created)
    }

    /// Remove one entry. Returns the removed value and whether the inner map
    /// was dropped because it became empty.
    pub fn remove(&mut self, outer: &O, inner: &I) -> Option<(V, bool)> {
        let map = self.outer.get_mut(outer)?;
        let value = map.remove(inner)?;
        let pruned = map.is_empty();
        if pruned {
            self.outer.remove(outer);
        }
        Some((value, pruned))
    }

    pub fn outer_len(&self) -> usize {
        self.outer.len()
    }

    pub fn total_len(&self) -> usize {
        self.outer.values().map(HashMap::len).sum()
    }
}
