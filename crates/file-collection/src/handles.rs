//! Integer handle allocation.

use std::collections::BTreeMap;

/// Table of open resources addressed by small integer ids.
///
/// New entries always take the smallest id not currently in use, so a
/// released id is handed out again before the table grows.
#[derive(Debug, Clone)]
pub struct HandlePool<T> {
    entries: BTreeMap<usize, T>,
}

impl<T> Default for HandlePool<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> HandlePool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next [`HandlePool::acquire`] will return.
    pub fn next_id(&self) -> usize {
        // keys are sorted: the first gap is where key and position disagree
        self.entries
            .keys()
            .enumerate()
            .find(|(position, id)| position != *id)
            .map(|(position, _)| position)
            .unwrap_or(self.entries.len())
    }

    /// Store `value` under the smallest free id.
    pub fn acquire(&mut self, value: T) -> usize {
        let id = self.next_id();
        self.entries.insert(id, value);
        id
    }

    /// Remove and return the entry for `id`.
    pub fn release(&mut self, id: usize) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: usize) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: usize) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Open ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Remove every entry.
    pub fn drain(&mut self) -> Vec<(usize, T)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }
}
