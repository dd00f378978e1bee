//! Insertion-ordered component storage keyed by id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::topology::component::ComponentId;

/// Components of one family, iterated in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentStore<T> {
    items: HashMap<ComponentId, T>,
    order: Vec<ComponentId>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> ComponentStore<T> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: ComponentId) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    pub(crate) fn insert(&mut self, id: ComponentId, item: T) {
        if self.items.insert(id, item).is_none() {
            self.order.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: ComponentId) -> Option<T> {
        let removed = self.items.remove(&id)?;
        self.order.retain(|&o| o != id);
        Some(removed)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + Clone + '_ {
        self.order.iter().copied()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + Clone + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn keeps_insertion_order() {
        let mut arena = SlotMap::<ComponentId, ()>::with_key();
        let ids: Vec<_> = (0..4).map(|_| arena.insert(())).collect();
        let mut store = ComponentStore::default();
        for (i, &id) in ids.iter().enumerate().rev() {
            store.insert(id, i);
        }
        assert_eq!(store.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(store.remove(ids[2]), Some(2));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![ids[3], ids[1], ids[0]]);
        assert!(!store.contains(ids[2]));
    }
}
